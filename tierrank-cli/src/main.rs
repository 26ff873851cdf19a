mod config;
mod interactive;
mod output;

use clap::Parser;
use std::path::PathBuf;
use tierrank_core::{Item, Mode, SortSession, TierList};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "tierrank", version, about = "Rank items into tiers with guided comparisons")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Rank a list of items interactively
    Rank(RankArgs),
    /// Create a default config file at ~/.config/tierrank/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// File with one item per line, or a JSON array of strings
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline item (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,

    /// Comparison mode: "pairwise" (2 at a time, ties allowed) or
    /// "triwise" (3 at a time, ranked strictly)
    #[arg(long)]
    mode: Option<String>,

    /// Skip the seeding stage; every item starts in the mid bucket
    #[arg(long)]
    skip_seeding: bool,

    /// Number of result tiers, 1-8
    #[arg(long)]
    tiers: Option<usize>,

    /// Title printed above the results
    #[arg(long)]
    title: Option<String>,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Show run statistics on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/tierrank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Tier bands offered via --tiers, best first. Thresholds are equal-width
/// over however many are used.
const TIER_BANDS: [(&str, &str); 8] = [
    ("S", "#ff7f7f"),
    ("A", "#ffbf7f"),
    ("B", "#ffff7f"),
    ("C", "#7fff7f"),
    ("D", "#7fbfff"),
    ("E", "#bf7fff"),
    ("F", "#ff7fbf"),
    ("G", "#cccccc"),
];

/// Parse a string as either a JSON array of strings or plain text (one item
/// per line).
fn parse_items_from_str(content: &str) -> Vec<String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        // Try JSON array
        let items: Vec<String> = serde_json::from_str(trimmed)
            .unwrap_or_else(|e| bail(format!("File looks like JSON but failed to parse: {e}")));
        items.into_iter().filter(|s| !s.trim().is_empty()).collect()
    } else {
        // Plain text, one item per line
        trimmed
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Load items from --items file and --item inline args. Stdin is reserved
/// for the interactive answers, so items cannot be piped in.
fn load_items(args: &RankArgs) -> Vec<String> {
    let mut items = Vec::new();

    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())));
        items = parse_items_from_str(&content);
    }

    items.extend(args.inline_items.iter().cloned());

    if items.is_empty() {
        bail("No items provided. Use --items <file> or --item <name>.");
    }
    if items.len() < 2 {
        bail(format!("Need at least 2 items to rank, got {}", items.len()));
    }
    items
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => run_rank(args),
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default mode, tier count, and title.");
        }
    }
}

fn run_rank(args: RankArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let mode = match args.mode.as_deref().or(cfg.mode.as_deref()) {
        None | Some("pairwise") | Some("2") => Mode::Pairwise,
        Some("triwise") | Some("3") => Mode::Triwise,
        Some(other) => bail(format!(
            "Unknown mode \"{other}\". Use \"pairwise\" or \"triwise\"."
        )),
    };

    let tier_count = args.tiers.or(cfg.tiers).unwrap_or(5);
    if !(1..=TIER_BANDS.len()).contains(&tier_count) {
        bail(format!("--tiers must be between 1 and {}", TIER_BANDS.len()));
    }

    let title = args
        .title
        .clone()
        .or(cfg.title)
        .unwrap_or_else(|| "Tier List".to_string());

    let texts = load_items(&args);
    let items: Vec<Item> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| Item::new(i as i64, text.clone()))
        .collect();

    if args.verbose {
        let mode_name = match mode {
            Mode::Pairwise => "pairwise",
            Mode::Triwise => "triwise",
        };
        eprintln!("Ranking {} items in {mode_name} mode", items.len());
    }

    let mut session = match SortSession::new(items, mode) {
        Ok(session) => session,
        Err(e) => bail(e),
    };
    session.start().unwrap_or_else(|e| bail(e));
    if args.skip_seeding {
        session.skip_seeding().unwrap_or_else(|e| bail(e));
    }

    if !interactive::run(&mut session, args.verbose) {
        eprintln!("Sort aborted.");
        return;
    }

    let mut tiers = TierList::from_bands(TIER_BANDS[..tier_count].iter().copied());
    let mut ranked = session.items().to_vec();
    tiers.assign(&mut ranked);

    let Some((_, stats)) = session.result() else {
        bail("The sort ended without a result.");
    };

    if args.json {
        output::print_json(&title, &ranked, &tiers, stats);
    } else {
        output::print_table(&title, &ranked, &tiers, stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items_plain_lines() {
        let items = parse_items_from_str("pizza\n  sushi  \n\ntacos\n");
        assert_eq!(items, vec!["pizza", "sushi", "tacos"]);
    }

    #[test]
    fn test_parse_items_json_array() {
        let items = parse_items_from_str(r#"["pizza", "sushi", ""]"#);
        assert_eq!(items, vec!["pizza", "sushi"]);
    }
}
