/// Output formatting: terminal tier table and JSON.
use serde::Serialize;
use tierrank_core::{Item, SortStats, TierList};

#[derive(Serialize)]
struct JsonItem {
    rank: usize,
    name: String,
    score: f64,
    tier: String,
}

#[derive(Serialize)]
struct JsonTier {
    label: String,
    threshold: f64,
    items: Vec<String>,
}

#[derive(Serialize)]
struct JsonOutput {
    title: String,
    tiers: Vec<JsonTier>,
    items: Vec<JsonItem>,
    total_comparisons: usize,
    elapsed_seconds: f64,
}

fn tier_label<'a>(item: &Item, tiers: &'a TierList) -> &'a str {
    item.tier
        .and_then(|id| tiers.tier(id))
        .map(|t| t.label.as_str())
        .unwrap_or("-")
}

/// Print the tier grid and the ranked score list.
pub fn print_table(title: &str, items: &[Item], tiers: &TierList, stats: SortStats) {
    println!();
    println!("{title}");
    println!("{}", "=".repeat(title.chars().count().max(4)));

    let label_width = tiers
        .tiers()
        .iter()
        .map(|t| t.label.len())
        .max()
        .unwrap_or(1);

    for tier in tiers.tiers() {
        let members: Vec<&str> = items
            .iter()
            .filter(|item| item.tier == Some(tier.id))
            .map(|item| item.text.as_str())
            .collect();
        println!("{:>label_width$} | {}", tier.label, members.join(", "));
    }

    // Find the widest item name for padding
    let name_width = items
        .iter()
        .map(|item| item.text.len())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Item"

    println!();
    println!(" # | {:<name_width$} | Score | Tier", "Item");
    println!("---|-{}-|-------|-----", "-".repeat(name_width));
    for (i, item) in items.iter().enumerate() {
        println!(
            "{:>2} | {:<name_width$} | {:>5.1} | {}",
            i + 1,
            item.text,
            item.score.unwrap_or(0.0),
            tier_label(item, tiers),
        );
    }

    println!(
        "\n{} items ranked in {} comparisons ({:.1}s)",
        items.len(),
        stats.comparisons,
        stats.elapsed.as_secs_f64(),
    );
}

/// Print the same results as JSON.
pub fn print_json(title: &str, items: &[Item], tiers: &TierList, stats: SortStats) {
    let json_tiers: Vec<JsonTier> = tiers
        .tiers()
        .iter()
        .map(|tier| JsonTier {
            label: tier.label.clone(),
            threshold: tier.threshold,
            items: items
                .iter()
                .filter(|item| item.tier == Some(tier.id))
                .map(|item| item.text.clone())
                .collect(),
        })
        .collect();

    let json_items: Vec<JsonItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| JsonItem {
            rank: i + 1,
            name: item.text.clone(),
            score: item.score.unwrap_or(0.0),
            tier: tier_label(item, tiers).to_string(),
        })
        .collect();

    let output = JsonOutput {
        title: title.to_string(),
        tiers: json_tiers,
        items: json_items,
        total_comparisons: stats.comparisons,
        elapsed_seconds: stats.elapsed.as_secs_f64(),
    };

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
