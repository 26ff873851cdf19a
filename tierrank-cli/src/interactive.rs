/// The human oracle: relays engine prompts to the terminal and reads
/// one-line answers from stdin.
use std::io::{self, BufRead};

use tierrank_core::{ItemId, Outcome, Prompt, SortSession};

/// What kind of answer the printed prompt expects.
enum Step {
    Seed { values: Vec<i32> },
    Pair { tie_allowed: bool },
    Triple { ids: [ItemId; 3] },
}

/// Drive the session until it completes or the user aborts.
/// Returns true when the run completed.
pub fn run(session: &mut SortSession, verbose: bool) -> bool {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let step = match session.prompt() {
            Prompt::Idle => return false,
            Prompt::Seed {
                item,
                tiers,
                progress,
            } => {
                println!();
                println!(
                    "Seeding {} of {}: {}",
                    progress.current, progress.total, item.text
                );
                for (i, tier) in tiers.iter().enumerate() {
                    println!("  {}) {}", i + 1, tier.label);
                }
                print_hint("choose a tier; s = skip seeding, q = abort");
                Step::Seed {
                    values: tiers.iter().map(|t| t.value).collect(),
                }
            }
            Prompt::Compare {
                first,
                second,
                tie_allowed,
                progress,
            } => {
                println!();
                println!("Comparison {} of ~{}", progress.current, progress.total);
                println!("  1) {}", first.text);
                println!("  2) {}", second.text);
                if tie_allowed {
                    print_hint("1 or 2 = winner; t = tie, s = skip, u = undo, q = abort");
                } else {
                    print_hint("deferred earlier, tie no longer allowed; 1 or 2 = winner, q = abort");
                }
                Step::Pair { tie_allowed }
            }
            Prompt::Rank { items, progress } => {
                println!();
                println!("Comparison {} of ~{}", progress.current, progress.total);
                for (i, item) in items.iter().enumerate() {
                    println!("  {}) {}", i + 1, item.text);
                }
                print_hint("rank best to worst, e.g. 231; u = undo, q = abort");
                Step::Triple {
                    ids: [items[0].id, items[1].id, items[2].id],
                }
            }
            Prompt::Done { stats } => {
                if verbose {
                    eprintln!(
                        "Sorted in {} comparisons ({:.1}s)",
                        stats.comparisons,
                        stats.elapsed.as_secs_f64()
                    );
                }
                return true;
            }
        };

        let Some(line) = read_line(&mut lines) else {
            // Stdin closed mid-run: nothing left to answer with.
            session.abort();
            return false;
        };
        let input = line.trim().to_lowercase();

        match step {
            Step::Seed { values } => match input.as_str() {
                "q" => {
                    session.abort();
                    return false;
                }
                "s" => {
                    let _ = session.skip_seeding();
                }
                other => match other.parse::<usize>() {
                    Ok(choice) if (1..=values.len()).contains(&choice) => {
                        if let Err(e) = session.answer_seed(values[choice - 1]) {
                            println!("{e}");
                        }
                    }
                    _ => println!("Pick a tier number between 1 and {}.", values.len()),
                },
            },
            Step::Pair { tie_allowed } => match input.as_str() {
                "1" => answer(session, Outcome::Greater),
                "2" => answer(session, Outcome::Less),
                "t" | "0" => {
                    if tie_allowed {
                        answer(session, Outcome::Tie);
                    } else {
                        println!("A tie is not accepted here — pick a winner.");
                    }
                }
                "s" => {
                    if !session.skip() {
                        println!("This comparison cannot be skipped.");
                    }
                }
                "u" => {
                    if !session.undo() {
                        println!("Nothing to undo.");
                    }
                }
                "q" => {
                    session.abort();
                    return false;
                }
                _ => println!("Unrecognized answer."),
            },
            Step::Triple { ids } => match input.as_str() {
                "u" => {
                    if !session.undo() {
                        println!("Nothing to undo.");
                    }
                }
                "q" => {
                    session.abort();
                    return false;
                }
                other => match parse_ranking(other, ids) {
                    Some(ranked) => {
                        if let Err(e) = session.answer_ranking(ranked) {
                            println!("{e}");
                        }
                    }
                    None => println!("Enter the three positions best to worst, e.g. 231."),
                },
            },
        }
    }
}

fn answer(session: &mut SortSession, outcome: Outcome) {
    if let Err(e) = session.answer_comparison(outcome) {
        println!("{e}");
    }
}

fn read_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Option<String> {
    match lines.next() {
        Some(Ok(line)) => Some(line),
        _ => None,
    }
}

fn print_hint(hint: &str) {
    println!("  [{hint}]");
}

/// Parse a permutation like "231" into ranked ids, best first: "231" means
/// the second displayed item is best, then the third, then the first.
fn parse_ranking(input: &str, ids: [ItemId; 3]) -> Option<[ItemId; 3]> {
    let digits: Vec<usize> = input
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as usize))
        .collect::<Option<_>>()?;
    if digits.len() != 3 {
        return None;
    }
    let mut sorted = digits.clone();
    sorted.sort_unstable();
    if sorted != [1, 2, 3] {
        return None;
    }
    Some([ids[digits[0] - 1], ids[digits[1] - 1], ids[digits[2] - 1]])
}
