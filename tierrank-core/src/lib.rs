/// tierrank-core: interactive comparison-based ranking engine.
///
/// Ranks a collection of items into tiers by asking a human (or any other
/// oracle) a minimal sequence of relative-comparison questions. No IO, no
/// rendering — bring your own prompt surface.
///
/// The flow: a quick **seeding** pass buckets every item coarsely, the
/// **sort engine** orders each bucket with a stable merge sort (two-item
/// questions) or a ternary insertion sort (three-item questions), and the
/// final order gets percentile **scores** and threshold-based **tier**
/// assignments. Every answer is journaled, so the whole run supports undo,
/// deferred ("skipped") comparisons, and deterministic replay.
///
/// Items are identified by caller-provided `i64` IDs; texts may repeat.
///
/// # Quick start
///
/// ```rust
/// use tierrank_core::{Item, Mode, Outcome, Prompt, SortSession, TierList};
///
/// let items = vec![
///     Item::new(1, "pizza"),
///     Item::new(2, "sushi"),
///     Item::new(3, "tacos"),
/// ];
///
/// let mut session = SortSession::new(items, Mode::Pairwise).unwrap();
/// session.start().unwrap();
/// session.skip_seeding().unwrap(); // or answer seed prompts one by one
///
/// loop {
///     match session.prompt() {
///         Prompt::Compare { first, second, .. } => {
///             // Ask your user; here: shorter name wins.
///             let outcome = if first.text.len() <= second.text.len() {
///                 Outcome::Greater
///             } else {
///                 Outcome::Less
///             };
///             session.answer_comparison(outcome).unwrap();
///         }
///         Prompt::Done { stats } => {
///             println!("done in {} comparisons", stats.comparisons);
///             break;
///         }
///         _ => unreachable!("pairwise runs only ask two-item questions"),
///     }
/// }
///
/// let mut tiers = TierList::standard();
/// tiers.set_initial_thresholds();
/// let mut ranked = session.items().to_vec();
/// tiers.assign(&mut ranked);
/// ```

pub mod color;
pub mod constants;
mod decisions;
mod history;
pub mod scoring;
pub mod seeding;
pub mod session;
pub mod sorter;
pub mod types;

// Re-export primary public API at crate root.
pub use scoring::{assign_scores, Tier, TierList};
pub use seeding::{default_seed_tiers, SeedTier};
pub use session::{Prompt, SortSession};
pub use sorter::{merge_sort, ternary_insertion_sort, Oracle, Suspended};
pub use types::{
    Decision, DecisionResult, Item, ItemId, Mode, Outcome, Progress, RankSnapshot, SessionError,
    SortStats, TierId,
};
