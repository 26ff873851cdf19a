/// The interactive sort session: one explicit object owning all run state.
///
/// The engine never blocks — it is a state machine with a single pending
/// question slot. A **pass** runs the grouped sort from the top against the
/// decision log: recorded answers replay, the first unanswered question
/// suspends the pass and becomes the pending prompt. Each new answer is
/// appended to the log and the pass re-runs; replay makes the re-run
/// deterministic and cheap. Undo is the same mechanism backwards: pop one
/// decision, re-run, and exactly one previously answered question comes
/// back.
///
/// Control flow: `start()` → seeding prompts → grouped sorting prompts →
/// (skip resolution prompts) → done, with scores assigned to the final
/// order. `abort()` resets to the pre-sort state at any point.
use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use tracing::debug;

use crate::decisions::DecisionLog;
use crate::history::RankHistory;
use crate::scoring::assign_scores;
use crate::seeding::{default_seed_tiers, SeedTier, Seeding};
use crate::sorter::{merge_sort, ternary_insertion_sort, Oracle, Suspended};
use crate::types::{
    Decision, DecisionResult, Item, ItemId, Mode, Outcome, Progress, RankSnapshot, SessionError,
    SortStats,
};

/// What the session needs from its driver right now.
#[derive(Debug)]
pub enum Prompt<'a> {
    /// Nothing running: not started, or aborted.
    Idle,
    /// Place one item into a seed bucket.
    Seed {
        item: &'a Item,
        tiers: &'a [SeedTier],
        progress: Progress,
    },
    /// Order two items. `tie_allowed` is false while resolving a skipped
    /// comparison.
    Compare {
        first: &'a Item,
        second: &'a Item,
        tie_allowed: bool,
        progress: Progress,
    },
    /// Rank three items best to worst.
    Rank {
        items: [&'a Item; 3],
        progress: Progress,
    },
    /// The run finished; `items()` holds the scored final order.
    Done { stats: SortStats },
}

#[derive(Debug, Clone)]
enum PendingQuestion {
    Pair(Item, Item),
    Triple(Item, Item, Item),
}

#[derive(Debug)]
enum Phase {
    Idle,
    Seeding,
    Sorting {
        pending: PendingQuestion,
        progress: Progress,
    },
    ResolvingSkips {
        order: Vec<Item>,
        queue: VecDeque<(ItemId, ItemId)>,
        progress: Progress,
        resolved: usize,
    },
    Complete {
        order: Vec<Item>,
        stats: SortStats,
    },
}

enum PassOutcome {
    Suspended(PendingQuestion),
    Finished(Vec<Item>),
}

pub struct SortSession {
    /// Committed pre-sort order. Only replaced by a completed run's result
    /// through `items()`; an aborted run leaves it untouched.
    items: Vec<Item>,
    mode: Mode,
    seeding: Seeding,
    log: DecisionLog,
    history: RankHistory,
    phase: Phase,
    estimated_total: usize,
    started: Option<Instant>,
}

impl SortSession {
    /// A session over the given items with the stock five seed buckets.
    pub fn new(items: Vec<Item>, mode: Mode) -> Result<Self, SessionError> {
        Self::with_seed_tiers(items, mode, default_seed_tiers())
    }

    pub fn with_seed_tiers(
        items: Vec<Item>,
        mode: Mode,
        seed_tiers: Vec<SeedTier>,
    ) -> Result<Self, SessionError> {
        if items.len() < 2 {
            return Err(SessionError::TooFewItems(items.len()));
        }
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            assert!(seen.insert(item.id), "Duplicate item ID: {}", item.id);
        }
        Ok(SortSession {
            items,
            mode,
            seeding: Seeding::new(seed_tiers)?,
            log: DecisionLog::default(),
            history: RankHistory::default(),
            phase: Phase::Idle,
            estimated_total: 0,
            started: None,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The final scored order once complete, otherwise the committed order.
    pub fn items(&self) -> &[Item] {
        match &self.phase {
            Phase::Complete { order, .. } => order,
            _ => &self.items,
        }
    }

    pub fn decision_log(&self) -> &[Decision] {
        self.log.entries()
    }

    pub fn rank_history(&self) -> &[RankSnapshot] {
        self.history.snapshots()
    }

    /// Final order and stats, once the run is complete.
    pub fn result(&self) -> Option<(&[Item], SortStats)> {
        match &self.phase {
            Phase::Complete { order, stats } => Some((order, *stats)),
            _ => None,
        }
    }

    /// Begin a run: seeding first, then the grouped sort.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(SessionError::AlreadyStarted);
        }
        self.seeding.clear();
        self.log.clear();
        self.history.clear();
        self.started = Some(Instant::now());
        self.phase = Phase::Seeding;
        debug!(items = self.items.len(), mode = ?self.mode, "sort started");
        Ok(())
    }

    /// The current question. Answer it with the matching `answer_*` call.
    pub fn prompt(&self) -> Prompt<'_> {
        match &self.phase {
            Phase::Idle => Prompt::Idle,
            Phase::Seeding => match self.seeding.next_unassigned(&self.items) {
                Some(item) => Prompt::Seed {
                    item,
                    tiers: self.seeding.tiers(),
                    progress: Progress {
                        current: self.seeding.assigned_count() + 1,
                        total: self.items.len(),
                    },
                },
                None => Prompt::Idle,
            },
            Phase::Sorting { pending, progress } => match pending {
                PendingQuestion::Pair(a, b) => Prompt::Compare {
                    first: a,
                    second: b,
                    tie_allowed: true,
                    progress: *progress,
                },
                PendingQuestion::Triple(a, b, c) => Prompt::Rank {
                    items: [a, b, c],
                    progress: *progress,
                },
            },
            Phase::ResolvingSkips {
                order,
                queue,
                progress,
                ..
            } => {
                let Some(&(a, b)) = queue.front() else {
                    return Prompt::Idle;
                };
                let first = order.iter().find(|item| item.id == a);
                let second = order.iter().find(|item| item.id == b);
                match (first, second) {
                    (Some(first), Some(second)) => Prompt::Compare {
                        first,
                        second,
                        tie_allowed: false,
                        progress: *progress,
                    },
                    _ => Prompt::Idle,
                }
            }
            Phase::Complete { stats, .. } => Prompt::Done { stats: *stats },
        }
    }

    /// Place the currently prompted item into the seed bucket with this
    /// value.
    pub fn answer_seed(&mut self, value: i32) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::Seeding) {
            return Err(SessionError::NotSeeding);
        }
        let id = match self.seeding.next_unassigned(&self.items) {
            Some(item) => item.id,
            None => return Err(SessionError::NotSeeding),
        };
        self.seeding.assign(id, value)?;
        if self.seeding.next_unassigned(&self.items).is_none() {
            self.begin_sorting();
        }
        Ok(())
    }

    /// End seeding early; every unanswered item defaults to the mid bucket.
    pub fn skip_seeding(&mut self) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::Seeding) {
            return Err(SessionError::NotSeeding);
        }
        self.seeding.fill_remaining(&self.items);
        self.begin_sorting();
        Ok(())
    }

    /// Answer the pending two-item question. During skip resolution a tie
    /// is rejected and the question stays pending.
    pub fn answer_comparison(&mut self, outcome: Outcome) -> Result<(), SessionError> {
        match &mut self.phase {
            Phase::Sorting {
                pending: PendingQuestion::Pair(a, b),
                ..
            } => {
                let decision = Decision {
                    items: vec![a.id, b.id],
                    result: DecisionResult::Pairwise(outcome),
                    skipped: false,
                };
                self.log.push(decision);
                self.advance();
                Ok(())
            }
            Phase::ResolvingSkips {
                order,
                queue,
                progress,
                resolved,
            } => {
                if outcome == Outcome::Tie {
                    return Err(SessionError::TieNotAllowed);
                }
                let Some((a, b)) = queue.pop_front() else {
                    return Err(SessionError::NoPendingComparison);
                };
                let pos_a = order.iter().position(|item| item.id == a);
                let pos_b = order.iter().position(|item| item.id == b);
                if let (Some(pa), Some(pb)) = (pos_a, pos_b) {
                    let disagrees = match outcome {
                        Outcome::Greater => pa > pb,
                        Outcome::Less => pa < pb,
                        Outcome::Tie => false,
                    };
                    if disagrees {
                        order.swap(pa, pb);
                    }
                }
                *resolved += 1;
                progress.current += 1;
                if queue.is_empty() {
                    let order = std::mem::take(order);
                    let forced = *resolved;
                    self.finish(order, forced);
                }
                Ok(())
            }
            _ => Err(SessionError::NoPendingComparison),
        }
    }

    /// Answer the pending three-item question with the ids ranked best to
    /// worst. A non-permutation answer is fatal: the run is aborted rather
    /// than risking a corrupted order.
    pub fn answer_ranking(&mut self, ranked: [ItemId; 3]) -> Result<(), SessionError> {
        let Phase::Sorting {
            pending: PendingQuestion::Triple(a, b, c),
            ..
        } = &self.phase
        else {
            return Err(SessionError::NoPendingRanking);
        };
        let asked = [a.id, b.id, c.id];

        let mut expected = asked;
        expected.sort_unstable();
        let mut given = ranked;
        given.sort_unstable();
        if given != expected {
            self.abort();
            return Err(SessionError::InvalidRanking);
        }

        self.log.push(Decision {
            items: asked.to_vec(),
            result: DecisionResult::Triwise(ranked),
            skipped: false,
        });
        self.advance();
        Ok(())
    }

    /// Rewind one answered question. The log shrinks by one, the pass
    /// replays forward, and the undone question is asked again. A no-op
    /// with an empty log, during seeding or skip resolution, or after a
    /// run whose skipped comparisons were force-resolved. Returns whether
    /// anything was rewound.
    pub fn undo(&mut self) -> bool {
        match &self.phase {
            Phase::Sorting { .. } => {
                if self.log.pop().is_some() {
                    debug!("undo: replaying one step back");
                    self.advance();
                    true
                } else {
                    false
                }
            }
            Phase::Complete { stats, .. } => {
                if stats.comparisons == self.log.len() && self.log.pop().is_some() {
                    debug!("undo: rewinding out of a completed run");
                    self.advance();
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Defer the pending two-item question: it resolves as a tie for now
    /// and is re-asked, forced, after the main sort. Pairwise mode only.
    /// Returns whether anything was deferred.
    pub fn skip(&mut self) -> bool {
        if self.mode != Mode::Pairwise {
            return false;
        }
        let Phase::Sorting {
            pending: PendingQuestion::Pair(a, b),
            ..
        } = &self.phase
        else {
            return false;
        };
        let decision = Decision {
            items: vec![a.id, b.id],
            result: DecisionResult::Pairwise(Outcome::Tie),
            skipped: true,
        };
        debug!(first = decision.items[0], second = decision.items[1], "comparison deferred");
        self.log.push(decision);
        self.advance();
        true
    }

    /// Hard abort: discard the run entirely. Items keep the order they had
    /// before the run began. Always safe.
    pub fn abort(&mut self) {
        debug!("sort aborted");
        self.log.clear();
        self.history.clear();
        self.seeding.clear();
        self.estimated_total = 0;
        self.started = None;
        self.phase = Phase::Idle;
    }

    fn begin_sorting(&mut self) {
        let groups = self.seeding.group(&self.items);
        self.estimated_total = estimate_total(&groups, self.mode);
        debug!(
            groups = groups.len(),
            estimated = self.estimated_total,
            "seeding complete"
        );
        self.advance();
    }

    /// Re-run the pass and move to whatever state it ends in.
    fn advance(&mut self) {
        match self.run_pass() {
            PassOutcome::Suspended(pending) => {
                let progress = Progress {
                    current: self.log.consumed() + 1,
                    total: self.estimated_total,
                };
                self.phase = Phase::Sorting { pending, progress };
            }
            PassOutcome::Finished(order) => {
                let queue: VecDeque<(ItemId, ItemId)> =
                    self.log.skipped_pairs().iter().copied().collect();
                if queue.is_empty() {
                    self.finish(order, 0);
                } else {
                    self.estimated_total += queue.len();
                    debug!(deferred = queue.len(), "entering skip resolution");
                    let progress = Progress {
                        current: self.log.len() + 1,
                        total: self.estimated_total,
                    };
                    self.phase = Phase::ResolvingSkips {
                        order,
                        queue,
                        progress,
                        resolved: 0,
                    };
                }
            }
        }
    }

    /// One deterministic execution of the grouped sort against the log.
    fn run_pass(&mut self) -> PassOutcome {
        self.log.begin_pass();
        self.history.clear();

        let groups = self.seeding.group(&self.items);
        let mut sorted: Vec<Item> = Vec::with_capacity(self.items.len());

        for gi in 0..groups.len() {
            let group = &groups[gi];
            if group.len() < 2 {
                sorted.extend(group.iter().cloned());
                continue;
            }

            let prefix: Vec<ItemId> = sorted.iter().map(|item| item.id).collect();
            let suffix: Vec<ItemId> = groups[gi + 1..]
                .iter()
                .flat_map(|g| g.iter().map(|item| item.id))
                .collect();

            let mut arr = group.clone();
            let mut oracle = PassOracle {
                log: &mut self.log,
                history: &mut self.history,
                prefix: &prefix,
                suffix: &suffix,
                pending: None,
            };

            let status = match self.mode {
                Mode::Pairwise => merge_sort(&mut arr, &mut oracle),
                Mode::Triwise => ternary_insertion_sort(&mut arr, &mut oracle),
            };

            if status.is_err() {
                let pending = oracle
                    .pending
                    .take()
                    .expect("suspended pass must hold a pending question");
                return PassOutcome::Suspended(pending);
            }
            sorted.extend(arr);
        }

        PassOutcome::Finished(sorted)
    }

    fn finish(&mut self, mut order: Vec<Item>, forced: usize) {
        assign_scores(&mut order);
        let stats = SortStats {
            comparisons: self.log.len() + forced,
            elapsed: self.started.map(|t| t.elapsed()).unwrap_or_default(),
        };
        debug!(comparisons = stats.comparisons, "sort complete");
        self.phase = Phase::Complete { order, stats };
    }
}

/// Replay-backed oracle for one pass: recorded and cached answers are
/// served silently; the first unanswered question suspends the pass and
/// becomes the pending prompt.
struct PassOracle<'a> {
    log: &'a mut DecisionLog,
    history: &'a mut RankHistory,
    /// IDs of already-sorted groups, best first.
    prefix: &'a [ItemId],
    /// IDs of groups not yet reached, in pre-sort order.
    suffix: &'a [ItemId],
    pending: Option<PendingQuestion>,
}

impl Oracle for PassOracle<'_> {
    fn compare(&mut self, a: &Item, b: &Item) -> Result<Outcome, Suspended> {
        if let Some(outcome) = self.log.resolve_pair(a.id, b.id) {
            return Ok(outcome);
        }
        self.pending = Some(PendingQuestion::Pair(a.clone(), b.clone()));
        Err(Suspended)
    }

    fn rank3(&mut self, a: &Item, b: &Item, c: &Item) -> Result<[ItemId; 3], Suspended> {
        if let Some(ranked) = self.log.resolve_triple([a.id, b.id, c.id]) {
            return Ok(ranked);
        }
        self.pending = Some(PendingQuestion::Triple(a.clone(), b.clone(), c.clone()));
        Err(Suspended)
    }

    fn on_step(&mut self, arr: &[Item]) {
        let ids = self
            .prefix
            .iter()
            .copied()
            .chain(arr.iter().map(|item| item.id))
            .chain(self.suffix.iter().copied());
        self.history.record(self.log.consumed(), ids);
    }
}

/// A-priori comparison estimate for the progress bar: `n·log2 n` per group
/// for pairwise, `n·log2 n / log2 3` for triwise. Not a hard bound.
fn estimate_total(groups: &[Vec<Item>], mode: Mode) -> usize {
    groups
        .iter()
        .map(|group| {
            if group.len() < 2 {
                return 0;
            }
            let n = group.len() as f64;
            let comparisons = match mode {
                Mode::Pairwise => n * n.log2(),
                Mode::Triwise => n * n.log2() / 3f64.log2(),
            };
            comparisons.ceil() as usize
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn items(n: i64) -> Vec<Item> {
        (0..n).map(|i| Item::new(i, format!("item {i}"))).collect()
    }

    fn final_ids(session: &SortSession) -> Vec<ItemId> {
        session.items().iter().map(|item| item.id).collect()
    }

    /// Rank map: `order[0]` is the best item.
    fn rank_of(order: &[ItemId]) -> HashMap<ItemId, usize> {
        order.iter().enumerate().map(|(i, &id)| (id, i)).collect()
    }

    /// Answer every prompt from the rank map until the run completes.
    /// Seeding prompts are skipped wholesale.
    fn drive(session: &mut SortSession, rank: &HashMap<ItemId, usize>) {
        for _ in 0..10_000 {
            enum Step {
                SkipSeeding,
                Answer(Outcome),
                Ranking([ItemId; 3]),
                Done,
            }
            let step = match session.prompt() {
                Prompt::Idle => panic!("unexpected idle prompt"),
                Prompt::Seed { .. } => Step::SkipSeeding,
                Prompt::Compare { first, second, .. } => {
                    Step::Answer(if rank[&first.id] < rank[&second.id] {
                        Outcome::Greater
                    } else {
                        Outcome::Less
                    })
                }
                Prompt::Rank { items: [a, b, c], .. } => {
                    let mut ranked = [a.id, b.id, c.id];
                    ranked.sort_by_key(|id| rank[id]);
                    Step::Ranking(ranked)
                }
                Prompt::Done { .. } => Step::Done,
            };
            match step {
                Step::SkipSeeding => session.skip_seeding().unwrap(),
                Step::Answer(outcome) => session.answer_comparison(outcome).unwrap(),
                Step::Ranking(ranked) => session.answer_ranking(ranked).unwrap(),
                Step::Done => return,
            }
        }
        panic!("session did not complete");
    }

    #[test]
    fn test_rejects_fewer_than_two_items() {
        assert_eq!(
            SortSession::new(items(1), Mode::Pairwise).err(),
            Some(SessionError::TooFewItems(1))
        );
    }

    #[test]
    #[should_panic(expected = "Duplicate item ID")]
    fn test_rejects_duplicate_ids() {
        let duplicated = vec![Item::new(1, "a"), Item::new(1, "b")];
        let _ = SortSession::new(duplicated, Mode::Pairwise);
    }

    #[test]
    fn test_start_twice_errors() {
        let mut session = SortSession::new(items(2), Mode::Pairwise).unwrap();
        session.start().unwrap();
        assert_eq!(session.start().err(), Some(SessionError::AlreadyStarted));
    }

    #[test]
    fn test_pairwise_end_to_end() {
        let truth = vec![3, 0, 4, 1, 2];
        let rank = rank_of(&truth);

        let mut session = SortSession::new(items(5), Mode::Pairwise).unwrap();
        session.start().unwrap();
        drive(&mut session, &rank);

        assert_eq!(final_ids(&session), truth);
        let scores: Vec<f64> = session.items().iter().map(|i| i.score.unwrap()).collect();
        assert_eq!(scores, vec![100.0, 75.0, 50.0, 25.0, 0.0]);

        let (_, stats) = session.result().unwrap();
        assert_eq!(stats.comparisons, session.decision_log().len());
        assert!(!session.rank_history().is_empty());
    }

    #[test]
    fn test_triwise_end_to_end() {
        let truth = vec![5, 2, 6, 0, 3, 1, 4];
        let rank = rank_of(&truth);

        let mut session = SortSession::new(items(7), Mode::Triwise).unwrap();
        session.start().unwrap();
        drive(&mut session, &rank);

        assert_eq!(final_ids(&session), truth);
    }

    #[test]
    fn test_all_tie_answers_preserve_input_order() {
        let mut session = SortSession::new(items(6), Mode::Pairwise).unwrap();
        session.start().unwrap();
        session.skip_seeding().unwrap();
        for _ in 0..10_000 {
            match session.prompt() {
                Prompt::Compare { .. } => session.answer_comparison(Outcome::Tie).unwrap(),
                Prompt::Done { .. } => break,
                other => panic!("unexpected prompt {other:?}"),
            }
        }
        assert_eq!(final_ids(&session), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_higher_seed_bucket_dominates_comparisons() {
        // The oracle considers item 0 the worst, but it is seeded into the
        // top bucket, so it outranks everything regardless.
        let truth = vec![1, 2, 0];
        let rank = rank_of(&truth);

        let mut session = SortSession::new(items(3), Mode::Pairwise).unwrap();
        session.start().unwrap();
        session.answer_seed(5).unwrap(); // item 0 → Top Tier
        session.answer_seed(3).unwrap(); // item 1 → Mid Tier
        session.answer_seed(3).unwrap(); // item 2 → Mid Tier
        drive(&mut session, &rank);

        assert_eq!(final_ids(&session), vec![0, 1, 2]);
    }

    #[test]
    fn test_singleton_groups_bypass_the_engine() {
        let mut session = SortSession::new(items(2), Mode::Pairwise).unwrap();
        session.start().unwrap();
        session.answer_seed(5).unwrap();
        session.answer_seed(1).unwrap();

        // Two singleton groups: no comparison was ever needed.
        let (order, stats) = session.result().unwrap();
        assert_eq!(order.iter().map(|i| i.id).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(stats.comparisons, 0);
        assert!(session.decision_log().is_empty());
    }

    #[test]
    fn test_seed_answers_validated() {
        let mut session = SortSession::new(items(2), Mode::Pairwise).unwrap();
        assert_eq!(session.answer_seed(3).err(), Some(SessionError::NotSeeding));
        session.start().unwrap();
        assert_eq!(
            session.answer_seed(42).err(),
            Some(SessionError::UnknownSeedValue(42))
        );
        // The item is still awaiting its seed answer.
        assert!(matches!(session.prompt(), Prompt::Seed { item, .. } if item.id == 0));
    }

    #[test]
    fn test_progress_estimate_and_current() {
        let mut session = SortSession::new(items(4), Mode::Pairwise).unwrap();
        session.start().unwrap();
        session.skip_seeding().unwrap();

        let Prompt::Compare { progress, .. } = session.prompt() else {
            panic!("expected a comparison");
        };
        // One group of four: ceil(4 · log2 4) = 8; first question pending.
        assert_eq!(progress.total, 8);
        assert_eq!(progress.current, 1);
    }

    #[test]
    fn test_undo_with_empty_log_is_noop() {
        let mut session = SortSession::new(items(3), Mode::Pairwise).unwrap();
        assert!(!session.undo());
        session.start().unwrap();
        assert!(!session.undo()); // seeding
        session.skip_seeding().unwrap();
        assert!(!session.undo()); // sorting, nothing answered yet
        assert!(matches!(session.prompt(), Prompt::Compare { .. }));
    }

    #[test]
    fn test_undo_reasks_exactly_the_last_question() {
        let truth = vec![2, 0, 3, 1];
        let rank = rank_of(&truth);

        let mut session = SortSession::new(items(4), Mode::Pairwise).unwrap();
        session.start().unwrap();
        session.skip_seeding().unwrap();

        // Answer two questions, remembering the second.
        let mut asked: Vec<(ItemId, ItemId)> = Vec::new();
        for _ in 0..2 {
            let Prompt::Compare { first, second, .. } = session.prompt() else {
                panic!("expected a comparison");
            };
            asked.push((first.id, second.id));
            let outcome = if rank[&first.id] < rank[&second.id] {
                Outcome::Greater
            } else {
                Outcome::Less
            };
            session.answer_comparison(outcome).unwrap();
        }

        assert!(session.undo());
        let Prompt::Compare { first, second, progress, .. } = session.prompt() else {
            panic!("expected a comparison");
        };
        assert_eq!((first.id, second.id), asked[1]);
        assert_eq!(progress.current, 2);
        assert_eq!(session.decision_log().len(), 1);
    }

    #[test]
    fn test_undo_then_identical_answers_reproduce_run() {
        let truth = vec![4, 1, 3, 0, 2, 5];
        let rank = rank_of(&truth);

        let mut session = SortSession::new(items(6), Mode::Pairwise).unwrap();
        session.start().unwrap();
        drive(&mut session, &rank);

        let order_before = final_ids(&session);
        let log_before = session.decision_log().to_vec();
        let history_before = session.rank_history().to_vec();

        // Rewind the final answer out of the completed run, then re-answer
        // identically.
        assert!(session.undo());
        assert_eq!(session.decision_log().len(), log_before.len() - 1);
        drive(&mut session, &rank);

        assert_eq!(final_ids(&session), order_before);
        assert_eq!(session.decision_log(), log_before.as_slice());
        assert_eq!(session.rank_history(), history_before.as_slice());
    }

    #[test]
    fn test_undo_then_different_answer_changes_outcome() {
        let mut session = SortSession::new(items(2), Mode::Pairwise).unwrap();
        session.start().unwrap();
        session.skip_seeding().unwrap();

        session.answer_comparison(Outcome::Greater).unwrap();
        assert_eq!(final_ids(&session), vec![0, 1]);

        assert!(session.undo());
        session.answer_comparison(Outcome::Less).unwrap();
        assert_eq!(final_ids(&session), vec![1, 0]);
        assert_eq!(session.decision_log().len(), 1);
    }

    #[test]
    fn test_skip_defers_and_forced_answer_reorders() {
        let mut session = SortSession::new(items(3), Mode::Pairwise).unwrap();
        session.start().unwrap();
        session.skip_seeding().unwrap();

        // First question: items 0 and 1. Defer it.
        let Prompt::Compare { first, second, .. } = session.prompt() else {
            panic!("expected a comparison");
        };
        assert_eq!((first.id, second.id), (0, 1));
        assert!(session.skip());

        // The merge proceeded on the provisional tie: next question pits the
        // tie-ordered head against item 2. Say 2 wins.
        let Prompt::Compare { first, .. } = session.prompt() else {
            panic!("expected a comparison");
        };
        assert_eq!(first.id, 0);
        session.answer_comparison(Outcome::Less).unwrap();

        // Main sort done: [2, 0, 1]. Now the deferred pair comes back,
        // forced.
        let Prompt::Compare { first, second, tie_allowed, .. } = session.prompt() else {
            panic!("expected the deferred comparison");
        };
        assert_eq!((first.id, second.id), (0, 1));
        assert!(!tie_allowed);

        // Ties are no longer accepted.
        assert_eq!(
            session.answer_comparison(Outcome::Tie).err(),
            Some(SessionError::TieNotAllowed)
        );

        // Item 1 wins: the pair swaps in the merged order.
        session.answer_comparison(Outcome::Less).unwrap();
        assert_eq!(final_ids(&session), vec![2, 1, 0]);

        // Forced resolutions count toward the stats but not the log.
        let (_, stats) = session.result().unwrap();
        assert_eq!(session.decision_log().len(), 2);
        assert_eq!(stats.comparisons, 3);
    }

    #[test]
    fn test_skip_agreeing_answer_keeps_order() {
        let mut session = SortSession::new(items(2), Mode::Pairwise).unwrap();
        session.start().unwrap();
        session.skip_seeding().unwrap();

        assert!(session.skip());
        // Tie kept input order [0, 1]; a Greater answer agrees with it.
        session.answer_comparison(Outcome::Greater).unwrap();
        assert_eq!(final_ids(&session), vec![0, 1]);
    }

    #[test]
    fn test_skip_noop_outside_pairwise_or_without_question() {
        let mut session = SortSession::new(items(3), Mode::Triwise).unwrap();
        session.start().unwrap();
        session.skip_seeding().unwrap();
        assert!(!session.skip()); // triwise: never skippable

        let mut session = SortSession::new(items(3), Mode::Pairwise).unwrap();
        assert!(!session.skip()); // idle
        session.start().unwrap();
        assert!(!session.skip()); // seeding
    }

    #[test]
    fn test_undo_disabled_during_and_after_skip_resolution() {
        let mut session = SortSession::new(items(2), Mode::Pairwise).unwrap();
        session.start().unwrap();
        session.skip_seeding().unwrap();
        assert!(session.skip());

        // Now resolving the deferred pair: undo must not fire.
        assert!(!session.undo());
        session.answer_comparison(Outcome::Less).unwrap();

        // Complete, but with a forced resolution applied: still no undo.
        assert!(matches!(session.prompt(), Prompt::Done { .. }));
        assert!(!session.undo());
    }

    #[test]
    fn test_abort_restores_pre_sort_state() {
        let truth = vec![2, 1, 0];
        let rank = rank_of(&truth);

        let mut session = SortSession::new(items(3), Mode::Pairwise).unwrap();
        session.start().unwrap();
        session.skip_seeding().unwrap();

        // Answer one question, then pull the plug.
        let Prompt::Compare { first, second, .. } = session.prompt() else {
            panic!("expected a comparison");
        };
        let outcome = if rank[&first.id] < rank[&second.id] {
            Outcome::Greater
        } else {
            Outcome::Less
        };
        session.answer_comparison(outcome).unwrap();
        session.abort();

        assert!(matches!(session.prompt(), Prompt::Idle));
        assert_eq!(final_ids(&session), vec![0, 1, 2]);
        assert!(session.decision_log().is_empty());
        assert!(session.rank_history().is_empty());

        // The session is reusable after an abort.
        session.start().unwrap();
        drive(&mut session, &rank);
        assert_eq!(final_ids(&session), truth);
    }

    #[test]
    fn test_invalid_ranking_aborts_the_run() {
        let mut session = SortSession::new(items(3), Mode::Triwise).unwrap();
        session.start().unwrap();
        session.skip_seeding().unwrap();

        // First triwise question over three items is the two-item base case.
        session.answer_comparison(Outcome::Greater).unwrap();
        assert!(matches!(session.prompt(), Prompt::Rank { .. }));

        // 99 is not among the asked ids.
        assert_eq!(
            session.answer_ranking([99, 0, 1]).err(),
            Some(SessionError::InvalidRanking)
        );
        assert!(matches!(session.prompt(), Prompt::Idle));
        assert!(session.decision_log().is_empty());
    }

    #[test]
    fn test_wrong_answer_kind_is_rejected() {
        let mut session = SortSession::new(items(4), Mode::Pairwise).unwrap();
        session.start().unwrap();
        session.skip_seeding().unwrap();

        assert!(matches!(session.prompt(), Prompt::Compare { .. }));
        assert_eq!(
            session.answer_ranking([0, 1, 2]).err(),
            Some(SessionError::NoPendingRanking)
        );

        let mut session = SortSession::new(items(3), Mode::Triwise).unwrap();
        session.start().unwrap();
        session.skip_seeding().unwrap();
        session.answer_comparison(Outcome::Greater).unwrap();
        assert!(matches!(session.prompt(), Prompt::Rank { .. }));
        assert_eq!(
            session.answer_comparison(Outcome::Greater).err(),
            Some(SessionError::NoPendingComparison)
        );
    }

    #[test]
    fn test_rank_history_tracks_every_item_globally() {
        let truth = vec![1, 0, 3, 2];
        let rank = rank_of(&truth);

        let mut session = SortSession::new(items(4), Mode::Pairwise).unwrap();
        session.start().unwrap();
        // Two buckets of two: history must still cover all four items.
        session.answer_seed(5).unwrap();
        session.answer_seed(5).unwrap();
        session.answer_seed(1).unwrap();
        session.answer_seed(1).unwrap();
        drive(&mut session, &rank);

        for snapshot in session.rank_history() {
            assert_eq!(snapshot.ranks.len(), 4);
            let mut ranks: Vec<usize> = snapshot.ranks.iter().map(|&(_, r)| r).collect();
            ranks.sort_unstable();
            assert_eq!(ranks, vec![1, 2, 3, 4]);
        }
        // One merge per two-item group.
        assert_eq!(session.rank_history().len(), 2);
    }
}
