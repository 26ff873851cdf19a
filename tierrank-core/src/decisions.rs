/// Decision Log & Cache: the replay layer between the sort engine and the
/// live oracle.
///
/// Every genuinely answered question is appended to the log in the order
/// asked, across the whole multi-group run. A sort pass resolves each
/// question in this order:
///
///   1. replay — the cursor entry matches the question's unordered id set:
///      consume it, orient the stored answer to the asked order;
///   2. cache — the pair (or id-triple) was already answered this pass;
///   3. neither — the question must go to the live oracle.
///
/// The caches are derived state, rebuilt from consumed log entries on every
/// pass, so undo (pop one entry, re-run) invalidates them for free. A replay
/// mismatch is not an error — it falls through to the cache/live path.
use std::collections::HashMap;

use crate::types::{Decision, DecisionResult, ItemId, Outcome};

#[derive(Debug, Default)]
pub(crate) struct DecisionLog {
    log: Vec<Decision>,
    /// Next log entry to replay; equals the number of live questions
    /// answered so far in the current pass.
    cursor: usize,
    /// Pairwise answers seen this pass, keyed `(min id, max id)` with the
    /// outcome oriented to that order.
    pair_cache: HashMap<(ItemId, ItemId), Outcome>,
    /// Three-way rankings seen this pass, keyed by the sorted id triple.
    triple_cache: HashMap<[ItemId; 3], [ItemId; 3]>,
    /// Pairs deferred by skip, in the order they were skipped.
    skip_queue: Vec<(ItemId, ItemId)>,
}

fn pair_key(a: ItemId, b: ItemId) -> (ItemId, ItemId) {
    (a.min(b), a.max(b))
}

impl DecisionLog {
    /// Reset the replay cursor and all derived state for a fresh pass.
    pub fn begin_pass(&mut self) {
        self.cursor = 0;
        self.pair_cache.clear();
        self.triple_cache.clear();
        self.skip_queue.clear();
    }

    /// Answer a two-item question from the log or the pair cache.
    /// `None` means the question must go to the live oracle.
    pub fn resolve_pair(&mut self, a: ItemId, b: ItemId) -> Option<Outcome> {
        if let Some(entry) = self.log.get(self.cursor) {
            if let DecisionResult::Pairwise(outcome) = entry.result {
                let (first, second) = (entry.items[0], entry.items[1]);
                if pair_key(first, second) == pair_key(a, b) {
                    let skipped = entry.skipped;
                    self.consume_pair(first, second, outcome, skipped);
                    return Some(if first == a { outcome } else { outcome.invert() });
                }
            }
        }

        let key = pair_key(a, b);
        self.pair_cache
            .get(&key)
            .map(|&stored| if key.0 == a { stored } else { stored.invert() })
    }

    fn consume_pair(&mut self, first: ItemId, second: ItemId, outcome: Outcome, skipped: bool) {
        self.cursor += 1;
        let key = pair_key(first, second);
        let canonical = if key.0 == first { outcome } else { outcome.invert() };
        self.pair_cache.insert(key, canonical);
        if skipped {
            self.skip_queue.push((first, second));
        }
    }

    /// Answer a three-item question from the log or the triple cache.
    /// The stored ranking is id-based and order-independent.
    pub fn resolve_triple(&mut self, asked: [ItemId; 3]) -> Option<[ItemId; 3]> {
        let key = sorted_triple(asked);

        if let Some(entry) = self.log.get(self.cursor) {
            if let DecisionResult::Triwise(ranked) = entry.result {
                if entry.items.len() == 3 {
                    let entry_key =
                        sorted_triple([entry.items[0], entry.items[1], entry.items[2]]);
                    if entry_key == key {
                        self.cursor += 1;
                        self.triple_cache.insert(key, ranked);
                        return Some(ranked);
                    }
                }
            }
        }

        self.triple_cache.get(&key).copied()
    }

    /// Append a freshly answered question. It is served back by replay on
    /// the next pass.
    pub fn push(&mut self, decision: Decision) {
        tracing::debug!(
            items = ?decision.items,
            skipped = decision.skipped,
            "decision recorded"
        );
        self.log.push(decision);
    }

    pub fn pop(&mut self) -> Option<Decision> {
        self.log.pop()
    }

    /// Log entries consumed by replay this pass — the number of questions
    /// the oracle has already answered up to this point of the run.
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn entries(&self) -> &[Decision] {
        &self.log
    }

    /// Pairs deferred by skip, FIFO, as rebuilt by the current pass.
    pub fn skipped_pairs(&self) -> &[(ItemId, ItemId)] {
        &self.skip_queue
    }

    pub fn clear(&mut self) {
        self.log.clear();
        self.begin_pass();
    }
}

fn sorted_triple(mut ids: [ItemId; 3]) -> [ItemId; 3] {
    ids.sort_unstable();
    ids
}
