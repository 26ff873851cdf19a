use std::time::Duration;

/// Items are identified by caller-provided `i64` IDs. Equality and ordering
/// decisions always resolve by ID, never by text — texts may repeat.
pub type ItemId = i64;

/// Result-side tier IDs, assigned by [`crate::scoring::TierList`].
pub type TierId = u32;

/// A single rankable item.
///
/// `score` and `tier` start empty and are filled in by the scoring and
/// assignment stages once a sort run completes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    /// Linear percentile in [0, 100], set after sorting. 100 = best.
    pub score: Option<f64>,
    /// Tier the item landed in, set by tier assignment.
    pub tier: Option<TierId>,
}

impl Item {
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Item {
            id,
            text: text.into(),
            score: None,
            tier: None,
        }
    }
}

/// Comparison mode: how many items each oracle question shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Two items per question, ties allowed. Merge sort.
    Pairwise,
    /// Three items per question, ranked strictly. Ternary insertion sort.
    Triwise,
}

impl Mode {
    /// Number of items per comparison question.
    pub fn arity(self) -> usize {
        match self {
            Mode::Pairwise => 2,
            Mode::Triwise => 3,
        }
    }
}

/// Outcome of a two-item comparison, relative to the order asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// The first item ranks higher.
    Greater,
    /// The second item ranks higher.
    Less,
    /// No preference.
    Tie,
}

impl Outcome {
    /// The same judgment with the two items swapped.
    pub fn invert(self) -> Self {
        match self {
            Outcome::Greater => Outcome::Less,
            Outcome::Less => Outcome::Greater,
            Outcome::Tie => Outcome::Tie,
        }
    }

    /// Whether a stable merge takes the first item (ties keep input order).
    pub fn prefers_first(self) -> bool {
        !matches!(self, Outcome::Less)
    }
}

/// The answer recorded for one oracle question.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionResult {
    Pairwise(Outcome),
    /// The three compared IDs ranked best to worst. Always a permutation of
    /// the asked IDs; no ties.
    Triwise([ItemId; 3]),
}

/// One resolved oracle question, in the order it was asked.
///
/// Replaying a run's decisions in order against the same item groups and
/// mode reproduces bit-identical questions in the same order — the property
/// undo and redo depend on.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    /// IDs of the compared items, in asked order.
    pub items: Vec<ItemId>,
    pub result: DecisionResult,
    /// True when this entry is a deferred (skipped) comparison, auto-resolved
    /// as a tie and queued for forced resolution after the main sort.
    pub skipped: bool,
}

/// Progress through the current stage.
///
/// `total` is an a-priori estimate (`n·log2 n` per group for pairwise,
/// `n·log2 n / log2 3` for triwise), not a hard bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

/// Summary of a completed sort run.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortStats {
    /// Questions actually answered by the oracle, including forced
    /// skip resolutions.
    pub comparisons: usize,
    pub elapsed: Duration,
}

/// Global rank of every item at one point during a sort run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankSnapshot {
    /// Oracle questions answered when the snapshot was taken.
    pub comparison_count: usize,
    /// `(item id, 1-based global rank)` for every item.
    pub ranks: Vec<(ItemId, usize)>,
}

/// Errors surfaced by [`crate::session::SortSession`] operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("need at least two items to sort, got {0}")]
    TooFewItems(usize),

    #[error("the session has already been started")]
    AlreadyStarted,

    #[error("seed tiers must be non-empty with strictly descending values")]
    InvalidSeedTiers,

    #[error("no seed choice is expected right now")]
    NotSeeding,

    #[error("{0} is not a configured seed tier value")]
    UnknownSeedValue(i32),

    #[error("no two-item comparison is pending")]
    NoPendingComparison,

    #[error("no three-item ranking is pending")]
    NoPendingRanking,

    #[error("ranking must be a permutation of the compared item ids")]
    InvalidRanking,

    #[error("a tie is not accepted when resolving a skipped comparison")]
    TieNotAllowed,
}
