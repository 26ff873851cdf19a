/// Default seed buckets presented during the seeding stage, best first.
/// Values are strictly descending rank weights; the middle entry is the
/// bucket unanswered items fall into when seeding is skipped.
pub const DEFAULT_SEED_TIERS: [(&str, i32, &str); 5] = [
    ("Top Tier", 5, "#ff7f7f"),
    ("High Tier", 4, "#ffbf7f"),
    ("Mid Tier", 3, "#ffff7f"),
    ("Low Tier", 2, "#7fff7f"),
    ("Bottom Tier", 1, "#7fbfff"),
];

/// Default result tiers `(label, threshold, color)`, descending by threshold.
/// The bottom threshold is 0 so every scored item lands in some tier.
pub const DEFAULT_RESULT_TIERS: [(&str, f64, &str); 5] = [
    ("S", 90.0, "#ff7f7f"),
    ("A", 75.0, "#ffbf7f"),
    ("B", 60.0, "#ffff7f"),
    ("C", 45.0, "#7fff7f"),
    ("D", 0.0, "#7fbfff"),
];

/// Threshold gap below the current lowest tier when a new tier is appended.
pub const NEW_TIER_THRESHOLD_STEP: f64 = 15.0;

/// Label and color for a freshly appended tier, before the user edits them.
pub const NEW_TIER_LABEL: &str = "New";
pub const NEW_TIER_COLOR: &str = "#cccccc";
