/// Score & Tier Assignment: linear percentile scores over the final order,
/// and threshold-banded tiers over the scores.
use std::cmp::Ordering;

use crate::color::contrast_text_color;
use crate::constants::{
    DEFAULT_RESULT_TIERS, NEW_TIER_COLOR, NEW_TIER_LABEL, NEW_TIER_THRESHOLD_STEP,
};
use crate::types::{Item, TierId};

/// Assign linear percentile scores by position: index 0 scores 100, the
/// last index scores 0. A single item scores 100.
pub fn assign_scores(items: &mut [Item]) {
    let n = items.len();
    if n == 0 {
        return;
    }
    for (i, item) in items.iter_mut().enumerate() {
        item.score = Some(if n > 1 {
            100.0 - (i as f64) * (100.0 / (n as f64 - 1.0))
        } else {
            100.0
        });
    }
}

/// A results-side tier band.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tier {
    pub id: TierId,
    pub label: String,
    pub color: String,
    pub text_color: String,
    /// Minimum score an item needs to land in this tier, in [0, 100].
    pub threshold: f64,
}

/// The ordered tier collection. Tiers are always kept sorted descending by
/// threshold; an item belongs to the first tier whose threshold its score
/// meets or exceeds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierList {
    tiers: Vec<Tier>,
    next_id: TierId,
}

impl Default for TierList {
    fn default() -> Self {
        TierList::standard()
    }
}

impl TierList {
    /// The stock S/A/B/C/D bands with their default thresholds and colors.
    pub fn standard() -> Self {
        Self::from_defs(
            DEFAULT_RESULT_TIERS
                .iter()
                .map(|&(label, threshold, color)| (label, threshold, color)),
        )
    }

    /// Build tiers from `(label, color)` pairs with equal-width thresholds,
    /// the lowest pinned to 0.
    pub fn from_bands<'a>(bands: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut list = Self::from_defs(bands.into_iter().map(|(label, color)| (label, 0.0, color)));
        list.set_initial_thresholds();
        list
    }

    fn from_defs<'a>(defs: impl Iterator<Item = (&'a str, f64, &'a str)>) -> Self {
        let mut list = TierList {
            tiers: Vec::new(),
            next_id: 0,
        };
        for (label, threshold, color) in defs {
            let id = list.take_id();
            list.tiers.push(Tier {
                id,
                label: label.to_string(),
                color: color.to_string(),
                text_color: contrast_text_color(color).to_string(),
                threshold,
            });
        }
        list.sort_by_threshold();
        list
    }

    fn take_id(&mut self) -> TierId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn sort_by_threshold(&mut self) {
        self.tiers.sort_by(|a, b| {
            b.threshold
                .partial_cmp(&a.threshold)
                .unwrap_or(Ordering::Equal)
        });
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn tier(&self, id: TierId) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Divide [0, 100] into equal-width bands in the current tier order:
    /// tier j gets `100 − (j+1)·(100/k)`, and the lowest is forced to 0 so
    /// every item is captured.
    pub fn set_initial_thresholds(&mut self) {
        let k = self.tiers.len();
        if k == 0 {
            return;
        }
        self.sort_by_threshold();
        let step = 100.0 / k as f64;
        for (j, tier) in self.tiers.iter_mut().enumerate() {
            tier.threshold = 100.0 - (j as f64 + 1.0) * step;
        }
        if let Some(last) = self.tiers.last_mut() {
            last.threshold = 0.0;
        }
    }

    /// Place every item in the first tier (descending threshold) whose
    /// threshold its score meets. Idempotent for unchanged scores and
    /// thresholds. Unscored items count as 0 and land in the bottom tier.
    pub fn assign(&mut self, items: &mut [Item]) {
        self.sort_by_threshold();
        for item in items {
            let score = item.score.unwrap_or(0.0);
            for tier in &self.tiers {
                if score >= tier.threshold {
                    item.tier = Some(tier.id);
                    break;
                }
            }
        }
    }

    /// Set a tier's threshold directly, clamped to [0, 100]; the list is
    /// re-sorted. Returns false for an unknown id.
    pub fn set_threshold(&mut self, id: TierId, threshold: f64) -> bool {
        let Some(tier) = self.tiers.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        tier.threshold = threshold.clamp(0.0, 100.0);
        self.sort_by_threshold();
        true
    }

    /// Append a tier one step below the current lowest threshold.
    pub fn add_tier(&mut self) -> TierId {
        let last_threshold = self.tiers.last().map(|t| t.threshold).unwrap_or(0.0);
        let id = self.take_id();
        self.tiers.push(Tier {
            id,
            label: NEW_TIER_LABEL.to_string(),
            color: NEW_TIER_COLOR.to_string(),
            text_color: contrast_text_color(NEW_TIER_COLOR).to_string(),
            threshold: (last_threshold - NEW_TIER_THRESHOLD_STEP).max(0.0),
        });
        self.sort_by_threshold();
        id
    }

    /// Drop the lowest tier. At least one tier always remains.
    pub fn remove_last(&mut self) -> bool {
        if self.tiers.len() > 1 {
            self.tiers.pop();
            true
        } else {
            false
        }
    }

    pub fn set_label(&mut self, id: TierId, label: impl Into<String>) -> bool {
        match self.tiers.iter_mut().find(|t| t.id == id) {
            Some(tier) => {
                tier.label = label.into();
                true
            }
            None => false,
        }
    }

    /// Change a tier's color; the text color follows its luminance.
    pub fn set_color(&mut self, id: TierId, color: impl Into<String>) -> bool {
        match self.tiers.iter_mut().find(|t| t.id == id) {
            Some(tier) => {
                tier.color = color.into();
                tier.text_color = contrast_text_color(&tier.color).to_string();
                true
            }
            None => false,
        }
    }
}
