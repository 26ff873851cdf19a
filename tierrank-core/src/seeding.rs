/// Seeding stage: coarse pre-classification before fine sorting.
///
/// One question per item places it into a seed bucket; the fine sort then
/// only compares items within a bucket. Items in a higher bucket always
/// outrank every item in a lower bucket, so buckets cut the comparison
/// count roughly by the square of their count.
use std::collections::HashMap;

use crate::constants::DEFAULT_SEED_TIERS;
use crate::types::{Item, ItemId, SessionError};

/// One coarse bucket choice offered during seeding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeedTier {
    pub label: String,
    /// Rank weight; buckets are ordered strictly descending by value.
    pub value: i32,
    pub color: String,
}

/// The stock five buckets, Top Tier (5) down to Bottom Tier (1).
pub fn default_seed_tiers() -> Vec<SeedTier> {
    DEFAULT_SEED_TIERS
        .iter()
        .map(|&(label, value, color)| SeedTier {
            label: label.to_string(),
            value,
            color: color.to_string(),
        })
        .collect()
}

/// Seed-value bookkeeping for one sort run.
#[derive(Debug)]
pub(crate) struct Seeding {
    tiers: Vec<SeedTier>,
    values: HashMap<ItemId, i32>,
}

impl Seeding {
    pub fn new(tiers: Vec<SeedTier>) -> Result<Self, SessionError> {
        if tiers.is_empty() || tiers.windows(2).any(|w| w[0].value <= w[1].value) {
            return Err(SessionError::InvalidSeedTiers);
        }
        Ok(Seeding {
            tiers,
            values: HashMap::new(),
        })
    }

    pub fn tiers(&self) -> &[SeedTier] {
        &self.tiers
    }

    /// Value of the bucket unanswered items default to: the middle of the
    /// configured list.
    pub fn mid_value(&self) -> i32 {
        self.tiers[self.tiers.len() / 2].value
    }

    /// The first item (in storage order) without a seed value, if any.
    pub fn next_unassigned<'a>(&self, items: &'a [Item]) -> Option<&'a Item> {
        items.iter().find(|item| !self.values.contains_key(&item.id))
    }

    pub fn assigned_count(&self) -> usize {
        self.values.len()
    }

    /// Record a bucket choice. The value must name a configured bucket.
    pub fn assign(&mut self, id: ItemId, value: i32) -> Result<(), SessionError> {
        if !self.tiers.iter().any(|t| t.value == value) {
            return Err(SessionError::UnknownSeedValue(value));
        }
        self.values.insert(id, value);
        Ok(())
    }

    /// Default every still-unanswered item to the mid bucket.
    pub fn fill_remaining(&mut self, items: &[Item]) {
        let mid = self.mid_value();
        for item in items {
            self.values.entry(item.id).or_insert(mid);
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Partition items into groups by seed value, highest bucket first.
    /// Within a group, items keep their storage order.
    pub fn group(&self, items: &[Item]) -> Vec<Vec<Item>> {
        let mid = self.mid_value();
        self.tiers
            .iter()
            .map(|tier| {
                items
                    .iter()
                    .filter(|item| *self.values.get(&item.id).unwrap_or(&mid) == tier.value)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .filter(|group| !group.is_empty())
            .collect()
    }
}
