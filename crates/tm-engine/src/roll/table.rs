//! Weighted die tables.

use rand::Rng;

/// A die table mapping face values to relative weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedTable {
    entries: &'static [(u32, u32)],
}

/// Opening roll of a level, biased toward 4-6.
pub const OPENING_TABLE: WeightedTable =
    WeightedTable::new(&[(4, 25), (5, 25), (6, 20), (3, 15), (2, 10), (1, 5)]);

/// Recovery table used after a streak of low rolls.
pub const RECOVERY_TABLE: WeightedTable =
    WeightedTable::new(&[(4, 30), (5, 25), (6, 20), (3, 15), (2, 7), (1, 3)]);

impl WeightedTable {
    /// Build a table from `(value, weight)` pairs.
    pub const fn new(entries: &'static [(u32, u32)]) -> Self {
        Self { entries }
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Probability of drawing `value`.
    pub fn probability(&self, value: u32) -> f64 {
        let total = self.total_weight();
        if total == 0 {
            return 0.0;
        }
        let weight: u32 = self
            .entries
            .iter()
            .filter(|(v, _)| *v == value)
            .map(|(_, w)| w)
            .sum();
        f64::from(weight) / f64::from(total)
    }

    /// Draw a value. An empty table yields 1.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let total = self.total_weight();
        if total == 0 {
            return 1;
        }
        let mut pick = rng.random_range(0..total);
        for &(value, weight) in self.entries {
            if pick < weight {
                return value;
            }
            pick -= weight;
        }
        self.entries.last().map_or(1, |(v, _)| *v)
    }
}
