//! Configuration for a game campaign.

use serde::{Deserialize, Serialize};

/// Point values used when scoring batches and completed levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Awarded once per target when it fills up.
    pub completion_bonus: u32,
    /// Level-complete bonus per unspent die.
    pub dice_bonus_per_die: u32,
    /// Level-complete bonus per level number.
    pub level_multiplier: u32,
    /// Level-complete bonus per roll saved against par.
    pub pace_bonus_per_roll: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            completion_bonus: 500,
            dice_bonus_per_die: 50,
            level_multiplier: 100,
            pace_bonus_per_roll: 100,
        }
    }
}

/// Configuration for a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// RNG seed for reproducible boards and rolls.
    pub seed: u64,
    /// Number of levels before the campaign wraps back to level 1.
    pub total_levels: u32,
    /// Minimum number of tiles on a board.
    pub board_size: u32,
    /// Hints granted to a fresh profile.
    pub initial_hints: u32,
    /// Share of surplus tiles generated locked (0.0-1.0).
    pub locked_fraction: f64,
    /// Dice granted by the extra-dice reward.
    pub ad_reward_dice: u32,
    /// Score bonus for finishing the whole campaign.
    pub wrap_bonus: u64,
    /// Batch and level scoring.
    pub scoring: ScoringRules,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            total_levels: 10,
            board_size: 12,
            initial_hints: 3,
            locked_fraction: 0.0,
            ad_reward_dice: 5,
            wrap_bonus: 10_000,
            scoring: ScoringRules::default(),
        }
    }
}

impl GameConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the campaign length (at least one level).
    pub fn with_total_levels(mut self, levels: u32) -> Self {
        self.total_levels = levels.max(1);
        self
    }

    /// Set the minimum board size (at least one tile).
    pub fn with_board_size(mut self, tiles: u32) -> Self {
        self.board_size = tiles.max(1);
        self
    }

    /// Set the starting hint count.
    pub fn with_hints(mut self, hints: u32) -> Self {
        self.initial_hints = hints;
        self
    }

    /// Set the locked share of surplus tiles (clamped to 0.0-1.0).
    pub fn with_locked_fraction(mut self, fraction: f64) -> Self {
        self.locked_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Replace the scoring rules.
    pub fn with_scoring(mut self, scoring: ScoringRules) -> Self {
        self.scoring = scoring;
        self
    }
}
