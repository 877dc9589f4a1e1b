//! State that survives level transitions, and its save format.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Cumulative player progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Current level number.
    pub level: u32,
    /// Cumulative score.
    pub score: u64,
    /// Dice left in the current level.
    pub dice: u32,
    /// Hints left.
    pub hints: u32,
    /// Bonus dice banked from special moments, added to the next level.
    pub bonus_dice: u32,
}

impl ProgressState {
    /// A fresh profile at level 1.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            level: 1,
            score: 0,
            dice: 0,
            hints: config.initial_hints,
            bonus_dice: 0,
        }
    }

    /// Empty the bonus dice bank, returning its contents.
    pub fn take_bonus_dice(&mut self) -> u32 {
        std::mem::take(&mut self.bonus_dice)
    }
}

/// Presentation preferences. Stored, never interpreted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sound effects.
    pub sound: bool,
    /// Background music.
    pub music: bool,
    /// Haptic feedback.
    pub vibration: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            music: true,
            vibration: false,
        }
    }
}

/// The persisted save blob.
///
/// Missing fields fall back to fresh-profile values, so older or partial
/// saves still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    /// Level to resume at.
    pub level: u32,
    /// Cumulative score.
    pub score: u64,
    /// Dice left in the saved level.
    pub dice: u32,
    /// Hints left.
    pub hints: u32,
    /// Banked bonus dice.
    pub bonus_dice: u32,
    /// Presentation preferences.
    pub settings: Settings,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            level: 1,
            score: 0,
            dice: 10,
            hints: 3,
            bonus_dice: 0,
            settings: Settings::default(),
        }
    }
}

impl SaveData {
    /// Capture progress and settings.
    pub fn capture(progress: &ProgressState, settings: Settings) -> Self {
        Self {
            level: progress.level,
            score: progress.score,
            dice: progress.dice,
            hints: progress.hints,
            bonus_dice: progress.bonus_dice,
            settings,
        }
    }

    /// Rebuild progress from the save.
    pub fn progress(&self) -> ProgressState {
        ProgressState {
            level: self.level.max(1),
            score: self.score,
            dice: self.dice,
            hints: self.hints,
            bonus_dice: self.bonus_dice,
        }
    }
}
