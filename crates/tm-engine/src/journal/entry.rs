//! Journal entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry in the play journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JournalEntry {
    /// A level was generated and play began.
    LevelStarted {
        /// Level number.
        level: u32,
        /// Difficulty tier.
        tier: u32,
        /// Starting dice budget.
        dice: u32,
        /// Target names with quotas, e.g. `"Birds x4"`.
        targets: Vec<String>,
        /// When the level started.
        timestamp: DateTime<Utc>,
    },
    /// The die was rolled.
    Rolled {
        /// Face value.
        value: u32,
        /// Policy rule that chose the value.
        rule: String,
        /// Tiles that may be picked.
        selectable: u32,
        /// Dice left afterwards.
        dice_left: u32,
        /// When rolled.
        timestamp: DateTime<Utc>,
    },
    /// A forced 6 granted a bonus die.
    SpecialMoment {
        /// Policy rule that forced the six.
        rule: String,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// A selection batch was scored.
    BatchResolved {
        /// Tiles consumed.
        tiles: u32,
        /// Points gained.
        points: u64,
        /// Target names completed by the batch.
        completed: Vec<String>,
        /// When resolved.
        timestamp: DateTime<Utc>,
    },
    /// A hint pointed at an unfinished target.
    HintUsed {
        /// Target name.
        target: String,
        /// Units still needed.
        remaining: u32,
        /// When used.
        timestamp: DateTime<Utc>,
    },
    /// Dice were added to the budget from outside the game.
    DiceAdded {
        /// Dice granted.
        amount: u32,
        /// When granted.
        timestamp: DateTime<Utc>,
    },
    /// Every target was filled.
    LevelCompleted {
        /// Level number.
        level: u32,
        /// Level-complete bonus.
        bonus: u64,
        /// Star rating.
        stars: u8,
        /// When completed.
        timestamp: DateTime<Utc>,
    },
    /// The level ran out of dice or tiles.
    LevelFailed {
        /// Level number.
        level: u32,
        /// Overall target completion, 0-100.
        completion_percent: u32,
        /// When failed.
        timestamp: DateTime<Utc>,
    },
    /// The last level was completed and the campaign wrapped.
    CampaignCompleted {
        /// Score before the wrap bonus.
        final_score: u64,
        /// Wrap bonus awarded.
        bonus: u64,
        /// When completed.
        timestamp: DateTime<Utc>,
    },
    /// An achievement was unlocked.
    Achievement {
        /// Achievement title.
        title: String,
        /// When unlocked.
        timestamp: DateTime<Utc>,
    },
}

impl JournalEntry {
    /// When the entry was recorded.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::LevelStarted { timestamp, .. }
            | Self::Rolled { timestamp, .. }
            | Self::SpecialMoment { timestamp, .. }
            | Self::BatchResolved { timestamp, .. }
            | Self::HintUsed { timestamp, .. }
            | Self::DiceAdded { timestamp, .. }
            | Self::LevelCompleted { timestamp, .. }
            | Self::LevelFailed { timestamp, .. }
            | Self::CampaignCompleted { timestamp, .. }
            | Self::Achievement { timestamp, .. } => *timestamp,
        }
    }

    /// One-line plain description.
    pub fn describe(&self) -> String {
        match self {
            Self::LevelStarted {
                level,
                tier,
                dice,
                targets,
                ..
            } => format!(
                "Level {level} (tier {tier}), {dice} dice, targets: {}",
                targets.join(", ")
            ),
            Self::Rolled {
                value,
                rule,
                selectable,
                dice_left,
                ..
            } => format!("Rolled {value} ({rule}), pick {selectable}, {dice_left} dice left"),
            Self::SpecialMoment { rule, .. } => {
                format!("Special moment! Forced six ({rule}), +1 bonus die")
            }
            Self::BatchResolved {
                tiles,
                points,
                completed,
                ..
            } => {
                let mut line = format!("Collected {tiles} tiles for +{points} points");
                if !completed.is_empty() {
                    line.push_str(&format!(", completed {}", completed.join(", ")));
                }
                line
            }
            Self::HintUsed {
                target, remaining, ..
            } => format!("Hint: focus on {target}, {remaining} more needed"),
            Self::DiceAdded { amount, .. } => format!("Added {amount} dice"),
            Self::LevelCompleted {
                level,
                bonus,
                stars,
                ..
            } => format!("Level {level} complete, bonus +{bonus}, {stars} stars"),
            Self::LevelFailed {
                level,
                completion_percent,
                ..
            } => format!("Level {level} failed at {completion_percent}%"),
            Self::CampaignCompleted {
                final_score, bonus, ..
            } => format!("Campaign complete with {final_score} points, bonus +{bonus}"),
            Self::Achievement { title, .. } => format!("Achievement unlocked: {title}"),
        }
    }
}
