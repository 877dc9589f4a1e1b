//! The adaptive roll cascade.
//!
//! Rules are tried in [`RollRule::CASCADE`] order and the first one that
//! fires produces the roll. Rules with a random component only consume
//! randomness once every earlier rule has declined.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::table::{OPENING_TABLE, RECOVERY_TABLE};

/// Everything the cascade may look at when choosing a roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollContext {
    /// Rolls already taken this level.
    pub rolls_taken: u32,
    /// Rolls since the most recent 6 (or since level start).
    pub elapsed_since_last_six: u32,
    /// Progress is lagging the expected pace.
    pub stuck: bool,
    /// Dice left after this roll's die is spent.
    pub remaining_dice: u32,
    /// Collected over needed units across targets.
    pub completion_ratio: f64,
    /// Consecutive rolls of 2 or less.
    pub low_streak: u32,
}

/// Which branch of the cascade produced a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollRule {
    /// First roll of a level, from the opening table.
    Opening,
    /// Forced 6 for a player who has fallen behind.
    StuckRescue,
    /// Forced 6 when only a few dice remain.
    FinalDiceMercy,
    /// Forced 6 to keep pacing interesting.
    PacingBoost,
    /// High-biased draw after two low rolls.
    LowStreakRecovery,
    /// Plain fair die.
    Uniform,
    /// Value supplied by a scripted source.
    Scripted,
}

impl RollRule {
    /// Evaluation order of the adaptive policy.
    pub const CASCADE: [RollRule; 6] = [
        Self::Opening,
        Self::StuckRescue,
        Self::FinalDiceMercy,
        Self::PacingBoost,
        Self::LowStreakRecovery,
        Self::Uniform,
    ];

    /// Whether this rule is a forced 6 that earns a bonus die.
    pub fn is_special(self) -> bool {
        matches!(
            self,
            Self::StuckRescue | Self::FinalDiceMercy | Self::PacingBoost
        )
    }

    /// Evaluate this rule, returning a value if it fires.
    pub fn try_draw<R: Rng + ?Sized>(self, ctx: &RollContext, rng: &mut R) -> Option<u32> {
        match self {
            Self::Opening => (ctx.rolls_taken == 0).then(|| OPENING_TABLE.draw(rng)),
            Self::StuckRescue => (ctx.stuck && ctx.elapsed_since_last_six >= 2).then_some(6),
            Self::FinalDiceMercy => (ctx.remaining_dice <= 3
                && ctx.elapsed_since_last_six >= 1
                && rng.random_bool(0.6))
            .then_some(6),
            Self::PacingBoost => should_boost(ctx, rng).then_some(6),
            Self::LowStreakRecovery => (ctx.low_streak >= 2).then(|| RECOVERY_TABLE.draw(rng)),
            Self::Uniform => Some(rng.random_range(1..=6)),
            Self::Scripted => None,
        }
    }
}

impl fmt::Display for RollRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opening => write!(f, "opening"),
            Self::StuckRescue => write!(f, "stuck rescue"),
            Self::FinalDiceMercy => write!(f, "final dice mercy"),
            Self::PacingBoost => write!(f, "pacing boost"),
            Self::LowStreakRecovery => write!(f, "low streak recovery"),
            Self::Uniform => write!(f, "uniform"),
            Self::Scripted => write!(f, "scripted"),
        }
    }
}

fn should_boost<R: Rng + ?Sized>(ctx: &RollContext, rng: &mut R) -> bool {
    ctx.elapsed_since_last_six > 7
        || (ctx.completion_ratio < 0.3 && ctx.remaining_dice < 8 && rng.random_bool(0.5))
        || (ctx.elapsed_since_last_six > 4 && rng.random_bool(0.1))
}

/// Run the cascade and return the first rule that fires with its value.
pub fn run_cascade<R: Rng + ?Sized>(ctx: &RollContext, rng: &mut R) -> (RollRule, u32) {
    for rule in RollRule::CASCADE {
        if let Some(value) = rule.try_draw(ctx, rng) {
            return (rule, value);
        }
    }
    // Uniform always fires.
    (RollRule::Uniform, rng.random_range(1..=6))
}
