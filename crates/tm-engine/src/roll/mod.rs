//! Die rolls for the selection budget.
//!
//! Rolls are not fair: the adaptive policy in [`rules`] reads the level's
//! rolling history and target progress to soften bad luck and keep pacing
//! lively. The policy sits behind [`RollSource`] so tests and replays can
//! substitute scripted values.

pub mod rules;
pub mod table;

pub use rules::{RollContext, RollRule, run_cascade};
pub use table::{OPENING_TABLE, RECOVERY_TABLE, WeightedTable};

use std::collections::VecDeque;

use rand::RngCore;
use serde::{Deserialize, Serialize};

/// A single roll and the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollDraw {
    /// Face value, 1-6.
    pub value: u32,
    /// Branch of the policy that chose the value.
    pub rule: RollRule,
}

impl RollDraw {
    /// Whether this roll is a special moment that earns a bonus die.
    pub fn is_special(&self) -> bool {
        self.rule.is_special()
    }
}

/// Rolling history of the current level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollState {
    current: u32,
    history: Vec<u32>,
    last_six: Option<usize>,
    low_streak: u32,
    stuck: bool,
}

impl RollState {
    /// A fresh state for a new level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the active roll, or 0 when none is active.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// All rolls of the level, oldest first.
    pub fn history(&self) -> &[u32] {
        &self.history
    }

    /// Number of rolls taken this level.
    pub fn rolls_taken(&self) -> u32 {
        self.history.len() as u32
    }

    /// Index into [`history`](Self::history) of the most recent 6.
    pub fn last_six(&self) -> Option<usize> {
        self.last_six
    }

    /// Rolls since the most recent 6, or all rolls if none was a 6.
    pub fn elapsed_since_last_six(&self) -> u32 {
        match self.last_six {
            Some(index) => (self.history.len() - 1 - index) as u32,
            None => self.rolls_taken(),
        }
    }

    /// Consecutive rolls of 2 or less.
    pub fn low_streak(&self) -> u32 {
        self.low_streak
    }

    /// Whether progress is lagging the expected pace.
    pub fn is_stuck(&self) -> bool {
        self.stuck
    }

    /// Build the policy input for the next roll.
    pub fn context(&self, remaining_dice: u32, completion_ratio: f64) -> RollContext {
        RollContext {
            rolls_taken: self.rolls_taken(),
            elapsed_since_last_six: self.elapsed_since_last_six(),
            stuck: self.stuck,
            remaining_dice,
            completion_ratio,
            low_streak: self.low_streak,
        }
    }

    /// Append a roll and refresh the derived streak and pace state.
    pub fn record(&mut self, draw: RollDraw, completion_ratio: f64) {
        if draw.rule == RollRule::LowStreakRecovery {
            self.low_streak = 0;
        }
        self.history.push(draw.value);
        self.current = draw.value;
        if draw.value == 6 {
            self.last_six = Some(self.history.len() - 1);
        }
        if draw.value <= 2 {
            self.low_streak += 1;
        } else {
            self.low_streak = 0;
        }
        let expected = f64::from(self.rolls_taken()) * 0.15 - 0.25;
        self.stuck = completion_ratio < expected;
    }

    /// End the active roll once its batch is resolved.
    pub fn clear_current(&mut self) {
        self.current = 0;
    }
}

/// Supplier of die values.
pub trait RollSource {
    /// Choose the next roll for the given context.
    fn next_roll(&mut self, ctx: &RollContext, rng: &mut dyn RngCore) -> RollDraw;
}

/// The production policy: the full rule cascade.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveRoller;

impl RollSource for AdaptiveRoller {
    fn next_roll(&mut self, ctx: &RollContext, rng: &mut dyn RngCore) -> RollDraw {
        let (rule, value) = run_cascade(ctx, rng);
        RollDraw { value, rule }
    }
}

/// Replays fixed values, then falls back to the adaptive policy.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    values: VecDeque<u32>,
}

impl ScriptedRoller {
    /// Script the given values; each is clamped to 1-6.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            values: values.into_iter().map(|v| v.clamp(1, 6)).collect(),
        }
    }

    /// Scripted values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RollSource for ScriptedRoller {
    fn next_roll(&mut self, ctx: &RollContext, rng: &mut dyn RngCore) -> RollDraw {
        match self.values.pop_front() {
            Some(value) => RollDraw {
                value,
                rule: RollRule::Scripted,
            },
            None => AdaptiveRoller.next_roll(ctx, rng),
        }
    }
}

/// Draw the next roll and record it in `state`.
///
/// `remaining_dice` is the budget left after this roll's die is spent.
pub fn roll_next(
    source: &mut dyn RollSource,
    state: &mut RollState,
    remaining_dice: u32,
    completion_ratio: f64,
    rng: &mut dyn RngCore,
) -> RollDraw {
    let ctx = state.context(remaining_dice, completion_ratio);
    let draw = source.next_roll(&ctx, rng);
    state.record(draw, completion_ratio);
    tracing::debug!(
        value = draw.value,
        rule = %draw.rule,
        elapsed_since_six = ctx.elapsed_since_last_six,
        "die rolled"
    );
    draw
}
