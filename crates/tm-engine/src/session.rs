//! State of one level attempt.
//!
//! A `GameSession` owns the level's targets, tiles, rolling history and
//! selection. It is replaced wholesale on reset and on level transitions;
//! nothing in it outlives the attempt.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Target, Tile, completion_ratio};
use crate::level::LevelLayout;
use crate::roll::RollState;
use crate::selection::Selection;

/// Level-scoped state.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub(crate) level: u32,
    pub(crate) tier: u32,
    pub(crate) starting_dice: u32,
    pub(crate) targets: Vec<Target>,
    pub(crate) board: Board,
    pub(crate) rolls: RollState,
    pub(crate) selection: Selection,
}

impl GameSession {
    /// Start an attempt from a generated layout.
    pub fn from_layout(layout: LevelLayout) -> Self {
        Self {
            level: layout.level,
            tier: layout.tier,
            starting_dice: layout.dice_budget,
            targets: layout.targets,
            board: Board::new(layout.tiles),
            rolls: RollState::new(),
            selection: Selection::new(),
        }
    }

    /// Level number.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Difficulty tier.
    pub fn tier(&self) -> u32 {
        self.tier
    }

    /// Dice the attempt started with.
    pub fn starting_dice(&self) -> u32 {
        self.starting_dice
    }

    /// The level's targets.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// The level's board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Rolling history.
    pub fn rolls(&self) -> &RollState {
        &self.rolls
    }

    /// The current selection batch.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Collected over needed units across all targets.
    pub fn completion_ratio(&self) -> f64 {
        completion_ratio(&self.targets)
    }

    /// Whether every target is filled.
    pub fn all_targets_complete(&self) -> bool {
        self.targets.iter().all(Target::is_complete)
    }

    /// Targets that still need tiles.
    pub fn incomplete_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| !t.is_complete())
    }

    /// A presentation snapshot with the given remaining dice.
    pub fn snapshot(&self, dice_budget: u32) -> LevelSnapshot {
        LevelSnapshot {
            level: self.level,
            tier: self.tier,
            dice_budget,
            targets: self.targets.clone(),
            tiles: self.board.tiles().to_vec(),
        }
    }
}

/// What a presentation layer needs to draw a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// Level number.
    pub level: u32,
    /// Difficulty tier.
    pub tier: u32,
    /// Dice left.
    pub dice_budget: u32,
    /// Targets with progress.
    pub targets: Vec<Target>,
    /// Tiles with status.
    pub tiles: Vec<Tile>,
}
