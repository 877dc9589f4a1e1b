//! Error types for the roll and progression engine.

use thiserror::Error;

use crate::board::TileId;
use crate::game::Phase;

/// Result type for engine operations.
pub type GameResult<T> = Result<T, GameError>;

/// Recoverable errors reported to the caller instead of aborting play.
///
/// None of these leave the game in a modified state: an operation that
/// fails has no observable effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The dice budget is exhausted.
    #[error("no dice remaining")]
    NoDiceRemaining,

    /// A roll is already active and its batch has not been resolved.
    #[error("finish selecting tiles before rolling again")]
    SelectionInProgress,

    /// The batch already holds as many tiles as the roll allows.
    #[error("you can only select {max} tiles this turn")]
    SelectionLimitReached {
        /// Selection budget of the active roll.
        max: u32,
    },

    /// The tile is used or locked.
    #[error("tile {0} is not available")]
    TileUnavailable(TileId),

    /// No tile with this identifier exists on the board.
    #[error("no tile with id {0}")]
    UnknownTile(TileId),

    /// A tile was toggled before rolling.
    #[error("roll the dice first")]
    NoActiveRoll,

    /// The batch was submitted before it reached the roll value.
    #[error("batch holds {selected} of {required} tiles")]
    BatchIncomplete {
        /// Tiles currently selected.
        selected: u32,
        /// Tiles the roll requires.
        required: u32,
    },

    /// Every tile on the board has been used or is locked.
    #[error("no tiles left on the board")]
    NoTilesAvailable,

    /// The hint budget is exhausted.
    #[error("no hints remaining")]
    NoHintsRemaining,

    /// Every target of the level is already complete.
    #[error("all targets complete")]
    AllTargetsComplete,

    /// The requested level is outside the campaign.
    #[error("invalid level {level} (levels run from 1 to {max})")]
    InvalidLevelNumber {
        /// The requested level.
        level: u32,
        /// The last level of the campaign.
        max: u32,
    },

    /// The progression state machine does not allow this action now.
    #[error("cannot {action} while {phase}")]
    InvalidAction {
        /// The attempted action.
        action: &'static str,
        /// The phase the game was in.
        phase: Phase,
    },
}

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a progress store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying storage could not be read or written.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored blob is not a valid save.
    #[error("malformed save data: {0}")]
    Format(#[from] serde_json::Error),
}
