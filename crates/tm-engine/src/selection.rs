//! The in-progress batch of tile picks for the active roll.

use serde::{Deserialize, Serialize};

use crate::board::{Board, TileId, TileStatus};
use crate::error::{GameError, GameResult};

/// Result of an accepted toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggle {
    /// The toggled tile.
    pub tile: TileId,
    /// Whether the tile is now selected (false: it was unselected).
    pub selected: bool,
    /// Batch size after the toggle.
    pub count: u32,
    /// Selection budget of the active roll.
    pub max: u32,
}

impl Toggle {
    /// Whether the batch is full and ready to resolve.
    pub fn batch_ready(&self) -> bool {
        self.max > 0 && self.count == self.max
    }
}

/// Picks gathered for one roll, bounded by the roll's budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    picks: Vec<TileId>,
    max: u32,
}

impl Selection {
    /// An inactive selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the selection for a roll.
    pub fn open(&mut self, max: u32) {
        self.picks.clear();
        self.max = max;
    }

    /// Selection budget, 0 when no roll is active.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Tiles currently picked, in pick order.
    pub fn picks(&self) -> &[TileId] {
        &self.picks
    }

    /// Number of tiles currently picked.
    pub fn count(&self) -> u32 {
        self.picks.len() as u32
    }

    /// Select or unselect a tile.
    ///
    /// Selecting a tile that is already picked unselects it; selecting a new
    /// tile when the batch is full fails with
    /// [`GameError::SelectionLimitReached`].
    pub fn toggle(&mut self, tile: TileId, board: &mut Board) -> GameResult<Toggle> {
        if self.max == 0 {
            return Err(GameError::NoActiveRoll);
        }
        let entry = board.get_mut(tile).ok_or(GameError::UnknownTile(tile))?;

        let selected = match entry.status {
            TileStatus::Selected => {
                entry.status = TileStatus::Available;
                self.picks.retain(|&id| id != tile);
                false
            }
            TileStatus::Available => {
                if self.count() >= self.max {
                    return Err(GameError::SelectionLimitReached { max: self.max });
                }
                entry.status = TileStatus::Selected;
                self.picks.push(tile);
                true
            }
            TileStatus::Used | TileStatus::Locked => {
                return Err(GameError::TileUnavailable(tile));
            }
        };

        Ok(Toggle {
            tile,
            selected,
            count: self.count(),
            max: self.max,
        })
    }

    /// Hand over the batch and close the selection.
    pub fn finalize(&mut self) -> Vec<TileId> {
        self.max = 0;
        std::mem::take(&mut self.picks)
    }
}
