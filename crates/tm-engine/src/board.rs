//! Level-scoped tiles and targets.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, TileType};

/// Unique identifier of a tile within a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a tile on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileStatus {
    /// Can be picked.
    #[default]
    Available,
    /// Part of the current selection batch.
    Selected,
    /// Consumed by a resolved batch.
    Used,
    /// Never selectable this level.
    Locked,
}

impl fmt::Display for TileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Selected => write!(f, "selected"),
            Self::Used => write!(f, "used"),
            Self::Locked => write!(f, "locked"),
        }
    }
}

/// A board cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Unique within the level.
    pub id: TileId,
    /// Key of the tile's category.
    pub category: String,
    /// The concrete face.
    pub kind: TileType,
    /// Current status.
    pub status: TileStatus,
    /// Presentation layer (1 = bottom). Has no effect on play.
    pub layer: u8,
}

impl Tile {
    /// Points scored when this tile is used.
    pub fn points(&self) -> u32 {
        self.kind.points
    }

    /// Whether the tile can be picked.
    pub fn is_available(&self) -> bool {
        self.status == TileStatus::Available
    }
}

/// A per-level quota for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Key of the bound category.
    pub category: String,
    /// Display name of the category.
    pub name: String,
    /// Display glyph of the category.
    pub icon: String,
    /// Units required.
    pub needed: u32,
    /// Units collected so far, never above `needed`.
    pub collected: u32,
    /// Bonus per collected unit.
    pub points_per_unit: u32,
}

impl Target {
    /// Create an empty target for a category.
    pub fn new(category: &Category, needed: u32) -> Self {
        Self {
            category: category.key.clone(),
            name: category.name.clone(),
            icon: category.icon.clone(),
            needed,
            collected: 0,
            points_per_unit: category.points,
        }
    }

    /// Whether the quota is filled.
    pub fn is_complete(&self) -> bool {
        self.collected == self.needed
    }

    /// Units still missing.
    pub fn remaining(&self) -> u32 {
        self.needed - self.collected
    }

    /// Collect up to `units`, clamped at the quota. Returns the units taken.
    pub fn collect(&mut self, units: u32) -> u32 {
        let taken = units.min(self.remaining());
        self.collected += taken;
        taken
    }
}

/// Collected units over needed units, summed across targets.
///
/// Returns 0.0 when there are no targets.
pub fn completion_ratio(targets: &[Target]) -> f64 {
    let needed: u32 = targets.iter().map(|t| t.needed).sum();
    if needed == 0 {
        return 0.0;
    }
    let collected: u32 = targets.iter().map(|t| t.collected).sum();
    f64::from(collected) / f64::from(needed)
}

/// The tile set of one level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tiles: Vec<Tile>,
}

impl Board {
    /// Wrap a generated tile set.
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    /// All tiles in display order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Look up a tile.
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|t| t.id == id)
    }

    /// Tiles that can still be picked.
    pub fn available(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_available())
    }

    /// Number of tiles that can still be picked.
    pub fn available_count(&self) -> usize {
        self.available().count()
    }

    /// Total tiles per category key, regardless of status.
    pub fn counts_by_category(&self) -> BTreeMap<&str, u32> {
        let mut counts = BTreeMap::new();
        for tile in &self.tiles {
            *counts.entry(tile.category.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of tiles on the board.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the board is empty.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
