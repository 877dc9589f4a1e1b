//! Adaptive roll and progression engine for a tile-matching dice game.
//!
//! Each level hands the player a dice budget and a few category targets.
//! A roll decides how many tiles must be picked; picked tiles feed the
//! matching targets. The roll policy bends the odds toward sixes when the
//! player is stuck or falling behind, and the controller carries score,
//! hints and banked bonus dice from level to level.

pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod game;
pub mod journal;
pub mod level;
pub mod progress;
pub mod resolution;
pub mod roll;
pub mod selection;
pub mod session;
pub mod store;

pub use board::{Board, Target, Tile, TileId, TileStatus};
pub use catalog::{Catalog, Category, TileType};
pub use config::{GameConfig, ScoringRules};
pub use error::{GameError, GameResult, StoreError, StoreResult};
pub use game::{Advance, Game, Hint, Phase, RollOutcome};
pub use level::{LevelLayout, Tier, generate_level};
pub use progress::{ProgressState, SaveData, Settings};
pub use resolution::{LevelOutcome, ResolutionResult};
pub use roll::{AdaptiveRoller, RollDraw, RollRule, RollSource, ScriptedRoller};
pub use session::{GameSession, LevelSnapshot};
pub use store::{JsonFileStore, MemoryStore, ProgressStore};
