//! The progression controller.
//!
//! `Game` owns the cumulative progress, the active [`GameSession`], the
//! play journal and the random source. Every player action goes through
//! it: rolling, toggling tiles, resolving batches, hints, bonus dice and
//! level transitions. Failed actions return a [`GameError`] and change
//! nothing, except that a roll finding the board empty fails the level.

use std::collections::BTreeSet;
use std::fmt;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::{TileId, TileStatus};
use crate::catalog::Catalog;
use crate::config::GameConfig;
use crate::error::{GameError, GameResult, StoreResult};
use crate::journal::{Journal, JournalEntry};
use crate::level::{LevelLayout, generate_level};
use crate::progress::{ProgressState, SaveData, Settings};
use crate::resolution::{
    LevelFacts, LevelOutcome, ResolutionResult, completion_percent, resolve, star_rating,
};
use crate::roll::{AdaptiveRoller, RollRule, RollSource, roll_next};
use crate::selection::Toggle;
use crate::session::{GameSession, LevelSnapshot};
use crate::store::ProgressStore;

/// Where the level attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for a roll.
    Idle,
    /// Rolled; the batch is not yet full.
    Rolled,
    /// The batch is full and can be resolved.
    Resolving,
    /// Every target is filled.
    LevelComplete,
    /// Out of dice or tiles with targets unfilled.
    LevelFailed,
}

impl Phase {
    /// Whether the attempt has ended.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::LevelComplete | Self::LevelFailed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Rolled => write!(f, "rolled"),
            Self::Resolving => write!(f, "resolving"),
            Self::LevelComplete => write!(f, "level complete"),
            Self::LevelFailed => write!(f, "level failed"),
        }
    }
}

/// Result of a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Face value, 1-6.
    pub value: u32,
    /// Rule that chose the value.
    pub rule: RollRule,
    /// Whether the roll was a forced six that granted a bonus die.
    pub special_moment: bool,
    /// Tiles that must be picked this turn.
    pub selectable: u32,
    /// Dice left after the roll.
    pub dice_left: u32,
}

/// Result of a hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    /// Category key of the hinted target.
    pub category: String,
    /// Display name of the hinted target.
    pub name: String,
    /// Units the target still needs.
    pub remaining_needed: u32,
    /// Available tiles of the category.
    pub tiles: Vec<TileId>,
}

/// Result of moving to the next level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advance {
    /// The level now being played.
    pub snapshot: LevelSnapshot,
    /// Bonus dice carried into the level.
    pub bonus_dice: u32,
    /// Set when the last level was completed and play wrapped to level 1.
    pub wrap_bonus: Option<u64>,
}

/// A running game.
pub struct Game {
    config: GameConfig,
    catalog: Catalog,
    progress: ProgressState,
    session: GameSession,
    phase: Phase,
    settings: Settings,
    journal: Journal,
    achievements: BTreeSet<String>,
    roller: Box<dyn RollSource>,
    rng: StdRng,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("level", &self.progress.level)
            .field("score", &self.progress.score)
            .field("dice", &self.progress.dice)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Start a fresh game at level 1.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        let progress = ProgressState::new(&config);
        Self::start(config, progress, Settings::default(), None)
    }

    /// Continue from saved progress.
    ///
    /// The board is not persisted, so the saved level is regenerated, but
    /// the saved dice count carries over and banked bonus dice stay banked
    /// for the next level. Resuming with no dice left resumes a failed
    /// level. A saved level beyond the campaign is clamped to the last
    /// level.
    pub fn resume(config: GameConfig, save: &SaveData) -> GameResult<Self> {
        let mut progress = save.progress();
        progress.level = progress.level.min(config.total_levels);
        Self::start(config, progress, save.settings, Some(save.dice))
    }

    /// Play a prepared layout instead of a generated one.
    pub fn with_layout(config: GameConfig, layout: LevelLayout) -> Self {
        let mut progress = ProgressState::new(&config);
        progress.level = layout.level;
        progress.dice = layout.dice_budget;
        let rng = StdRng::seed_from_u64(config.seed);
        Self::assemble(config, progress, Settings::default(), layout, rng)
    }

    /// Replace the roll policy.
    pub fn with_roller(mut self, roller: impl RollSource + 'static) -> Self {
        self.roller = Box::new(roller);
        self
    }

    fn start(
        config: GameConfig,
        mut progress: ProgressState,
        settings: Settings,
        saved_dice: Option<u32>,
    ) -> GameResult<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let layout = generate_level(progress.level, 0, &Catalog::standard(), &config, &mut rng)?;
        progress.dice = saved_dice.unwrap_or(layout.dice_budget);

        let mut game = Self::assemble(config, progress, settings, layout, rng);
        if game.progress.dice == 0 {
            game.fail_level();
        }
        Ok(game)
    }

    fn assemble(
        config: GameConfig,
        progress: ProgressState,
        settings: Settings,
        layout: LevelLayout,
        rng: StdRng,
    ) -> Self {
        let mut game = Self {
            config,
            catalog: Catalog::standard(),
            progress,
            session: GameSession::from_layout(layout),
            phase: Phase::Idle,
            settings,
            journal: Journal::new(),
            achievements: BTreeSet::new(),
            roller: Box::new(AdaptiveRoller),
            rng,
        };
        game.log_level_started();
        game
    }

    /// Generate and enter a level, adding `bonus_dice` to its budget.
    ///
    /// Any in-progress attempt is discarded.
    pub fn start_level(&mut self, level: u32, bonus_dice: u32) -> GameResult<LevelSnapshot> {
        let layout = generate_level(level, bonus_dice, &self.catalog, &self.config, &mut self.rng)?;
        self.progress.level = level;
        self.progress.dice = layout.dice_budget;
        self.session = GameSession::from_layout(layout);
        self.phase = Phase::Idle;
        self.log_level_started();
        Ok(self.snapshot())
    }

    /// Spend a die and roll.
    pub fn roll(&mut self) -> GameResult<RollOutcome> {
        match self.phase {
            Phase::Rolled | Phase::Resolving => return Err(GameError::SelectionInProgress),
            Phase::LevelComplete | Phase::LevelFailed => {
                return Err(GameError::InvalidAction {
                    action: "roll",
                    phase: self.phase,
                });
            }
            Phase::Idle => {}
        }
        if self.progress.dice == 0 {
            return Err(GameError::NoDiceRemaining);
        }
        let available = self.session.board.available_count() as u32;
        if available == 0 {
            self.fail_level();
            return Err(GameError::NoTilesAvailable);
        }

        self.progress.dice -= 1;
        let ratio = self.session.completion_ratio();
        let draw = roll_next(
            self.roller.as_mut(),
            &mut self.session.rolls,
            self.progress.dice,
            ratio,
            &mut self.rng,
        );

        let special_moment = draw.is_special();
        if special_moment {
            self.progress.dice += 1;
            self.progress.bonus_dice += 1;
            tracing::info!(rule = %draw.rule, "special moment: bonus die granted");
            self.journal.append(JournalEntry::SpecialMoment {
                rule: draw.rule.to_string(),
                timestamp: Utc::now(),
            });
        }

        let selectable = draw.value.min(available);
        self.session.selection.open(selectable);
        self.phase = Phase::Rolled;

        self.journal.append(JournalEntry::Rolled {
            value: draw.value,
            rule: draw.rule.to_string(),
            selectable,
            dice_left: self.progress.dice,
            timestamp: Utc::now(),
        });

        Ok(RollOutcome {
            value: draw.value,
            rule: draw.rule,
            special_moment,
            selectable,
            dice_left: self.progress.dice,
        })
    }

    /// Select or unselect a tile for the active roll.
    pub fn toggle_tile(&mut self, tile: TileId) -> GameResult<Toggle> {
        match self.phase {
            Phase::Idle => return Err(GameError::NoActiveRoll),
            Phase::LevelComplete | Phase::LevelFailed => {
                return Err(GameError::InvalidAction {
                    action: "select tiles",
                    phase: self.phase,
                });
            }
            Phase::Rolled | Phase::Resolving => {}
        }
        let toggle = self.session.selection.toggle(tile, &mut self.session.board)?;
        self.phase = if toggle.batch_ready() {
            Phase::Resolving
        } else {
            Phase::Rolled
        };
        Ok(toggle)
    }

    /// Score the full batch and settle the level outcome.
    pub fn resolve_batch(&mut self) -> GameResult<ResolutionResult> {
        match self.phase {
            Phase::Resolving => {}
            Phase::Rolled => {
                return Err(GameError::BatchIncomplete {
                    selected: self.session.selection.count(),
                    required: self.session.selection.max(),
                });
            }
            Phase::Idle => return Err(GameError::NoActiveRoll),
            Phase::LevelComplete | Phase::LevelFailed => {
                return Err(GameError::InvalidAction {
                    action: "resolve",
                    phase: self.phase,
                });
            }
        }

        let facts = LevelFacts {
            level: self.session.level,
            rolls_taken: self.session.rolls.rolls_taken(),
        };
        let result = resolve(
            self.session.selection.picks(),
            &mut self.session.targets,
            &mut self.session.board,
            &mut self.progress,
            facts,
            &self.config.scoring,
        )?;
        self.session.selection.finalize();
        self.session.rolls.clear_current();

        self.journal.append(JournalEntry::BatchResolved {
            tiles: result.tiles.len() as u32,
            points: result.points_gained,
            completed: result.completed_categories.clone(),
            timestamp: Utc::now(),
        });

        match result.outcome {
            LevelOutcome::Continue => self.phase = Phase::Idle,
            LevelOutcome::Complete => {
                self.phase = Phase::LevelComplete;
                let bonus = result.level_bonus.map_or(0, |b| b.total());
                tracing::info!(
                    level = self.session.level,
                    bonus,
                    stars = result.stars,
                    "level complete"
                );
                self.journal.append(JournalEntry::LevelCompleted {
                    level: self.session.level,
                    bonus,
                    stars: result.stars,
                    timestamp: Utc::now(),
                });
                self.unlock(format!("Completed Level {}", self.session.level));
            }
            LevelOutcome::Failed => self.fail_level(),
        }

        Ok(result)
    }

    /// Point at a random unfinished target and its available tiles.
    ///
    /// Costs one hint. Fails without spending one when no hints are left
    /// or every target is already filled.
    pub fn use_hint(&mut self) -> GameResult<Hint> {
        if self.progress.hints == 0 {
            return Err(GameError::NoHintsRemaining);
        }
        let open: Vec<(String, String, u32)> = self
            .session
            .incomplete_targets()
            .map(|t| (t.category.clone(), t.name.clone(), t.remaining()))
            .collect();
        if open.is_empty() {
            return Err(GameError::AllTargetsComplete);
        }

        let index = self.rng.random_range(0..open.len());
        let (category, name, remaining_needed) = open[index].clone();
        let tiles = self
            .session
            .board
            .available()
            .filter(|t| t.category == category)
            .map(|t| t.id)
            .collect();
        self.progress.hints -= 1;

        self.journal.append(JournalEntry::HintUsed {
            target: name.clone(),
            remaining: remaining_needed,
            timestamp: Utc::now(),
        });

        Ok(Hint {
            category,
            name,
            remaining_needed,
            tiles,
        })
    }

    /// Add dice to the current level's budget.
    ///
    /// A level that failed for lack of dice becomes playable again when
    /// tiles remain.
    pub fn add_bonus_dice(&mut self, amount: u32) {
        if amount == 0 {
            return;
        }
        self.progress.dice += amount;
        self.journal.append(JournalEntry::DiceAdded {
            amount,
            timestamp: Utc::now(),
        });
        if self.phase == Phase::LevelFailed && self.session.board.available_count() > 0 {
            self.phase = Phase::Idle;
        }
    }

    /// Grant the rewarded-ad dice. Returns the number of dice added.
    pub fn watch_ad(&mut self) -> u32 {
        let amount = self.config.ad_reward_dice;
        self.add_bonus_dice(amount);
        self.unlock("Ad Watcher".to_string());
        amount
    }

    /// Move on from a completed level.
    ///
    /// Banked bonus dice are added to the new level. Completing the last
    /// level awards the wrap bonus and restarts the campaign at level 1.
    pub fn advance(&mut self) -> GameResult<Advance> {
        if self.phase != Phase::LevelComplete {
            return Err(GameError::InvalidAction {
                action: "advance",
                phase: self.phase,
            });
        }

        let mut next = self.session.level + 1;
        let mut wrap_bonus = None;
        if next > self.config.total_levels {
            let final_score = self.progress.score;
            let bonus = self.config.wrap_bonus;
            self.progress.score += bonus;
            next = 1;
            wrap_bonus = Some(bonus);
            tracing::info!(final_score, bonus, "campaign completed");
            self.journal.append(JournalEntry::CampaignCompleted {
                final_score,
                bonus,
                timestamp: Utc::now(),
            });
            self.unlock("Game Master".to_string());
        }

        let bonus_dice = self.progress.take_bonus_dice();
        let snapshot = self.start_level(next, bonus_dice)?;
        Ok(Advance {
            snapshot,
            bonus_dice,
            wrap_bonus,
        })
    }

    /// Regenerate the current level.
    ///
    /// Allowed before the first roll of a turn and after failing.
    pub fn reset_level(&mut self) -> GameResult<LevelSnapshot> {
        match self.phase {
            Phase::Idle | Phase::LevelFailed => {}
            Phase::Rolled | Phase::Resolving => return Err(GameError::SelectionInProgress),
            Phase::LevelComplete => {
                return Err(GameError::InvalidAction {
                    action: "reset",
                    phase: self.phase,
                });
            }
        }
        let bonus_dice = self.progress.take_bonus_dice();
        self.start_level(self.session.level, bonus_dice)
    }

    fn fail_level(&mut self) {
        self.phase = Phase::LevelFailed;
        let completion_percent = completion_percent(&self.session.targets);
        tracing::info!(level = self.session.level, completion_percent, "level failed");
        self.journal.append(JournalEntry::LevelFailed {
            level: self.session.level,
            completion_percent,
            timestamp: Utc::now(),
        });
    }

    fn unlock(&mut self, title: String) {
        if self.achievements.insert(title.clone()) {
            tracing::debug!(%title, "achievement unlocked");
            self.journal.append(JournalEntry::Achievement {
                title,
                timestamp: Utc::now(),
            });
        }
    }

    fn log_level_started(&mut self) {
        let targets = self
            .session
            .targets
            .iter()
            .map(|t| format!("{} x{}", t.name, t.needed))
            .collect();
        self.journal.append(JournalEntry::LevelStarted {
            level: self.session.level,
            tier: self.session.tier,
            dice: self.progress.dice,
            targets,
            timestamp: Utc::now(),
        });
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Cumulative progress.
    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    /// The active level attempt.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Game configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Tile catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Play journal.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Unlocked achievement titles.
    pub fn achievements(&self) -> impl Iterator<Item = &str> {
        self.achievements.iter().map(String::as_str)
    }

    /// Presentation preferences.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Replace the presentation preferences.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Overall completion of the current level, 0-100.
    pub fn completion_percent(&self) -> u32 {
        completion_percent(&self.session.targets)
    }

    /// Star rating for the current completion.
    pub fn stars(&self) -> u8 {
        star_rating(self.completion_percent())
    }

    /// Tiles selected for the active roll that are still marked selected.
    pub fn selected_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.session
            .selection
            .picks()
            .iter()
            .copied()
            .filter(|&id| {
                self.session
                    .board
                    .get(id)
                    .is_some_and(|t| t.status == TileStatus::Selected)
            })
    }

    /// Presentation snapshot of the current level.
    pub fn snapshot(&self) -> LevelSnapshot {
        self.session.snapshot(self.progress.dice)
    }

    /// The persisted form of the current progress.
    pub fn save_data(&self) -> SaveData {
        SaveData::capture(&self.progress, self.settings)
    }

    /// Save progress to `store`.
    pub fn save_to(&self, store: &mut dyn ProgressStore) -> StoreResult<()> {
        store.save(&self.save_data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Target, Tile};
    use crate::roll::{RollContext, RollDraw, ScriptedRoller};
    use rand::RngCore;
    use crate::store::MemoryStore;

    fn tiles(catalog: &Catalog, key: &str, ids: std::ops::Range<u32>) -> Vec<Tile> {
        let cat = catalog.get(key).unwrap();
        ids.map(|i| Tile {
            id: TileId(i),
            category: cat.key.clone(),
            kind: cat.tiles[i as usize % cat.tiles.len()].clone(),
            status: TileStatus::Available,
            layer: 1,
        })
        .collect()
    }

    /// One animals target needing `needed`, with `extra` off-target fruit tiles.
    fn layout(needed: u32, dice: u32, animal_tiles: u32, extra: u32) -> LevelLayout {
        let catalog = Catalog::standard();
        let mut all = tiles(&catalog, "animals", 0..animal_tiles);
        all.extend(tiles(&catalog, "fruits", animal_tiles..animal_tiles + extra));
        LevelLayout {
            level: 1,
            tier: 1,
            dice_budget: dice,
            targets: vec![Target::new(catalog.get("animals").unwrap(), needed)],
            tiles: all,
        }
    }

    fn pick_animals(game: &mut Game, n: u32) {
        let ids: Vec<TileId> = game
            .session()
            .board()
            .available()
            .filter(|t| t.category == "animals")
            .take(n as usize)
            .map(|t| t.id)
            .collect();
        for id in ids {
            game.toggle_tile(id).unwrap();
        }
    }

    #[test]
    fn new_game_starts_idle_at_level_one() {
        let game = Game::new(GameConfig::default()).unwrap();
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.progress().level, 1);
        assert_eq!(game.progress().dice, 12);
        assert_eq!(game.progress().hints, 3);
        assert_eq!(game.session().targets().len(), 1);
        assert!(matches!(
            game.journal().entries().first(),
            Some(JournalEntry::LevelStarted { level: 1, .. })
        ));
    }

    #[test]
    fn same_seed_same_level() {
        let a = Game::new(GameConfig::default().with_seed(9)).unwrap();
        let b = Game::new(GameConfig::default().with_seed(9)).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn roll_spends_a_die_and_opens_selection() {
        let mut game =
            Game::with_layout(GameConfig::default(), layout(5, 5, 8, 0)).with_roller(ScriptedRoller::new([3]));
        let roll = game.roll().unwrap();
        assert_eq!(roll.value, 3);
        assert_eq!(roll.selectable, 3);
        assert_eq!(roll.dice_left, 4);
        assert!(!roll.special_moment);
        assert_eq!(game.phase(), Phase::Rolled);
        assert_eq!(game.roll(), Err(GameError::SelectionInProgress));
    }

    #[test]
    fn selectable_capped_by_available_tiles() {
        let mut game =
            Game::with_layout(GameConfig::default(), layout(2, 5, 2, 0)).with_roller(ScriptedRoller::new([6]));
        let roll = game.roll().unwrap();
        assert_eq!(roll.selectable, 2);
    }

    #[test]
    fn toggle_before_roll_fails() {
        let mut game = Game::with_layout(GameConfig::default(), layout(5, 5, 8, 0));
        assert_eq!(game.toggle_tile(TileId(0)), Err(GameError::NoActiveRoll));
    }

    #[test]
    fn resolve_requires_full_batch() {
        let mut game =
            Game::with_layout(GameConfig::default(), layout(5, 5, 8, 0)).with_roller(ScriptedRoller::new([3]));
        game.roll().unwrap();
        game.toggle_tile(TileId(0)).unwrap();
        assert_eq!(
            game.resolve_batch(),
            Err(GameError::BatchIncomplete {
                selected: 1,
                required: 3
            })
        );
        game.toggle_tile(TileId(1)).unwrap();
        game.toggle_tile(TileId(2)).unwrap();
        assert_eq!(game.phase(), Phase::Resolving);
        game.toggle_tile(TileId(2)).unwrap();
        assert_eq!(game.phase(), Phase::Rolled);
    }

    #[test]
    fn five_single_rolls_complete_the_level() {
        let mut game = Game::with_layout(GameConfig::default(), layout(5, 5, 8, 0))
            .with_roller(ScriptedRoller::new([1; 5]));

        let mut completion_bonuses = 0;
        let mut last = None;
        for _ in 0..5 {
            game.roll().unwrap();
            pick_animals(&mut game, 1);
            let result = game.resolve_batch().unwrap();
            completion_bonuses += result.completed_categories.len();
            last = Some(result);
        }

        let last = last.unwrap();
        assert_eq!(completion_bonuses, 1);
        assert_eq!(last.outcome, LevelOutcome::Complete);
        assert_eq!(last.completion_percent, 100);
        assert_eq!(last.stars, 5);
        assert_eq!(game.phase(), Phase::LevelComplete);
        assert_eq!(game.progress().dice, 0);
        assert!(game.achievements().any(|a| a == "Completed Level 1"));
        assert_eq!(game.roll().unwrap_err(), GameError::InvalidAction {
            action: "roll",
            phase: Phase::LevelComplete,
        });
    }

    #[test]
    fn last_die_short_of_target_fails() {
        let mut game = Game::with_layout(GameConfig::default(), layout(5, 1, 5, 3))
            .with_roller(ScriptedRoller::new([3]));
        game.roll().unwrap();
        for id in [5, 6, 7] {
            game.toggle_tile(TileId(id)).unwrap();
        }
        let result = game.resolve_batch().unwrap();
        assert_eq!(result.outcome, LevelOutcome::Failed);
        assert!(result.level_bonus.is_none());
        assert_eq!(game.phase(), Phase::LevelFailed);
        assert_eq!(
            game.roll(),
            Err(GameError::InvalidAction {
                action: "roll",
                phase: Phase::LevelFailed,
            })
        );
    }

    #[test]
    fn roll_without_dice_fails() {
        let mut game = Game::with_layout(GameConfig::default(), layout(5, 0, 5, 0));
        assert_eq!(game.roll(), Err(GameError::NoDiceRemaining));
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn bonus_dice_revive_failed_level() {
        let mut game = Game::with_layout(GameConfig::default(), layout(5, 1, 5, 3))
            .with_roller(ScriptedRoller::new([3, 1]));
        game.roll().unwrap();
        for id in [5, 6, 7] {
            game.toggle_tile(TileId(id)).unwrap();
        }
        game.resolve_batch().unwrap();
        assert_eq!(game.watch_ad(), 5);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.progress().dice, 5);
        assert!(game.roll().is_ok());
        assert!(game.achievements().any(|a| a == "Ad Watcher"));
    }

    #[test]
    fn hint_after_completion_keeps_budget() {
        let mut game = Game::with_layout(GameConfig::default(), layout(2, 5, 4, 0))
            .with_roller(ScriptedRoller::new([2]));
        game.roll().unwrap();
        pick_animals(&mut game, 2);
        game.resolve_batch().unwrap();
        assert_eq!(game.use_hint(), Err(GameError::AllTargetsComplete));
        assert_eq!(game.progress().hints, 3);
    }

    #[test]
    fn hint_points_at_open_target() {
        let mut game = Game::with_layout(GameConfig::default().with_hints(1), layout(5, 5, 6, 3));
        let hint = game.use_hint().unwrap();
        assert_eq!(hint.category, "animals");
        assert_eq!(hint.remaining_needed, 5);
        assert_eq!(hint.tiles.len(), 6);
        assert_eq!(game.progress().hints, 0);
        assert_eq!(game.use_hint(), Err(GameError::NoHintsRemaining));
    }

    #[test]
    fn empty_board_fails_on_roll() {
        let mut game = Game::with_layout(GameConfig::default(), layout(5, 3, 0, 0));
        assert_eq!(game.roll(), Err(GameError::NoTilesAvailable));
        assert_eq!(game.phase(), Phase::LevelFailed);
        assert_eq!(game.progress().dice, 3);

        assert!(matches!(
            game.roll(),
            Err(GameError::InvalidAction { action: "roll", .. })
        ));
        let failures = game
            .journal()
            .entries()
            .iter()
            .filter(|e| matches!(e, JournalEntry::LevelFailed { .. }))
            .count();
        assert_eq!(failures, 1);
    }

    /// Always rolls a forced six.
    struct ForcedSix;

    impl RollSource for ForcedSix {
        fn next_roll(&mut self, _ctx: &RollContext, _rng: &mut dyn RngCore) -> RollDraw {
            RollDraw {
                value: 6,
                rule: RollRule::PacingBoost,
            }
        }
    }

    #[test]
    fn special_moment_refunds_and_banks_a_die() {
        let mut game = Game::with_layout(GameConfig::default(), layout(1, 5, 2, 0))
            .with_roller(ForcedSix);

        let roll = game.roll().unwrap();
        assert!(roll.special_moment);
        assert_eq!(roll.rule, RollRule::PacingBoost);
        assert_eq!(roll.selectable, 2);
        assert_eq!(roll.dice_left, 5);
        assert_eq!(game.progress().dice, 5);
        assert_eq!(game.progress().bonus_dice, 1);
        assert!(
            game.journal()
                .entries()
                .iter()
                .any(|e| matches!(e, JournalEntry::SpecialMoment { .. }))
        );

        pick_animals(&mut game, 2);
        assert_eq!(game.resolve_batch().unwrap().outcome, LevelOutcome::Complete);

        let next = game.advance().unwrap();
        assert_eq!(next.bonus_dice, 1);
        assert_eq!(next.snapshot.dice_budget, 12 + 1);
        assert_eq!(game.progress().dice, 13);
        assert_eq!(game.progress().bonus_dice, 0);
    }

    #[test]
    fn advance_requires_completion() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        assert!(matches!(
            game.advance(),
            Err(GameError::InvalidAction {
                action: "advance",
                ..
            })
        ));
    }

    #[test]
    fn advance_moves_to_next_level() {
        let mut game = Game::with_layout(GameConfig::default(), layout(1, 5, 2, 0))
            .with_roller(ScriptedRoller::new([1]));
        game.roll().unwrap();
        pick_animals(&mut game, 1);
        game.resolve_batch().unwrap();
        let next = game.advance().unwrap();
        assert_eq!(next.snapshot.level, 2);
        assert_eq!(next.wrap_bonus, None);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.progress().level, 2);
        assert_eq!(game.progress().dice, 12);
    }

    #[test]
    fn last_level_wraps_with_bonus() {
        let config = GameConfig::default().with_total_levels(1);
        let mut game =
            Game::with_layout(config, layout(1, 5, 2, 0)).with_roller(ScriptedRoller::new([1]));
        game.roll().unwrap();
        pick_animals(&mut game, 1);
        game.resolve_batch().unwrap();
        let score = game.progress().score;
        let next = game.advance().unwrap();
        assert_eq!(next.wrap_bonus, Some(10_000));
        assert_eq!(next.snapshot.level, 1);
        assert_eq!(game.progress().score, score + 10_000);
        assert!(game.achievements().any(|a| a == "Game Master"));
    }

    #[test]
    fn reset_blocked_mid_roll() {
        let mut game =
            Game::with_layout(GameConfig::default(), layout(5, 5, 8, 0)).with_roller(ScriptedRoller::new([2]));
        game.roll().unwrap();
        assert_eq!(game.reset_level(), Err(GameError::SelectionInProgress));
    }

    #[test]
    fn reset_regenerates_level() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.add_bonus_dice(2);
        let snap = game.reset_level().unwrap();
        assert_eq!(snap.level, 1);
        assert_eq!(snap.dice_budget, 12);
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn start_level_validates_number() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        assert_eq!(
            game.start_level(11, 0),
            Err(GameError::InvalidLevelNumber { level: 11, max: 10 })
        );
        assert_eq!(game.progress().level, 1);
        let snap = game.start_level(5, 2).unwrap();
        assert_eq!(snap.dice_budget, 10 + 2);
    }

    #[test]
    fn save_and_resume() {
        let mut game = Game::new(GameConfig::default()).unwrap();
        game.start_level(4, 0).unwrap();
        game.set_settings(Settings {
            music: false,
            ..Settings::default()
        });
        let mut store = MemoryStore::new();
        game.save_to(&mut store).unwrap();

        let save = store.load().unwrap().unwrap();
        assert_eq!(save.level, 4);
        let resumed = Game::resume(GameConfig::default(), &save).unwrap();
        assert_eq!(resumed.progress().level, 4);
        assert_eq!(resumed.progress().dice, 11);
        assert!(!resumed.settings().music);
    }

    #[test]
    fn resume_keeps_spent_dice_and_bank() {
        let mut game = Game::with_layout(GameConfig::default(), layout(5, 5, 8, 0))
            .with_roller(ScriptedRoller::new([1, 1]));
        for _ in 0..2 {
            game.roll().unwrap();
            pick_animals(&mut game, 1);
            game.resolve_batch().unwrap();
        }
        let mut save = game.save_data();
        save.bonus_dice = 2;
        assert_eq!(save.dice, 3);

        let resumed = Game::resume(GameConfig::default(), &save).unwrap();
        assert_eq!(resumed.progress().dice, 3);
        assert_eq!(resumed.progress().bonus_dice, 2);
        assert_eq!(resumed.progress().score, save.score);
        assert_eq!(resumed.phase(), Phase::Idle);
    }

    #[test]
    fn resume_out_of_dice_is_failed() {
        let save = SaveData {
            level: 2,
            dice: 0,
            ..SaveData::default()
        };
        let mut game = Game::resume(GameConfig::default(), &save).unwrap();
        assert_eq!(game.phase(), Phase::LevelFailed);
        assert_eq!(game.progress().dice, 0);
        assert!(game.roll().is_err());
        game.add_bonus_dice(2);
        assert_eq!(game.phase(), Phase::Idle);
        assert!(game.roll().is_ok());
    }

    #[test]
    fn resume_clamps_level() {
        let save = SaveData {
            level: 40,
            ..SaveData::default()
        };
        let game = Game::resume(GameConfig::default(), &save).unwrap();
        assert_eq!(game.progress().level, 10);
    }

    #[test]
    fn adaptive_game_never_overspends() {
        let mut game = Game::new(GameConfig::default().with_seed(3)).unwrap();
        let start = game.progress().dice;
        let mut rolls = 0;
        while game.phase() == Phase::Idle {
            let roll = game.roll().unwrap();
            rolls += 1;
            let ids: Vec<TileId> = game
                .session()
                .board()
                .available()
                .take(roll.selectable as usize)
                .map(|t| t.id)
                .collect();
            for id in ids {
                game.toggle_tile(id).unwrap();
            }
            game.resolve_batch().unwrap();
        }
        assert!(game.phase().is_terminal());
        assert!(rolls <= start + game.progress().bonus_dice);
    }
}
