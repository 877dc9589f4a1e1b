//! Scoring a finalized batch and deciding the level outcome.
//!
//! A batch is validated in full before anything is mutated, so a rejected
//! batch leaves targets, tiles and score untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Target, TileId, TileStatus, completion_ratio};
use crate::config::ScoringRules;
use crate::error::{GameError, GameResult};
use crate::progress::ProgressState;

/// What happens to the level after a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelOutcome {
    /// Targets remain and play can go on.
    Continue,
    /// Every target is filled.
    Complete,
    /// Out of dice (or tiles) with targets unfilled.
    Failed,
}

impl fmt::Display for LevelOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Bonus awarded when a level is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelBonus {
    /// For unspent dice.
    pub dice_bonus: u64,
    /// For the level number.
    pub level_bonus: u64,
    /// For finishing in fewer rolls than par.
    pub pace_bonus: u64,
}

impl LevelBonus {
    /// Sum of all parts.
    pub fn total(&self) -> u64 {
        self.dice_bonus + self.level_bonus + self.pace_bonus
    }
}

/// Result of resolving one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Tiles consumed by the batch.
    pub tiles: Vec<TileId>,
    /// Face value of the tiles.
    pub base_points: u64,
    /// Per-unit and completion bonuses from targets.
    pub target_bonus: u64,
    /// `base_points + target_bonus`.
    pub points_gained: u64,
    /// Names of targets this batch completed.
    pub completed_categories: Vec<String>,
    /// Level outcome after the batch.
    pub outcome: LevelOutcome,
    /// Present when the batch completed the level.
    pub level_bonus: Option<LevelBonus>,
    /// Overall target completion, 0-100.
    pub completion_percent: u32,
    /// Star rating, 1-5.
    pub stars: u8,
}

/// Level-wide facts the engine needs beyond the batch itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFacts {
    /// Current level number.
    pub level: u32,
    /// Rolls taken so far this level.
    pub rolls_taken: u32,
}

/// Score a batch, update targets and score, and decide the level outcome.
pub fn resolve(
    batch: &[TileId],
    targets: &mut [Target],
    board: &mut Board,
    progress: &mut ProgressState,
    facts: LevelFacts,
    rules: &ScoringRules,
) -> GameResult<ResolutionResult> {
    let mut seen = BTreeSet::new();
    let mut per_category: BTreeMap<String, u32> = BTreeMap::new();
    let mut base_points = 0u64;
    for &id in batch {
        let tile = board.get(id).ok_or(GameError::UnknownTile(id))?;
        let usable = matches!(tile.status, TileStatus::Available | TileStatus::Selected);
        if !usable || !seen.insert(id) {
            return Err(GameError::TileUnavailable(id));
        }
        base_points += u64::from(tile.points());
        *per_category.entry(tile.category.clone()).or_insert(0) += 1;
    }

    let mut target_bonus = 0u64;
    let mut completed_categories = Vec::new();
    for target in targets.iter_mut() {
        let Some(&count) = per_category.get(&target.category) else {
            continue;
        };
        let was_complete = target.is_complete();
        let taken = target.collect(count);
        target_bonus += u64::from(taken) * u64::from(target.points_per_unit);
        if !was_complete && target.is_complete() {
            target_bonus += u64::from(rules.completion_bonus);
            completed_categories.push(target.name.clone());
        }
    }

    let points_gained = base_points + target_bonus;
    progress.score += points_gained;

    for &id in batch {
        if let Some(tile) = board.get_mut(id) {
            tile.status = TileStatus::Used;
        }
    }

    let outcome = evaluate_outcome(targets, board, progress.dice);
    let award = (outcome == LevelOutcome::Complete)
        .then(|| level_bonus(targets, progress.dice, facts, rules));
    if let Some(bonus) = award {
        progress.score += bonus.total();
    }

    let completion_percent = completion_percent(targets);
    Ok(ResolutionResult {
        tiles: batch.to_vec(),
        base_points,
        target_bonus,
        points_gained,
        completed_categories,
        outcome,
        level_bonus: award,
        completion_percent,
        stars: star_rating(completion_percent),
    })
}

/// Decide whether the level is complete, failed, or continues.
pub fn evaluate_outcome(targets: &[Target], board: &Board, dice_left: u32) -> LevelOutcome {
    if targets.iter().all(Target::is_complete) {
        LevelOutcome::Complete
    } else if dice_left == 0 || board.available_count() == 0 {
        LevelOutcome::Failed
    } else {
        LevelOutcome::Continue
    }
}

/// Level-complete bonus for the given targets and remaining dice.
pub fn level_bonus(
    targets: &[Target],
    dice_left: u32,
    facts: LevelFacts,
    rules: &ScoringRules,
) -> LevelBonus {
    let needed: u32 = targets.iter().map(|t| t.needed).sum();
    let par = needed.div_ceil(3);
    LevelBonus {
        dice_bonus: u64::from(dice_left) * u64::from(rules.dice_bonus_per_die),
        level_bonus: u64::from(facts.level) * u64::from(rules.level_multiplier),
        pace_bonus: u64::from(par.saturating_sub(facts.rolls_taken))
            * u64::from(rules.pace_bonus_per_roll),
    }
}

/// Overall completion rounded to a whole percent.
pub fn completion_percent(targets: &[Target]) -> u32 {
    (completion_ratio(targets) * 100.0).round() as u32
}

/// Stars for a completion percentage.
pub fn star_rating(percent: u32) -> u8 {
    match percent {
        90.. => 5,
        75..=89 => 4,
        60..=74 => 3,
        40..=59 => 2,
        _ => 1,
    }
}

/// Praise for the points a batch earned.
pub fn feedback_for(points: u64) -> &'static str {
    match points {
        0..=50 => "Good start!",
        51..=100 => "Nice!",
        101..=200 => "Great!",
        201..=300 => "Excellent!",
        301..=500 => "Amazing!",
        501..=1000 => "Unbelievable!",
        _ => "FANTASTIC!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Tile;
    use crate::catalog::{Catalog, Category};
    use crate::config::GameConfig;
    use proptest::prelude::*;

    fn category(key: &str) -> Category {
        Catalog::standard().get(key).cloned().unwrap()
    }

    fn board_of(keys: &[&str]) -> Board {
        Board::new(
            keys.iter()
                .enumerate()
                .map(|(i, key)| {
                    let cat = category(key);
                    Tile {
                        id: TileId(i as u32),
                        category: cat.key.clone(),
                        kind: cat.tiles[0].clone(),
                        status: TileStatus::Available,
                        layer: 1,
                    }
                })
                .collect(),
        )
    }

    fn progress(dice: u32) -> ProgressState {
        ProgressState {
            dice,
            ..ProgressState::new(&GameConfig::default())
        }
    }

    fn facts() -> LevelFacts {
        LevelFacts {
            level: 1,
            rolls_taken: 1,
        }
    }

    fn ids(range: std::ops::Range<u32>) -> Vec<TileId> {
        range.map(TileId).collect()
    }

    #[test]
    fn scores_base_and_unit_bonus() {
        let mut targets = vec![Target::new(&category("animals"), 5)];
        let mut board = board_of(&["animals", "animals", "fruits", "animals"]);
        let mut p = progress(4);
        let r = resolve(
            &ids(0..3),
            &mut targets,
            &mut board,
            &mut p,
            facts(),
            &ScoringRules::default(),
        )
        .unwrap();
        assert_eq!(r.base_points, 280);
        assert_eq!(r.target_bonus, 200);
        assert_eq!(r.points_gained, 480);
        assert_eq!(p.score, 480);
        assert_eq!(targets[0].collected, 2);
        assert_eq!(r.outcome, LevelOutcome::Continue);
        assert!(r.completed_categories.is_empty());
        assert_eq!(board.get(TileId(0)).map(|t| t.status), Some(TileStatus::Used));
        assert_eq!(board.get(TileId(3)).map(|t| t.status), Some(TileStatus::Available));
    }

    #[test]
    fn completion_bonus_once_and_clamped() {
        let mut targets = vec![
            Target::new(&category("animals"), 2),
            Target::new(&category("birds"), 5),
        ];
        let mut board = board_of(&["animals", "animals", "animals", "animals", "birds"]);
        let mut p = progress(6);
        let rules = ScoringRules::default();

        let first = resolve(&ids(0..3), &mut targets, &mut board, &mut p, facts(), &rules).unwrap();
        assert_eq!(targets[0].collected, 2);
        assert_eq!(first.completed_categories, vec!["Animals".to_string()]);
        assert_eq!(first.target_bonus, 2 * 100 + 500);

        let second = resolve(&ids(3..5), &mut targets, &mut board, &mut p, facts(), &rules).unwrap();
        assert_eq!(targets[0].collected, 2);
        assert!(second.completed_categories.is_empty());
        assert_eq!(second.target_bonus, 120);
    }

    #[test]
    fn used_tiles_rejected_without_side_effects() {
        let mut targets = vec![Target::new(&category("animals"), 5)];
        let mut board = board_of(&["animals", "animals"]);
        let mut p = progress(3);
        let rules = ScoringRules::default();
        resolve(&ids(0..1), &mut targets, &mut board, &mut p, facts(), &rules).unwrap();
        let score = p.score;

        let err = resolve(&ids(0..2), &mut targets, &mut board, &mut p, facts(), &rules);
        assert_eq!(err, Err(GameError::TileUnavailable(TileId(0))));
        assert_eq!(p.score, score);
        assert_eq!(targets[0].collected, 1);
        assert_eq!(board.get(TileId(1)).map(|t| t.status), Some(TileStatus::Available));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut targets = vec![Target::new(&category("animals"), 5)];
        let mut board = board_of(&["animals", "animals"]);
        let mut p = progress(3);
        let batch = vec![TileId(1), TileId(1)];
        let err = resolve(
            &batch,
            &mut targets,
            &mut board,
            &mut p,
            facts(),
            &ScoringRules::default(),
        );
        assert_eq!(err, Err(GameError::TileUnavailable(TileId(1))));
        assert_eq!(p.score, 0);
    }

    #[test]
    fn completing_level_adds_bonus() {
        let mut targets = vec![Target::new(&category("animals"), 3)];
        let mut board = board_of(&["animals", "animals", "animals"]);
        let mut p = progress(2);
        let facts = LevelFacts {
            level: 3,
            rolls_taken: 1,
        };
        let r = resolve(
            &ids(0..3),
            &mut targets,
            &mut board,
            &mut p,
            facts,
            &ScoringRules::default(),
        )
        .unwrap();
        assert_eq!(r.outcome, LevelOutcome::Complete);
        let bonus = r.level_bonus.unwrap();
        assert_eq!(bonus.dice_bonus, 100);
        assert_eq!(bonus.level_bonus, 300);
        // par 1, one roll taken
        assert_eq!(bonus.pace_bonus, 0);
        assert_eq!(r.stars, 5);
        assert_eq!(p.score, r.points_gained + bonus.total());
    }

    #[test]
    fn out_of_dice_fails() {
        let mut targets = vec![Target::new(&category("animals"), 5)];
        let mut board = board_of(&["fruits", "fruits", "animals", "animals"]);
        let mut p = progress(0);
        let r = resolve(
            &ids(0..3),
            &mut targets,
            &mut board,
            &mut p,
            facts(),
            &ScoringRules::default(),
        )
        .unwrap();
        assert_eq!(r.outcome, LevelOutcome::Failed);
        assert!(r.level_bonus.is_none());
        assert_eq!(r.completion_percent, 20);
        assert_eq!(r.stars, 1);
    }

    #[test]
    fn empty_board_fails() {
        let mut targets = vec![Target::new(&category("animals"), 5)];
        let mut board = board_of(&["animals"]);
        let mut p = progress(5);
        let r = resolve(
            &ids(0..1),
            &mut targets,
            &mut board,
            &mut p,
            facts(),
            &ScoringRules::default(),
        )
        .unwrap();
        assert_eq!(r.outcome, LevelOutcome::Failed);
    }

    #[test]
    fn pace_bonus_rewards_fast_finish() {
        let targets = vec![Target::new(&category("animals"), 9)];
        let b = level_bonus(
            &targets,
            0,
            LevelFacts {
                level: 1,
                rolls_taken: 1,
            },
            &ScoringRules::default(),
        );
        assert_eq!(b.pace_bonus, 200);
    }

    #[test]
    fn star_thresholds() {
        assert_eq!(star_rating(100), 5);
        assert_eq!(star_rating(90), 5);
        assert_eq!(star_rating(89), 4);
        assert_eq!(star_rating(75), 4);
        assert_eq!(star_rating(60), 3);
        assert_eq!(star_rating(40), 2);
        assert_eq!(star_rating(39), 1);
        assert_eq!(star_rating(0), 1);
    }

    #[test]
    fn feedback_tiers() {
        assert_eq!(feedback_for(0), "Good start!");
        assert_eq!(feedback_for(100), "Nice!");
        assert_eq!(feedback_for(180), "Great!");
        assert_eq!(feedback_for(480), "Amazing!");
        assert_eq!(feedback_for(1000), "Unbelievable!");
        assert_eq!(feedback_for(1001), "FANTASTIC!");
    }

    proptest! {
        #[test]
        fn collected_never_exceeds_needed(
            needed in 1u32..8,
            batches in proptest::collection::vec(1usize..7, 1..6),
        ) {
            let total: usize = batches.iter().sum();
            let keys = vec!["animals"; total];
            let mut board = board_of(&keys);
            let mut targets = vec![Target::new(&category("animals"), needed)];
            let mut p = progress(99);
            let rules = ScoringRules::default();
            let mut start = 0u32;
            let mut completions = 0;
            for size in batches {
                let end = start + size as u32;
                let r = resolve(&ids(start..end), &mut targets, &mut board, &mut p, facts(), &rules)
                    .unwrap();
                completions += r.completed_categories.len();
                prop_assert!(targets[0].collected <= targets[0].needed);
                start = end;
            }
            prop_assert!(completions <= 1);
        }
    }
}
