//! Level generation: difficulty tiers, targets and the tile multiset.
//!
//! Only target categories appear on the board, so every visible tile feeds
//! some target. Boards are always large enough to fill every quota.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::board::{Target, Tile, TileId, TileStatus};
use crate::catalog::{Catalog, Category};
use crate::config::GameConfig;
use crate::error::{GameError, GameResult};

/// Base dice budget per tier, easiest first.
const TIER_BUDGETS: [u32; 6] = [12, 11, 10, 9, 8, 7];

/// Most target categories a level asks for.
const MAX_TARGETS: u32 = 4;

/// Number of cosmetic board layers.
const LAYERS: usize = 3;

/// A band of levels sharing dice budget and target count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Tier number, 1-6.
    pub index: u32,
    /// Base dice budget before carried-over bonus dice.
    pub dice_budget: u32,
    /// Target categories per level.
    pub target_count: u32,
}

impl Tier {
    /// The tier a level belongs to. Two levels share each tier.
    pub fn for_level(level: u32) -> Self {
        let index = (level.saturating_sub(1) / 2 + 1).min(TIER_BUDGETS.len() as u32);
        Self {
            index,
            dice_budget: TIER_BUDGETS[(index - 1) as usize],
            target_count: index.min(MAX_TARGETS),
        }
    }
}

/// Everything a level starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Level number.
    pub level: u32,
    /// Difficulty tier.
    pub tier: u32,
    /// Starting dice budget, including carried-over bonus dice.
    pub dice_budget: u32,
    /// Quotas to fill.
    pub targets: Vec<Target>,
    /// Board tiles in display order.
    pub tiles: Vec<Tile>,
}

/// Quota for one target: `base + random(0..=variance)`.
pub fn quota_for<R: Rng + ?Sized>(level: u32, rng: &mut R) -> u32 {
    let base = level / 3 + 3;
    let variance = base * 2 / 5;
    base + rng.random_range(0..=variance)
}

/// Generate a level.
///
/// Fails with [`GameError::InvalidLevelNumber`] outside `1..=total_levels`.
pub fn generate_level<R: Rng + ?Sized>(
    level: u32,
    carry_over_bonus_dice: u32,
    catalog: &Catalog,
    config: &GameConfig,
    rng: &mut R,
) -> GameResult<LevelLayout> {
    if level == 0 || level > config.total_levels {
        return Err(GameError::InvalidLevelNumber {
            level,
            max: config.total_levels,
        });
    }

    let tier = Tier::for_level(level);
    let categories = pick_categories(catalog, tier.target_count as usize, rng);
    let targets: Vec<Target> = categories
        .iter()
        .map(|c| Target::new(c, quota_for(level, rng)))
        .collect();

    let needed: Vec<u32> = targets.iter().map(|t| t.needed).collect();
    let total = config.board_size.max(needed.iter().sum());
    let weights: Vec<f64> = categories.iter().map(|c| c.weight).collect();
    let mut counts = allocate_counts(&weights, total, rng);
    ensure_minimums(&mut counts, &needed);

    let tiles = build_tiles(&categories, &counts, &needed, config.locked_fraction, rng);
    let dice_budget = tier.dice_budget + carry_over_bonus_dice;

    tracing::info!(
        level,
        tier = tier.index,
        dice_budget,
        targets = targets.len(),
        tiles = tiles.len(),
        "level generated"
    );

    Ok(LevelLayout {
        level,
        tier: tier.index,
        dice_budget,
        targets,
        tiles,
    })
}

/// Sample `count` distinct categories uniformly.
fn pick_categories<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    count: usize,
    rng: &mut R,
) -> Vec<&'a Category> {
    let mut pool: Vec<&Category> = catalog.categories().iter().collect();
    let mut chosen = Vec::with_capacity(count);
    while chosen.len() < count && !pool.is_empty() {
        let index = rng.random_range(0..pool.len());
        chosen.push(pool.swap_remove(index));
    }
    chosen
}

/// Split `total` tiles by weight, flooring each share and handing the
/// remainder out one tile at a time to random categories.
pub fn allocate_counts<R: Rng + ?Sized>(weights: &[f64], total: u32, rng: &mut R) -> Vec<u32> {
    if weights.is_empty() {
        return Vec::new();
    }
    let weight_sum: f64 = weights.iter().sum();
    let mut counts: Vec<u32> = weights
        .iter()
        .map(|w| {
            if weight_sum > 0.0 {
                (f64::from(total) * w / weight_sum).floor() as u32
            } else {
                0
            }
        })
        .collect();

    let mut assigned: u32 = counts.iter().sum();
    while assigned > total {
        if let Some(max) = counts.iter_mut().max() {
            *max -= 1;
        }
        assigned -= 1;
    }
    while assigned < total {
        let index = rng.random_range(0..counts.len());
        counts[index] += 1;
        assigned += 1;
    }
    counts
}

/// Move tiles from categories with surplus to any below its minimum.
///
/// The total is unchanged. Requires `sum(counts) >= sum(minimums)`.
pub fn ensure_minimums(counts: &mut [u32], minimums: &[u32]) {
    for short in 0..counts.len() {
        while counts[short] < minimums[short] {
            let donor = (0..counts.len())
                .filter(|&i| counts[i] > minimums[i])
                .max_by_key(|&i| counts[i] - minimums[i]);
            match donor {
                Some(donor) => {
                    counts[donor] -= 1;
                    counts[short] += 1;
                }
                None => return,
            }
        }
    }
}

fn build_tiles<R: Rng + ?Sized>(
    categories: &[&Category],
    counts: &[u32],
    needed: &[u32],
    locked_fraction: f64,
    rng: &mut R,
) -> Vec<Tile> {
    let mut tiles = Vec::new();
    for (category, &count) in categories.iter().zip(counts) {
        for _ in 0..count {
            let Some(kind) = category.tiles.get(rng.random_range(0..category.tiles.len().max(1)))
            else {
                continue;
            };
            tiles.push(Tile {
                id: TileId(0),
                category: category.key.clone(),
                kind: kind.clone(),
                status: TileStatus::Available,
                layer: 1,
            });
        }
    }
    tiles.shuffle(rng);

    let per_layer = tiles.len().div_ceil(LAYERS).max(1);
    for (index, tile) in tiles.iter_mut().enumerate() {
        tile.id = TileId(index as u32);
        tile.layer = (index / per_layer + 1) as u8;
    }

    if locked_fraction > 0.0 {
        lock_surplus(&mut tiles, categories, needed, locked_fraction, rng);
    }
    tiles
}

/// Lock a share of the tiles each category has beyond its quota.
fn lock_surplus<R: Rng + ?Sized>(
    tiles: &mut [Tile],
    categories: &[&Category],
    needed: &[u32],
    fraction: f64,
    rng: &mut R,
) {
    let mut candidates = Vec::new();
    for (category, &quota) in categories.iter().zip(needed) {
        candidates.extend(
            tiles
                .iter()
                .enumerate()
                .filter(|(_, t)| t.category == category.key)
                .skip(quota as usize)
                .map(|(i, _)| i),
        );
    }
    let lock_count = (candidates.len() as f64 * fraction).floor() as usize;
    candidates.shuffle(rng);
    for &index in candidates.iter().take(lock_count) {
        tiles[index].status = TileStatus::Locked;
    }
}
