use std::cmp::Reverse;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use tm_engine::{Game, GameConfig, LevelOutcome, Phase, TileId};

/// What one attempt at a level looked like.
#[derive(Default)]
struct Attempt {
    rolls: u32,
    specials: u32,
    stars: u8,
    completed: bool,
}

pub fn run(levels: u32, seed: u64, attempts: u32) -> Result<(), String> {
    let config = GameConfig::default()
        .with_seed(seed)
        .with_total_levels(levels);
    let levels = config.total_levels;
    let attempts = attempts.max(1);
    let mut game = Game::new(config).map_err(|e| format!("failed to start game: {e}"))?;

    println!(
        "  {} {}",
        "Simulation".bold(),
        format!("({levels} levels, seed={seed}, {attempts} attempts/level)").dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Level", "Attempts", "Rolls", "Specials", "Stars", "Outcome", "Score",
    ]);

    let mut cleared = 0;
    for level in 1..=levels {
        let mut tries = 0;
        let mut last = Attempt::default();
        while tries < attempts {
            tries += 1;
            last = play_level(&mut game)?;
            if last.completed {
                break;
            }
            if tries < attempts {
                game.reset_level().map_err(|e| e.to_string())?;
            }
        }

        table.add_row(vec![
            level.to_string(),
            tries.to_string(),
            last.rolls.to_string(),
            last.specials.to_string(),
            super::stars(last.stars),
            if last.completed { "complete" } else { "failed" }.to_string(),
            game.progress().score.to_string(),
        ]);

        if !last.completed {
            break;
        }
        cleared += 1;
        tracing::debug!(level, tries, rolls = last.rolls, "level cleared");
        if level < levels {
            game.advance().map_err(|e| e.to_string())?;
        }
    }

    println!("{table}");
    println!();
    let summary = format!("{cleared}/{levels} levels cleared");
    if cleared == levels {
        println!("  {}", summary.green().bold());
    } else {
        println!("  {}", summary.yellow().bold());
    }
    println!("  Final score: {}", game.progress().score);

    Ok(())
}

/// Roll and pick greedily until the level ends.
fn play_level(game: &mut Game) -> Result<Attempt, String> {
    let mut attempt = Attempt::default();
    while game.phase() == Phase::Idle {
        let roll = game.roll().map_err(|e| e.to_string())?;
        attempt.rolls += 1;
        if roll.special_moment {
            attempt.specials += 1;
        }
        for id in greedy_picks(game, roll.selectable) {
            game.toggle_tile(id).map_err(|e| e.to_string())?;
        }
        let result = game.resolve_batch().map_err(|e| e.to_string())?;
        attempt.stars = result.stars;
        attempt.completed = result.outcome == LevelOutcome::Complete;
    }
    Ok(attempt)
}

/// Fill the neediest targets first, then take whatever is left.
fn greedy_picks(game: &Game, count: u32) -> Vec<TileId> {
    let session = game.session();
    let board = session.board();
    let mut targets: Vec<_> = session.incomplete_targets().collect();
    targets.sort_by_key(|t| Reverse(t.remaining()));

    let count = count as usize;
    let mut picks: Vec<TileId> = Vec::with_capacity(count);
    for target in targets {
        let take = (count - picks.len()).min(target.remaining() as usize);
        let ids: Vec<TileId> = board
            .available()
            .filter(|t| t.category == target.category)
            .take(take)
            .map(|t| t.id)
            .collect();
        picks.extend(ids);
    }
    if picks.len() < count {
        let filler: Vec<TileId> = board
            .available()
            .map(|t| t.id)
            .filter(|id| !picks.contains(id))
            .take(count - picks.len())
            .collect();
        picks.extend(filler);
    }
    picks
}
