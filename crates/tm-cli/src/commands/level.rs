use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;

use tm_engine::{Catalog, GameConfig, generate_level};

pub fn run(level: u32, seed: u64, board_size: u32, json: bool) -> Result<(), String> {
    let config = GameConfig::default()
        .with_seed(seed)
        .with_board_size(board_size);
    let catalog = Catalog::standard();
    let mut rng = StdRng::seed_from_u64(seed);
    let layout =
        generate_level(level, 0, &catalog, &config, &mut rng).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&layout)
            .map_err(|e| format!("failed to serialize level: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "  {} {}",
        format!("Level {}", layout.level).bold(),
        format!("(tier {}, {} dice, seed={seed})", layout.tier, layout.dice_budget).dimmed()
    );
    println!();

    println!("  {}", "Targets".bold().underline());
    let mut targets = Table::new();
    targets.set_content_arrangement(ContentArrangement::Dynamic);
    targets.set_header(vec!["Target", "Needed", "On board", "Points/unit"]);
    for target in &layout.targets {
        let on_board = layout
            .tiles
            .iter()
            .filter(|t| t.category == target.category)
            .count();
        targets.add_row(vec![
            format!("{} {}", target.icon, target.name),
            target.needed.to_string(),
            on_board.to_string(),
            target.points_per_unit.to_string(),
        ]);
    }
    println!("{targets}");
    println!();

    println!("  {}", "Tiles".bold().underline());
    let mut tiles = Table::new();
    tiles.set_content_arrangement(ContentArrangement::Dynamic);
    tiles.set_header(vec!["Id", "Layer", "Category", "Tile", "Points", "Status"]);
    for tile in &layout.tiles {
        tiles.add_row(vec![
            tile.id.to_string(),
            tile.layer.to_string(),
            tile.category.clone(),
            format!("{} {}", tile.kind.icon, tile.kind.name),
            tile.points().to_string(),
            tile.status.to_string(),
        ]);
    }
    println!("{tiles}");

    Ok(())
}
