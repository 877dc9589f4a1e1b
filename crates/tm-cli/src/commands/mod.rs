pub mod level;
pub mod play;
pub mod simulate;

use tm_engine::{Board, Target, TileStatus};

/// Filled and empty stars for a rating.
fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Single-character marker for a tile's status.
fn status_marker(status: TileStatus) -> &'static str {
    match status {
        TileStatus::Available => " ",
        TileStatus::Selected => "*",
        TileStatus::Used => "x",
        TileStatus::Locked => "#",
    }
}

/// `collected/needed` progress line for a target.
fn target_line(target: &Target) -> String {
    let check = if target.is_complete() { " ✓" } else { "" };
    format!(
        "{} {} {}/{}{check}",
        target.icon, target.name, target.collected, target.needed
    )
}

/// Tiles still on the board, grouped per layer.
fn board_lines(board: &Board) -> Vec<String> {
    let mut lines = Vec::new();
    for layer in 1..=3u8 {
        let cells: Vec<String> = board
            .tiles()
            .iter()
            .filter(|t| t.layer == layer && t.status != TileStatus::Used)
            .map(|t| format!("[{:>2}{}{}]", t.id.0, t.kind.icon, status_marker(t.status)))
            .collect();
        if !cells.is_empty() {
            lines.push(format!("L{layer} {}", cells.join(" ")));
        }
    }
    if lines.is_empty() {
        lines.push("(board is empty)".to_string());
    }
    lines
}
