//! Plain-text rendering of a dungeon grid.

use std::fmt::Write as _;

use probable_journey_core::TileKind;
use probable_journey_world::Grid;

/// Character drawn for each tile classification.
pub(crate) const fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Empty | TileKind::Padding => ' ',
        TileKind::Floor => '.',
        TileKind::Wall => '#',
        TileKind::Corner => '+',
        TileKind::Hall => ',',
        TileKind::Water => '~',
        TileKind::StartPoint => 'S',
        TileKind::EndPoint => 'E',
        TileKind::Explored => ':',
        TileKind::Path => '*',
    }
}

/// Draws the grid one row per line.
pub(crate) fn render(grid: &Grid) -> String {
    let columns = usize::try_from(grid.columns()).unwrap_or(0);
    let rows = usize::try_from(grid.rows()).unwrap_or(0);
    let mut output = String::with_capacity(grid.len() + rows);
    for (index, tile) in grid.iter().enumerate() {
        if index > 0 && columns > 0 && index % columns == 0 {
            output.push('\n');
        }
        output.push(glyph(tile.kind()));
    }
    output.push('\n');
    output
}

/// One-line summary printed under the map.
pub(crate) fn legend() -> String {
    let mut legend = String::new();
    for (kind, label) in [
        (TileKind::Floor, "floor"),
        (TileKind::Hall, "hall"),
        (TileKind::Wall, "wall"),
        (TileKind::Corner, "corner"),
        (TileKind::StartPoint, "start"),
        (TileKind::EndPoint, "end"),
        (TileKind::Explored, "explored"),
        (TileKind::Path, "path"),
    ] {
        if !legend.is_empty() {
            legend.push_str("  ");
        }
        let _ = write!(legend, "{} {label}", glyph(kind));
    }
    legend
}
