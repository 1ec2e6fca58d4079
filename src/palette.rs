use crossterm::style::Color;
use quadfall_engine::{Cell, PieceKind};

/// The display color of a piece kind, keyed off its stable tile id.
pub fn kind_color(kind: PieceKind) -> Color {
    match kind.type_id() {
        1 => Color::Cyan,        // I
        2 => Color::Blue,        // J
        3 => Color::DarkYellow,  // L
        4 => Color::Yellow,      // O
        5 => Color::Green,       // S
        6 => Color::Magenta,     // T
        7 => Color::Red,         // Z
        _ => Color::Reset,
    }
}

/// Completed rows flash in this color until they are removed.
pub const FLASH_COLOR: Color = Color::White;

/// The display color of a well cell; empty cells have none.
pub fn cell_color(cell: Cell) -> Option<Color> {
    match cell {
        Cell::Empty => None,
        Cell::Filled(kind) => Some(kind_color(kind)),
        Cell::Marked => Some(FLASH_COLOR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_distinct_color() {
        let mut colors: Vec<Color> = PieceKind::VARIANTS.map(kind_color).to_vec();
        colors.sort_by_key(|c| format!("{c:?}"));
        colors.dedup();
        assert_eq!(colors.len(), PieceKind::VARIANTS.len());
    }

    #[test]
    fn marked_cells_flash_white() {
        assert_eq!(cell_color(Cell::Marked), Some(FLASH_COLOR));
        assert_eq!(cell_color(Cell::Empty), None);
    }
}
