//! Direct-draw renderer for the gameplay screen: the bordered well with
//! its locked tiles and falling piece, the preview box, and the score
//! panel. Everything is redrawn each frame.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use quadfall_engine::{Piece, PIECE_TILES};

use crate::{application::Application, palette};

impl<T: Write> Application<T> {
    pub(crate) fn render_game(&mut self) -> io::Result<()> {
        let session = self.game.session();
        let well = &session.well;
        let (w, h) = (well.width(), well.height());

        // Compose the visible grid: locked tiles first, then the falling
        // piece on top. Cells above the well (negative rows) are simply
        // not visible.
        let mut grid: Vec<Vec<Option<Color>>> = (0..h)
            .map(|y| {
                (0..w)
                    .map(|x| {
                        well.tile(x as i32, y as i32)
                            .ok()
                            .and_then(palette::cell_color)
                    })
                    .collect()
            })
            .collect();
        if let Some(piece) = session.piece {
            let color = palette::kind_color(piece.kind);
            for (wx, wy) in occupied_well_cells(&piece) {
                if wx >= 0 && wx < w as i32 && wy >= 0 && wy < h as i32 {
                    grid[wy as usize][wx as usize] = Some(color);
                }
            }
        }

        let (x_main, y_main) = Self::fetch_main_xy();
        let x_well = x_main + 2;

        self.term
            .queue(MoveTo(0, 0))?
            .queue(Clear(ClearType::FromCursorDown))?;

        // Bordered well, two terminal columns per cell.
        let border = format!("+{}+", "-".repeat(2 * w));
        self.term
            .queue(MoveTo(x_well, y_main))?
            .queue(Print(&border))?;
        for (y, row) in grid.iter().enumerate() {
            self.term
                .queue(MoveTo(x_well, y_main + 1 + u16::try_from(y).unwrap()))?
                .queue(Print("|"))?;
            for cell in row {
                match cell {
                    Some(color) => {
                        self.term.queue(PrintStyledContent("██".with(*color)))?;
                    }
                    None => {
                        self.term.queue(Print(" ."))?;
                    }
                }
            }
            self.term.queue(Print("|"))?;
        }
        self.term
            .queue(MoveTo(x_well, y_main + 1 + u16::try_from(h).unwrap()))?
            .queue(Print(&border))?;

        // Score panel and preview box beside the well.
        let x_panel = x_well + u16::try_from(2 * w).unwrap() + 6;
        let score = &session.score;
        for (dy, line) in [
            format!("Score: {:>7}", score.points),
            format!("Level: {:>7}", score.level),
            format!("Lines: {:>7}", score.lines),
        ]
        .iter()
        .enumerate()
        {
            self.term
                .queue(MoveTo(x_panel, y_main + 1 + u16::try_from(dy).unwrap()))?
                .queue(Print(line))?;
        }

        self.term
            .queue(MoveTo(x_panel, y_main + 6))?
            .queue(Print("Next:"))?;
        if let Some(preview) = session.preview {
            let color = palette::kind_color(preview.kind);
            for (py, row) in preview.tiles.iter().enumerate() {
                self.term
                    .queue(MoveTo(x_panel, y_main + 7 + u16::try_from(py).unwrap()))?;
                for &occupied in row {
                    if occupied {
                        self.term.queue(PrintStyledContent("██".with(color)))?;
                    } else {
                        self.term.queue(Print("  "))?;
                    }
                }
            }
        }

        self.term
            .queue(MoveTo(
                x_main,
                y_main + Self::H_MAIN.saturating_sub(1),
            ))?
            .queue(PrintStyledContent(
                "[<-|->] move  [v] soft drop  [z] rotate  [x] drop  [Esc] pause"
                    .italic(),
            ))?;

        self.term.flush()
    }
}

/// The well coordinates covered by a piece's occupancy matrix.
fn occupied_well_cells(piece: &Piece) -> Vec<(i32, i32)> {
    let mut cells = Vec::with_capacity(4);
    for (py, row) in piece.tiles.iter().enumerate() {
        for (px, &occupied) in row.iter().enumerate() {
            if occupied {
                cells.push((
                    piece.x - (PIECE_TILES as i32) / 2 + px as i32,
                    piece.y - (PIECE_TILES as i32) / 2 + py as i32,
                ));
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadfall_engine::PieceKind;

    #[test]
    fn occupied_cells_are_centered_on_the_piece_position() {
        let mut piece = Piece::new(PieceKind::O);
        piece.x = 4;
        piece.y = 10;
        let mut cells = occupied_well_cells(&piece);
        cells.sort_unstable();
        // The O square sits in matrix cells (2..=3, 2..=3) around center (2, 2).
        assert_eq!(cells, vec![(4, 10), (4, 11), (5, 10), (5, 11)]);
    }

    #[test]
    fn cells_above_the_well_have_negative_rows() {
        let mut piece = Piece::new(PieceKind::I);
        piece.x = 5;
        piece.y = 0;
        let cells = occupied_well_cells(&piece);
        assert!(cells.iter().all(|&(_, y)| y == 0));

        piece.y = -1;
        let cells = occupied_well_cells(&piece);
        assert!(cells.iter().all(|&(_, y)| y == -1));
    }
}
