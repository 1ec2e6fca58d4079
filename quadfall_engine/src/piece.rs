/*!
This module handles piece shapes, the pure rotation transform, and random
piece generation.
*/

use rand::Rng;

use crate::{GameRng, TileMatrix};

/// Side length of the square occupancy matrix every piece lives in.
pub const PIECE_TILES: usize = 5;

/// One of the seven piece shapes.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PieceKind {
    /// Four cells in a straight line.
    I = 0,
    /// Three cells in a column with a foot to the left.
    J,
    /// Three cells in a column with a foot to the right.
    L,
    /// Four cells in a square; the only rotation-locked shape.
    O,
    /// Four cells snaking left.
    S,
    /// Three cells in a row with a stem above.
    T,
    /// Four cells snaking right.
    Z,
}

impl PieceKind {
    /// All `PieceKind` enum variants in order.
    pub const VARIANTS: [Self; 7] = {
        use PieceKind::*;
        [I, J, L, O, S, T, Z]
    };

    /// The stable tile id `1..=7` this kind writes into the well, used by
    /// palettes to pick a color.
    pub const fn type_id(self) -> u8 {
        self as u8 + 1
    }

    /// Whether rotation is suppressed for this shape.
    pub const fn rotation_locked(self) -> bool {
        matches!(self, PieceKind::O)
    }

    /// The four occupied `(row, col)` cells of the canonical orientation,
    /// anchored near the matrix center.
    const fn cells(self) -> [(usize, usize); 4] {
        match self {
            PieceKind::I => [(2, 1), (2, 2), (2, 3), (2, 4)],
            PieceKind::J => [(1, 2), (2, 2), (3, 1), (3, 2)],
            PieceKind::L => [(1, 2), (2, 2), (3, 2), (3, 3)],
            PieceKind::O => [(2, 2), (2, 3), (3, 2), (3, 3)],
            PieceKind::S => [(2, 2), (2, 3), (3, 1), (3, 2)],
            PieceKind::T => [(1, 2), (2, 1), (2, 2), (2, 3)],
            PieceKind::Z => [(1, 1), (1, 2), (2, 2), (2, 3)],
        }
    }

    /// The canonical occupancy matrix of this kind.
    pub const fn matrix(self) -> TileMatrix {
        let mut tiles = [[false; PIECE_TILES]; PIECE_TILES];
        let cells = self.cells();
        let mut i = 0;
        while i < cells.len() {
            tiles[cells[i].0][cells[i].1] = true;
            i += 1;
        }
        tiles
    }
}

/// A movable four-cell piece inside its square occupancy matrix.
///
/// `x`/`y` address the matrix's *center* cell in well coordinates (not the
/// top-left corner), so a piece may legally sit partly above the visible
/// well right after spawning. The matrix is a plain array, so copies never
/// share tiles with the original.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
pub struct Piece {
    /// Which of the seven shapes this piece is.
    pub kind: PieceKind,
    /// Column of the matrix center in well coordinates.
    pub x: i32,
    /// Row of the matrix center in well coordinates.
    pub y: i32,
    /// The current occupancy matrix.
    pub tiles: TileMatrix,
}

impl Piece {
    /// A piece of the given kind in canonical orientation at the origin.
    pub const fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            x: 0,
            y: 0,
            tiles: kind.matrix(),
        }
    }

    /// Returns the occupancy matrix turned by 90°, leaving `self` untouched.
    ///
    /// The mapping is `rotated[n-1-c][r] = tiles[r][c]`; applying it four
    /// times yields the original matrix again. Rotation-locked kinds (O)
    /// yield their matrix unchanged.
    pub fn rotated(&self) -> TileMatrix {
        if self.kind.rotation_locked() {
            return self.tiles;
        }
        let mut rotated = [[false; PIECE_TILES]; PIECE_TILES];
        for (r, row) in self.tiles.iter().enumerate() {
            for (c, &occupied) in row.iter().enumerate() {
                rotated[PIECE_TILES - 1 - c][r] = occupied;
            }
        }
        rotated
    }

    /// Generates a piece of uniformly random kind, with 0 to 3 uniformly
    /// chosen quarter-turns applied in sequence.
    pub fn random(rng: &mut GameRng) -> Self {
        let kind = PieceKind::VARIANTS[rng.random_range(0..PieceKind::VARIANTS.len())];
        let mut piece = Self::new(kind);
        for _ in 0..rng.random_range(0..4u8) {
            piece.tiles = piece.rotated();
        }
        piece
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    #[test]
    fn every_shape_has_four_cells() {
        for kind in PieceKind::VARIANTS {
            let count = kind
                .matrix()
                .iter()
                .flatten()
                .filter(|&&occupied| occupied)
                .count();
            assert_eq!(count, 4, "{kind:?}");
        }
    }

    #[test]
    fn type_ids_cover_one_through_seven() {
        let ids: Vec<u8> = PieceKind::VARIANTS.iter().map(|k| k.type_id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn rotation_is_cyclic_of_order_four() {
        for kind in PieceKind::VARIANTS {
            let mut piece = Piece::new(kind);
            let original = piece.tiles;
            for _ in 0..4 {
                piece.tiles = piece.rotated();
            }
            assert_eq!(piece.tiles, original, "{kind:?}");
        }
    }

    #[test]
    fn o_piece_rotation_is_identity() {
        let piece = Piece::new(PieceKind::O);
        assert_eq!(piece.rotated(), piece.tiles);
    }

    #[test]
    fn rotation_moves_cells_counterclockwise() {
        // The T stem points up in canonical orientation; one turn with
        // `rotated[n-1-c][r] = tiles[r][c]` makes it point left.
        let piece = Piece::new(PieceKind::T);
        let turned = piece.rotated();
        let occupied: Vec<(usize, usize)> = (0..PIECE_TILES)
            .flat_map(|r| (0..PIECE_TILES).map(move |c| (r, c)))
            .filter(|&(r, c)| turned[r][c])
            .collect();
        assert_eq!(occupied, vec![(1, 2), (2, 1), (2, 2), (3, 2)]);
    }

    #[test]
    fn rotation_does_not_mutate_the_piece() {
        let piece = Piece::new(PieceKind::S);
        let before = piece.tiles;
        let _ = piece.rotated();
        assert_eq!(piece.tiles, before);
    }

    #[test]
    fn random_pieces_reach_valid_orientations() {
        let mut rng = GameRng::seed_from_u64(7);
        for _ in 0..64 {
            let mut piece = Piece::random(&mut rng);
            // Any reachable orientation returns to itself after four turns.
            let generated = piece.tiles;
            for _ in 0..4 {
                piece.tiles = piece.rotated();
            }
            assert_eq!(piece.tiles, generated);
            assert_eq!(
                piece.tiles.iter().flatten().filter(|&&t| t).count(),
                4
            );
        }
    }

    #[test]
    fn random_generation_is_reproducible() {
        let mut a = GameRng::seed_from_u64(42);
        let mut b = GameRng::seed_from_u64(42);
        for _ in 0..16 {
            assert_eq!(Piece::random(&mut a), Piece::random(&mut b));
        }
    }
}
