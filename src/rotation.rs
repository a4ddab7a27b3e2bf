//! Clockwise rotation with a fixed wall-kick search.

use crate::board::Board;
use crate::collision::fits;
use crate::piece::{ActivePiece, Offsets};

/// Anchor offsets tried after rotating, in priority order.
pub const KICKS: [(i16, i16); 9] = [
    (0, 0),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// True when every offset lies inside the unit box `[0,1] x [0,1]`.
///
/// Such a shape is rotation-invariant for play purposes and is never turned.
/// The test looks at the current offsets, not at the piece kind.
pub fn is_unit_square(offsets: &Offsets) -> bool {
    offsets
        .iter()
        .all(|&(x, y)| (0..=1).contains(&x) && (0..=1).contains(&y))
}

/// Maps `(x, y)` to `(y, -x)` for every offset.
pub fn rotate_cw(offsets: &Offsets) -> Offsets {
    offsets.map(|(x, y)| (y, -x))
}

/// Rotates `piece` clockwise, trying each of [`KICKS`] in order.
///
/// Returns the first placement that fits, or `None` when the piece is a unit
/// square or no kick works. The piece passed in is never modified.
pub fn resolve(board: &Board, piece: &ActivePiece) -> Option<ActivePiece> {
    if is_unit_square(&piece.offsets) {
        return None;
    }

    let rotated = rotate_cw(&piece.offsets);
    KICKS.iter().find_map(|&(dx, dy)| {
        let anchor = piece.position.offset(dx, dy);
        fits(board, anchor, &rotated).then_some(ActivePiece {
            kind: piece.kind,
            offsets: rotated,
            position: anchor,
        })
    })
}
