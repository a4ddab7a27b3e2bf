use crate::board::{Board, BOARD_HEIGHT, BOARD_WIDTH};
use crate::piece::{ActivePiece, Offsets, Position};

/// Whether `offsets` anchored at `anchor` is a legal placement on `board`.
///
/// Columns must lie in `0..BOARD_WIDTH` and rows below `BOARD_HEIGHT`.
/// Rows above the board (`y < 0`) are always allowed and never looked up.
pub fn fits(board: &Board, anchor: Position, offsets: &Offsets) -> bool {
    offsets.iter().all(|&(dx, dy)| {
        let cell = anchor.offset(dx, dy);
        if cell.x < 0 || cell.x >= BOARD_WIDTH as i16 || cell.y >= BOARD_HEIGHT as i16 {
            return false;
        }
        cell.y < 0 || !board.is_occupied(cell.x, cell.y)
    })
}

pub fn piece_fits(board: &Board, piece: &ActivePiece) -> bool {
    fits(board, piece.position, &piece.offsets)
}
