//! Property tests for collision, rotation, dropping and line clearing

use proptest::prelude::*;

use blockfall::collision::fits;
use blockfall::game::test_helpers::*;
use blockfall::{
    ActivePiece, Board, Cell, Game, PieceKind, Position, BOARD_HEIGHT, BOARD_WIDTH,
};

const FULL_ROW: u16 = (1 << BOARD_WIDTH) - 1;

fn any_kind() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

fn non_o_kind() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(
        PieceKind::ALL
            .into_iter()
            .filter(|k| *k != PieceKind::O)
            .collect::<Vec<_>>(),
    )
}

fn board_from_masks(masks: &[u16]) -> Board {
    let mut board = Board::new();
    for (y, mask) in masks.iter().enumerate() {
        for x in 0..BOARD_WIDTH {
            if *mask & (1u16 << x) != 0 {
                board.set(x as i16, y as i16, Cell::Filled(PieceKind::S));
            }
        }
    }
    board
}

fn row_mask(board: &Board, y: usize) -> u16 {
    (0..BOARD_WIDTH)
        .filter(|&x| board.is_occupied(x as i16, y as i16))
        .fold(0u16, |mask, x| mask | (1u16 << x))
}

proptest! {
    #[test]
    fn empty_board_fit_depends_only_on_bounds(
        kind in any_kind(),
        x in -4i16..14,
        y in -4i16..24,
    ) {
        let board = Board::new();
        let offsets = kind.offsets();
        let expected = offsets.iter().all(|&(dx, dy)| {
            let cx = x + dx;
            let cy = y + dy;
            (0..BOARD_WIDTH as i16).contains(&cx) && cy < BOARD_HEIGHT as i16
        });

        prop_assert_eq!(fits(&board, Position::new(x, y), &offsets), expected);
    }

    #[test]
    fn four_rotations_are_identity(
        kind in non_o_kind(),
        x in 3i16..=6,
        y in 3i16..=16,
    ) {
        let start = ActivePiece::new_at(kind, x, y);
        let mut game = Game::with_piece(Board::new(), start, sequence(&[PieceKind::T]));

        for _ in 0..4 {
            prop_assert!(game.rotate());
        }
        prop_assert_eq!(*game.active(), start);
    }

    #[test]
    fn o_piece_never_rotates(
        x in 0i16..=8,
        y in 0i16..=18,
        masks in prop::collection::vec(0u16..FULL_ROW, BOARD_HEIGHT),
    ) {
        let start = ActivePiece::new_at(PieceKind::O, x, y);
        let mut game = Game::with_piece(board_from_masks(&masks), start, sequence(&[PieceKind::T]));

        prop_assert!(!game.rotate());
        prop_assert_eq!(*game.active(), start);
    }

    #[test]
    fn hard_drop_on_empty_board_reaches_floor(kind in any_kind()) {
        let mut game = Game::with_board(empty_board(), sequence(&[kind, PieceKind::O]), 1.0);

        game.hard_drop();

        prop_assert!(game.board().filled_count_in_row(BOARD_HEIGHT - 1) > 0);
        prop_assert_eq!(game.board().total_filled_cells(), 4);
    }

    #[test]
    fn clearing_removes_full_rows_and_compacts_the_rest(
        rows in prop::collection::vec(
            prop_oneof![Just(FULL_ROW), 0u16..FULL_ROW],
            BOARD_HEIGHT,
        ),
    ) {
        let mut board = board_from_masks(&rows);
        let before = board.total_filled_cells();
        let full = rows.iter().filter(|&&m| m == FULL_ROW).count();

        let cleared = board.clear_full_rows();

        prop_assert_eq!(cleared as usize, full);
        prop_assert_eq!(board.total_filled_cells(), before - full * BOARD_WIDTH);

        // Surviving rows keep their order, packed against the floor
        let survivors: Vec<u16> = rows.iter().copied().filter(|&m| m != FULL_ROW).collect();
        let mut expected = vec![0u16; full];
        expected.extend(survivors);
        for (y, mask) in expected.iter().enumerate() {
            prop_assert_eq!(row_mask(&board, y), *mask, "row {}", y);
        }
    }
}
