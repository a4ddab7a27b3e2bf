use std::collections::VecDeque;

use log::{debug, info, trace, warn};

use crate::board::{Board, Cell, BOARD_HEIGHT, BOARD_WIDTH};
use crate::collision::piece_fits;
use crate::config::GameConfig;
use crate::gravity::GravityScheduler;
use crate::input::Command;
use crate::piece::{ActivePiece, PieceKind, Position};
use crate::randomizer::{PieceProvider, RandomPieceProvider, Randomizer};
use crate::rotation;

// ============================================================================
// Types
// ============================================================================

/// Most events kept between calls to [`Game::take_events`]. Older events are
/// dropped first.
pub const EVENT_CAPACITY: usize = 256;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    PieceSpawned(PieceKind),
    GameRestarted,
    GameOver,
}

/// Read-only copy of everything a renderer needs for one frame.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    pub cells: [[Cell; BOARD_WIDTH]; BOARD_HEIGHT],
    pub active_cells: [Position; 4],
    pub active_kind: PieceKind,
    pub next: PieceKind,
    pub game_over: bool,
}

impl Snapshot {
    /// Locked cells with the active piece drawn on top. The piece is left
    /// out once the game is over.
    pub fn visual_grid(&self) -> [[Cell; BOARD_WIDTH]; BOARD_HEIGHT] {
        let mut grid = self.cells;
        if !self.game_over {
            for cell in self.active_cells {
                if cell.x >= 0 && cell.y >= 0 {
                    if let Some(slot) = grid
                        .get_mut(cell.y as usize)
                        .and_then(|row| row.get_mut(cell.x as usize))
                    {
                        *slot = Cell::Filled(self.active_kind);
                    }
                }
            }
        }
        grid
    }
}

// ============================================================================
// Game
// ============================================================================

/// Owns the board, the falling piece and the game-over flag.
///
/// Every mutation is checked against the board before it is committed, so a
/// rejected command leaves the game exactly as it was.
///
/// Events pile up until drained; front ends call [`Game::take_events`] once
/// per frame. At most [`EVENT_CAPACITY`] are kept.
pub struct Game {
    board: Board,
    active: ActivePiece,
    randomizer: Randomizer,
    gravity: GravityScheduler,
    game_over: bool,
    events: VecDeque<GameEvent>,
}

impl Game {
    pub fn new(config: &GameConfig) -> Self {
        let provider: Box<dyn PieceProvider> = match config.seed {
            Some(seed) => Box::new(RandomPieceProvider::from_seed(seed)),
            None => Box::new(RandomPieceProvider::from_entropy()),
        };
        Self::with_board(Board::new(), provider, config.fall_interval)
    }

    pub fn with_provider(provider: Box<dyn PieceProvider>, fall_interval: f32) -> Self {
        Self::with_board(Board::new(), provider, fall_interval)
    }

    /// Starts on a prepared board and spawns the first piece from `provider`.
    /// The spawn may end the game immediately if the board blocks it.
    pub fn with_board(board: Board, provider: Box<dyn PieceProvider>, fall_interval: f32) -> Self {
        let randomizer = Randomizer::new(provider);
        let placeholder = ActivePiece::new(randomizer.peek());
        let mut game = Self {
            board,
            active: placeholder,
            randomizer,
            gravity: GravityScheduler::new(fall_interval),
            game_over: false,
            events: VecDeque::new(),
        };
        game.spawn();
        game
    }

    /// Starts with `piece` already falling, skipping the first spawn.
    pub fn with_piece(board: Board, piece: ActivePiece, provider: Box<dyn PieceProvider>) -> Self {
        Self {
            board,
            active: piece,
            randomizer: Randomizer::new(provider),
            gravity: GravityScheduler::default(),
            game_over: false,
            events: VecDeque::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Frame entry points
    // ------------------------------------------------------------------------

    /// Runs one frame: commands in order, then gravity.
    pub fn update(&mut self, dt: f32, commands: &[Command]) {
        for &command in commands {
            self.apply(command);
        }
        self.tick(dt);
    }

    /// Applies one command. Returns whether it changed anything.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_piece(-1, 0),
            Command::MoveRight => self.move_piece(1, 0),
            Command::SoftDrop => self.soft_drop(),
            Command::Rotate => self.rotate(),
            Command::HardDrop => self.hard_drop(),
            Command::Reset => self.reset(),
        }
    }

    /// Feeds `dt` seconds to the fall timer and runs a gravity step when due.
    pub fn tick(&mut self, dt: f32) {
        if self.game_over {
            return;
        }
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!("ignoring invalid frame time {dt}");
            0.0
        };
        if self.gravity.advance(dt) {
            self.gravity_step();
        }
    }

    // ------------------------------------------------------------------------
    // Piece control
    // ------------------------------------------------------------------------

    /// Moves the piece one row down, or locks it when it cannot move.
    pub fn gravity_step(&mut self) {
        if self.game_over {
            return;
        }
        if !self.try_move(0, 1) {
            self.lock_and_spawn();
        }
    }

    pub fn move_piece(&mut self, dx: i16, dy: i16) -> bool {
        if self.game_over {
            return false;
        }
        let moved = self.try_move(dx, dy);
        if moved {
            trace!("moved to {:?}", self.active.position);
            self.record(GameEvent::PieceMoved);
        }
        moved
    }

    /// One row down. Never locks; a blocked soft drop does nothing.
    pub fn soft_drop(&mut self) -> bool {
        self.move_piece(0, 1)
    }

    pub fn rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        match rotation::resolve(&self.board, &self.active) {
            Some(rotated) => {
                trace!(
                    "rotated {:?} with kick ({}, {})",
                    self.active.kind,
                    rotated.position.x - self.active.position.x,
                    rotated.position.y - self.active.position.y
                );
                self.active = rotated;
                self.record(GameEvent::PieceRotated);
                true
            }
            None => false,
        }
    }

    /// Drops the piece as far as it goes and locks it at once.
    pub fn hard_drop(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        while self.try_move(0, 1) {}
        self.lock_and_spawn();
        true
    }

    /// Leaves game over: empties the board and spawns a fresh piece.
    /// Does nothing while a piece is still falling.
    pub fn reset(&mut self) -> bool {
        if !self.game_over {
            return false;
        }
        info!("game reset");
        self.board.clear();
        self.game_over = false;
        self.events.clear();
        self.randomizer.regenerate();
        self.record(GameEvent::GameRestarted);
        self.spawn();
        true
    }

    fn try_move(&mut self, dx: i16, dy: i16) -> bool {
        let moved = self.active.moved(dx, dy);
        if piece_fits(&self.board, &moved) {
            self.active = moved;
            true
        } else {
            false
        }
    }

    fn lock_and_spawn(&mut self) {
        self.board.merge(&self.active);
        self.record(GameEvent::PieceLocked);
        debug!("locked {:?} at {:?}", self.active.kind, self.active.position);

        let lines = self.board.clear_full_rows();
        if lines > 0 {
            debug!("cleared {lines} rows");
            self.record(GameEvent::LinesCleared(lines));
        }

        self.spawn();
    }

    fn spawn(&mut self) {
        let kind = self.randomizer.take();
        self.active = ActivePiece::new(kind);
        self.record(GameEvent::PieceSpawned(kind));
        debug!("spawned {kind:?}, next {:?}", self.randomizer.peek());

        let blocked = self
            .active
            .cells()
            .iter()
            .any(|cell| cell.y >= 0 && self.board.is_occupied(cell.x, cell.y));
        if blocked {
            self.game_over = true;
            self.record(GameEvent::GameOver);
            info!(
                "game over: {kind:?} blocked at spawn, {} cells on board",
                self.board.total_filled_cells()
            );
        }
    }

    // ------------------------------------------------------------------------
    // Read-only views
    // ------------------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &ActivePiece {
        &self.active
    }

    pub fn next_piece(&self) -> PieceKind {
        self.randomizer.peek()
    }

    pub fn next_index(&self) -> usize {
        self.randomizer.peek().index()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn gravity(&self) -> &GravityScheduler {
        &self.gravity
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cells: *self.board.rows(),
            active_cells: self.active.cells(),
            active_kind: self.active.kind,
            next: self.randomizer.peek(),
            game_over: self.game_over,
        }
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    fn record(&mut self, event: GameEvent) {
        if self.events.len() == EVENT_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::randomizer::SequencePieceProvider;

    pub fn empty_board() -> Board {
        Board::new()
    }

    pub fn fill_row(board: &mut Board, y: usize) {
        fill_row_except(board, y, &[]);
    }

    pub fn fill_row_except(board: &mut Board, y: usize, gaps: &[usize]) {
        for x in 0..BOARD_WIDTH {
            if !gaps.contains(&x) {
                board.set(x as i16, y as i16, Cell::Filled(PieceKind::T));
            }
        }
    }

    pub fn sequence(pieces: &[PieceKind]) -> Box<dyn PieceProvider> {
        Box::new(SequencePieceProvider::new(pieces.to_vec()))
    }
}
