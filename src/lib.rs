//! Falling-block puzzle engine.
//!
//! The library holds all game state and rules; the `blockfall` binary is a
//! terminal front end that feeds it frame times and debounced commands and
//! draws [`game::Snapshot`]s.

pub mod board;
pub mod collision;
pub mod config;
pub mod game;
pub mod gravity;
pub mod input;
pub mod piece;
pub mod randomizer;
pub mod rotation;

pub use board::{Board, Cell, BOARD_HEIGHT, BOARD_WIDTH};
pub use config::{ConfigError, GameConfig};
pub use game::{Game, GameEvent, Snapshot};
pub use input::Command;
pub use piece::{ActivePiece, Color, PieceKind, Position};
