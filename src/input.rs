//! Discrete commands and edge-triggered key handling.
//!
//! The game core assumes each command arrives once per physical press.
//! [`KeySampler`] turns terminal key events into the set of commands held
//! during a frame, and [`CommandLatch`] reports only the ones that were not
//! held in the previous frame.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    Reset,
}

impl Command {
    pub const COUNT: usize = 6;

    pub const ALL: [Command; Command::COUNT] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::Rotate,
        Command::HardDrop,
        Command::Reset,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Map a key to a game command. Unbound keys yield `None`.
pub fn command_for_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h' | 'H') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l' | 'L') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j' | 'J') => Some(Command::SoftDrop),
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k' | 'K') => Some(Command::Rotate),
        KeyCode::Char(' ') => Some(Command::HardDrop),
        KeyCode::Char('r' | 'R') => Some(Command::Reset),
        _ => None,
    }
}

/// Keys that leave the program. Not game commands.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc | KeyCode::Char('q' | 'Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

// ============================================================================
// Edge Latch
// ============================================================================

/// Per-command "was active last frame" state.
#[derive(Clone, Debug, Default)]
pub struct CommandLatch {
    was_active: [bool; Command::COUNT],
}

impl CommandLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the commands in `active` that were inactive at the previous
    /// sample, in [`Command::ALL`] order. A command held across frames fires
    /// once and re-arms only after a sample in which it is inactive.
    pub fn sample(&mut self, active: &[Command]) -> Vec<Command> {
        let mut now = [false; Command::COUNT];
        for command in active {
            now[command.slot()] = true;
        }

        let fired = Command::ALL
            .iter()
            .copied()
            .filter(|c| now[c.slot()] && !self.was_active[c.slot()])
            .collect();

        self.was_active = now;
        fired
    }
}

// ============================================================================
// Terminal Key Sampling
// ============================================================================

/// Folds crossterm key events into the set of commands held this frame.
///
/// When the terminal reports key releases, a key stays held from its press
/// to its release. Otherwise a key stays held until no press or repeat event
/// for it has arrived for more than `grace_frames` frames, so auto-repeat
/// gaps do not look like fresh presses. A press released within the same
/// frame still counts for that frame.
#[derive(Clone, Debug)]
pub struct KeySampler {
    /// `None` when the terminal reports releases.
    grace_frames: Option<u32>,
    held: [bool; Command::COUNT],
    pressed: [bool; Command::COUNT],
    idle: [u32; Command::COUNT],
}

impl KeySampler {
    pub fn with_release_events() -> Self {
        Self::build(None)
    }

    /// For terminals that only send presses and repeats. `grace_frames`
    /// should cover the terminal's key repeat interval.
    pub fn with_release_grace(grace_frames: u32) -> Self {
        Self::build(Some(grace_frames))
    }

    fn build(grace_frames: Option<u32>) -> Self {
        Self {
            grace_frames,
            held: [false; Command::COUNT],
            pressed: [false; Command::COUNT],
            idle: [0; Command::COUNT],
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) {
        let Some(command) = command_for_key(key.code) else {
            return;
        };
        let slot = command.slot();
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held[slot] = true;
                self.pressed[slot] = true;
            }
            KeyEventKind::Release => {
                self.held[slot] = false;
                self.idle[slot] = 0;
            }
        }
    }

    /// Commands held during the frame that just ended.
    pub fn end_frame(&mut self) -> Vec<Command> {
        if let Some(grace) = self.grace_frames {
            for slot in 0..Command::COUNT {
                if self.pressed[slot] {
                    self.idle[slot] = 0;
                } else if self.held[slot] {
                    self.idle[slot] += 1;
                    if self.idle[slot] > grace {
                        self.held[slot] = false;
                        self.idle[slot] = 0;
                    }
                }
            }
        }
        let active = Command::ALL
            .iter()
            .copied()
            .filter(|c| self.held[c.slot()] || self.pressed[c.slot()])
            .collect();
        self.pressed = [false; Command::COUNT];
        active
    }
}

/// Frames covering `millis` at `frame_rate`, rounded up.
pub fn frames_for_millis(millis: u32, frame_rate: u32) -> u32 {
    let frames = (u64::from(millis) * u64::from(frame_rate)).div_ceil(1000);
    u32::try_from(frames).unwrap_or(u32::MAX)
}
