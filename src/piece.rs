use crate::board::BOARD_WIDTH;

// ============================================================================
// Types
// ============================================================================

/// Four cell offsets relative to a piece's anchor.
pub type Offsets = [(i16, i16); 4];

pub const PIECE_COUNT: usize = 7;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Linear RGB display color, each channel in `0.0..=1.0`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to 8 bits, for terminal and UI output.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let scale = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (scale(self.r), scale(self.g), scale(self.b))
    }
}

// ============================================================================
// Piece Catalog
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// Immutable shape definition shared by every piece of one kind.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PieceShape {
    pub offsets: Offsets,
    pub color: Color,
}

static CATALOG: [PieceShape; PIECE_COUNT] = [
    PieceShape {
        offsets: [(-1, 0), (0, 0), (1, 0), (2, 0)],
        color: Color::new(0.0, 0.8, 1.0),
    },
    PieceShape {
        offsets: [(0, 0), (1, 0), (0, 1), (1, 1)],
        color: Color::new(1.0, 0.9, 0.0),
    },
    PieceShape {
        offsets: [(-1, 0), (0, 0), (1, 0), (0, 1)],
        color: Color::new(0.8, 0.0, 0.8),
    },
    PieceShape {
        offsets: [(-1, 0), (0, 0), (0, 1), (1, 1)],
        color: Color::new(0.0, 0.9, 0.0),
    },
    PieceShape {
        offsets: [(1, 0), (0, 0), (0, 1), (-1, 1)],
        color: Color::new(0.9, 0.0, 0.0),
    },
    PieceShape {
        offsets: [(-1, 0), (0, 0), (1, 0), (1, 1)],
        color: Color::new(0.0, 0.0, 0.9),
    },
    PieceShape {
        offsets: [(-1, 0), (0, 0), (1, 0), (-1, 1)],
        color: Color::new(1.0, 0.5, 0.0),
    },
];

impl PieceKind {
    pub const ALL: [PieceKind; PIECE_COUNT] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Catalog index in `0..PIECE_COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn shape(self) -> &'static PieceShape {
        &CATALOG[self.index()]
    }

    pub fn offsets(self) -> Offsets {
        self.shape().offsets
    }

    pub fn color(self) -> Color {
        self.shape().color
    }

    /// Offsets shifted so the bounding box starts at (0, 0), with the box's
    /// width and height. Used to draw the next-piece preview.
    pub fn preview_cells(self) -> (Offsets, u16, u16) {
        let offsets = self.offsets();
        let min_x = offsets.iter().map(|&(x, _)| x).min().unwrap_or(0);
        let max_x = offsets.iter().map(|&(x, _)| x).max().unwrap_or(0);
        let min_y = offsets.iter().map(|&(_, y)| y).min().unwrap_or(0);
        let max_y = offsets.iter().map(|&(_, y)| y).max().unwrap_or(0);

        let cells = offsets.map(|(x, y)| (x - min_x, y - min_y));
        let width = (max_x - min_x + 1) as u16;
        let height = (max_y - min_y + 1) as u16;
        (cells, width, height)
    }
}

// ============================================================================
// Active Piece
// ============================================================================

/// Anchor every new piece spawns at.
pub const SPAWN_POSITION: Position = Position::new(BOARD_WIDTH as i16 / 2 - 1, 0);

/// The falling piece. Rotation rewrites `offsets` in place, so after a few
/// turns they no longer match the catalog entry for `kind`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub offsets: Offsets,
    pub position: Position,
}

impl ActivePiece {
    pub fn new(kind: PieceKind) -> Self {
        Self::new_at(kind, SPAWN_POSITION.x, SPAWN_POSITION.y)
    }

    pub fn new_at(kind: PieceKind, x: i16, y: i16) -> Self {
        Self {
            kind,
            offsets: kind.offsets(),
            position: Position::new(x, y),
        }
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }

    /// Absolute board coordinates of the four cells. Rows may be negative.
    pub fn cells(&self) -> [Position; 4] {
        self.offsets
            .map(|(dx, dy)| self.position.offset(dx, dy))
    }

    pub(crate) fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            ..*self
        }
    }
}
