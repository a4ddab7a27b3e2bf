use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::piece::{PieceKind, PIECE_COUNT};

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> PieceKind;
}

/// Uniform choice over all kinds. No bag: any kind can repeat any number of
/// times in a row.
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> PieceKind {
        let index = self.rng.gen_range(0..PIECE_COUNT);
        PieceKind::ALL[index]
    }
}

/// Cycles through a fixed list. An empty list always yields `I`.
pub struct SequencePieceProvider {
    pieces: Vec<PieceKind>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<PieceKind>) -> Self {
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> PieceKind {
        if self.pieces.is_empty() {
            return PieceKind::I;
        }
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

// ============================================================================
// Randomizer
// ============================================================================

/// Holds the single pending "next" piece.
pub struct Randomizer {
    provider: Box<dyn PieceProvider>,
    next: PieceKind,
}

impl Randomizer {
    pub fn new(mut provider: Box<dyn PieceProvider>) -> Self {
        let next = provider.next_piece();
        Self { provider, next }
    }

    /// The pending piece, for the preview display.
    pub fn peek(&self) -> PieceKind {
        self.next
    }

    /// Hands out the pending piece and draws a replacement.
    pub fn take(&mut self) -> PieceKind {
        let piece = self.next;
        self.next = self.provider.next_piece();
        piece
    }

    /// Discards the pending piece and draws a new one.
    pub fn regenerate(&mut self) {
        self.next = self.provider.next_piece();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_returns_peeked_piece_and_advances() {
        let provider = SequencePieceProvider::new(vec![PieceKind::T, PieceKind::O, PieceKind::L]);
        let mut randomizer = Randomizer::new(Box::new(provider));

        assert_eq!(randomizer.peek(), PieceKind::T);
        assert_eq!(randomizer.take(), PieceKind::T);
        assert_eq!(randomizer.peek(), PieceKind::O);
    }

    #[test]
    fn regenerate_skips_pending_piece() {
        let provider = SequencePieceProvider::new(vec![PieceKind::T, PieceKind::O, PieceKind::L]);
        let mut randomizer = Randomizer::new(Box::new(provider));

        randomizer.regenerate();
        assert_eq!(randomizer.peek(), PieceKind::O);
    }

    #[test]
    fn seeded_provider_is_deterministic() {
        let mut a = RandomPieceProvider::from_seed(7);
        let mut b = RandomPieceProvider::from_seed(7);
        for _ in 0..50 {
            assert_eq!(a.next_piece(), b.next_piece());
        }
    }

    #[test]
    fn random_provider_eventually_yields_every_kind() {
        let mut provider = RandomPieceProvider::from_seed(42);
        let mut seen = [false; PIECE_COUNT];
        for _ in 0..1000 {
            seen[provider.next_piece().index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
