//! Sources of die faces
//!
//! Every random draw in the engine goes through [`DieRoller`]. Production
//! code wraps a seeded generator; replays and tests use [`LoadedDice`].

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Something that can roll a single die
pub trait DieRoller {
    /// Roll one die with `sides` faces. Returns a value in `[1, sides]`.
    fn roll_die(&mut self, sides: u32) -> u32;

    fn d6(&mut self) -> u32 {
        self.roll_die(6)
    }
}

/// Dice backed by a random number generator
#[derive(Debug, Clone)]
pub struct RngDice<R> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngDice<ChaCha8Rng> {
    /// Deterministic dice: same seed, same sequence of faces
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> DieRoller for RngDice<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 1;
        }
        self.rng.gen_range(1..=sides)
    }
}

/// Dice that replay a fixed sequence of faces, cycling when exhausted
///
/// Faces larger than the die being rolled are clamped to its size, so a
/// loaded 6 rolled as a D3 comes up 3.
#[derive(Debug, Clone, Default)]
pub struct LoadedDice {
    faces: Vec<u32>,
    cursor: usize,
}

impl LoadedDice {
    pub fn new(faces: impl Into<Vec<u32>>) -> Self {
        Self {
            faces: faces.into(),
            cursor: 0,
        }
    }

    /// Every roll comes up `face`
    pub fn always(face: u32) -> Self {
        Self::new(vec![face])
    }

    /// Number of dice rolled so far
    pub fn rolls_made(&self) -> usize {
        self.cursor
    }
}

impl DieRoller for LoadedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if self.faces.is_empty() || sides == 0 {
            return 1;
        }
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face.clamp(1, sides)
    }
}
