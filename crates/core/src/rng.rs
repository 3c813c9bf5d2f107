//! RNG module - seeded 7-bag piece generation
//!
//! Each bag holds one of each tetromino, shuffled with a small LCG. Pieces are
//! drawn until the bag is empty, then a new bag is shuffled. The same seed
//! always yields the same sequence, which the tests rely on.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // Seed 0 maps to a fixed odd constant.
        let state = if seed == 0 { 0x9E37_79B9 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Value in `[0, max)`; `max` must be non-zero.
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are better distributed than the low ones.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceQueue {
    seed: u32,
    bag: [PieceKind; 7],
    bag_index: usize,
    rng: SimpleRng,
}

impl PieceQueue {
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let bag = shuffled_bag(&mut rng);
        Self {
            seed,
            bag,
            bag_index: 0,
            rng,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Take the next piece, refilling the bag when it runs out.
    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.bag = shuffled_bag(&mut self.rng);
            self.bag_index = 0;
        }
        let kind = self.bag[self.bag_index];
        self.bag_index += 1;
        kind
    }

    /// The piece the next `draw` will return, without consuming it.
    pub fn peek(&self) -> PieceKind {
        if self.bag_index < self.bag.len() {
            return self.bag[self.bag_index];
        }
        // Preview the next bag on a cloned RNG so `draw` stays consistent.
        let mut preview = self.rng.clone();
        shuffled_bag(&mut preview)[0]
    }
}

fn shuffled_bag(rng: &mut SimpleRng) -> [PieceKind; 7] {
    let mut bag = PieceKind::ALL;
    rng.shuffle(&mut bag);
    bag
}
