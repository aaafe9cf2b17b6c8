//! Mulberry32 stream generator shared by every randomized system.
//!
//! The bit operations follow the published Mulberry32 mixing steps, so a seed
//! produces the same boards in every implementation.

const INCREMENT: u32 = 0x6d2b_79f5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Seeded pseudo-random stream producing floats in `[0, 1)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Creates a stream positioned at the start of the provided seed.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Creates the stream for a run seed.
    ///
    /// Only the low 32 bits take part, so seeds that agree modulo 2^32 yield
    /// the same stream while the run keeps reporting its full seed.
    #[must_use]
    pub const fn from_seed(seed: u64) -> Self {
        Self::new(seed as u32)
    }

    /// Internal counter, advanced once per draw.
    #[must_use]
    pub const fn state(&self) -> u32 {
        self.state
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// Uniform integer in the inclusive range `[min, max]`.
    ///
    /// Computed as `floor(next_f64() * (max - min + 1)) + min`; callers must
    /// pass `min <= max`.
    pub fn random_int(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max, "random_int requires min <= max");
        let span = f64::from(max - min) + 1.0;
        // The product is strictly below `span`, so the floor fits in u32.
        (self.next_f64() * span).floor() as u32 + min
    }
}
