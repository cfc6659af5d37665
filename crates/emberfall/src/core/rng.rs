//! Injectable randomness seam.
//!
//! The only intentionally random part of the simulation is chunk selection
//! (plus the stalker's light flicker, which shares the stream). Everything
//! routes through `RandomSource` so tests can inject a seeded or scripted
//! generator and replay a session bit-for-bit.

/// Source of uniform random integers. Implementations must be deterministic
/// for a given starting state.
pub trait RandomSource {
    /// Generate a random number in [0, upper_bound).
    fn next_int(&mut self, upper_bound: u32) -> u32;
}

/// Seedable pseudo-random number generator (xorshift64).
/// Deterministic, fast, no-std compatible.
#[derive(Debug, Clone)]
pub struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    pub fn new(seed: u64) -> Self {
        XorShiftRng {
            // xorshift has an all-zero fixed point
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for XorShiftRng {
    fn next_int(&mut self, upper_bound: u32) -> u32 {
        (self.next_u64() % upper_bound as u64) as u32
    }
}
