//! Xorshift32 pseudo-random generator
//!
//! Marsaglia's xorshift with the (13, 17, 5) triple. The output sequence is
//! part of the contract: the charset is reproducible byte-for-byte from the
//! seed, so the shift amounts and their order must not change.
//!
//! Implements `rand::RngCore` so the charset generator can be driven by any
//! generator from the rand ecosystem as well.

use rand::{RngCore, SeedableRng};

use crate::consts::RNG_SEED;

/// 32-bit xorshift state. Never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Create a generator. A zero seed is degenerate and is replaced by `RNG_SEED`.
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { RNG_SEED } else { seed },
        }
    }

    /// Current state word
    #[inline]
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance the state and return it
    #[inline]
    pub fn rand32(&mut self) -> u32 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        s
    }

    /// Low byte of the next `rand32`
    #[inline]
    pub fn rand8(&mut self) -> u8 {
        (self.rand32() & 0xFF) as u8
    }
}

impl Default for Xorshift32 {
    fn default() -> Self {
        Self::new(RNG_SEED)
    }
}

impl RngCore for Xorshift32 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.rand32()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.rand32());
        let hi = u64::from(self.rand32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.rand32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Xorshift32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GOLDEN_SEED_7: [u32; 6] = [
        0x001C_E0E7,
        0x1C09_9207,
        0xE765_C143,
        0xB6FC_5245,
        0xAA29_6FFF,
        0x7D0F_4E94,
    ];

    #[test]
    fn test_rand32_golden_sequence() {
        let mut rng = Xorshift32::default();
        for (i, &expected) in GOLDEN_SEED_7.iter().enumerate() {
            assert_eq!(rng.rand32(), expected, "draw {i}");
        }
    }

    #[test]
    fn test_rand8_is_low_byte() {
        let mut rng = Xorshift32::new(RNG_SEED);
        let bytes: Vec<u8> = (0..GOLDEN_SEED_7.len()).map(|_| rng.rand8()).collect();
        let expected: Vec<u8> = GOLDEN_SEED_7.iter().map(|&w| (w & 0xFF) as u8).collect();
        assert_eq!(bytes, expected);
        assert_eq!(bytes, vec![0xE7, 0x07, 0x43, 0x45, 0xFF, 0x94]);
    }

    #[test]
    fn test_zero_seed_replaced() {
        assert_eq!(Xorshift32::new(0), Xorshift32::default());
        assert_eq!(Xorshift32::from_seed([0; 4]).state(), RNG_SEED);
    }

    #[test]
    fn test_from_seed_little_endian() {
        assert_eq!(Xorshift32::from_seed([7, 0, 0, 0]), Xorshift32::new(7));
        assert_eq!(Xorshift32::from_seed([0x78, 0x56, 0x34, 0x12]).state(), 0x1234_5678);
    }

    #[test]
    fn test_rng_core_matches_rand32() {
        let mut a = Xorshift32::default();
        let mut b = Xorshift32::default();
        assert_eq!(a.next_u32(), b.rand32());

        let lo = u64::from(b.rand32());
        let hi = u64::from(b.rand32());
        assert_eq!(a.next_u64(), (hi << 32) | lo);
    }

    #[test]
    fn test_fill_bytes_partial_chunk() {
        let mut rng = Xorshift32::default();
        let mut buf = [0u8; 6];
        rng.fill_bytes(&mut buf);
        assert_eq!(&buf[..4], &GOLDEN_SEED_7[0].to_le_bytes());
        assert_eq!(&buf[4..], &GOLDEN_SEED_7[1].to_le_bytes()[..2]);
    }

    proptest! {
        #[test]
        fn prop_state_never_zero(seed in any::<u32>()) {
            let mut rng = Xorshift32::new(seed);
            for _ in 0..2048 {
                prop_assert_ne!(rng.rand32(), 0);
            }
        }

        #[test]
        fn prop_same_seed_same_stream(seed in 1u32..) {
            let mut a = Xorshift32::new(seed);
            let mut b = Xorshift32::new(seed);
            for _ in 0..64 {
                prop_assert_eq!(a.rand8(), b.rand8());
            }
        }
    }
}
