//! 32-bit mixing hash used by the sketches.
//!
//! [`hash`] is Murmur3 x86_32: the input is consumed in little-endian 4-byte
//! blocks through a multiply-rotate-xor step, any 1-3 trailing bytes are
//! folded through the same step, the input length is mixed in, and a final
//! avalanche pass spreads entropy across all 32 bits. The avalanche property
//! keeps the top bits (register index) and the remaining bits (rank)
//! statistically independent, which the estimator relies on.

/// Default hash seed used by [`crate::Sketch::new`].
pub(crate) const DEFAULT_SEED: u32 = 0x9747_b28c;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// Hash `data` with the given `seed`, deterministically.
///
/// Any byte string is valid input, including the empty string.
#[inline]
pub(crate) fn hash(data: &[u8], seed: u32) -> u32 {
    let mut h = seed;

    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let mut k = u32::from_le_bytes(block.try_into().unwrap());
        k = k.wrapping_mul(C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(C2);

        h ^= k;
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (i, &byte) in tail.iter().enumerate() {
            k ^= u32::from(byte) << (8 * i);
        }
        k = k.wrapping_mul(C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(C2);
        h ^= k;
    }

    h ^= data.len() as u32;
    fmix32(h)
}

/// Murmur3 finalizer: xor-shift/multiply avalanche over all 32 bits.
#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Avalanche mixer for deriving ensemble member seeds.
///
/// Distinct from [`hash`]: this is a standalone integer finalizer with strong
/// low-bias properties, so nearby base seeds map to well-spread member seeds.
#[inline]
pub(crate) fn mix_seed(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use test_case::test_case;

    // Canonical Murmur3 x86_32 test vectors.
    #[test_case(b"", 0 => 0x0000_0000)]
    #[test_case(b"", 1 => 0x514e_28b7)]
    #[test_case(b"", 0xffff_ffff => 0x81f1_6f39)]
    #[test_case(b"\x00\x00\x00\x00", 0 => 0x2362_f9de)]
    #[test_case(b"a", 0x9747_b28c => 0x7fa0_9ea6)]
    #[test_case(b"aa", 0x9747_b28c => 0x5d21_1726)]
    #[test_case(b"aaa", 0x9747_b28c => 0x283e_0130)]
    #[test_case(b"aaaa", 0x9747_b28c => 0x5a97_808a)]
    #[test_case(b"abc", 0x9747_b28c => 0xc84a_62dd)]
    #[test_case(b"Hello, world!", 0x9747_b28c => 0x2488_4cba)]
    #[test_case(b"The quick brown fox jumps over the lazy dog", 0x9747_b28c => 0x2fa8_26cd)]
    fn test_known_vectors(data: &[u8], seed: u32) -> u32 {
        hash(data, seed)
    }

    #[test]
    fn test_deterministic() {
        let data = b"some stream element";
        assert_eq!(hash(data, 42), hash(data, 42));
        assert_eq!(hash(b"", DEFAULT_SEED), hash(b"", DEFAULT_SEED));
    }

    #[test]
    fn test_seed_decorrelation() {
        // Adjacent seeds must not produce related hashes for the same input.
        let data = b"element";
        let a = hash(data, 1);
        let b = hash(data, 2);
        assert_ne!(a, b);
        // At least a quarter of the output bits should flip.
        assert!((a ^ b).count_ones() >= 8);
    }

    #[test]
    fn test_single_bit_avalanche() {
        // Flipping one input bit should flip a large fraction of output bits.
        let base = hash(b"\x00\x00\x00\x00", 0);
        let flipped = hash(b"\x01\x00\x00\x00", 0);
        assert!((base ^ flipped).count_ones() >= 8);
    }

    #[test]
    fn test_mix_seed_disperses() {
        let seeds: Vec<u32> = (0..64)
            .map(|i: u32| mix_seed(0x9747_b28c_u32.wrapping_add(i.wrapping_mul(0x9e37_79b9))))
            .collect();
        for (i, &a) in seeds.iter().enumerate() {
            for &b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
