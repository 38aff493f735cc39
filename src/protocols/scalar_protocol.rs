// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! `ScalarProtocol` trait for using a Scalar

use blake2::{Blake2b512, Digest};
use curve25519_dalek::scalar::Scalar;
use rand_core::CryptoRngCore;

/// Defines a `ScalarProtocol` trait for using a Scalar
pub trait ScalarProtocol {
    /// Returns a non-zero random Scalar
    fn random_not_zero<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Scalar;

    /// Construct a scalar from an existing Blake2b instance (helper function to implement 'Scalar::from_hash<Blake2b>')
    fn from_hasher_blake2b(hasher: Blake2b512) -> Scalar;

    /// Inner product of two equally sized scalar slices
    fn dot(a: &[Scalar], b: &[Scalar]) -> Scalar;
}

impl ScalarProtocol for Scalar {
    // 'Scalar::random(rng)' in most cases will not return zero due to the intent of the implementation, but this is
    // not guaranteed. This function makes it clear that zero will never be returned
    fn random_not_zero<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Scalar {
        loop {
            let value = Scalar::random(rng);
            if value != Scalar::ZERO {
                return value;
            }
        }
    }

    fn from_hasher_blake2b(hasher: Blake2b512) -> Scalar {
        let mut output = [0u8; 64];
        output.copy_from_slice(hasher.finalize().as_slice());
        Scalar::from_bytes_mod_order_wide(&output)
    }

    fn dot(a: &[Scalar], b: &[Scalar]) -> Scalar {
        a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
    }
}

#[cfg(test)]
mod tests {
    use rand::thread_rng;

    use super::*;

    #[test]
    fn test_random_not_zero() {
        let mut rng = thread_rng();
        for _ in 0..16 {
            assert_ne!(Scalar::random_not_zero(&mut rng), Scalar::ZERO);
        }
    }

    #[test]
    fn test_dot() {
        let a = [Scalar::from(2u8), Scalar::from(3u8), Scalar::from(5u8)];
        let b = [Scalar::from(7u8), Scalar::from(11u8), Scalar::from(13u8)];
        assert_eq!(Scalar::dot(&a, &b), Scalar::from(2u64 * 7 + 3 * 11 + 5 * 13));
    }

    #[test]
    fn test_blake2b_hash_is_deterministic() {
        let hash = |data: &[u8]| Scalar::from_hasher_blake2b(Blake2b512::new().chain_update(data));
        assert_eq!(hash(b"multiplier"), hash(b"multiplier"));
        assert_ne!(hash(b"multiplier"), hash(b"multiplies"));
    }
}
