// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! `RistrettoPointProtocol` trait for using a RistrettoPoint

use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use digest::Digest;
use sha3::Sha3_512;

use crate::errors::ProofError;

/// Defines a `RistrettoPointProtocol` trait for using a RistrettoPoint
pub trait RistrettoPointProtocol {
    /// Helper function to implement 'RistrettoPoint::hash_from_bytes::<Sha3_512>'
    fn hash_from_bytes_sha3_512(input: &[u8]) -> RistrettoPoint;

    /// Helper function to implement 'RistrettoPoint::from_hash::<Sha3_512>'
    fn from_hash_sha3_512(hasher: Sha3_512) -> RistrettoPoint;

    /// Import a compact point, naming the offending member on failure
    fn import(compressed: &CompressedRistretto, member: &str) -> Result<RistrettoPoint, ProofError>;
}

impl RistrettoPointProtocol for RistrettoPoint {
    fn hash_from_bytes_sha3_512(input: &[u8]) -> RistrettoPoint {
        let mut hasher = Sha3_512::default();
        hasher.update(input);
        Self::from_hash_sha3_512(hasher)
    }

    fn from_hash_sha3_512(hasher: Sha3_512) -> RistrettoPoint {
        let output = hasher.finalize();
        let mut output_bytes = [0u8; 64];
        output_bytes.copy_from_slice(output.as_slice());

        RistrettoPoint::from_uniform_bytes(&output_bytes)
    }

    fn import(compressed: &CompressedRistretto, member: &str) -> Result<RistrettoPoint, ProofError> {
        compressed.decompress().ok_or_else(|| {
            ProofError::InvalidArgument(format!("Member '{}' was not the canonical encoding of a point", member))
        })
    }
}

#[cfg(test)]
mod tests {
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;

    use super::*;

    #[test]
    fn test_hash_to_point_is_deterministic() {
        let p1 = RistrettoPoint::hash_from_bytes_sha3_512(b"generator");
        let p2 = RistrettoPoint::hash_from_bytes_sha3_512(b"generator");
        let p3 = RistrettoPoint::hash_from_bytes_sha3_512(b"generatos");
        assert_eq!(p1, p2);
        assert_ne!(p1, p3);
    }

    #[test]
    fn test_import() {
        let compressed = RISTRETTO_BASEPOINT_POINT.compress();
        assert_eq!(
            RistrettoPoint::import(&compressed, "B").unwrap(),
            RISTRETTO_BASEPOINT_POINT
        );

        // The all-ones encoding is not a canonical field element
        let invalid = CompressedRistretto([0xff; 32]);
        match RistrettoPoint::import(&invalid, "X") {
            Err(ProofError::InvalidArgument(_)) => {},
            _ => panic!("Expected 'ProofError::InvalidArgument'"),
        }
    }
}
