// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause
//   Modified from:
//     Copyright (c) 2018 Chain, Inc.
//     SPDX-License-Identifier: MIT

use curve25519_dalek::{
    constants::{RISTRETTO_BASEPOINT_COMPRESSED, RISTRETTO_BASEPOINT_POINT},
    ristretto::RistrettoPoint,
    scalar::Scalar,
    traits::MultiscalarMul,
};

use crate::protocols::ristretto_point_protocol::RistrettoPointProtocol;

/// Represents a pair of base points for Pedersen commitments
///
/// The default generators are:
///
/// * `h_base`: the `ristretto255` basepoint, the base for the committed value;
/// * `g_base`: the result of `ristretto255` SHA3-512 hash-to-group on input `B_bytes`, the base for the blinding
///   factor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PedersenGens {
    /// Base for the committed value
    pub h_base: RistrettoPoint,
    /// Base for the blinding factor
    pub g_base: RistrettoPoint,
}

impl PedersenGens {
    /// Creates a Pedersen commitment using the value scalar and a blinding factor.
    pub fn commit(&self, value: &Scalar, blinding: &Scalar) -> RistrettoPoint {
        RistrettoPoint::multiscalar_mul([value, blinding], [&self.h_base, &self.g_base])
    }
}

impl Default for PedersenGens {
    fn default() -> Self {
        PedersenGens {
            h_base: RISTRETTO_BASEPOINT_POINT,
            g_base: RistrettoPoint::hash_from_bytes_sha3_512(RISTRETTO_BASEPOINT_COMPRESSED.as_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::thread_rng;

    use super::*;
    use crate::protocols::scalar_protocol::ScalarProtocol;

    #[test]
    fn test_const() {
        let pc_gens = PedersenGens::default();
        assert_eq!(pc_gens.h_base.compress(), RISTRETTO_BASEPOINT_COMPRESSED);
        assert_ne!(pc_gens.h_base, pc_gens.g_base);
    }

    #[test]
    fn test_commitment_is_homomorphic() {
        let mut rng = thread_rng();
        let pc_gens = PedersenGens::default();
        let (v1, v2) = (Scalar::from(1234u64), Scalar::from(5678u64));
        let (r1, r2) = (Scalar::random_not_zero(&mut rng), Scalar::random_not_zero(&mut rng));

        assert_eq!(
            pc_gens.commit(&v1, &r1) + pc_gens.commit(&v2, &r2),
            pc_gens.commit(&(v1 + v2), &(r1 + r2))
        );
        assert_eq!(
            pc_gens.commit(&v1, &r1),
            pc_gens.h_base * v1 + pc_gens.g_base * r1
        );
    }
}
