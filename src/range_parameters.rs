// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Fixed protocol constants and the generator tables shared by provers and verifiers

use curve25519_dalek::ristretto::RistrettoPoint;

use crate::{
    generators::{bulletproof_gens::BulletproofGens, pedersen_gens::PedersenGens},
    protocols::ristretto_point_protocol::RistrettoPointProtocol,
};

/// The bit length of a ranged value, and the length of every inner-product vector
pub const N_DIM: usize = 64;
/// The number of inner-product folding rounds, `log2(N_DIM)`
pub const N_CYCLES: usize = N_DIM.trailing_zeros() as usize;
/// The inner-product round after which the prover condenses its generators into points
pub const CONDENSE_CYCLE: usize = 2;

/// Index of the inner-product cross-term generator in the prepared table
pub const IDX_GEN_DOT: usize = 2 * N_DIM;
/// Index of the negated sum of the `G` vector in the prepared table
pub const IDX_AUX2: usize = 2 * N_DIM + 1;
/// Index of the blinding base in the prepared table
pub const IDX_G: usize = 2 * N_DIM + 2;
/// Index of the value base in the prepared table
pub const IDX_H: usize = 2 * N_DIM + 3;
/// Size of the prepared table
pub const PREPARED_COUNT: usize = 2 * N_DIM + 4;

const _: () = assert!(N_DIM.is_power_of_two() && N_DIM == u64::BITS as usize);
const _: () = assert!(CONDENSE_CYCLE + 1 < N_CYCLES);

lazy_static! {
    static ref RANGE_PARAMETERS: RangeParameters = RangeParameters::init();
}

/// Contains all the generators and base points needed to create and verify range proofs
#[derive(Clone, Debug)]
pub struct RangeParameters {
    /// The vector generators the bits and blinding vectors are committed against
    bp_gens: BulletproofGens,
    /// The pair of base points for Pedersen commitments
    pc_gens: PedersenGens,
    /// Generator for the inner-product cross term
    gen_dot: RistrettoPoint,
    /// The `H` vector negated, selected for zero bits
    hi_negated: Vec<RistrettoPoint>,
    /// All publicly fixed generators in prepared-index order
    prepared: Vec<RistrettoPoint>,
}

impl RangeParameters {
    fn init() -> Self {
        let bp_gens = BulletproofGens::new(N_DIM);
        let pc_gens = PedersenGens::default();
        let gen_dot = RistrettoPoint::hash_from_bytes_sha3_512(b"Bulletproof inner product cross term");
        let aux2 = -bp_gens.g_vec.iter().sum::<RistrettoPoint>();
        let hi_negated = bp_gens.h_vec.iter().map(|h| -h).collect();

        let mut prepared = Vec::with_capacity(PREPARED_COUNT);
        prepared.extend_from_slice(&bp_gens.g_vec);
        prepared.extend_from_slice(&bp_gens.h_vec);
        prepared.push(gen_dot);
        prepared.push(aux2);
        prepared.push(pc_gens.g_base);
        prepared.push(pc_gens.h_base);

        Self {
            bp_gens,
            pc_gens,
            gen_dot,
            hi_negated,
            prepared,
        }
    }

    /// The process-wide parameters, built on first use
    pub fn get() -> &'static RangeParameters {
        &RANGE_PARAMETERS
    }

    pub fn bp_gens(&self) -> &BulletproofGens {
        &self.bp_gens
    }

    pub fn pc_gens(&self) -> &PedersenGens {
        &self.pc_gens
    }

    /// Base for the blinding factor
    pub fn g_base(&self) -> RistrettoPoint {
        self.pc_gens.g_base
    }

    /// Base for the committed value
    pub fn h_base(&self) -> RistrettoPoint {
        self.pc_gens.h_base
    }

    pub fn gen_dot(&self) -> RistrettoPoint {
        self.gen_dot
    }

    pub fn gi_base(&self) -> &[RistrettoPoint] {
        &self.bp_gens.g_vec
    }

    pub fn hi_base(&self) -> &[RistrettoPoint] {
        &self.bp_gens.h_vec
    }

    pub(crate) fn hi_negated(&self) -> &[RistrettoPoint] {
        &self.hi_negated
    }

    pub(crate) fn prepared(&self) -> &[RistrettoPoint] {
        &self.prepared
    }
}

#[cfg(test)]
mod tests {
    use curve25519_dalek::traits::Identity;

    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(N_CYCLES, 6);
        assert_eq!(1 << N_CYCLES, N_DIM);
        assert_eq!(PREPARED_COUNT, 132);
    }

    #[test]
    fn test_prepared_table_layout() {
        let params = RangeParameters::get();
        let prepared = params.prepared();
        assert_eq!(prepared.len(), PREPARED_COUNT);
        assert_eq!(&prepared[..N_DIM], params.gi_base());
        assert_eq!(&prepared[N_DIM..2 * N_DIM], params.hi_base());
        assert_eq!(prepared[IDX_GEN_DOT], params.gen_dot());
        assert_eq!(prepared[IDX_G], params.g_base());
        assert_eq!(prepared[IDX_H], params.h_base());

        // Aux2 cancels the sum of the G vector
        let sum: RistrettoPoint = params.gi_base().iter().sum();
        assert_eq!(prepared[IDX_AUX2] + sum, RistrettoPoint::identity());

        for (h, h_neg) in params.hi_base().iter().zip(params.hi_negated()) {
            assert_eq!(h + h_neg, RistrettoPoint::identity());
        }
    }
}
