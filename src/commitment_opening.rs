// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Range proof commitment opening struct

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use zeroize::Zeroize;

use crate::range_parameters::RangeParameters;

/// The secret opening `(v, r)` of a Pedersen commitment `H*v + G*r`
#[derive(Clone, Zeroize)]
pub struct CommitmentOpening {
    pub(crate) v: u64,
    pub(crate) r: Scalar,
}

impl CommitmentOpening {
    /// Construct a new commitment opening
    pub fn new(v: u64, r: Scalar) -> Self {
        Self { v, r }
    }

    pub fn value(&self) -> u64 {
        self.v
    }

    /// The commitment this opening opens
    pub fn commit(&self) -> RistrettoPoint {
        RangeParameters::get().pc_gens().commit(&Scalar::from(self.v), &self.r)
    }
}

/// Overwrite secrets with null bytes when they go out of scope.
impl Drop for CommitmentOpening {
    fn drop(&mut self) {
        self.v.zeroize();
        self.r.zeroize();
    }
}
