// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause
//   Modified from:
//     Copyright (c) 2018 Chain, Inc.
//     SPDX-License-Identifier: MIT

use byteorder::{ByteOrder, LittleEndian};
use curve25519_dalek::ristretto::RistrettoPoint;

use crate::generators::generators_chain::GeneratorsChain;

/// The `BulletproofGens` struct contains the two generator vectors \\(\mathbf G\\) and \\(\mathbf H\\) that the
/// bit-decomposition of a committed value (and its blinding vectors) are committed against.
///
/// To construct an arbitrary-length chain of generators, we apply SHAKE256 to a domain separator label, and feed each
/// 64 bytes of XOF output into the curve hash-to-group function. The two sides use different labels, so that no
/// discrete log relation between any two generators is known.
#[derive(Clone, Debug)]
pub struct BulletproofGens {
    /// Precomputed \\(\mathbf G\\) generators.
    pub(crate) g_vec: Vec<RistrettoPoint>,
    /// Precomputed \\(\mathbf H\\) generators.
    pub(crate) h_vec: Vec<RistrettoPoint>,
}

impl BulletproofGens {
    /// Create a new `BulletproofGens` object with `gens_capacity` generators per side.
    pub fn new(gens_capacity: usize) -> Self {
        let mut label = [b'G', 0, 0, 0, 0];
        LittleEndian::write_u32(&mut label[1..5], 0);
        let g_vec = GeneratorsChain::new(&label).take(gens_capacity).collect();

        label[0] = b'H';
        let h_vec = GeneratorsChain::new(&label).take(gens_capacity).collect();

        BulletproofGens {
            g_vec,
            h_vec,
        }
    }

    /// The generator vector for the given side (0 for \\(\mathbf G\\), 1 for \\(\mathbf H\\)).
    pub fn side(&self, side: usize) -> &[RistrettoPoint] {
        if side == 0 {
            &self.g_vec
        } else {
            &self.h_vec
        }
    }
}
