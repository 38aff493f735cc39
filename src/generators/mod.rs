// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause
//   Modified from:
//     Copyright (c) 2018 Chain, Inc.
//     SPDX-License-Identifier: MIT

//! The `generators` module contains API for producing the fixed generators of a range proof

/// The two generator vectors the bit-decomposition is committed against
pub mod bulletproof_gens;
/// Arbitrary-long sequence of orthogonal generators, deterministically produced starting with an arbitrary point
mod generators_chain;
/// Represents a pair of base points for Pedersen commitments
pub mod pedersen_gens;
