// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Extension traits over the curve, scalar and transcript primitives

/// `RistrettoPointProtocol` trait for hashing to and folding Ristretto points
pub mod ristretto_point_protocol;
/// `ScalarProtocol` trait for using a Scalar
pub mod scalar_protocol;
/// `TranscriptProtocol` trait for using a Merlin transcript
pub mod transcript_protocol;
