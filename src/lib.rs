// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Bulletproof range proofs over the Ristretto group, with an inner-product argument that can be used on its own,
//! deferred batch verification of many proofs, and multi-party construction of a single proof by several holders of
//! a shared blinding factor.

#![cfg_attr(not(debug_assertions), deny(unused_variables))]
#![cfg_attr(not(debug_assertions), deny(unused_imports))]
#![cfg_attr(not(debug_assertions), deny(dead_code))]
#![cfg_attr(not(debug_assertions), deny(unused_extern_crates))]
#![deny(unused_must_use)]
#![deny(unreachable_patterns)]
#![deny(unknown_lints)]
#![recursion_limit = "1024"]
// Some functions have a large amount of dependencies (e.g. services) and historically this warning
// has lead to bundling of dependencies into a resources struct, which is then overused and is the
// wrong abstraction
#![allow(clippy::too_many_arguments)]

#[macro_use]
extern crate lazy_static;

pub mod batch;
pub mod commitment_opening;
pub mod cosign;
pub mod errors;
pub mod generators;
pub mod inner_product;
pub mod protocols;
pub mod range_parameters;
pub mod range_proof;
mod transcripts;
mod utils;

pub use crate::{
    batch::BatchContext,
    commitment_opening::CommitmentOpening,
    cosign::{
        AwaitingCommitments,
        AwaitingResponses,
        BlindingResponse,
        CoSignLeader,
        CoSignPhase,
        CoSigner,
        PolynomialCommitments,
        VectorCommitments,
    },
    errors::ProofError,
    generators::{bulletproof_gens::BulletproofGens, pedersen_gens::PedersenGens},
    inner_product::{InnerProductProof, Modifier},
    range_parameters::RangeParameters,
    range_proof::RangeProof,
};
