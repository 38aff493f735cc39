// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Range proof error definitions

use thiserror::Error;

/// Represents an error in proof creation, verification, co-signing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// A proof component failed to verify
    #[error("A proof component failed to verify: `{0}`")]
    VerificationFailed(String),
    /// An encoded point or scalar could not be imported
    #[error("Internal data is invalid: `{0}`")]
    InvalidArgument(String),
    /// Invalid array/vector length or batch capacity error
    #[error("Invalid array/vector length error: `{0}`")]
    InvalidLength(String),
}
