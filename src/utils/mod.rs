// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Range proof utilities

/// Deterministic secret nonces and bit helpers
pub mod generic;
