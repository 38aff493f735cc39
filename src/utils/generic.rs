// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Range proof utilities

use blake2::{digest::Mac, Blake2bMac512};
use curve25519_dalek::scalar::Scalar;
use merlin::Transcript;
use subtle::Choice;
use zeroize::Zeroizing;

use crate::errors::ProofError;

/// Produces the secret per-proof nonces of one signer from its `(sk, v)` pair and the transcript state the proof is
/// built from
///
/// An internal oracle absorbs the value and a challenge squeezed from a copy of the transcript; every extraction
/// squeezes a fresh 32-byte tag from the oracle and runs it through a Blake2b MAC keyed with the secret. The sequence
/// is reproducible by the key holder only, and a different transcript state gives unrelated nonces.
pub(crate) struct NonceGenerator {
    oracle: Transcript,
    key: Zeroizing<[u8; 32]>,
}

impl NonceGenerator {
    pub(crate) fn new(sk: &Scalar, v: u64, transcript: &Transcript) -> Self {
        let mut binding = [0u8; 64];
        transcript.clone().challenge_bytes(b"nonce binding", &mut binding);

        let mut oracle = Transcript::new(b"Bulletproof nonce generator");
        oracle.append_u64(b"v", v);
        oracle.append_message(b"transcript", &binding);
        Self {
            oracle,
            key: Zeroizing::new(sk.to_bytes()),
        }
    }

    /// The next nonce in the sequence, never zero
    pub(crate) fn next_nonce(&mut self) -> Result<Scalar, ProofError> {
        let mut tag = Zeroizing::new([0u8; 32]);
        let mut output = Zeroizing::new([0u8; 64]);
        loop {
            self.oracle.challenge_bytes(b"nonce", &mut tag[..]);
            // See https://www.blake2.net/blake2.pdf section 2.8
            let mut mac = Blake2bMac512::new_with_salt_and_personal(&self.key[..], &[], b"bp.nonce")
                .map_err(|_| ProofError::InvalidLength("nonce key".to_string()))?;
            mac.update(&tag[..]);
            output.copy_from_slice(mac.finalize().into_bytes().as_slice());
            let nonce = Scalar::from_bytes_mod_order_wide(&output);
            if nonce != Scalar::ZERO {
                return Ok(nonce);
            }
        }
    }

    /// Fill `out` with consecutive nonces
    pub(crate) fn fill(&mut self, out: &mut [Scalar]) -> Result<(), ProofError> {
        for item in out.iter_mut() {
            *item = self.next_nonce()?;
        }
        Ok(())
    }
}

/// Bit `i` of `value` as a constant-time choice
pub(crate) fn bit_choice(value: u64, i: usize) -> Choice {
    Choice::from(((value >> i) & 1) as u8)
}

/// The first `n` powers of `base`, starting at one
pub(crate) fn powers(base: &Scalar, n: usize) -> Vec<Scalar> {
    let mut out = Vec::with_capacity(n);
    let mut current = Scalar::ONE;
    for _ in 0..n {
        out.push(current);
        current *= base;
    }
    out
}
