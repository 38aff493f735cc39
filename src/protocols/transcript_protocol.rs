// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause
//   Modified from:
//     Copyright (c) 2018 Chain, Inc.
//     SPDX-License-Identifier: MIT

//! `TranscriptProtocol` trait for using a Transcript

use curve25519_dalek::{ristretto::CompressedRistretto, scalar::Scalar, traits::IsIdentity};
use merlin::Transcript;

use crate::errors::ProofError;

/// Defines a `TranscriptProtocol` trait for using a Merlin transcript.
pub trait TranscriptProtocol {
    /// Append a `scalar` with the given `label`.
    fn append_scalar(&mut self, label: &'static [u8], scalar: &Scalar);

    /// Append a `point` with the given `label`.
    fn append_point(&mut self, label: &'static [u8], point: &CompressedRistretto);

    /// Check that a point is not the identity, then append it to the
    /// transcript.  Otherwise, return an error.
    fn validate_and_append_point(&mut self, label: &'static [u8], point: &CompressedRistretto)
        -> Result<(), ProofError>;

    /// Compute a `label`ed challenge variable. The challenge is never zero.
    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar;
}

impl TranscriptProtocol for Transcript {
    fn append_scalar(&mut self, label: &'static [u8], scalar: &Scalar) {
        self.append_message(label, scalar.as_bytes());
    }

    fn append_point(&mut self, label: &'static [u8], point: &CompressedRistretto) {
        self.append_message(label, point.as_bytes());
    }

    fn validate_and_append_point(
        &mut self,
        label: &'static [u8],
        point: &CompressedRistretto,
    ) -> Result<(), ProofError> {
        if point.is_identity() {
            Err(ProofError::VerificationFailed(
                "Identity element cannot be added to the transcript".to_string(),
            ))
        } else {
            self.append_message(label, point.as_bytes());
            Ok(())
        }
    }

    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar {
        let mut buf = [0u8; 64];
        loop {
            self.challenge_bytes(label, &mut buf);
            let value = Scalar::from_bytes_mod_order_wide(&buf);
            if value != Scalar::ZERO {
                return value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use curve25519_dalek::{constants::RISTRETTO_BASEPOINT_COMPRESSED, traits::Identity};

    use super::*;

    #[test]
    fn test_identity_point_rejected() {
        let mut transcript = Transcript::new(b"test");
        assert!(transcript
            .validate_and_append_point(b"P", &CompressedRistretto::identity())
            .is_err());
        assert!(transcript
            .validate_and_append_point(b"P", &RISTRETTO_BASEPOINT_COMPRESSED)
            .is_ok());
    }

    #[test]
    fn test_challenges_depend_on_order() {
        let one = Scalar::ONE;
        let two = Scalar::from(2u8);

        let mut t1 = Transcript::new(b"test");
        t1.append_scalar(b"k", &one);
        t1.append_scalar(b"k", &two);

        let mut t2 = Transcript::new(b"test");
        t2.append_scalar(b"k", &two);
        t2.append_scalar(b"k", &one);

        let mut t3 = Transcript::new(b"test");
        t3.append_scalar(b"k", &one);
        t3.append_scalar(b"k", &two);

        let c1 = t1.challenge_scalar(b"c");
        assert_ne!(c1, t2.challenge_scalar(b"c"));
        assert_eq!(c1, t3.challenge_scalar(b"c"));
        assert_ne!(c1, Scalar::ZERO);
    }
}
