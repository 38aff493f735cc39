//  Copyright 2022 The Tari Project
//  SPDX-License-Identifier: BSD-3-Clause

use curve25519_dalek::{ristretto::CompressedRistretto, scalar::Scalar};
use merlin::Transcript;

use crate::{errors::ProofError, protocols::transcript_protocol::TranscriptProtocol};

/// The challenges derived once the vector commitments are absorbed
#[derive(Clone, Copy, Debug)]
pub(crate) struct ChallengesYz {
    pub(crate) y: Scalar,
    pub(crate) z: Scalar,
    pub(crate) zz: Scalar,
}

/// A wrapper around a caller-owned Merlin transcript that fixes the order in which proof messages are absorbed
pub(crate) struct RangeProofTranscript<'a> {
    transcript: &'a mut Transcript,
}

impl<'a> RangeProofTranscript<'a> {
    pub(crate) fn new(transcript: &'a mut Transcript) -> Self {
        Self { transcript }
    }

    /// Absorb `A` and `S`, then construct the `y` and `z` challenges
    pub(crate) fn challenges_y_z(
        &mut self,
        a: &CompressedRistretto,
        s: &CompressedRistretto,
    ) -> Result<ChallengesYz, ProofError> {
        self.transcript.validate_and_append_point(b"A", a)?;
        self.transcript.validate_and_append_point(b"S", s)?;
        let y = self.transcript.challenge_scalar(b"y");
        let z = self.transcript.challenge_scalar(b"z");
        Ok(ChallengesYz { y, z, zz: z * z })
    }

    /// Absorb `T1` and `T2`, then construct the `x` challenge
    pub(crate) fn challenge_x(
        &mut self,
        t1: &CompressedRistretto,
        t2: &CompressedRistretto,
    ) -> Result<Scalar, ProofError> {
        self.transcript.validate_and_append_point(b"T1", t1)?;
        self.transcript.validate_and_append_point(b"T2", t2)?;
        Ok(self.transcript.challenge_scalar(b"x"))
    }

    /// Absorb the commitment to the inner-product vectors
    pub(crate) fn append_inner_product_commitment(&mut self, p: &CompressedRistretto) -> Result<(), ProofError> {
        self.transcript.validate_and_append_point(b"P", p)
    }

    /// Absorb the claimed inner product, then construct the multiplier of the cross-term generator
    pub(crate) fn challenge_dot_multiplier(&mut self, dot: &Scalar) -> Scalar {
        self.transcript.append_scalar(b"dot", dot);
        self.transcript.challenge_scalar(b"u")
    }

    /// Absorb one folding round's `L` and `R`, then construct the round challenge and its inverse
    pub(crate) fn challenge_round(
        &mut self,
        l: &CompressedRistretto,
        r: &CompressedRistretto,
    ) -> Result<[Scalar; 2], ProofError> {
        self.transcript.validate_and_append_point(b"L", l)?;
        self.transcript.validate_and_append_point(b"R", r)?;
        let x = self.transcript.challenge_scalar(b"e");
        Ok([x, x.invert()])
    }
}
