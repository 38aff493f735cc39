// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Bulletproof range proof that a committed value fits in [`N_DIM`] bits

use core::fmt;

use blake2::{Blake2b512, Digest};
use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::{Identity, MultiscalarMul},
};
use merlin::Transcript;
use serde::{
    de::{self, Visitor},
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use subtle::ConditionallySelectable;
use zeroize::Zeroizing;

use crate::{
    batch::BatchContext,
    commitment_opening::CommitmentOpening,
    cosign::{BlindingResponse, CoSignPhase, PolynomialCommitments, SignerNonces, VectorCommitments},
    errors::ProofError,
    inner_product::{InnerProductProof, Modifier},
    protocols::{scalar_protocol::ScalarProtocol, transcript_protocol::TranscriptProtocol},
    range_parameters::{RangeParameters, IDX_AUX2, IDX_G, IDX_H, N_CYCLES, N_DIM},
    transcripts::RangeProofTranscript,
    utils::generic::{bit_choice, powers, NonceGenerator},
};

/// The parts of a proof that several signers may build up incrementally
#[derive(Clone, Debug, Default)]
pub(crate) struct PartialProof {
    pub(crate) part1: VectorCommitments,
    pub(crate) part2: PolynomialCommitments,
    pub(crate) part3: BlindingResponse,
}

/// A range proof for one Pedersen commitment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeProof {
    part1: VectorCommitments,
    part2: PolynomialCommitments,
    part3: BlindingResponse,
    mu: Scalar,
    t_dot: Scalar,
    ip: InnerProductProof,
}

impl RangeProof {
    /// Compact points in the encoding
    pub const POINT_COUNT: usize = 2 * N_CYCLES + 4;
    /// Scalars in the encoding
    pub const SCALAR_COUNT: usize = 5;
    /// Size of the encoding in bytes
    pub const SIZE: usize = 32 * (Self::POINT_COUNT + Self::SCALAR_COUNT);

    /// Prove that `opening` commits to a value of at most [`N_DIM`] bits
    ///
    /// Proofs are deterministic in the opening and the transcript state.
    #[tracing::instrument(skip_all, name = "RangeProof::create")]
    pub fn create(opening: &CommitmentOpening, transcript: &mut Transcript) -> Result<Self, ProofError> {
        let mut partial = PartialProof::default();
        co_sign(opening, transcript, CoSignPhase::SinglePass, &mut partial)?
            .ok_or_else(|| ProofError::InvalidArgument("Single pass did not produce a proof".to_string()))
    }

    /// Verify the proof against `commitment` with a private context
    #[tracing::instrument(skip_all, name = "RangeProof::verify")]
    pub fn verify(&self, commitment: &CompressedRistretto, transcript: &mut Transcript) -> Result<(), ProofError> {
        let mut batch = BatchContext::with_proof_capacity(1);
        batch.enable_batch();
        self.verify_with_batch(commitment, transcript, &mut batch)?;
        batch.flush()
    }

    /// Queue the verification equations of the proof into `batch`
    ///
    /// With batch mode enabled on `batch` the result is only known after [`BatchContext::flush`]. A proof rejected
    /// before its equations are complete leaves nothing of itself queued.
    #[tracing::instrument(skip_all, name = "RangeProof::verify_with_batch")]
    pub fn verify_with_batch(
        &self,
        commitment: &CompressedRistretto,
        transcript: &mut Transcript,
        batch: &mut BatchContext,
    ) -> Result<(), ProofError> {
        batch.checkpoint();
        let result = self.queue_equations(commitment, transcript, batch);
        if result.is_err() {
            batch.rollback();
        }
        result
    }

    fn queue_equations(
        &self,
        commitment: &CompressedRistretto,
        transcript: &mut Transcript,
        batch: &mut BatchContext,
    ) -> Result<(), ProofError> {
        let mut multiplier = Scalar::ONE;
        if batch.is_batch_enabled() {
            multiplier = self.batch_multiplier(commitment);
            batch.set_multiplier(multiplier);
        }

        let mut proof_transcript = RangeProofTranscript::new(transcript);
        let cs = proof_transcript.challenges_y_z(&self.part1.a, &self.part1.s)?;
        let x = proof_transcript.challenge_x(&self.part2.t1, &self.part2.t2)?;

        // delta(y, z) = (z - z^2) * sum(y^i) - z^3 * sum(2^i)
        let y_sum: Scalar = powers(&cs.y, N_DIM).iter().sum();
        let two_sum = Scalar::from(u64::MAX);
        let delta = (cs.z - cs.zz) * y_sum - cs.zz * cs.z * two_sum;

        // z^2*V + delta*H + x*T1 + x^2*T2 == tau_x*G + tDot*H
        batch.equation_begin(3)?;
        batch.add_casual(commitment, &-cs.zz)?;
        batch.add_casual(&self.part2.t1, &-x)?;
        batch.add_casual(&self.part2.t2, &-(x * x))?;
        batch.add_prepared(IDX_G, &self.part3.tau_x)?;
        batch.add_prepared(IDX_H, &(self.t_dot - delta))?;
        batch.equation_end().map_err(|e| {
            tracing::debug!("polynomial commitment check rejected");
            e
        })?;

        if batch.is_batch_enabled() {
            let mut hasher = Blake2b512::new();
            hasher.update(multiplier.as_bytes());
            batch.set_multiplier(Scalar::from_hasher_blake2b(hasher));
        }

        // A + x*S - z*sum(G_i) + sum((z + z^2*2^i*y^-i) * H_i) - mu*G is the commitment of the inner product
        let y_inv = cs.y.invert();
        batch.equation_begin(2 + 2 * N_CYCLES)?;
        batch.add_prepared(IDX_AUX2, &cs.z)?;
        batch.add_prepared(IDX_G, &-self.mu)?;
        batch.add_casual(&self.part1.s, &x)?;
        let two_y_inv = Scalar::from(2u8) * y_inv;
        for (i, k) in powers(&two_y_inv, N_DIM).iter().enumerate() {
            batch.add_prepared(N_DIM + i, &(cs.z + cs.zz * k))?;
        }
        batch.add_casual(&self.part1.a, &Scalar::ONE)?;

        let modifier = Modifier {
            multiplier: [None, Some(y_inv)],
        };
        self.ip.verify_terms(batch, transcript, &self.t_dot, &modifier)?;
        batch.equation_end().map_err(|e| {
            tracing::debug!("inner product check rejected");
            e
        })
    }

    /// Verify several proofs together in one context, each against its own commitment and transcript state
    ///
    /// A failure does not say which proof is invalid.
    #[tracing::instrument(skip_all, name = "RangeProof::verify_batch")]
    pub fn verify_batch(items: &[(&RangeProof, &CompressedRistretto, &Transcript)]) -> Result<(), ProofError> {
        let mut batch = BatchContext::with_proof_capacity(items.len());
        batch.enable_batch();
        for (proof, commitment, transcript) in items {
            let mut transcript = (*transcript).clone();
            proof.verify_with_batch(commitment, &mut transcript, &mut batch)?;
        }
        batch.flush()
    }

    /// Randomized combination weight binding every element of the proof and the commitment
    fn batch_multiplier(&self, commitment: &CompressedRistretto) -> Scalar {
        let mut transcript = Transcript::new(b"Range proof batch multiplier");
        transcript.append_scalar(b"a", &self.ip.condensed()[0]);
        for [l, _] in self.ip.lr() {
            transcript.append_point(b"L", l);
        }
        transcript.append_scalar(b"b", &self.ip.condensed()[1]);
        for [_, r] in self.ip.lr() {
            transcript.append_point(b"R", r);
        }
        transcript.append_point(b"A", &self.part1.a);
        transcript.append_point(b"S", &self.part1.s);
        transcript.append_point(b"T1", &self.part2.t1);
        transcript.append_point(b"T2", &self.part2.t2);
        transcript.append_scalar(b"tau_x", &self.part3.tau_x);
        transcript.append_scalar(b"mu", &self.mu);
        transcript.append_scalar(b"tDot", &self.t_dot);
        transcript.append_point(b"C", commitment);
        transcript.challenge_scalar(b"multiplier")
    }

    pub fn vector_commitments(&self) -> &VectorCommitments {
        &self.part1
    }

    pub fn polynomial_commitments(&self) -> &PolynomialCommitments {
        &self.part2
    }

    pub fn blinding_response(&self) -> &BlindingResponse {
        &self.part3
    }

    pub fn mu(&self) -> &Scalar {
        &self.mu
    }

    /// The claimed inner product `t(x)`
    pub fn t_dot(&self) -> &Scalar {
        &self.t_dot
    }

    pub fn inner_product(&self) -> &InnerProductProof {
        &self.ip
    }

    /// Serializes the proof into a byte array of 16 32-byte compressed points followed by 5 32-byte scalars:
    /// `A, S, T1, T2, L_0, R_0, ..., L_5, R_5, tau_x, mu, tDot, a, b`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        buf.extend_from_slice(self.part1.a.as_bytes());
        buf.extend_from_slice(self.part1.s.as_bytes());
        buf.extend_from_slice(self.part2.t1.as_bytes());
        buf.extend_from_slice(self.part2.t2.as_bytes());
        for [l, r] in self.ip.lr() {
            buf.extend_from_slice(l.as_bytes());
            buf.extend_from_slice(r.as_bytes());
        }
        buf.extend_from_slice(self.part3.tau_x.as_bytes());
        buf.extend_from_slice(self.mu.as_bytes());
        buf.extend_from_slice(self.t_dot.as_bytes());
        buf.extend_from_slice(self.ip.condensed()[0].as_bytes());
        buf.extend_from_slice(self.ip.condensed()[1].as_bytes());
        buf
    }

    /// Deserializes the proof from a byte slice produced by [`RangeProof::to_bytes`]
    ///
    /// Scalars must be canonical; points are decompressed only when verifying.
    pub fn from_bytes(slice: &[u8]) -> Result<RangeProof, ProofError> {
        if slice.len() != Self::SIZE {
            return Err(ProofError::InvalidLength(format!(
                "Range proof encoding must be {} bytes, got {}",
                Self::SIZE,
                slice.len()
            )));
        }
        let mut chunks = slice.chunks_exact(32).map(|chunk| {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(chunk);
            bytes
        });
        let mut point = || CompressedRistretto(chunks.next().unwrap_or_default());
        let part1 = VectorCommitments::new(point(), point());
        let part2 = PolynomialCommitments::new(point(), point());
        let mut lr = [[CompressedRistretto::identity(); 2]; N_CYCLES];
        for pair in &mut lr {
            *pair = [point(), point()];
        }

        let mut scalars = [Scalar::ZERO; Self::SCALAR_COUNT];
        for (i, scalar) in scalars.iter_mut().enumerate() {
            let bytes = chunks.next().unwrap_or_default();
            *scalar = Option::from(Scalar::from_canonical_bytes(bytes)).ok_or_else(|| {
                ProofError::InvalidArgument(format!("Scalar {} of the proof is not canonical", i))
            })?;
        }
        let [tau_x, mu, t_dot, a, b] = scalars;

        Ok(RangeProof {
            part1,
            part2,
            part3: BlindingResponse::new(tau_x),
            mu,
            t_dot,
            ip: InnerProductProof::from_parts(lr, [a, b]),
        })
    }
}

impl Serialize for RangeProof {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        serializer.serialize_bytes(&self.to_bytes()[..])
    }
}

impl<'de> Deserialize<'de> for RangeProof {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de> {
        struct RangeProofVisitor;

        impl<'de> Visitor<'de> for RangeProofVisitor {
            type Value = RangeProof;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a valid RangeProof")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<RangeProof, E>
            where E: de::Error {
                RangeProof::from_bytes(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_bytes(RangeProofVisitor)
    }
}

/// Run one phase of proof construction for the signer holding `opening`
///
/// `partial` carries the commitments and responses accumulated by earlier phases and other signers. A proof is
/// returned by the phases that complete it.
pub(crate) fn co_sign(
    opening: &CommitmentOpening,
    transcript: &mut Transcript,
    phase: CoSignPhase,
    partial: &mut PartialProof,
) -> Result<Option<RangeProof>, ProofError> {
    let params = RangeParameters::get();
    let (sk, v) = (&opening.r, opening.v);
    let mut nonces = NonceGenerator::new(sk, v, transcript);

    // A = G*alpha + sum(bit_i ? G_i : -H_i), selected without branching on the bits
    let alpha = Zeroizing::new(nonces.next_nonce()?);
    let mut a = params.g_base() * *alpha;
    for (i, (g, h_neg)) in params.gi_base().iter().zip(params.hi_negated()).enumerate() {
        a += RistrettoPoint::conditional_select(h_neg, g, bit_choice(v, i));
    }

    // S = G*rho + <sL, G_i> + <sR, H_i>
    let rho = Zeroizing::new(nonces.next_nonce()?);
    let mut s_l = Zeroizing::new(vec![Scalar::ZERO; N_DIM]);
    let mut s_r = Zeroizing::new(vec![Scalar::ZERO; N_DIM]);
    nonces.fill(&mut s_l)?;
    nonces.fill(&mut s_r)?;
    let s = RistrettoPoint::multiscalar_mul(
        core::iter::once(&*rho).chain(s_l.iter()).chain(s_r.iter()),
        core::iter::once(&params.g_base())
            .chain(params.gi_base())
            .chain(params.hi_base()),
    );

    partial.part1 = VectorCommitments::new(a.compress(), s.compress());
    if phase == CoSignPhase::Step1 {
        return Ok(None);
    }

    let mut proof_transcript = RangeProofTranscript::new(transcript);
    let cs = proof_transcript.challenges_y_z(&partial.part1.a, &partial.part1.s)?;

    // Coefficients of t(x) = <l(x), r(x)>
    let y_powers = powers(&cs.y, N_DIM);
    let bits = Zeroizing::new(
        (0..N_DIM)
            .map(|i| Scalar::conditional_select(&Scalar::ZERO, &Scalar::ONE, bit_choice(v, i)))
            .collect::<Vec<Scalar>>(),
    );
    let mut zz_two = cs.zz;
    let mut r0 = Zeroizing::new(Vec::with_capacity(N_DIM));
    let (mut t0, mut t1, mut t2) = (Scalar::ZERO, Scalar::ZERO, Scalar::ZERO);
    for i in 0..N_DIM {
        let l0 = bits[i] - cs.z;
        r0.push((cs.z + bits[i] - Scalar::ONE) * y_powers[i] + zz_two);
        let rx = y_powers[i] * s_r[i];
        t0 += l0 * r0[i];
        t1 += l0 * rx + s_l[i] * r0[i];
        t2 += s_l[i] * rx;
        zz_two += zz_two;
    }
    let t0 = Zeroizing::new(t0);

    let signer = SignerNonces::draw(&mut nonces)?;
    if phase != CoSignPhase::Finalize {
        let [mut t1_point, mut t2_point] = signer.commitments();
        t1_point += params.h_base() * t1;
        t2_point += params.h_base() * t2;
        if phase != CoSignPhase::SinglePass {
            let [t1_shares, t2_shares] = partial.part2.decompress()?;
            t1_point += t1_shares;
            t2_point += t2_shares;
        }
        partial.part2 = PolynomialCommitments::new(t1_point.compress(), t2_point.compress());
    }
    if phase == CoSignPhase::Step2 {
        return Ok(None);
    }

    let x = proof_transcript.challenge_x(&partial.part2.t1, &partial.part2.t2)?;
    let mut tau_x = signer.response(sk, &x, &cs.zz);
    if phase != CoSignPhase::SinglePass {
        tau_x += partial.part3.tau_x;
    }
    partial.part3 = BlindingResponse::new(tau_x);

    let mu = *alpha + *rho * x;
    let t_dot = *t0 + t1 * x + t2 * x * x;

    // l = aL - z + sL*x, r = y^i * (aR + z + sR*x) + z^2*2^i
    let l: Zeroizing<Vec<Scalar>> = Zeroizing::new((0..N_DIM).map(|i| s_l[i] * x - cs.z + bits[i]).collect());
    let r: Zeroizing<Vec<Scalar>> = Zeroizing::new((0..N_DIM).map(|i| s_r[i] * x * y_powers[i] + r0[i]).collect());
    debug_assert_eq!(Scalar::dot(&l, &r), t_dot);

    let modifier = Modifier {
        multiplier: [None, Some(cs.y.invert())],
    };
    let (ip, _) = InnerProductProof::create(transcript, false, &t_dot, &l, &r, &modifier)?;

    Ok(Some(RangeProof {
        part1: partial.part1,
        part2: partial.part2,
        part3: partial.part3,
        mu,
        t_dot,
        ip,
    }))
}
