// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Multi-party construction of a single range proof
//!
//! The blinding factor of the committed value is split between several key holders. One of them, the leader, knows
//! the value and builds the proof; every other holder is a [`CoSigner`] contributing a share of the polynomial
//! commitments and a share of the blinding response. Nobody learns another holder's blinding share.
//!
//! The leader moves through typed states, so out-of-order calls do not compile:
//!
//! 1. [`CoSignLeader::new`] commits to the bit vectors (`A`, `S`), which every co-signer needs for its
//!    [`CoSigner::polynomial_commitments`];
//! 2. [`CoSignLeader::step2`] folds the co-signers' aggregated [`PolynomialCommitments`] into the full `T1`, `T2`;
//! 3. [`CoSignLeader::finalize`] adds the co-signers' aggregated [`BlindingResponse`] to its own and completes the
//!    proof.
//!
//! Transport of the partial state between the parties is up to the caller.

use std::marker::PhantomData;

use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::Identity,
};
use merlin::Transcript;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    commitment_opening::CommitmentOpening,
    errors::ProofError,
    protocols::ristretto_point_protocol::RistrettoPointProtocol,
    range_parameters::RangeParameters,
    range_proof::{co_sign, PartialProof, RangeProof},
    transcripts::{ChallengesYz, RangeProofTranscript},
    utils::generic::NonceGenerator,
};

/// Which parts of a partially built proof are final
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoSignPhase {
    /// A single party holds all secrets and builds the whole proof
    SinglePass,
    /// The leader commits to the bit vectors only
    Step1,
    /// The leader completes the polynomial commitments from the co-signers' aggregated shares
    Step2,
    /// The leader completes the proof; the polynomial commitments are already final and the blinding response holds
    /// the co-signers' aggregated shares
    Finalize,
}

/// The vector commitments `A` and `S`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorCommitments {
    pub(crate) a: CompressedRistretto,
    pub(crate) s: CompressedRistretto,
}

impl VectorCommitments {
    pub fn new(a: CompressedRistretto, s: CompressedRistretto) -> Self {
        Self { a, s }
    }

    pub fn a(&self) -> &CompressedRistretto {
        &self.a
    }

    pub fn s(&self) -> &CompressedRistretto {
        &self.s
    }
}

impl Default for VectorCommitments {
    fn default() -> Self {
        Self::new(CompressedRistretto::identity(), CompressedRistretto::identity())
    }
}

/// The polynomial commitments `T1` and `T2`, either complete or a sum of shares
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolynomialCommitments {
    pub(crate) t1: CompressedRistretto,
    pub(crate) t2: CompressedRistretto,
}

impl PolynomialCommitments {
    pub fn new(t1: CompressedRistretto, t2: CompressedRistretto) -> Self {
        Self { t1, t2 }
    }

    pub fn t1(&self) -> &CompressedRistretto {
        &self.t1
    }

    pub fn t2(&self) -> &CompressedRistretto {
        &self.t2
    }

    pub(crate) fn decompress(&self) -> Result<[RistrettoPoint; 2], ProofError> {
        Ok([
            RistrettoPoint::import(&self.t1, "T1")?,
            RistrettoPoint::import(&self.t2, "T2")?,
        ])
    }

    /// The sum of two sets of shares
    pub fn aggregate(&self, other: &Self) -> Result<Self, ProofError> {
        let [t1, t2] = self.decompress()?;
        let [o1, o2] = other.decompress()?;
        Ok(Self::new((t1 + o1).compress(), (t2 + o2).compress()))
    }
}

/// The empty sum of shares
impl Default for PolynomialCommitments {
    fn default() -> Self {
        Self::new(CompressedRistretto::identity(), CompressedRistretto::identity())
    }
}

/// The blinding response `tau_x`, either complete or a sum of shares
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlindingResponse {
    pub(crate) tau_x: Scalar,
}

impl BlindingResponse {
    pub fn new(tau_x: Scalar) -> Self {
        Self { tau_x }
    }

    pub fn tau_x(&self) -> &Scalar {
        &self.tau_x
    }

    /// The sum of two sets of shares
    pub fn aggregate(&self, other: &Self) -> Self {
        Self::new(self.tau_x + other.tau_x)
    }
}

/// The nonces `tau1`, `tau2` of one signer's share of the polynomial commitments
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct SignerNonces {
    tau1: Scalar,
    tau2: Scalar,
}

impl SignerNonces {
    pub(crate) fn draw(nonces: &mut NonceGenerator) -> Result<Self, ProofError> {
        let tau1 = nonces.next_nonce()?;
        let tau2 = nonces.next_nonce()?;
        Ok(Self { tau1, tau2 })
    }

    /// `G*tau1` and `G*tau2`
    pub(crate) fn commitments(&self) -> [RistrettoPoint; 2] {
        let g_base = RangeParameters::get().g_base();
        [g_base * self.tau1, g_base * self.tau2]
    }

    /// `tau2*x^2 + tau1*x + z^2*sk`
    pub(crate) fn response(&self, sk: &Scalar, x: &Scalar, zz: &Scalar) -> Scalar {
        self.tau2 * x * x + self.tau1 * x + zz * sk
    }
}

/// A key holder that owns a share of the blinding factor but does not build the proof
///
/// The co-signer's nonces are bound to the session transcript and the leader's `A`, `S`. Within one session a
/// co-signer must answer for a single set of `(A, S, T1, T2)` only: two responses under different `T1`, `T2` share
/// their nonces, and three reveal the blinding share.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CoSigner {
    sk: Scalar,
    v: u64,
}

impl CoSigner {
    /// A co-signer holding blinding share `sk` of a commitment to `v`
    pub fn new(sk: Scalar, v: u64) -> Self {
        Self { sk, v }
    }

    /// The session transcript after `A` and `S`, and the challenges derived from them
    fn session(
        transcript: &Transcript,
        vector_commitments: &VectorCommitments,
    ) -> Result<(Transcript, ChallengesYz), ProofError> {
        let mut session = transcript.clone();
        let cs = RangeProofTranscript::new(&mut session)
            .challenges_y_z(&vector_commitments.a, &vector_commitments.s)?;
        Ok((session, cs))
    }

    fn nonces(&self, session: &Transcript) -> Result<SignerNonces, ProofError> {
        SignerNonces::draw(&mut NonceGenerator::new(&self.sk, self.v, session))
    }

    /// This signer's share of `T1` and `T2`, given the transcript state the proof starts from and the leader's vector
    /// commitments
    pub fn polynomial_commitments(
        &self,
        transcript: &Transcript,
        vector_commitments: &VectorCommitments,
    ) -> Result<PolynomialCommitments, ProofError> {
        let (session, _) = Self::session(transcript, vector_commitments)?;
        let [t1, t2] = self.nonces(&session)?.commitments();
        Ok(PolynomialCommitments::new(t1.compress(), t2.compress()))
    }

    /// This signer's share of `tau_x`, given the transcript state the proof starts from and the final commitments
    #[tracing::instrument(skip_all, name = "CoSigner::blinding_response")]
    pub fn blinding_response(
        &self,
        transcript: &Transcript,
        vector_commitments: &VectorCommitments,
        polynomial_commitments: &PolynomialCommitments,
    ) -> Result<BlindingResponse, ProofError> {
        let (mut session, cs) = Self::session(transcript, vector_commitments)?;
        let nonces = self.nonces(&session)?;
        let x = RangeProofTranscript::new(&mut session)
            .challenge_x(&polynomial_commitments.t1, &polynomial_commitments.t2)?;
        Ok(BlindingResponse::new(nonces.response(&self.sk, &x, &cs.zz)))
    }
}

/// The leader has committed to the bit vectors and waits for the co-signers' polynomial commitment shares
pub struct AwaitingCommitments;
/// The polynomial commitments are final and the leader waits for the co-signers' blinding response shares
pub struct AwaitingResponses;

/// The key holder that knows the value and builds the proof
pub struct CoSignLeader<S> {
    opening: CommitmentOpening,
    transcript: Transcript,
    partial: PartialProof,
    _state: PhantomData<S>,
}

impl<S> CoSignLeader<S> {
    /// The commitments the co-signers derive `y` and `z` from
    pub fn vector_commitments(&self) -> &VectorCommitments {
        &self.partial.part1
    }

    fn run(&mut self, phase: CoSignPhase) -> Result<Option<RangeProof>, ProofError> {
        let mut transcript = self.transcript.clone();
        co_sign(&self.opening, &mut transcript, phase, &mut self.partial)
    }

    fn into_state<T>(self) -> CoSignLeader<T> {
        CoSignLeader {
            opening: self.opening,
            transcript: self.transcript,
            partial: self.partial,
            _state: PhantomData,
        }
    }
}

impl CoSignLeader<AwaitingCommitments> {
    /// Start a joint proof for `opening`, which holds the value and the leader's blinding share; `transcript` is the
    /// state every party and the verifier start from
    #[tracing::instrument(skip_all, name = "CoSignLeader::new")]
    pub fn new(opening: CommitmentOpening, transcript: &Transcript) -> Result<Self, ProofError> {
        let mut leader = Self {
            opening,
            transcript: transcript.clone(),
            partial: PartialProof::default(),
            _state: PhantomData,
        };
        leader.run(CoSignPhase::Step1)?;
        Ok(leader)
    }

    /// Fold the co-signers' aggregated shares into the final `T1`, `T2`
    #[tracing::instrument(skip_all, name = "CoSignLeader::step2")]
    pub fn step2(mut self, shares: &PolynomialCommitments) -> Result<CoSignLeader<AwaitingResponses>, ProofError> {
        self.partial.part2 = *shares;
        self.run(CoSignPhase::Step2)?;
        Ok(self.into_state())
    }
}

impl CoSignLeader<AwaitingResponses> {
    /// The final polynomial commitments the co-signers derive `x` from
    pub fn polynomial_commitments(&self) -> &PolynomialCommitments {
        &self.partial.part2
    }

    /// Add the co-signers' aggregated blinding responses to the leader's own and complete the proof
    #[tracing::instrument(skip_all, name = "CoSignLeader::finalize")]
    pub fn finalize(mut self, responses: &BlindingResponse) -> Result<RangeProof, ProofError> {
        self.partial.part3 = *responses;
        self.run(CoSignPhase::Finalize)?
            .ok_or_else(|| ProofError::InvalidArgument("Final phase did not produce a proof".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rand::thread_rng;

    use super::*;
    use crate::protocols::scalar_protocol::ScalarProtocol;

    #[test]
    fn test_aggregate() {
        let mut rng = thread_rng();
        let g_base = RangeParameters::get().g_base();
        let (a, b) = (Scalar::random_not_zero(&mut rng), Scalar::random_not_zero(&mut rng));
        let first = PolynomialCommitments::new((g_base * a).compress(), (g_base * b).compress());
        let second = PolynomialCommitments::new((g_base * b).compress(), (g_base * a).compress());

        let sum = first.aggregate(&second).unwrap();
        assert_eq!(sum.t1, (g_base * (a + b)).compress());
        assert_eq!(sum.t2, sum.t1);
        assert_eq!(PolynomialCommitments::default().aggregate(&first).unwrap(), first);

        let corrupt = PolynomialCommitments::new(CompressedRistretto([0xff; 32]), first.t2);
        assert!(matches!(
            corrupt.aggregate(&first),
            Err(ProofError::InvalidArgument(_))
        ));

        let responses = BlindingResponse::new(a).aggregate(&BlindingResponse::new(b));
        assert_eq!(responses.tau_x, a + b);
        assert_eq!(BlindingResponse::default().aggregate(&responses), responses);
    }

    #[test]
    fn test_cosigner_is_deterministic() {
        let sk = Scalar::from(1234u64);
        let params = RangeParameters::get();
        let transcript = Transcript::new(b"cosign session");
        let part1 = VectorCommitments::new(params.g_base().compress(), params.h_base().compress());
        let signer = CoSigner::new(sk, 42);
        let shares = signer.polynomial_commitments(&transcript, &part1).unwrap();
        assert_eq!(
            shares,
            CoSigner::new(sk, 42).polynomial_commitments(&transcript, &part1).unwrap()
        );
        assert_ne!(
            shares,
            CoSigner::new(sk, 43).polynomial_commitments(&transcript, &part1).unwrap()
        );

        // A new session or new vector commitments draw new nonces
        assert_ne!(
            shares,
            signer
                .polynomial_commitments(&Transcript::new(b"another session"), &part1)
                .unwrap()
        );
        let swapped = VectorCommitments::new(part1.s, part1.a);
        assert_ne!(shares, signer.polynomial_commitments(&transcript, &swapped).unwrap());

        // Identity commitments are refused
        assert!(signer
            .polynomial_commitments(&transcript, &VectorCommitments::default())
            .is_err());
    }

    #[test]
    fn test_signer_response() {
        let mut nonces = NonceGenerator::new(&Scalar::from(9u8), 1, &Transcript::new(b"signer nonces"));
        let signer = SignerNonces::draw(&mut nonces).unwrap();
        let (sk, x, zz) = (Scalar::from(3u8), Scalar::from(5u8), Scalar::from(7u8));
        assert_eq!(
            signer.response(&sk, &x, &zz),
            signer.tau2 * Scalar::from(25u8) + signer.tau1 * x + Scalar::from(21u8)
        );

        let g_base = RangeParameters::get().g_base();
        let [t1, t2] = signer.commitments();
        assert_eq!(t1, g_base * signer.tau1);
        assert_eq!(t2, g_base * signer.tau2);
    }

    #[test]
    fn test_leader_states() {
        let mut rng = thread_rng();
        let transcript = Transcript::new(b"cosign states");
        let opening = CommitmentOpening::new(77, Scalar::random_not_zero(&mut rng));
        let leader = CoSignLeader::new(opening.clone(), &transcript).unwrap();
        let part1 = *leader.vector_commitments();
        assert_ne!(part1, VectorCommitments::default());

        // Without co-signers the joint proof reduces to a single-party proof
        let leader = leader.step2(&PolynomialCommitments::default()).unwrap();
        assert_eq!(*leader.vector_commitments(), part1);
        let proof = leader.finalize(&BlindingResponse::default()).unwrap();
        let single = RangeProof::create(&opening, &mut transcript.clone()).unwrap();
        assert_eq!(proof, single);
    }
}
