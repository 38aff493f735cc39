// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Inner-product argument
//!
//! Proves that two secret vectors `a`, `b` of length [`N_DIM`] have a claimed inner product `c`, in [`N_CYCLES`]
//! folding rounds. Round `i` halves both vectors with the challenge `x_i`, committing to the cross terms of the two
//! halves as `L_i`, `R_i`. An optional [`Modifier`] weights the exponents of either generator vector by powers of a
//! scalar, so the range proof can fold its `y^-i` weighting without a second generator table.

use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::{Identity, MultiscalarMul, VartimeMultiscalarMul},
};
use merlin::Transcript;
use zeroize::{Zeroize, Zeroizing};

use crate::{
    batch::BatchContext,
    errors::ProofError,
    protocols::{scalar_protocol::ScalarProtocol, transcript_protocol::TranscriptProtocol},
    range_parameters::{RangeParameters, CONDENSE_CYCLE, IDX_GEN_DOT, N_CYCLES, N_DIM},
    transcripts::RangeProofTranscript,
    utils::generic::powers,
};

/// Optional per-side multipliers for the generator exponents: side 0 is the `G` vector, side 1 the `H` vector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifier {
    pub multiplier: [Option<Scalar>; 2],
}

impl Modifier {
    fn expand(&self) -> ExpandedModifier {
        ExpandedModifier {
            powers: [0, 1].map(|side| match self.multiplier[side] {
                Some(m) => powers(&m, N_DIM),
                None => Vec::new(),
            }),
        }
    }
}

struct ExpandedModifier {
    powers: [Vec<Scalar>; 2],
}

impl ExpandedModifier {
    fn power(&self, side: usize, i: usize) -> Scalar {
        self.powers[side].get(i).copied().unwrap_or(Scalar::ONE)
    }
}

/// Walk the folding tree of one generator side from `order` down to `target`, passing every subtree root position and
/// its accumulated challenge product to `sink`
///
/// A node of order `o` covers `2^o` consecutive positions. Its lower half is scaled by one of the challenges of round
/// `N_CYCLES - o` and its upper half by the other, depending on the side.
pub(crate) fn expand<F>(
    challenges: &[[Scalar; 2]; N_CYCLES],
    side: usize,
    pos: usize,
    order: usize,
    target: usize,
    k: Scalar,
    sink: &mut F,
) where
    F: FnMut(usize, Scalar),
{
    if order == target {
        sink(pos, k);
        return;
    }
    let round = &challenges[N_CYCLES - order];
    let step = 1 << (order - 1);
    expand(challenges, side, pos, order - 1, target, k * round[1 - side], sink);
    expand(challenges, side, pos + step, order - 1, target, k * round[side], sink);
}

/// Where the prover's current generators come from
enum GeneratorSource {
    /// The fixed generator vectors, with the modifier still to be applied
    Table,
    /// Generators already folded through the first rounds, modifier included
    Condensed([Vec<RistrettoPoint>; 2]),
}

impl GeneratorSource {
    fn order(&self) -> usize {
        match self {
            GeneratorSource::Table => N_CYCLES,
            GeneratorSource::Condensed(_) => N_CYCLES - CONDENSE_CYCLE - 1,
        }
    }

    fn points(&self, side: usize) -> &[RistrettoPoint] {
        match self {
            GeneratorSource::Table => RangeParameters::get().bp_gens().side(side),
            GeneratorSource::Condensed(points) => &points[side],
        }
    }

    /// The weight of every source point in the current generators after `folded` rounds; source point `s` belongs to
    /// current generator `s % (N_DIM >> folded)`
    fn weights(
        &self,
        challenges: &[[Scalar; 2]; N_CYCLES],
        side: usize,
        folded: usize,
        modifier: &ExpandedModifier,
    ) -> Vec<Scalar> {
        let order = self.order();
        let width = N_DIM >> folded;
        let mut weights = vec![Scalar::ZERO; 1 << order];
        expand(challenges, side, 0, order, N_CYCLES - folded, Scalar::ONE, &mut |pos, k| {
            for w in 0..width {
                weights[pos + w] = match self {
                    GeneratorSource::Table => k * modifier.power(side, pos + w),
                    GeneratorSource::Condensed(_) => k,
                };
            }
        });
        weights
    }

    fn condense(&self, challenges: &[[Scalar; 2]; N_CYCLES], folded: usize, modifier: &ExpandedModifier) -> Self {
        let width = N_DIM >> folded;
        let points = [0, 1].map(|side| {
            let weights = self.weights(challenges, side, folded, modifier);
            let source = self.points(side);
            (0..width)
                .map(|w| {
                    RistrettoPoint::vartime_multiscalar_mul(
                        weights.iter().skip(w).step_by(width),
                        source.iter().skip(w).step_by(width),
                    )
                })
                .collect::<Vec<RistrettoPoint>>()
        });
        GeneratorSource::Condensed(points)
    }
}

/// A proof that two committed vectors have a claimed inner product
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InnerProductProof {
    lr: [[CompressedRistretto; 2]; N_CYCLES],
    condensed: [Scalar; 2],
}

impl InnerProductProof {
    /// Prove `<a, b> = dot`
    ///
    /// With `commit` set, the commitment `P = <a, G'> + <b, H'>` (modified generators) is computed, absorbed into the
    /// transcript and returned alongside the proof.
    #[tracing::instrument(skip_all, name = "InnerProductProof::create")]
    pub fn create(
        transcript: &mut Transcript,
        commit: bool,
        dot: &Scalar,
        a: &[Scalar],
        b: &[Scalar],
        modifier: &Modifier,
    ) -> Result<(Self, Option<CompressedRistretto>), ProofError> {
        if a.len() != N_DIM || b.len() != N_DIM {
            return Err(ProofError::InvalidLength(format!(
                "Inner-product vectors must have length {}",
                N_DIM
            )));
        }
        let params = RangeParameters::get();
        let modifier = modifier.expand();
        let mut transcript = RangeProofTranscript::new(transcript);
        let mut a = Zeroizing::new(a.to_vec());
        let mut b = Zeroizing::new(b.to_vec());

        let commitment = if commit {
            let scalars = Zeroizing::new(
                a.iter()
                    .enumerate()
                    .map(|(i, ai)| ai * modifier.power(0, i))
                    .chain(b.iter().enumerate().map(|(i, bi)| bi * modifier.power(1, i)))
                    .collect::<Vec<Scalar>>(),
            );
            let p = RistrettoPoint::multiscalar_mul(scalars.iter(), params.gi_base().iter().chain(params.hi_base()))
                .compress();
            transcript.append_inner_product_commitment(&p)?;
            Some(p)
        } else {
            None
        };
        let dot_multiplier = transcript.challenge_dot_multiplier(dot);

        let mut challenges = [[Scalar::ZERO; 2]; N_CYCLES];
        let mut lr = [[CompressedRistretto::identity(); 2]; N_CYCLES];
        let mut source = GeneratorSource::Table;

        for cycle in 0..N_CYCLES {
            let n = N_DIM >> (cycle + 1);
            let mut l_scalars = Zeroizing::new(Vec::with_capacity(N_DIM + 1));
            let mut r_scalars = Zeroizing::new(Vec::with_capacity(N_DIM + 1));
            let mut l_points = Vec::with_capacity(N_DIM + 1);
            let mut r_points = Vec::with_capacity(N_DIM + 1);

            for side in 0..2 {
                let weights = source.weights(&challenges, side, cycle, &modifier);
                for (s, (weight, point)) in weights.iter().zip(source.points(side)).enumerate() {
                    let w = s % (2 * n);
                    // L pairs the lower half of `a` with the upper generators, and the upper half of `b` with the lower
                    // generators; R is the mirror image
                    match (side, w < n) {
                        (0, false) => {
                            l_scalars.push(a[w - n] * weight);
                            l_points.push(*point);
                        },
                        (0, true) => {
                            r_scalars.push(a[w + n] * weight);
                            r_points.push(*point);
                        },
                        (_, true) => {
                            l_scalars.push(b[w + n] * weight);
                            l_points.push(*point);
                        },
                        (_, false) => {
                            r_scalars.push(b[w - n] * weight);
                            r_points.push(*point);
                        },
                    }
                }
            }
            l_scalars.push(Scalar::dot(&a[..n], &b[n..]) * dot_multiplier);
            l_points.push(params.gen_dot());
            r_scalars.push(Scalar::dot(&a[n..], &b[..n]) * dot_multiplier);
            r_points.push(params.gen_dot());

            let l = RistrettoPoint::multiscalar_mul(l_scalars.iter(), l_points.iter()).compress();
            let r = RistrettoPoint::multiscalar_mul(r_scalars.iter(), r_points.iter()).compress();
            let [x, x_inv] = transcript.challenge_round(&l, &r)?;
            challenges[cycle] = [x, x_inv];
            lr[cycle] = [l, r];

            for i in 0..n {
                a[i] = a[i] * x + a[n + i] * x_inv;
                b[i] = b[i] * x_inv + b[n + i] * x;
            }
            a[n..].iter_mut().for_each(Zeroize::zeroize);
            b[n..].iter_mut().for_each(Zeroize::zeroize);
            a.truncate(n);
            b.truncate(n);

            if cycle == CONDENSE_CYCLE {
                source = source.condense(&challenges, cycle + 1, &modifier);
            }
        }

        Ok((
            Self {
                lr,
                condensed: [a[0], b[0]],
            },
            commitment,
        ))
    }

    /// Verify the proof against a commitment to `(a, b)`, queueing the check into `batch`
    #[tracing::instrument(skip_all, name = "InnerProductProof::verify")]
    pub fn verify(
        &self,
        batch: &mut BatchContext,
        transcript: &mut Transcript,
        commitment: &CompressedRistretto,
        dot: &Scalar,
        modifier: &Modifier,
    ) -> Result<(), ProofError> {
        if batch.is_batch_enabled() {
            batch.set_multiplier(self.batch_multiplier(commitment, dot));
        }
        batch.checkpoint();
        let result = self.queue_equation(batch, transcript, commitment, dot, modifier);
        if result.is_err() {
            batch.rollback();
        }
        result
    }

    fn queue_equation(
        &self,
        batch: &mut BatchContext,
        transcript: &mut Transcript,
        commitment: &CompressedRistretto,
        dot: &Scalar,
        modifier: &Modifier,
    ) -> Result<(), ProofError> {
        batch.equation_begin(1 + 2 * N_CYCLES)?;
        batch.add_casual(commitment, &Scalar::ONE)?;
        RangeProofTranscript::new(transcript).append_inner_product_commitment(commitment)?;
        self.verify_terms(batch, transcript, dot, modifier)?;
        batch.equation_end()
    }

    /// Queue every term of the proof except the commitment itself into the currently open equation
    pub(crate) fn verify_terms(
        &self,
        batch: &mut BatchContext,
        transcript: &mut Transcript,
        dot: &Scalar,
        modifier: &Modifier,
    ) -> Result<(), ProofError> {
        let mut transcript = RangeProofTranscript::new(transcript);
        let dot_multiplier = transcript.challenge_dot_multiplier(dot);

        let mut challenges = [[Scalar::ZERO; 2]; N_CYCLES];
        for (cycle, [l, r]) in self.lr.iter().enumerate() {
            let [x, x_inv] = transcript.challenge_round(l, r)?;
            batch.add_casual(l, &(x * x))?;
            batch.add_casual(r, &(x_inv * x_inv))?;
            challenges[cycle] = [x, x_inv];
        }

        let modifier = modifier.expand();
        let mut coefficients = vec![Scalar::ZERO; N_DIM];
        for side in 0..2 {
            expand(&challenges, side, 0, N_CYCLES, 0, -self.condensed[side], &mut |pos, k| {
                coefficients[pos] = k * modifier.power(side, pos);
            });
            for (i, k) in coefficients.iter().enumerate() {
                batch.add_prepared(side * N_DIM + i, k)?;
            }
        }

        let cross = (dot - self.condensed[0] * self.condensed[1]) * dot_multiplier;
        batch.add_prepared(IDX_GEN_DOT, &cross)
    }

    fn batch_multiplier(&self, commitment: &CompressedRistretto, dot: &Scalar) -> Scalar {
        let mut transcript = Transcript::new(b"Inner product batch multiplier");
        transcript.append_point(b"P", commitment);
        transcript.append_scalar(b"dot", dot);
        for [l, r] in &self.lr {
            transcript.append_point(b"L", l);
            transcript.append_point(b"R", r);
        }
        transcript.append_scalar(b"a", &self.condensed[0]);
        transcript.append_scalar(b"b", &self.condensed[1]);
        transcript.challenge_scalar(b"multiplier")
    }

    pub(crate) fn from_parts(lr: [[CompressedRistretto; 2]; N_CYCLES], condensed: [Scalar; 2]) -> Self {
        Self { lr, condensed }
    }

    /// The `(L, R)` pair of every folding round
    pub fn lr(&self) -> &[[CompressedRistretto; 2]; N_CYCLES] {
        &self.lr
    }

    /// The two remaining scalars after the last round
    pub fn condensed(&self) -> &[Scalar; 2] {
        &self.condensed
    }
}
