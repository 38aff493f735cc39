// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

//! Deferred verification of "sum equals identity" equations
//!
//! Every verification equation is expressed as a list of point-scalar terms whose weighted sum must be the group
//! identity. Terms against runtime points ("casual" terms) are queued individually; terms against the fixed
//! generators of [`RangeParameters`] ("prepared" terms) are accumulated into one coefficient per generator. A single
//! multiscalar multiplication resolves everything queued at [`BatchContext::flush`].
//!
//! With batch mode enabled, the terms of each equation are scaled by a multiplier derived from the proof data before
//! being summed, so that many equations collapse into one check of a random linear combination.

use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
    traits::{IsIdentity, VartimeMultiscalarMul},
};

use crate::{
    errors::ProofError,
    protocols::ristretto_point_protocol::RistrettoPointProtocol,
    range_parameters::{RangeParameters, N_CYCLES, PREPARED_COUNT},
};

/// Casual terms one range proof queues across both of its equations
pub const CASUAL_PER_PROOF: usize = 3 + 2 + 2 * N_CYCLES;

/// An accumulator of pending verification equations
#[derive(Clone, Debug)]
pub struct BatchContext {
    capacity: usize,
    casual_points: Vec<RistrettoPoint>,
    casual_scalars: Vec<Scalar>,
    prepared_scalars: Vec<Scalar>,
    dirty: bool,
    enable_batch: bool,
    multiplier: Scalar,
    checkpoint: Checkpoint,
}

/// The queue lengths and prepared coefficients to return to when a proof is rejected mid-way
#[derive(Clone, Debug)]
struct Checkpoint {
    casual: usize,
    prepared_scalars: Vec<Scalar>,
    dirty: bool,
}

impl Checkpoint {
    fn empty() -> Self {
        Self {
            casual: 0,
            prepared_scalars: vec![Scalar::ZERO; PREPARED_COUNT],
            dirty: false,
        }
    }
}

impl BatchContext {
    /// A context holding at most `capacity` casual terms between resolutions
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            casual_points: Vec::with_capacity(capacity),
            casual_scalars: Vec::with_capacity(capacity),
            prepared_scalars: vec![Scalar::ZERO; PREPARED_COUNT],
            dirty: false,
            enable_batch: false,
            multiplier: Scalar::ONE,
            checkpoint: Checkpoint::empty(),
        }
    }

    /// A context sized to queue `proofs` range proofs without an intermediate resolution
    pub fn with_proof_capacity(proofs: usize) -> Self {
        Self::new(proofs.max(1) * CASUAL_PER_PROOF)
    }

    /// Switch on randomized combination; from now on equations are resolved only by an explicit
    /// [`BatchContext::flush`] or when the casual capacity runs out
    pub fn enable_batch(&mut self) {
        self.enable_batch = true;
    }

    pub fn is_batch_enabled(&self) -> bool {
        self.enable_batch
    }

    /// Whether any equation is queued and not yet resolved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Set the multiplier applied to all terms added from now on; ignored unless batch mode is enabled
    pub(crate) fn set_multiplier(&mut self, multiplier: Scalar) {
        self.multiplier = multiplier;
    }

    fn scaled(&self, k: Scalar) -> Scalar {
        if self.enable_batch {
            k * self.multiplier
        } else {
            k
        }
    }

    /// Queue `point * k`, importing the point from its compact form
    pub fn add_casual(&mut self, point: &CompressedRistretto, k: &Scalar) -> Result<(), ProofError> {
        let point = RistrettoPoint::import(point, "casual point").map_err(|e| {
            tracing::debug!("batch term rejected: {}", e);
            e
        })?;
        self.add_casual_point(point, k)
    }

    /// Queue `point * k`
    pub fn add_casual_point(&mut self, point: RistrettoPoint, k: &Scalar) -> Result<(), ProofError> {
        if self.casual_points.len() >= self.capacity {
            debug_assert!(false, "casual term outside an equation bracket overflowed the batch");
            return Err(ProofError::InvalidLength(format!(
                "Batch capacity of {} casual terms exceeded",
                self.capacity
            )));
        }
        let k = self.scaled(*k);
        self.casual_points.push(point);
        self.casual_scalars.push(k);
        Ok(())
    }

    /// Accumulate `k` against the prepared generator at `index`
    pub fn add_prepared(&mut self, index: usize, k: &Scalar) -> Result<(), ProofError> {
        let k = self.scaled(*k);
        let slot = self.prepared_scalars.get_mut(index).ok_or_else(|| {
            ProofError::InvalidLength(format!("Prepared generator index {} out of range", index))
        })?;
        *slot += k;
        Ok(())
    }

    /// Open an equation that will queue at most `casual_terms` casual terms
    ///
    /// Previously queued equations are resolved first if the new one would not fit.
    pub fn equation_begin(&mut self, casual_terms: usize) -> Result<(), ProofError> {
        if casual_terms > self.capacity {
            debug_assert!(false, "equation larger than the batch capacity");
            return Err(ProofError::InvalidLength(format!(
                "Equation of {} casual terms exceeds the batch capacity of {}",
                casual_terms, self.capacity
            )));
        }
        if self.casual_points.len() + casual_terms > self.capacity {
            self.flush()?;
        }
        self.dirty = true;
        Ok(())
    }

    /// Close an equation; outside batch mode it is resolved immediately
    pub fn equation_end(&mut self) -> Result<(), ProofError> {
        if self.enable_batch {
            Ok(())
        } else {
            self.flush()
        }
    }

    /// Resolve all queued equations with one multiscalar multiplication
    ///
    /// The queued state is cleared whether or not the check succeeds.
    #[tracing::instrument(skip_all, name = "BatchContext::flush")]
    pub fn flush(&mut self) -> Result<(), ProofError> {
        if !self.dirty {
            return Ok(());
        }
        tracing::trace!(casual = self.casual_points.len(), "resolving batch");

        let prepared = RangeParameters::get().prepared();
        let sum = RistrettoPoint::vartime_multiscalar_mul(
            self.casual_scalars.iter().chain(self.prepared_scalars.iter()),
            self.casual_points.iter().chain(prepared.iter()),
        );
        self.reset();

        if sum.is_identity() {
            Ok(())
        } else {
            tracing::debug!("batch did not resolve to the identity");
            Err(ProofError::VerificationFailed(
                "Batched equations do not resolve to the identity".to_string(),
            ))
        }
    }

    /// Remember the current queue so that [`BatchContext::rollback`] can discard everything added after it
    pub(crate) fn checkpoint(&mut self) {
        self.checkpoint.casual = self.casual_points.len();
        self.checkpoint.prepared_scalars.copy_from_slice(&self.prepared_scalars);
        self.checkpoint.dirty = self.dirty;
    }

    /// Drop every term queued since the last checkpoint; a flush in between moves the checkpoint to the empty queue
    pub(crate) fn rollback(&mut self) {
        self.casual_points.truncate(self.checkpoint.casual);
        self.casual_scalars.truncate(self.checkpoint.casual);
        self.prepared_scalars.copy_from_slice(&self.checkpoint.prepared_scalars);
        self.dirty = self.checkpoint.dirty;
    }

    fn reset(&mut self) {
        self.casual_points.clear();
        self.casual_scalars.clear();
        for k in self.prepared_scalars.iter_mut().chain(&mut self.checkpoint.prepared_scalars) {
            *k = Scalar::ZERO;
        }
        self.dirty = false;
        self.checkpoint.casual = 0;
        self.checkpoint.dirty = false;
    }
}
