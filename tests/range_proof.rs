// Copyright 2022 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use cosign_bulletproofs::{
    protocols::scalar_protocol::ScalarProtocol,
    BatchContext,
    CommitmentOpening,
    ProofError,
    RangeProof,
};
use curve25519_dalek::{ristretto::CompressedRistretto, scalar::Scalar};
use merlin::Transcript;
use proptest::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use rand_core::SeedableRng;

const TRANSCRIPT_LABEL: &[u8] = b"RangeProofTest";

fn prove(v: u64, sk: Scalar) -> (RangeProof, CompressedRistretto) {
    let opening = CommitmentOpening::new(v, sk);
    let mut transcript = Transcript::new(TRANSCRIPT_LABEL);
    let proof = RangeProof::create(&opening, &mut transcript).unwrap();
    (proof, opening.commit().compress())
}

fn verify(proof: &RangeProof, commitment: &CompressedRistretto) -> Result<(), ProofError> {
    proof.verify(commitment, &mut Transcript::new(TRANSCRIPT_LABEL))
}

#[test]
fn test_boundary_values() {
    let mut rng = ChaCha12Rng::seed_from_u64(8675309); // for testing only!
    for v in [0, 1, u64::MAX] {
        let (proof, commitment) = prove(v, Scalar::random_not_zero(&mut rng));
        assert!(verify(&proof, &commitment).is_ok(), "value {}", v);
    }
}

#[test]
fn test_random_values() {
    let mut rng = ChaCha12Rng::seed_from_u64(1234);
    for _ in 0..8 {
        let v: u64 = rng.gen();
        let (proof, commitment) = prove(v, Scalar::random_not_zero(&mut rng));
        assert!(verify(&proof, &commitment).is_ok());
    }
}

#[test]
fn test_determinism() {
    let sk = Scalar::from(987_654_321u64);
    let (first, _) = prove(555, sk);
    let (second, _) = prove(555, sk);
    assert_eq!(first.to_bytes(), second.to_bytes());

    // The transcript state is part of the input
    let opening = CommitmentOpening::new(555, sk);
    let mut transcript = Transcript::new(b"another label");
    let third = RangeProof::create(&opening, &mut transcript).unwrap();
    assert_ne!(first, third);
    assert!(third
        .verify(&opening.commit().compress(), &mut Transcript::new(b"another label"))
        .is_ok());
    assert!(verify(&third, &opening.commit().compress()).is_err());
}

#[test]
fn test_wrong_commitment() {
    let mut rng = ChaCha12Rng::seed_from_u64(42);
    let sk = Scalar::random_not_zero(&mut rng);
    let (proof, _) = prove(100, sk);

    let other_value = CommitmentOpening::new(101, sk).commit().compress();
    assert!(verify(&proof, &other_value).is_err());
    let other_blinding = CommitmentOpening::new(100, sk + Scalar::ONE).commit().compress();
    assert!(verify(&proof, &other_blinding).is_err());
}

#[test]
fn test_every_byte_flip_rejects() {
    let mut rng = ChaCha12Rng::seed_from_u64(7);
    let (proof, commitment) = prove(rng.gen(), Scalar::random_not_zero(&mut rng));
    let bytes = proof.to_bytes();

    // One byte of every 32-byte field: A, S, T1, T2, L_i, R_i, tau_x, mu, tDot and both condensed scalars
    for field in 0..RangeProof::POINT_COUNT + RangeProof::SCALAR_COUNT {
        let mut tampered = bytes.clone();
        let offset = 32 * field + rng.gen_range(0..31);
        tampered[offset] ^= 1 << rng.gen_range(0..8);
        match RangeProof::from_bytes(&tampered) {
            Ok(tampered) => assert!(verify(&tampered, &commitment).is_err(), "field {}", field),
            Err(e) => assert!(matches!(e, ProofError::InvalidArgument(_))),
        }
    }
}

#[test]
fn test_serde() {
    let (proof, commitment) = prove(31337, Scalar::from(99u8));
    let encoded = bincode::serialize(&proof).unwrap();
    let decoded: RangeProof = bincode::deserialize(&encoded).unwrap();
    assert_eq!(decoded, proof);
    assert!(verify(&decoded, &commitment).is_ok());

    let mut truncated = encoded;
    truncated.truncate(truncated.len() - 1);
    assert!(bincode::deserialize::<RangeProof>(&truncated).is_err());
}

#[test]
fn test_shared_context_outside_batch_mode() {
    let mut batch = BatchContext::with_proof_capacity(1);
    for v in [3u64, 4, 5] {
        let (proof, commitment) = prove(v, Scalar::from(v + 10));
        let mut transcript = Transcript::new(TRANSCRIPT_LABEL);
        assert!(proof
            .verify_with_batch(&commitment, &mut transcript, &mut batch)
            .is_ok());
    }
    let (proof, _) = prove(6, Scalar::from(16u8));
    let (_, wrong) = prove(7, Scalar::from(17u8));
    let mut transcript = Transcript::new(TRANSCRIPT_LABEL);
    assert!(proof
        .verify_with_batch(&wrong, &mut transcript, &mut batch)
        .is_err());

    // An undecodable T1 is rejected after the commitment term is queued; the context stays usable
    let (proof, commitment) = prove(8, Scalar::from(18u8));
    let mut corrupt = proof.to_bytes();
    corrupt[2 * 32..3 * 32].copy_from_slice(&[0xff; 32]);
    let corrupt = RangeProof::from_bytes(&corrupt).unwrap();
    assert!(corrupt
        .verify_with_batch(&commitment, &mut Transcript::new(TRANSCRIPT_LABEL), &mut batch)
        .is_err());
    assert!(!batch.is_dirty());
    assert!(proof
        .verify_with_batch(&commitment, &mut Transcript::new(TRANSCRIPT_LABEL), &mut batch)
        .is_ok());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_round_trip(v in any::<u64>(), seed in any::<u64>()) {
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let (proof, commitment) = prove(v, Scalar::random_not_zero(&mut rng));
        prop_assert!(verify(&proof, &commitment).is_ok());
        prop_assert_eq!(RangeProof::from_bytes(&proof.to_bytes()).unwrap(), proof);
    }
}
