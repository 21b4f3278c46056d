use hex_literal::hex;
use pqsign_mldsa::{MlDsa44, MlDsa65, MlDsa87, MlDsaError, PublicKey, Signature};
use rand::thread_rng;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;

const TEST_SEED: [u8; 32] =
    hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");
const TEST_SEED_ALT: [u8; 32] =
    hex!("ffeeddccbbaa99887766554433221100ffeeddccbbaa99887766554433221100");

#[test]
fn test_keygen_sign_verify_roundtrip_44() {
    let keypair = MlDsa44::keypair(&mut thread_rng()).expect("key generation should succeed");
    let msg = b"Test message for ML-DSA signature";
    let sig = MlDsa44::sign(keypair.secret_key(), msg, b"").expect("signing should succeed");
    assert!(MlDsa44::verify(keypair.public_key(), msg, b"", &sig).is_ok());
}

#[test]
fn test_keygen_sign_verify_roundtrip_65() {
    let keypair = MlDsa65::keypair(&mut thread_rng()).expect("key generation should succeed");
    let msg = b"Test message for ML-DSA signature";
    let sig = MlDsa65::sign(keypair.secret_key(), msg, b"ctx").expect("signing should succeed");
    assert!(MlDsa65::verify(keypair.public_key(), msg, b"ctx", &sig).is_ok());
}

#[test]
fn test_keygen_sign_verify_roundtrip_87() {
    let keypair = MlDsa87::keypair(&mut thread_rng()).expect("key generation should succeed");
    let msg = b"Test message for ML-DSA signature";
    let sig = MlDsa87::sign(keypair.secret_key(), msg, b"").expect("signing should succeed");
    assert!(MlDsa87::verify(keypair.public_key(), msg, b"", &sig).is_ok());
}

#[test]
fn test_message_tampering_rejected() {
    let keypair = MlDsa44::keypair(&mut thread_rng()).unwrap();
    let sig = MlDsa44::sign(keypair.secret_key(), b"Original message", b"").unwrap();
    let verification = MlDsa44::verify(keypair.public_key(), b"Tampered message", b"", &sig);
    assert_eq!(verification, Err(MlDsaError::VerificationFailed));
}

#[test]
fn test_context_tampering_rejected() {
    let keypair = MlDsa44::keypair(&mut thread_rng()).unwrap();
    let sig = MlDsa44::sign(keypair.secret_key(), b"msg", b"context-a").unwrap();
    let verification = MlDsa44::verify(keypair.public_key(), b"msg", b"context-b", &sig);
    assert_eq!(verification, Err(MlDsaError::VerificationFailed));
}

#[test]
fn test_signature_bitflips_rejected() {
    let keypair = MlDsa44::keypair_from_seed(&TEST_SEED);
    let msg = b"bitflip target";
    let sig = MlDsa44::sign(keypair.secret_key(), msg, b"").unwrap();

    // Walk a spread of positions covering c-tilde, z and the hint block.
    let len = sig.as_bytes().len();
    for pos in [0, 1, 40, len / 2, len - 90, len - 5, len - 1] {
        let mut bytes = sig.as_bytes().to_vec();
        bytes[pos] ^= 0x01;
        let mangled = Signature::from_bytes(&bytes).unwrap();
        assert!(
            MlDsa44::verify(keypair.public_key(), msg, b"", &mangled).is_err(),
            "bit flip at byte {pos} must invalidate the signature"
        );
    }
}

#[test]
fn test_public_key_bitflip_rejected() {
    let keypair = MlDsa44::keypair_from_seed(&TEST_SEED_ALT);
    let msg = b"pk bitflip target";
    let sm = MlDsa44::sign_attached(keypair.secret_key(), msg, b"").unwrap();

    let mut pk_bytes = keypair.public_key().as_bytes().to_vec();
    pk_bytes[100] ^= 0x40;
    let mangled_pk = PublicKey::from_bytes(&pk_bytes).unwrap();
    assert!(MlDsa44::open(&mangled_pk, &sm, b"").is_err());
}

#[test]
fn test_attached_signature_open_roundtrip() {
    let keypair = MlDsa44::keypair(&mut thread_rng()).unwrap();
    let msg = b"message riding behind its signature";
    let sm = MlDsa44::sign_attached(keypair.secret_key(), msg, b"").unwrap();
    assert_eq!(sm.len(), MlDsa44::SIGNATURE_SIZE + msg.len());

    let recovered = MlDsa44::open(keypair.public_key(), &sm, b"").unwrap();
    assert_eq!(recovered, msg);
}

#[test]
fn test_open_rejects_tampered_blob() {
    let keypair = MlDsa44::keypair(&mut thread_rng()).unwrap();
    let msg = b"message riding behind its signature";
    let mut sm = MlDsa44::sign_attached(keypair.secret_key(), msg, b"").unwrap();

    sm[MlDsa44::SIGNATURE_SIZE + 3] ^= 0x80;
    assert_eq!(
        MlDsa44::open(keypair.public_key(), &sm, b""),
        Err(MlDsaError::VerificationFailed)
    );
}

#[test]
fn test_open_rejects_truncated_blob() {
    let keypair = MlDsa44::keypair(&mut thread_rng()).unwrap();
    let sm = MlDsa44::sign_attached(keypair.secret_key(), b"m", b"").unwrap();
    assert!(MlDsa44::open(keypair.public_key(), &sm[..MlDsa44::SIGNATURE_SIZE - 1], b"").is_err());
}

#[test]
fn test_context_length_limit() {
    let keypair = MlDsa44::keypair(&mut thread_rng()).unwrap();
    let ctx = [0u8; 256];
    assert_eq!(
        MlDsa44::sign(keypair.secret_key(), b"m", &ctx),
        Err(MlDsaError::ContextTooLong(256))
    );

    let sig = MlDsa44::sign(keypair.secret_key(), b"m", b"").unwrap();
    assert_eq!(
        MlDsa44::verify(keypair.public_key(), b"m", &ctx, &sig),
        Err(MlDsaError::ContextTooLong(256))
    );

    // 255 bytes is still legal.
    let ctx = [0u8; 255];
    let sig = MlDsa44::sign(keypair.secret_key(), b"m", &ctx).unwrap();
    assert!(MlDsa44::verify(keypair.public_key(), b"m", &ctx, &sig).is_ok());
}

#[test]
fn test_deterministic_signing_is_reproducible() {
    let keypair = MlDsa44::keypair_from_seed(&TEST_SEED);
    let a = MlDsa44::sign(keypair.secret_key(), b"same input", b"ctx").unwrap();
    let b = MlDsa44::sign(keypair.secret_key(), b"same input", b"ctx").unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn test_randomized_signing_differs_but_verifies() {
    let keypair = MlDsa44::keypair(&mut thread_rng()).unwrap();
    let msg = b"hedged";
    let det = MlDsa44::sign(keypair.secret_key(), msg, b"").unwrap();
    let hedged =
        MlDsa44::sign_randomized(&mut thread_rng(), keypair.secret_key(), msg, b"").unwrap();
    assert_ne!(det.as_bytes(), hedged.as_bytes());
    assert!(MlDsa44::verify(keypair.public_key(), msg, b"", &det).is_ok());
    assert!(MlDsa44::verify(keypair.public_key(), msg, b"", &hedged).is_ok());
}

#[test]
fn test_external_mu_equals_pure_signing() {
    // Computing mu = SHAKE256(tr || 0x00 || len(ctx) || ctx || msg, 64)
    // externally and signing it through the external-mu entry point must
    // produce the same bytes as the pure variant.
    let keypair = MlDsa44::keypair_from_seed(&TEST_SEED_ALT);
    let msg = b"externally hashed";
    let ctx = b"mu";

    let mut hasher = Shake256::default();
    let mut tr = [0u8; 64];
    hasher.update(keypair.public_key().as_bytes());
    hasher.finalize_xof().read(&mut tr);

    let mut hasher = Shake256::default();
    hasher.update(&tr);
    hasher.update(&[0, ctx.len() as u8]);
    hasher.update(ctx);
    hasher.update(msg);
    let mut mu = [0u8; 64];
    hasher.finalize_xof().read(&mut mu);

    let pure = MlDsa44::sign(keypair.secret_key(), msg, ctx).unwrap();
    let extmu = MlDsa44::sign_extmu(keypair.secret_key(), &mu).unwrap();
    assert_eq!(pure.as_bytes(), extmu.as_bytes());

    assert!(MlDsa44::verify_extmu(keypair.public_key(), &mu, &extmu).is_ok());
    assert!(MlDsa44::verify(keypair.public_key(), msg, ctx, &pure).is_ok());
}

#[test]
fn test_wrong_key_rejected() {
    let alice = MlDsa44::keypair(&mut thread_rng()).unwrap();
    let mallory = MlDsa44::keypair(&mut thread_rng()).unwrap();
    let sig = MlDsa44::sign(alice.secret_key(), b"msg", b"").unwrap();
    assert!(MlDsa44::verify(mallory.public_key(), b"msg", b"", &sig).is_err());
}

#[test]
fn test_garbage_signature_rejected() {
    let keypair = MlDsa44::keypair(&mut thread_rng()).unwrap();
    // All-0xFF hint counts are non-monotonic, so this dies in decoding.
    let garbage = Signature::from_bytes(&vec![0xFF; MlDsa44::SIGNATURE_SIZE]).unwrap();
    assert!(MlDsa44::verify(keypair.public_key(), b"msg", b"", &garbage).is_err());
}

#[test]
fn test_pairwise_consistency_check() {
    let keypair = MlDsa44::keypair_checked(&mut thread_rng()).unwrap();
    let sig = MlDsa44::sign(keypair.secret_key(), b"after pct", b"").unwrap();
    assert!(MlDsa44::verify(keypair.public_key(), b"after pct", b"", &sig).is_ok());
}
