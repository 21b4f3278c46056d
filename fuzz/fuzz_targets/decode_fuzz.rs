#![no_main]
use libfuzzer_sys::fuzz_target;
use pqsign_mldsa::{MlDsa44, PublicKey, SecretKey, Signature};

// Attacker-controlled bytes hit three public decoders plus full
// verification. None of them may panic; structurally valid garbage must be
// rejected by verification, not by UB.
fuzz_target!(|data: &[u8]| {
    let _ = PublicKey::<pqsign_mldsa::MlDsa44Params>::from_bytes(data);
    let _ = SecretKey::<pqsign_mldsa::MlDsa44Params>::from_bytes(data);
    let _ = Signature::<pqsign_mldsa::MlDsa44Params>::from_bytes(data);

    if data.len() >= MlDsa44::SIGNATURE_SIZE + 32 {
        let seed: [u8; 32] = data[..32].try_into().unwrap();
        let keypair = MlDsa44::keypair_from_seed(&seed);
        let sig_bytes = &data[32..32 + MlDsa44::SIGNATURE_SIZE];
        if let Ok(sig) = Signature::from_bytes(sig_bytes) {
            let msg = &data[32 + MlDsa44::SIGNATURE_SIZE..];
            let _ = MlDsa44::verify(keypair.public_key(), msg, b"", &sig);
            let _ = MlDsa44::open(keypair.public_key(), data, b"");
        }
    }
});
