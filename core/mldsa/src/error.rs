//! Errors surfaced by the ML-DSA operations.

use thiserror::Error;

/// Errors that can occur during ML-DSA key handling, signing or verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MlDsaError {
    /// The context string exceeds the 255-byte limit of FIPS 204.
    #[error("context string is {0} bytes, maximum is 255")]
    ContextTooLong(usize),

    /// A key blob has the wrong length for the parameter set.
    #[error("invalid key length: expected {expected}, found {found}")]
    InvalidKeyLength {
        /// Required length in bytes.
        expected: usize,
        /// Length actually supplied.
        found: usize,
    },

    /// A signature blob has the wrong length for the parameter set.
    #[error("invalid signature length: expected {expected}, found {found}")]
    InvalidSignatureLength {
        /// Required length in bytes.
        expected: usize,
        /// Length actually supplied.
        found: usize,
    },

    /// The signature's hint block violates its canonical encoding.
    #[error("malformed signature encoding")]
    InvalidSignatureEncoding,

    /// The signature does not verify under the given public key.
    ///
    /// All internal mismatches (norm bound, challenge recomputation, hint
    /// decoding during verification) collapse into this single variant so
    /// callers cannot distinguish why verification failed.
    #[error("signature verification failed")]
    VerificationFailed,

    /// The pairwise consistency self-test after key generation failed.
    #[error("pairwise consistency test failed")]
    PctFailure,
}
