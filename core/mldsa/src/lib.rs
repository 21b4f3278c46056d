#![deny(unsafe_code)]

//! Pure Rust ML-DSA (FIPS 204), the module-lattice signature scheme
//! standardised from CRYSTALS-Dilithium.
//!
//! All three parameter sets live in one build:
//! - [`MlDsa44`]: security category 2 (pk 1312 B, sk 2560 B, sig 2420 B)
//! - [`MlDsa65`]: security category 3 (pk 1952 B, sk 4032 B, sig 3309 B)
//! - [`MlDsa87`]: security category 5 (pk 2592 B, sk 4896 B, sig 4627 B)
//!
//! # Security notes
//!
//! - Secret keys and secret-derived scratch are zeroized on drop.
//! - Operations on secret data avoid secret-dependent branches and memory
//!   access patterns; selection helpers go through a value barrier so the
//!   optimiser cannot reintroduce branches.
//! - Signing is deterministic by default; [`sign::MlDsa::sign_randomized`]
//!   provides the hedged variant.
//! - No hardening against power/EM side channels or fault injection is
//!   attempted.
//!
//! # Example
//!
//! ```rust
//! use pqsign_mldsa::MlDsa44;
//!
//! let mut rng = rand::thread_rng();
//! let keypair = MlDsa44::keypair(&mut rng)?;
//!
//! let msg = b"interoperable bytes";
//! let ctx = b"example";
//! let sig = MlDsa44::sign(keypair.secret_key(), msg, ctx)?;
//! MlDsa44::verify(keypair.public_key(), msg, ctx, &sig)?;
//! # Ok::<(), pqsign_mldsa::MlDsaError>(())
//! ```

pub mod error;
pub mod params;
pub mod sign;

mod ct;
mod ntt;
mod packing;
mod poly;
mod polyvec;
mod reduce;
mod rounding;
mod xof;

pub use error::MlDsaError;
pub use params::{MlDsa44Params, MlDsa65Params, MlDsa87Params, ParameterSet};
pub use sign::{Keypair, MlDsa, MlDsa44, MlDsa65, MlDsa87, PublicKey, SecretKey, Signature};
