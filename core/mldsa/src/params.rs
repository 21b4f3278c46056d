//! Parameter sets for the three standardised ML-DSA security levels.
//!
//! FIPS 204 fixes three instantiations of the scheme. The reference C
//! implementations select one at compile time through a preprocessor mode;
//! here each set is a type implementing [`ParameterSet`], so all three levels
//! coexist in a single build and every size is carried by the type.

/// Number of coefficients in a ring element.
pub const N: usize = 256;

/// The prime modulus q = 2^23 - 2^13 + 1.
pub const Q: i32 = 8_380_417;

/// Dropped bits in the power-of-two rounding of t.
pub const D: u32 = 13;

/// Width of the key-generation seed xi and of the key seed K.
pub const SEED_BYTES: usize = 32;

/// Width of collision-resistant hashes (mu, rho').
pub const CRH_BYTES: usize = 64;

/// Width of the public-key hash tr.
pub const TR_BYTES: usize = 64;

/// Width of the signing randomness rnd.
pub const RND_BYTES: usize = 32;

/// Bytes per packed t1 polynomial (10 bits per coefficient).
pub const POLYT1_PACKED_BYTES: usize = 320;

/// Bytes per packed t0 polynomial (13 bits per coefficient).
pub const POLYT0_PACKED_BYTES: usize = 416;

/// Constants of one ML-DSA security level.
///
/// The associated constants mirror Table 1 of FIPS 204; the packed sizes and
/// the derived key/signature sizes follow from them. Implementors are
/// zero-sized markers used purely at the type level.
pub trait ParameterSet: Clone + Copy + core::fmt::Debug + Send + Sync + 'static {
    /// Rows of the public matrix A.
    const K: usize;
    /// Columns of the public matrix A.
    const L: usize;
    /// Infinity-norm bound on the secret vectors s1, s2.
    const ETA: i32;
    /// Range parameter of the mask vector y.
    const GAMMA1: i32;
    /// Low-order rounding range.
    const GAMMA2: i32;
    /// Number of nonzero coefficients in the challenge polynomial.
    const TAU: usize;
    /// Rejection bound offset, tau * eta.
    const BETA: i32;
    /// Maximum total weight of the hint vector.
    const OMEGA: usize;
    /// Width of the commitment hash c-tilde.
    const CTILDE_BYTES: usize;

    /// Bytes per eta-packed secret polynomial.
    const POLYETA_PACKED_BYTES: usize;
    /// Bytes per gamma1-packed z polynomial.
    const POLYZ_PACKED_BYTES: usize;
    /// Bytes per packed w1 polynomial.
    const POLYW1_PACKED_BYTES: usize;

    /// Encoded public key size in bytes.
    const PUBLIC_KEY_BYTES: usize = SEED_BYTES + Self::K * POLYT1_PACKED_BYTES;

    /// Encoded secret key size in bytes.
    const SECRET_KEY_BYTES: usize = 2 * SEED_BYTES
        + TR_BYTES
        + (Self::K + Self::L) * Self::POLYETA_PACKED_BYTES
        + Self::K * POLYT0_PACKED_BYTES;

    /// Encoded signature size in bytes.
    const SIGNATURE_BYTES: usize =
        Self::CTILDE_BYTES + Self::L * Self::POLYZ_PACKED_BYTES + Self::OMEGA + Self::K;
}

/// ML-DSA-44 (NIST security category 2).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MlDsa44Params;

/// ML-DSA-65 (NIST security category 3).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MlDsa65Params;

/// ML-DSA-87 (NIST security category 5).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MlDsa87Params;

impl ParameterSet for MlDsa44Params {
    const K: usize = 4;
    const L: usize = 4;
    const ETA: i32 = 2;
    const GAMMA1: i32 = 1 << 17;
    const GAMMA2: i32 = (Q - 1) / 88;
    const TAU: usize = 39;
    const BETA: i32 = 78;
    const OMEGA: usize = 80;
    const CTILDE_BYTES: usize = 32;

    const POLYETA_PACKED_BYTES: usize = 96;
    const POLYZ_PACKED_BYTES: usize = 576;
    const POLYW1_PACKED_BYTES: usize = 192;
}

impl ParameterSet for MlDsa65Params {
    const K: usize = 6;
    const L: usize = 5;
    const ETA: i32 = 4;
    const GAMMA1: i32 = 1 << 19;
    const GAMMA2: i32 = (Q - 1) / 32;
    const TAU: usize = 49;
    const BETA: i32 = 196;
    const OMEGA: usize = 55;
    const CTILDE_BYTES: usize = 48;

    const POLYETA_PACKED_BYTES: usize = 128;
    const POLYZ_PACKED_BYTES: usize = 640;
    const POLYW1_PACKED_BYTES: usize = 128;
}

impl ParameterSet for MlDsa87Params {
    const K: usize = 8;
    const L: usize = 7;
    const ETA: i32 = 2;
    const GAMMA1: i32 = 1 << 19;
    const GAMMA2: i32 = (Q - 1) / 32;
    const TAU: usize = 60;
    const BETA: i32 = 120;
    const OMEGA: usize = 75;
    const CTILDE_BYTES: usize = 64;

    const POLYETA_PACKED_BYTES: usize = 96;
    const POLYZ_PACKED_BYTES: usize = 640;
    const POLYW1_PACKED_BYTES: usize = 128;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_sizes_match_fips204() {
        assert_eq!(MlDsa44Params::PUBLIC_KEY_BYTES, 1312);
        assert_eq!(MlDsa44Params::SECRET_KEY_BYTES, 2560);
        assert_eq!(MlDsa44Params::SIGNATURE_BYTES, 2420);

        assert_eq!(MlDsa65Params::PUBLIC_KEY_BYTES, 1952);
        assert_eq!(MlDsa65Params::SECRET_KEY_BYTES, 4032);
        assert_eq!(MlDsa65Params::SIGNATURE_BYTES, 3309);

        assert_eq!(MlDsa87Params::PUBLIC_KEY_BYTES, 2592);
        assert_eq!(MlDsa87Params::SECRET_KEY_BYTES, 4896);
        assert_eq!(MlDsa87Params::SIGNATURE_BYTES, 4627);
    }

    #[test]
    fn beta_is_tau_times_eta() {
        assert_eq!(MlDsa44Params::BETA, MlDsa44Params::TAU as i32 * MlDsa44Params::ETA);
        assert_eq!(MlDsa65Params::BETA, MlDsa65Params::TAU as i32 * MlDsa65Params::ETA);
        assert_eq!(MlDsa87Params::BETA, MlDsa87Params::TAU as i32 * MlDsa87Params::ETA);
    }
}
