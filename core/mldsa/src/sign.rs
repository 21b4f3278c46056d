//! Key generation, signing and verification.
//!
//! # Example
//!
//! ```rust
//! use pqsign_mldsa::MlDsa65;
//!
//! let mut rng = rand::thread_rng();
//! let keypair = MlDsa65::keypair(&mut rng)?;
//!
//! let msg = b"attached to a lattice";
//! let sig = MlDsa65::sign(keypair.secret_key(), msg, b"")?;
//! MlDsa65::verify(keypair.public_key(), msg, b"", &sig)?;
//! # Ok::<(), pqsign_mldsa::MlDsaError>(())
//! ```

use core::fmt;
use core::marker::PhantomData;

use rand_core::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use tracing::trace;
use zeroize::Zeroize;

use crate::error::MlDsaError;
use crate::packing::{self, SecretKeyParts};
use crate::params::{ParameterSet, CRH_BYTES, RND_BYTES, SEED_BYTES, TR_BYTES};
use crate::poly::Poly;
use crate::polyvec::{Matrix, PolyVecK, PolyVecL};
use crate::xof::shake256_once;

/// Message signed and re-verified by the pairwise consistency test.
const PCT_MESSAGE: &[u8] = b"pairwise consistency test";

/// An ML-DSA public key for signature verification.
pub struct PublicKey<P: ParameterSet> {
    bytes: Vec<u8>,
    _params: PhantomData<P>,
}

impl<P: ParameterSet> PublicKey<P> {
    /// Parses a public key, checking only the length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MlDsaError> {
        if bytes.len() != P::PUBLIC_KEY_BYTES {
            return Err(MlDsaError::InvalidKeyLength {
                expected: P::PUBLIC_KEY_BYTES,
                found: bytes.len(),
            });
        }
        Ok(Self { bytes: bytes.to_vec(), _params: PhantomData })
    }

    /// Raw encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl<P: ParameterSet> Clone for PublicKey<P> {
    fn clone(&self) -> Self {
        Self { bytes: self.bytes.clone(), _params: PhantomData }
    }
}

impl<P: ParameterSet> fmt::Debug for PublicKey<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey").field("len", &self.bytes.len()).finish()
    }
}

/// An ML-DSA secret key. Zeroized on drop.
///
/// `from_bytes` validates the length only; the coefficient ranges of an
/// unauthenticated blob are not checked, matching the reference unpacking
/// contract. Decoding an arbitrary blob yields eta coefficients in a
/// widened but bounded range ([-5, 2] for eta = 2, [-11, 4] for eta = 4).
pub struct SecretKey<P: ParameterSet> {
    bytes: Vec<u8>,
    _params: PhantomData<P>,
}

impl<P: ParameterSet> SecretKey<P> {
    /// Parses a secret key, checking only the length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MlDsaError> {
        if bytes.len() != P::SECRET_KEY_BYTES {
            return Err(MlDsaError::InvalidKeyLength {
                expected: P::SECRET_KEY_BYTES,
                found: bytes.len(),
            });
        }
        Ok(Self { bytes: bytes.to_vec(), _params: PhantomData })
    }

    /// Raw encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl<P: ParameterSet> Drop for SecretKey<P> {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl<P: ParameterSet> Clone for SecretKey<P> {
    fn clone(&self) -> Self {
        Self { bytes: self.bytes.clone(), _params: PhantomData }
    }
}

impl<P: ParameterSet> fmt::Debug for SecretKey<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material.
        f.debug_struct("SecretKey").field("len", &self.bytes.len()).finish()
    }
}

/// A detached ML-DSA signature.
pub struct Signature<P: ParameterSet> {
    bytes: Vec<u8>,
    _params: PhantomData<P>,
}

impl<P: ParameterSet> Signature<P> {
    /// Parses a signature, checking only the length. Structural checks on
    /// the hint encoding happen during verification.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MlDsaError> {
        if bytes.len() != P::SIGNATURE_BYTES {
            return Err(MlDsaError::InvalidSignatureLength {
                expected: P::SIGNATURE_BYTES,
                found: bytes.len(),
            });
        }
        Ok(Self { bytes: bytes.to_vec(), _params: PhantomData })
    }

    /// Raw encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl<P: ParameterSet> Clone for Signature<P> {
    fn clone(&self) -> Self {
        Self { bytes: self.bytes.clone(), _params: PhantomData }
    }
}

impl<P: ParameterSet> PartialEq for Signature<P> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<P: ParameterSet> Eq for Signature<P> {}

impl<P: ParameterSet> fmt::Debug for Signature<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature").field("len", &self.bytes.len()).finish()
    }
}

/// A generated key pair.
#[derive(Debug, Clone)]
pub struct Keypair<P: ParameterSet> {
    public_key: PublicKey<P>,
    secret_key: SecretKey<P>,
}

impl<P: ParameterSet> Keypair<P> {
    /// Generates a fresh key pair from the given RNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, MlDsaError> {
        MlDsa::<P>::keypair(rng)
    }

    /// The verification half.
    pub fn public_key(&self) -> &PublicKey<P> {
        &self.public_key
    }

    /// The signing half.
    pub fn secret_key(&self) -> &SecretKey<P> {
        &self.secret_key
    }
}

/// Entry point for one parameter set; see the [`MlDsa44`], [`MlDsa65`] and
/// [`MlDsa87`] aliases.
pub struct MlDsa<P: ParameterSet> {
    _params: PhantomData<P>,
}

/// ML-DSA-44 (security category 2).
pub type MlDsa44 = MlDsa<crate::params::MlDsa44Params>;
/// ML-DSA-65 (security category 3).
pub type MlDsa65 = MlDsa<crate::params::MlDsa65Params>;
/// ML-DSA-87 (security category 5).
pub type MlDsa87 = MlDsa<crate::params::MlDsa87Params>;

impl<P: ParameterSet> MlDsa<P> {
    /// Encoded public key size in bytes.
    pub const PUBLIC_KEY_SIZE: usize = P::PUBLIC_KEY_BYTES;
    /// Encoded secret key size in bytes.
    pub const SECRET_KEY_SIZE: usize = P::SECRET_KEY_BYTES;
    /// Encoded signature size in bytes.
    pub const SIGNATURE_SIZE: usize = P::SIGNATURE_BYTES;

    /// Generates a key pair from fresh randomness.
    pub fn keypair<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Keypair<P>, MlDsaError> {
        let mut seed = [0u8; SEED_BYTES];
        rng.fill_bytes(&mut seed);
        let keypair = Self::keypair_from_seed(&seed);
        seed.zeroize();
        Ok(keypair)
    }

    /// Generates a key pair and runs a pairwise consistency test: a fixed
    /// message is signed and re-verified before the pair is released.
    pub fn keypair_checked<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Keypair<P>, MlDsaError> {
        let keypair = Self::keypair(rng)?;
        let sig = Self::sign(&keypair.secret_key, PCT_MESSAGE, b"")
            .map_err(|_| MlDsaError::PctFailure)?;
        Self::verify(&keypair.public_key, PCT_MESSAGE, b"", &sig)
            .map_err(|_| MlDsaError::PctFailure)?;
        Ok(keypair)
    }

    /// Deterministically derives a key pair from a 32-byte seed.
    pub fn keypair_from_seed(seed: &[u8; SEED_BYTES]) -> Keypair<P> {
        let (pk, sk) = keypair_internal::<P>(seed);
        Keypair {
            public_key: PublicKey { bytes: pk, _params: PhantomData },
            secret_key: SecretKey { bytes: sk, _params: PhantomData },
        }
    }

    /// Signs `msg` under the context string `ctx` (at most 255 bytes),
    /// deterministically.
    pub fn sign(
        sk: &SecretKey<P>,
        msg: &[u8],
        ctx: &[u8],
    ) -> Result<Signature<P>, MlDsaError> {
        Self::sign_with_randomness(sk, msg, ctx, &[0u8; RND_BYTES])
    }

    /// Hedged variant of [`MlDsa::sign`]: mixes 32 fresh random bytes into
    /// the signing seed.
    pub fn sign_randomized<R: RngCore + CryptoRng>(
        rng: &mut R,
        sk: &SecretKey<P>,
        msg: &[u8],
        ctx: &[u8],
    ) -> Result<Signature<P>, MlDsaError> {
        let mut rnd = [0u8; RND_BYTES];
        rng.fill_bytes(&mut rnd);
        let sig = Self::sign_with_randomness(sk, msg, ctx, &rnd);
        rnd.zeroize();
        sig
    }

    /// Signs with caller-supplied hedging randomness (all-zero `rnd` gives
    /// the deterministic variant).
    pub fn sign_with_randomness(
        sk: &SecretKey<P>,
        msg: &[u8],
        ctx: &[u8],
        rnd: &[u8; RND_BYTES],
    ) -> Result<Signature<P>, MlDsaError> {
        let pre = domain_prefix(ctx)?;
        let bytes = sign_internal::<P>(msg, Some(&pre), rnd, &sk.bytes);
        Ok(Signature { bytes, _params: PhantomData })
    }

    /// Signs a caller-prehashed 64-byte representative mu directly
    /// (the external-mu variant), deterministically.
    pub fn sign_extmu(
        sk: &SecretKey<P>,
        mu: &[u8; CRH_BYTES],
    ) -> Result<Signature<P>, MlDsaError> {
        let bytes = sign_internal::<P>(mu, None, &[0u8; RND_BYTES], &sk.bytes);
        Ok(Signature { bytes, _params: PhantomData })
    }

    /// Signs `msg` and returns the attached form `signature || msg`.
    pub fn sign_attached(
        sk: &SecretKey<P>,
        msg: &[u8],
        ctx: &[u8],
    ) -> Result<Vec<u8>, MlDsaError> {
        let sig = Self::sign(sk, msg, ctx)?;
        let mut sm = Vec::with_capacity(sig.bytes.len() + msg.len());
        sm.extend_from_slice(&sig.bytes);
        sm.extend_from_slice(msg);
        Ok(sm)
    }

    /// Verifies a detached signature over `msg` and `ctx`.
    pub fn verify(
        pk: &PublicKey<P>,
        msg: &[u8],
        ctx: &[u8],
        sig: &Signature<P>,
    ) -> Result<(), MlDsaError> {
        let pre = domain_prefix(ctx)?;
        verify_internal::<P>(&sig.bytes, msg, Some(&pre), &pk.bytes)
    }

    /// Verifies a detached signature over an external 64-byte mu.
    pub fn verify_extmu(
        pk: &PublicKey<P>,
        mu: &[u8; CRH_BYTES],
        sig: &Signature<P>,
    ) -> Result<(), MlDsaError> {
        verify_internal::<P>(&sig.bytes, mu, None, &pk.bytes)
    }

    /// Verifies an attached `signature || msg` blob and returns the message.
    pub fn open(pk: &PublicKey<P>, sm: &[u8], ctx: &[u8]) -> Result<Vec<u8>, MlDsaError> {
        if sm.len() < P::SIGNATURE_BYTES {
            return Err(MlDsaError::VerificationFailed);
        }
        let (sig_bytes, msg) = sm.split_at(P::SIGNATURE_BYTES);
        let sig = Signature::from_bytes(sig_bytes)?;
        Self::verify(pk, msg, ctx, &sig)?;
        Ok(msg.to_vec())
    }
}

/// Builds `0x00 || len(ctx) || ctx`, the pure-variant domain separator.
fn domain_prefix(ctx: &[u8]) -> Result<Vec<u8>, MlDsaError> {
    if ctx.len() > 255 {
        return Err(MlDsaError::ContextTooLong(ctx.len()));
    }
    let mut pre = Vec::with_capacity(2 + ctx.len());
    pre.push(0);
    pre.push(ctx.len() as u8);
    pre.extend_from_slice(ctx);
    Ok(pre)
}

fn keypair_internal<P: ParameterSet>(seed: &[u8; SEED_BYTES]) -> (Vec<u8>, Vec<u8>) {
    // Derive rho, rho' and key; the parameter set is domain-separated into
    // the expansion.
    let mut inbuf = [0u8; SEED_BYTES + 2];
    inbuf[..SEED_BYTES].copy_from_slice(seed);
    inbuf[SEED_BYTES] = P::K as u8;
    inbuf[SEED_BYTES + 1] = P::L as u8;

    let mut seedbuf = [0u8; 2 * SEED_BYTES + CRH_BYTES];
    shake256_once(&mut seedbuf, &[&inbuf]);

    let mut rho = [0u8; SEED_BYTES];
    let mut rhoprime = [0u8; CRH_BYTES];
    let mut key = [0u8; SEED_BYTES];
    rho.copy_from_slice(&seedbuf[..SEED_BYTES]);
    rhoprime.copy_from_slice(&seedbuf[SEED_BYTES..SEED_BYTES + CRH_BYTES]);
    key.copy_from_slice(&seedbuf[SEED_BYTES + CRH_BYTES..]);
    inbuf.zeroize();
    seedbuf.zeroize();

    let mat = Matrix::<P>::expand(&rho);

    let mut s1 = PolyVecL::<P>::zero();
    for (i, p) in s1.polys.iter_mut().enumerate() {
        *p = Poly::uniform_eta::<P>(&rhoprime, i as u16);
    }
    let mut s2 = PolyVecK::<P>::zero();
    for (i, p) in s2.polys.iter_mut().enumerate() {
        *p = Poly::uniform_eta::<P>(&rhoprime, (P::L + i) as u16);
    }
    rhoprime.zeroize();

    // t = A * s1 + s2 over the integers mod q.
    let mut s1hat = s1.clone();
    s1hat.ntt();
    let mut t = mat.pointwise_montgomery(&s1hat);
    t.reduce();
    t.invntt_tomont();
    t.add_assign(&s2);
    t.caddq();
    s1hat.zeroize();

    let (t1, t0) = t.power2round();

    let mut pk = vec![0u8; P::PUBLIC_KEY_BYTES];
    packing::pack_pk::<P>(&mut pk, &rho, &t1);

    let mut tr = [0u8; TR_BYTES];
    shake256_once(&mut tr, &[&pk]);

    let mut sk = vec![0u8; P::SECRET_KEY_BYTES];
    packing::pack_sk::<P>(&mut sk, &rho, &tr, &key, &t0, &s1, &s2);

    s1.zeroize();
    s2.zeroize();
    t.zeroize();
    key.zeroize();

    (pk, sk)
}

/// One attempt of the rejection loop. Returns the packed signature on
/// acceptance. The mask and response vectors and the secret-key products
/// held in the scratch vectors are scrubbed on both outcomes, since
/// rejected candidates must never be revealed.
fn sign_attempt<P: ParameterSet>(
    mat: &Matrix<P>,
    parts: &SecretKeyParts<P>,
    mu: &[u8; CRH_BYTES],
    rhoprime: &[u8; CRH_BYTES],
    kappa: u16,
    w1_packed: &mut [u8],
) -> Option<Vec<u8>> {
    let mut y = PolyVecL::<P>::uniform_gamma1(rhoprime, kappa);

    let mut z = y.clone();
    z.ntt();
    let mut w = mat.pointwise_montgomery(&z);
    w.reduce();
    w.invntt_tomont();
    w.caddq();
    let (w1, mut w0) = w.decompose();
    w1.pack_w1(w1_packed);

    let mut c_tilde = vec![0u8; P::CTILDE_BYTES];
    shake256_once(&mut c_tilde, &[mu, w1_packed]);
    let mut cp = Poly::challenge::<P>(&c_tilde);
    cp.ntt();

    // z = y + c * s1; rejecting on its norm keeps z independent of s1.
    z.pointwise_poly_montgomery(&cp, &parts.s1);
    z.invntt_tomont();
    z.add_assign(&y);
    z.reduce();
    if z.chknorm(P::GAMMA1 - P::BETA) {
        y.zeroize();
        z.zeroize();
        w0.zeroize();
        return None;
    }

    // Subtracting c * s2 must not change the high bits of w or leak the
    // low bits. From here on w0 and h carry secret-key products and are
    // scrubbed on every exit like y and z.
    let mut h = PolyVecK::<P>::zero();
    h.pointwise_poly_montgomery(&cp, &parts.s2);
    h.invntt_tomont();
    w0.sub_assign(&h);
    w0.reduce();
    if w0.chknorm(P::GAMMA2 - P::BETA) {
        y.zeroize();
        z.zeroize();
        w0.zeroize();
        h.zeroize();
        return None;
    }

    // Hint computation; c * t0 itself must stay small.
    h.pointwise_poly_montgomery(&cp, &parts.t0);
    h.invntt_tomont();
    h.reduce();
    if h.chknorm(P::GAMMA2) {
        y.zeroize();
        z.zeroize();
        w0.zeroize();
        h.zeroize();
        return None;
    }

    w0.add_assign(&h);
    let (hint, weight) = PolyVecK::<P>::make_hint(&w0, &w1);
    if weight > P::OMEGA as u32 {
        y.zeroize();
        z.zeroize();
        w0.zeroize();
        h.zeroize();
        return None;
    }

    let mut sig = vec![0u8; P::SIGNATURE_BYTES];
    packing::pack_sig::<P>(&mut sig, &c_tilde, &z, &hint, weight);
    y.zeroize();
    z.zeroize();
    w0.zeroize();
    h.zeroize();
    Some(sig)
}

fn sign_internal<P: ParameterSet>(
    m: &[u8],
    pre: Option<&[u8]>,
    rnd: &[u8; RND_BYTES],
    sk: &[u8],
) -> Vec<u8> {
    let mut parts = packing::unpack_sk::<P>(sk);

    let mut mu = [0u8; CRH_BYTES];
    match pre {
        Some(pre) => shake256_once(&mut mu, &[&parts.tr, pre, m]),
        // External mu: the caller passes the 64-byte representative.
        None => mu.copy_from_slice(m),
    }

    let mut rhoprime = [0u8; CRH_BYTES];
    shake256_once(&mut rhoprime, &[&parts.key, rnd, &mu]);

    let mat = Matrix::<P>::expand(&parts.rho);
    parts.s1.ntt();
    parts.s2.ntt();
    parts.t0.ntt();

    let mut w1_packed = vec![0u8; P::K * P::POLYW1_PACKED_BYTES];
    let mut kappa: u16 = 0;

    let sig = loop {
        match sign_attempt::<P>(&mat, &parts, &mu, &rhoprime, kappa, &mut w1_packed) {
            Some(sig) => break sig,
            None => {
                trace!(attempt = kappa as u32, "signature candidate rejected");
                kappa = kappa.wrapping_add(1);
            }
        }
    };
    trace!(attempts = kappa as u32 + 1, "signature produced");

    parts.s1.zeroize();
    parts.s2.zeroize();
    parts.t0.zeroize();
    parts.key.zeroize();
    rhoprime.zeroize();

    sig
}

fn verify_internal<P: ParameterSet>(
    sig: &[u8],
    m: &[u8],
    pre: Option<&[u8]>,
    pk: &[u8],
) -> Result<(), MlDsaError> {
    let (rho, mut t1) = packing::unpack_pk::<P>(pk);
    let (c_tilde, mut z, h) = packing::unpack_sig::<P>(sig)?;

    if z.chknorm(P::GAMMA1 - P::BETA) {
        return Err(MlDsaError::VerificationFailed);
    }

    let mut mu = [0u8; CRH_BYTES];
    match pre {
        Some(pre) => {
            let mut hpk = [0u8; TR_BYTES];
            shake256_once(&mut hpk, &[pk]);
            shake256_once(&mut mu, &[&hpk, pre, m]);
        }
        None => mu.copy_from_slice(m),
    }

    // w1' = use_hint(A * z - c * t1 * 2^d, h)
    let mut cp = Poly::challenge::<P>(&c_tilde);
    let mat = Matrix::<P>::expand(&rho);

    z.ntt();
    let mut w1 = mat.pointwise_montgomery(&z);

    cp.ntt();
    t1.shiftl();
    t1.ntt();
    let mut tmp = PolyVecK::<P>::zero();
    tmp.pointwise_poly_montgomery(&cp, &t1);

    w1.sub_assign(&tmp);
    w1.reduce();
    w1.invntt_tomont();
    w1.caddq();
    let w1 = w1.use_hint(&h);

    let mut w1_packed = vec![0u8; P::K * P::POLYW1_PACKED_BYTES];
    w1.pack_w1(&mut w1_packed);

    let mut c_tilde2 = vec![0u8; P::CTILDE_BYTES];
    shake256_once(&mut c_tilde2, &[&mu, &w1_packed]);

    if bool::from(c_tilde.ct_eq(&c_tilde2)) {
        Ok(())
    } else {
        trace!("challenge recomputation mismatch");
        Err(MlDsaError::VerificationFailed)
    }
}
