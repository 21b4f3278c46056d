//! Byte-exact encoding of public keys, secret keys and signatures.

use crate::error::MlDsaError;
use crate::params::{
    ParameterSet, POLYT0_PACKED_BYTES, POLYT1_PACKED_BYTES, SEED_BYTES, TR_BYTES,
};
use crate::poly;
use crate::polyvec::{PolyVecK, PolyVecL};

/// pk = rho || t1.
pub(crate) fn pack_pk<P: ParameterSet>(
    pk: &mut [u8],
    rho: &[u8; SEED_BYTES],
    t1: &PolyVecK<P>,
) {
    pk[..SEED_BYTES].copy_from_slice(rho);
    for (p, chunk) in t1
        .polys
        .iter()
        .zip(pk[SEED_BYTES..].chunks_mut(POLYT1_PACKED_BYTES))
    {
        poly::t1_pack(chunk, p);
    }
}

/// Inverse of [`pack_pk`]. The caller has already validated the length.
pub(crate) fn unpack_pk<P: ParameterSet>(pk: &[u8]) -> ([u8; SEED_BYTES], PolyVecK<P>) {
    let mut rho = [0u8; SEED_BYTES];
    rho.copy_from_slice(&pk[..SEED_BYTES]);

    let mut t1 = PolyVecK::<P>::zero();
    for (p, chunk) in t1
        .polys
        .iter_mut()
        .zip(pk[SEED_BYTES..].chunks(POLYT1_PACKED_BYTES))
    {
        *p = poly::t1_unpack(chunk);
    }
    (rho, t1)
}

/// sk = rho || key || tr || eta(s1) || eta(s2) || t0.
#[allow(clippy::too_many_arguments)]
pub(crate) fn pack_sk<P: ParameterSet>(
    sk: &mut [u8],
    rho: &[u8; SEED_BYTES],
    tr: &[u8; TR_BYTES],
    key: &[u8; SEED_BYTES],
    t0: &PolyVecK<P>,
    s1: &PolyVecL<P>,
    s2: &PolyVecK<P>,
) {
    let mut off = 0;
    sk[off..off + SEED_BYTES].copy_from_slice(rho);
    off += SEED_BYTES;
    sk[off..off + SEED_BYTES].copy_from_slice(key);
    off += SEED_BYTES;
    sk[off..off + TR_BYTES].copy_from_slice(tr);
    off += TR_BYTES;

    for p in s1.polys.iter() {
        poly::eta_pack::<P>(&mut sk[off..off + P::POLYETA_PACKED_BYTES], p);
        off += P::POLYETA_PACKED_BYTES;
    }
    for p in s2.polys.iter() {
        poly::eta_pack::<P>(&mut sk[off..off + P::POLYETA_PACKED_BYTES], p);
        off += P::POLYETA_PACKED_BYTES;
    }
    for p in t0.polys.iter() {
        poly::t0_pack(&mut sk[off..off + POLYT0_PACKED_BYTES], p);
        off += POLYT0_PACKED_BYTES;
    }
}

/// Unpacked secret-key components.
pub(crate) struct SecretKeyParts<P: ParameterSet> {
    pub rho: [u8; SEED_BYTES],
    pub tr: [u8; TR_BYTES],
    pub key: [u8; SEED_BYTES],
    pub t0: PolyVecK<P>,
    pub s1: PolyVecL<P>,
    pub s2: PolyVecK<P>,
}

/// Inverse of [`pack_sk`]. The caller has already validated the length; the
/// eta coefficients of an adversarial blob may land in the widened range
/// documented on [`poly::eta_unpack`].
pub(crate) fn unpack_sk<P: ParameterSet>(sk: &[u8]) -> SecretKeyParts<P> {
    let mut rho = [0u8; SEED_BYTES];
    let mut key = [0u8; SEED_BYTES];
    let mut tr = [0u8; TR_BYTES];

    let mut off = 0;
    rho.copy_from_slice(&sk[off..off + SEED_BYTES]);
    off += SEED_BYTES;
    key.copy_from_slice(&sk[off..off + SEED_BYTES]);
    off += SEED_BYTES;
    tr.copy_from_slice(&sk[off..off + TR_BYTES]);
    off += TR_BYTES;

    let mut s1 = PolyVecL::<P>::zero();
    for p in s1.polys.iter_mut() {
        *p = poly::eta_unpack::<P>(&sk[off..off + P::POLYETA_PACKED_BYTES]);
        off += P::POLYETA_PACKED_BYTES;
    }
    let mut s2 = PolyVecK::<P>::zero();
    for p in s2.polys.iter_mut() {
        *p = poly::eta_unpack::<P>(&sk[off..off + P::POLYETA_PACKED_BYTES]);
        off += P::POLYETA_PACKED_BYTES;
    }
    let mut t0 = PolyVecK::<P>::zero();
    for p in t0.polys.iter_mut() {
        *p = poly::t0_unpack(&sk[off..off + POLYT0_PACKED_BYTES]);
        off += POLYT0_PACKED_BYTES;
    }

    SecretKeyParts { rho, tr, key, t0, s1, s2 }
}

/// sig = c-tilde || z || hints.
///
/// The hint block is omega index bytes followed by K running totals. At most
/// `number_of_hints <= omega` indices are written; the rest stay zero.
pub(crate) fn pack_sig<P: ParameterSet>(
    sig: &mut [u8],
    c_tilde: &[u8],
    z: &PolyVecL<P>,
    h: &PolyVecK<P>,
    number_of_hints: u32,
) {
    sig[..P::CTILDE_BYTES].copy_from_slice(c_tilde);
    let mut off = P::CTILDE_BYTES;

    for p in z.polys.iter() {
        poly::z_pack::<P>(&mut sig[off..off + P::POLYZ_PACKED_BYTES], p);
        off += P::POLYZ_PACKED_BYTES;
    }

    let hints = &mut sig[off..];
    hints.fill(0);
    let mut k = 0usize;
    for (i, p) in h.polys.iter().enumerate() {
        for (j, &coeff) in p.coeffs.iter().enumerate() {
            if coeff != 0 && k < number_of_hints as usize {
                hints[k] = j as u8;
                k += 1;
            }
        }
        hints[P::OMEGA + i] = k as u8;
    }
}

/// Decoded signature components: c-tilde, z and the hint vector.
pub(crate) type SignatureParts<P> = (Vec<u8>, PolyVecL<P>, PolyVecK<P>);

/// Inverse of [`pack_sig`]. Rejects non-canonical hint encodings: running
/// totals must be monotone and bounded by omega, indices within a polynomial
/// strictly increasing, and unused index bytes zero. These checks are what
/// make the signature encoding unique, which strong unforgeability relies
/// on.
pub(crate) fn unpack_sig<P: ParameterSet>(sig: &[u8]) -> Result<SignatureParts<P>, MlDsaError> {
    let c_tilde = sig[..P::CTILDE_BYTES].to_vec();
    let mut off = P::CTILDE_BYTES;

    let mut z = PolyVecL::<P>::zero();
    for p in z.polys.iter_mut() {
        *p = poly::z_unpack::<P>(&sig[off..off + P::POLYZ_PACKED_BYTES]);
        off += P::POLYZ_PACKED_BYTES;
    }

    let hints = &sig[off..];
    let mut h = PolyVecK::<P>::zero();
    let mut k = 0usize;
    for i in 0..P::K {
        let total = hints[P::OMEGA + i] as usize;
        if total < k || total > P::OMEGA {
            return Err(MlDsaError::InvalidSignatureEncoding);
        }
        for j in k..total {
            if j > k && hints[j] <= hints[j - 1] {
                return Err(MlDsaError::InvalidSignatureEncoding);
            }
            h.polys[i].coeffs[hints[j] as usize] = 1;
        }
        k = total;
    }
    if hints[k..P::OMEGA].iter().any(|&b| b != 0) {
        return Err(MlDsaError::InvalidSignatureEncoding);
    }

    Ok((c_tilde, z, h))
}
