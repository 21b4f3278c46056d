//! Vectors of polynomials of length L and K, and the public matrix A.

use core::marker::PhantomData;

use zeroize::Zeroize;

use crate::ntt::{ActiveBackend, NttBackend};
use crate::params::{ParameterSet, CRH_BYTES, N, SEED_BYTES};
use crate::poly::Poly;
use crate::reduce::montgomery_reduce;

macro_rules! polyvec_common {
    ($name:ident, $len:expr) => {
        impl<P: ParameterSet> $name<P> {
            pub(crate) fn zero() -> Self {
                Self {
                    polys: vec![Poly::default(); $len].into_boxed_slice(),
                    _params: PhantomData,
                }
            }

            pub(crate) fn reduce(&mut self) {
                for p in self.polys.iter_mut() {
                    p.reduce();
                }
            }

            pub(crate) fn caddq(&mut self) {
                for p in self.polys.iter_mut() {
                    p.caddq();
                }
            }

            pub(crate) fn add_assign(&mut self, other: &Self) {
                for (p, o) in self.polys.iter_mut().zip(other.polys.iter()) {
                    p.add_assign(o);
                }
            }

            pub(crate) fn sub_assign(&mut self, other: &Self) {
                for (p, o) in self.polys.iter_mut().zip(other.polys.iter()) {
                    p.sub_assign(o);
                }
            }

            pub(crate) fn ntt(&mut self) {
                for p in self.polys.iter_mut() {
                    p.ntt();
                }
            }

            pub(crate) fn invntt_tomont(&mut self) {
                for p in self.polys.iter_mut() {
                    p.invntt_tomont();
                }
            }

            /// `self = a * v` coefficient-wise in the NTT domain.
            pub(crate) fn pointwise_poly_montgomery(&mut self, a: &Poly, v: &Self) {
                for (p, o) in self.polys.iter_mut().zip(v.polys.iter()) {
                    p.pointwise_montgomery(a, o);
                }
            }

            /// True if any coefficient of any polynomial reaches `bound`.
            pub(crate) fn chknorm(&self, bound: i32) -> bool {
                self.polys.iter().any(|p| p.chknorm(bound))
            }
        }

        impl<P: ParameterSet> Clone for $name<P> {
            fn clone(&self) -> Self {
                Self {
                    polys: self.polys.clone(),
                    _params: PhantomData,
                }
            }
        }

        impl<P: ParameterSet> Zeroize for $name<P> {
            fn zeroize(&mut self) {
                for p in self.polys.iter_mut() {
                    p.zeroize();
                }
            }
        }
    };
}

/// A vector of L polynomials.
#[derive(Debug)]
pub(crate) struct PolyVecL<P: ParameterSet> {
    pub(crate) polys: Box<[Poly]>,
    _params: PhantomData<P>,
}

/// A vector of K polynomials.
#[derive(Debug)]
pub(crate) struct PolyVecK<P: ParameterSet> {
    pub(crate) polys: Box<[Poly]>,
    _params: PhantomData<P>,
}

polyvec_common!(PolyVecL, P::L);
polyvec_common!(PolyVecK, P::K);

impl<P: ParameterSet> PolyVecL<P> {
    /// Samples the mask vector y with per-polynomial nonces
    /// `L * kappa + i`.
    pub(crate) fn uniform_gamma1(seed: &[u8; CRH_BYTES], kappa: u16) -> Self {
        let base = (P::L as u16).wrapping_mul(kappa);
        let mut v = Self::zero();
        for (i, p) in v.polys.iter_mut().enumerate() {
            *p = Poly::uniform_gamma1::<P>(seed, base.wrapping_add(i as u16));
        }
        v
    }
}

impl<P: ParameterSet> PolyVecK<P> {
    /// Multiplies every coefficient by 2^d.
    pub(crate) fn shiftl(&mut self) {
        for p in self.polys.iter_mut() {
            p.shiftl();
        }
    }

    /// Per-coefficient power2round; returns `(high, low)`.
    pub(crate) fn power2round(&self) -> (Self, Self) {
        let mut hi = Self::zero();
        let mut lo = Self::zero();
        for (i, p) in self.polys.iter().enumerate() {
            let (h, l) = p.power2round();
            hi.polys[i] = h;
            lo.polys[i] = l;
        }
        (hi, lo)
    }

    /// Per-coefficient decompose; returns `(high, low)`.
    pub(crate) fn decompose(&self) -> (Self, Self) {
        let mut hi = Self::zero();
        let mut lo = Self::zero();
        for (i, p) in self.polys.iter().enumerate() {
            let (h, l) = p.decompose::<P>();
            hi.polys[i] = h;
            lo.polys[i] = l;
        }
        (hi, lo)
    }

    /// Computes the hint vector; returns it with its total weight.
    pub(crate) fn make_hint(lo: &Self, hi: &Self) -> (Self, u32) {
        let mut h = Self::zero();
        let mut weight = 0;
        for i in 0..P::K {
            let (hp, w) = Poly::make_hint::<P>(&lo.polys[i], &hi.polys[i]);
            h.polys[i] = hp;
            weight += w;
        }
        (h, weight)
    }

    /// Applies the hint vector to recover high parts.
    pub(crate) fn use_hint(&self, h: &Self) -> Self {
        let mut out = Self::zero();
        for (i, p) in self.polys.iter().enumerate() {
            out.polys[i] = p.use_hint::<P>(&h.polys[i]);
        }
        out
    }

    /// Packs all w1 polynomials into `out`.
    pub(crate) fn pack_w1(&self, out: &mut [u8]) {
        for (p, chunk) in self.polys.iter().zip(out.chunks_mut(P::POLYW1_PACKED_BYTES)) {
            crate::poly::w1_pack::<P>(chunk, p);
        }
    }
}

/// The public matrix A in the NTT domain: K rows of L polynomials each,
/// addressed pair-wise. Rows are independently boxed; nothing relies on the
/// vectors being contiguous in memory.
pub(crate) struct Matrix<P: ParameterSet> {
    pub(crate) rows: Box<[PolyVecL<P>]>,
}

impl<P: ParameterSet> Matrix<P> {
    /// Expands A from rho: entry (i, j) is sampled from
    /// SHAKE128(rho || le16((i << 8) | j)), then permuted into the active
    /// backend's NTT-domain order.
    pub(crate) fn expand(rho: &[u8; SEED_BYTES]) -> Self {
        let mut rows = Vec::with_capacity(P::K);
        for i in 0..P::K {
            let mut row = PolyVecL::<P>::zero();
            for (j, p) in row.polys.iter_mut().enumerate() {
                *p = Poly::uniform(rho, ((i as u16) << 8) | j as u16);
                ActiveBackend::permute_bitrev_to_custom(&mut p.coeffs);
            }
            rows.push(row);
        }
        Self { rows: rows.into_boxed_slice() }
    }

    /// Computes `t = A * v` in the NTT domain with Montgomery reduction.
    pub(crate) fn pointwise_montgomery(&self, v: &PolyVecL<P>) -> PolyVecK<P> {
        let mut t = PolyVecK::<P>::zero();
        for (row, out) in self.rows.iter().zip(t.polys.iter_mut()) {
            *out = pointwise_acc_montgomery::<P>(row, v);
        }
        t
    }
}

/// Inner product of two length-L vectors in the NTT domain.
///
/// Accumulates in 64 bits without intermediate reductions: with one operand
/// bounded by 9q this stays below 2^63 even for L = 7.
fn pointwise_acc_montgomery<P: ParameterSet>(u: &PolyVecL<P>, v: &PolyVecL<P>) -> Poly {
    let mut w = Poly::default();
    for i in 0..N {
        let mut t = 0i64;
        for j in 0..P::L {
            t += u.polys[j].coeffs[i] as i64 * v.polys[j].coeffs[i] as i64;
        }
        w.coeffs[i] = montgomery_reduce(t);
    }
    w
}
