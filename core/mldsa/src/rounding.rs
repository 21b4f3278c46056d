//! Coefficient rounding: power-of-two splitting, high/low decomposition and
//! the hint mechanism used to transmit carry information to the verifier.

use crate::params::{ParameterSet, D, Q};

/// Splits `a` (in `[0, q)`) into `(a1, a0)` with `a = a1 * 2^d + a0` and
/// `-2^{d-1} < a0 <= 2^{d-1}`.
#[inline(always)]
pub(crate) fn power2round(a: i32) -> (i32, i32) {
    let a1 = (a + (1 << (D - 1)) - 1) >> D;
    let a0 = a - (a1 << D);
    (a1, a0)
}

/// Splits `a` (in `[0, q)`) into `(a1, a0)` with `a = a1 * 2 * gamma2 + a0`,
/// `|a0| <= gamma2` and `a1` in `[0, (q-1)/(2*gamma2))`.
///
/// The multiply-shift constants are the standard integer approximation of
/// division by 2*gamma2; the branch on gamma2 resolves at compile time.
#[inline(always)]
pub(crate) fn decompose<P: ParameterSet>(a: i32) -> (i32, i32) {
    let mut a1 = (a + 127) >> 7;
    if P::GAMMA2 == (Q - 1) / 32 {
        a1 = (a1 * 1025 + (1 << 21)) >> 22;
        a1 &= 15;
    } else {
        a1 = (a1 * 11275 + (1 << 23)) >> 24;
        a1 ^= ((43 - a1) >> 31) & a1;
    }
    let mut a0 = a - a1 * 2 * P::GAMMA2;
    a0 -= (((Q - 1) / 2 - a0) >> 31) & Q;
    (a1, a0)
}

/// Hint bit: 1 iff the low part `a0` overflows into the high part.
#[inline(always)]
pub(crate) fn make_hint<P: ParameterSet>(a0: i32, a1: i32) -> u32 {
    u32::from(a0 > P::GAMMA2 || a0 < -P::GAMMA2 || (a0 == -P::GAMMA2 && a1 != 0))
}

/// Corrects the high part of `a` according to the hint bit.
#[inline(always)]
pub(crate) fn use_hint<P: ParameterSet>(a: i32, hint: u32) -> i32 {
    let (a1, a0) = decompose::<P>(a);
    if hint == 0 {
        return a1;
    }

    if P::GAMMA2 == (Q - 1) / 32 {
        if a0 > 0 {
            (a1 + 1) & 15
        } else {
            (a1 - 1) & 15
        }
    } else if a0 > 0 {
        if a1 == 43 {
            0
        } else {
            a1 + 1
        }
    } else if a1 == 0 {
        43
    } else {
        a1 - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{MlDsa44Params, MlDsa65Params};

    fn sample_inputs() -> impl Iterator<Item = i32> {
        // A sweep of q's range plus the boundary neighbourhoods.
        (0..Q).step_by(4099).chain([0, 1, Q - 1, Q - 2, 1 << D, (1 << D) - 1])
    }

    #[test]
    fn power2round_reconstructs() {
        for a in sample_inputs() {
            let (a1, a0) = power2round(a);
            assert_eq!(a, a1 * (1 << D) + a0);
            assert!(a0 > -(1 << (D - 1)) && a0 <= 1 << (D - 1));
            assert!((0..=(Q - 1) >> D).contains(&a1));
        }
    }

    fn check_decompose<P: ParameterSet>() {
        for a in sample_inputs() {
            let (a1, a0) = decompose::<P>(a);
            assert!(a0.abs() <= P::GAMMA2, "a0 = {a0} for a = {a}");
            assert!((0..(Q - 1) / (2 * P::GAMMA2)).contains(&a1), "a1 = {a1} for a = {a}");
            // a = a1 * 2 * gamma2 + a0 (mod q)
            let recomposed = (a1 as i64 * 2 * P::GAMMA2 as i64 + a0 as i64).rem_euclid(Q as i64);
            assert_eq!(recomposed, a as i64 % Q as i64);
        }
    }

    #[test]
    fn decompose_both_gamma2_branches() {
        check_decompose::<MlDsa44Params>();
        check_decompose::<MlDsa65Params>();
    }

    fn check_hint_lemma<P: ParameterSet>() {
        // The verifier identity: with (w1, w0) = decompose(w) and a
        // perturbation |e| <= beta, the hint computed from (w0 - e, w1) lets
        // use_hint recover w1 from the perturbed element w - e.
        for w in sample_inputs() {
            let (w1, w0) = decompose::<P>(w);
            for e in [-P::BETA, -1, 0, 1, P::BETA] {
                let hint = make_hint::<P>(w0 - e, w1);
                let shifted = (w as i64 - e as i64).rem_euclid(Q as i64) as i32;
                assert_eq!(use_hint::<P>(shifted, hint), w1, "w = {w}, e = {e}");
            }
        }
    }

    #[test]
    fn hints_recover_high_bits_of_perturbed_elements() {
        check_hint_lemma::<MlDsa44Params>();
        check_hint_lemma::<MlDsa65Params>();
    }

    #[test]
    fn high_bits_recovery_against_reference() {
        // When no hint is needed, use_hint must equal plain decompose.
        for a in sample_inputs() {
            let (a1, _) = decompose::<MlDsa44Params>(a);
            assert_eq!(use_hint::<MlDsa44Params>(a, 0), a1);
            let (a1, _) = decompose::<MlDsa65Params>(a);
            assert_eq!(use_hint::<MlDsa65Params>(a, 0), a1);
        }
    }
}
