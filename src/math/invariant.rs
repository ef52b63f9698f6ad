//! StableSwap invariant solver (n = 2).
//!
//! # Invariant
//!
//! ```text
//! Ann · (x + y) + D = Ann · D + D³ / (4 · x · y)        Ann = amp · n
//! ```
//!
//! `amp` is the interpolated amplification already multiplied by
//! [`A_PRECISION`](super::A_PRECISION); it is used as-is, so the effective
//! curve is very close to constant-sum for the usual `A` values.
//!
//! Both solvers run on the raw `Dec` representation widened to 512 bits.
//! Convergence is reached when two consecutive iterates differ by at most
//! one raw unit (10^-18).

use primitive_types::U512;

use super::{MAX_ITERATIONS, N_COINS};
use crate::domain::Dec;
use crate::error::AmmError;

/// Convergence threshold, in raw `Dec` units.
const CONVERGENCE_THRESHOLD: u64 = 1;

fn widen(value: Dec, what: &'static str) -> Result<U512, AmmError> {
    if value.is_negative() {
        return Err(AmmError::InvalidQuantity(what));
    }
    Ok(U512::from(value.raw().unsigned_abs()))
}

fn narrow(value: U512, what: &'static str) -> Result<Dec, AmmError> {
    if value.bits() > 127 {
        return Err(AmmError::Overflow(what));
    }
    i128::try_from(value.low_u128())
        .map(Dec::from_raw)
        .map_err(|_| AmmError::Overflow(what))
}

fn converged(a: U512, b: U512) -> bool {
    let diff = if a > b { a - b } else { b - a };
    diff <= U512::from(CONVERGENCE_THRESHOLD)
}

/// Computes the invariant `D` for two adjusted balances via Newton-Raphson.
///
/// Starts from `D = x + y` and iterates
///
/// ```text
/// D_P    = D³ / (n² · x · y)
/// D_next = (Ann·S + n·D_P) · D / ((Ann − 1)·D + (n + 1)·D_P)
/// ```
///
/// Returns zero when both balances are zero.
///
/// # Errors
///
/// - [`AmmError::NonConvergence`] after [`MAX_ITERATIONS`] iterations.
/// - [`AmmError::DivisionByZero`] if exactly one balance is zero.
/// - [`AmmError::InvalidQuantity`] if a balance is negative.
/// - [`AmmError::Overflow`] if an intermediate exceeds 512 bits.
pub fn calculate_invariant(balances: &[Dec; 2], amp: u128) -> Result<Dec, AmmError> {
    let x = widen(balances[0], "D: negative balance")?;
    let y = widen(balances[1], "D: negative balance")?;
    let n = U512::from(N_COINS);

    let s = x
        .checked_add(y)
        .ok_or(AmmError::Overflow("D: S overflow"))?;
    if s.is_zero() {
        return Ok(Dec::ZERO);
    }

    let ann = U512::from(amp)
        .checked_mul(n)
        .ok_or(AmmError::Overflow("D: A·n overflow"))?;
    let nx = n.checked_mul(x).ok_or(AmmError::Overflow("D: n·x overflow"))?;
    let ny = n.checked_mul(y).ok_or(AmmError::Overflow("D: n·y overflow"))?;
    if nx.is_zero() || ny.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let ann_s = ann
        .checked_mul(s)
        .ok_or(AmmError::Overflow("D: ann·S overflow"))?;
    let ann_minus_1 = ann.saturating_sub(U512::one());

    let mut d = s;
    for _ in 0..MAX_ITERATIONS {
        // D_P = D · D / (n·x) · D / (n·y), step by step to bound the width.
        let mut d_p = d
            .checked_mul(d)
            .ok_or(AmmError::Overflow("D: d_p·d overflow"))?
            / nx;
        d_p = d_p
            .checked_mul(d)
            .ok_or(AmmError::Overflow("D: d_p·d overflow"))?
            / ny;

        let d_prev = d;

        let numerator = ann_s
            .checked_add(n.checked_mul(d_p).ok_or(AmmError::Overflow("D: n·D_P overflow"))?)
            .ok_or(AmmError::Overflow("D: num inner overflow"))?
            .checked_mul(d)
            .ok_or(AmmError::Overflow("D: numerator overflow"))?;

        let denominator = ann_minus_1
            .checked_mul(d)
            .ok_or(AmmError::Overflow("D: denom left overflow"))?
            .checked_add(
                (n + U512::one())
                    .checked_mul(d_p)
                    .ok_or(AmmError::Overflow("D: denom right overflow"))?,
            )
            .ok_or(AmmError::Overflow("D: denominator overflow"))?;
        if denominator.is_zero() {
            return Err(AmmError::DivisionByZero);
        }

        d = numerator / denominator;

        if converged(d, d_prev) {
            return narrow(d, "D: result exceeds decimal range");
        }
    }

    Err(AmmError::NonConvergence(
        "D computation did not converge within 255 iterations",
    ))
}

/// Solves for the balance of the *other* asset given the new balance
/// `x_new` of one asset and the invariant `d`.
///
/// For n = 2 the equation `y² + (b − D)·y = c` is iterated as
///
/// ```text
/// c      = D³ / (n² · x_new · Ann)
/// b      = x_new + D / Ann
/// y_next = (y² + c) / (2·y + b − D)
/// ```
///
/// starting from `y = D`.
///
/// # Errors
///
/// - [`AmmError::NonConvergence`] after [`MAX_ITERATIONS`] iterations.
/// - [`AmmError::DivisionByZero`] if `x_new` or `amp` is zero.
/// - [`AmmError::Overflow`] if an intermediate exceeds 512 bits.
pub fn get_y(x_new: Dec, amp: u128, d: Dec) -> Result<Dec, AmmError> {
    let x = widen(x_new, "y: negative balance")?;
    let d = widen(d, "y: negative invariant")?;
    let n = U512::from(N_COINS);

    let ann = U512::from(amp)
        .checked_mul(n)
        .ok_or(AmmError::Overflow("y: A·n overflow"))?;
    if ann.is_zero() {
        return Err(AmmError::DivisionByZero);
    }
    let nx = n.checked_mul(x).ok_or(AmmError::Overflow("y: n·x overflow"))?;
    if nx.is_zero() {
        return Err(AmmError::DivisionByZero);
    }

    let c_part = d.checked_mul(d).ok_or(AmmError::Overflow("y: D² overflow"))? / nx;
    let c = c_part
        .checked_mul(d)
        .ok_or(AmmError::Overflow("y: c overflow"))?
        / ann
            .checked_mul(n)
            .ok_or(AmmError::Overflow("y: ann·n overflow"))?;
    let b = x
        .checked_add(d / ann)
        .ok_or(AmmError::Overflow("y: b overflow"))?;

    let mut y = d;
    for _ in 0..MAX_ITERATIONS {
        let y_prev = y;

        let numerator = y
            .checked_mul(y)
            .ok_or(AmmError::Overflow("y: y² overflow"))?
            .checked_add(c)
            .ok_or(AmmError::Overflow("y: num overflow"))?;
        let denominator = y
            .checked_mul(U512::from(2u8))
            .ok_or(AmmError::Overflow("y: 2y overflow"))?
            .checked_add(b)
            .ok_or(AmmError::Overflow("y: denom sum overflow"))?
            .checked_sub(d)
            .ok_or(AmmError::Underflow("y: denominator below zero"))?;
        if denominator.is_zero() {
            return Err(AmmError::DivisionByZero);
        }

        y = numerator / denominator;

        if converged(y, y_prev) {
            return narrow(y, "y: result exceeds decimal range");
        }
    }

    Err(AmmError::NonConvergence(
        "y computation did not converge within 255 iterations",
    ))
}
