//! Amplification-coefficient ramp.

use super::A_PRECISION;

/// Returns the amplification at `now`, scaled by [`A_PRECISION`].
///
/// Once the ramp has ended (`future_a_time <= now`) the result is
/// `future_a × A_PRECISION`.  Before the ramp starts the result is
/// `initial_a × A_PRECISION`.  In between, `A` moves linearly from
/// `initial_a` to `future_a`, rounding the increment toward zero, so the
/// output is monotonic in time and hits both endpoints exactly.
///
/// # Examples
///
/// ```
/// use stableswap_engine::math::{get_a, A_PRECISION};
///
/// assert_eq!(get_a(100, 200, 0, 100, 50), 150 * A_PRECISION);
/// assert_eq!(get_a(100, 200, 0, 100, 100), 200 * A_PRECISION);
/// ```
#[must_use]
pub fn get_a(initial_a: u64, future_a: u64, initial_a_time: i64, future_a_time: i64, now: i64) -> u128 {
    let initial = u128::from(initial_a) * A_PRECISION;
    let future = u128::from(future_a) * A_PRECISION;

    if future_a_time <= now {
        return future;
    }
    if now <= initial_a_time {
        return initial;
    }

    // Both differences are strictly positive here.
    let elapsed = now.abs_diff(initial_a_time);
    let window = future_a_time.abs_diff(initial_a_time);

    if future >= initial {
        let step = (future - initial) * u128::from(elapsed) / u128::from(window);
        initial + step
    } else {
        let step = (initial - future) * u128::from(elapsed) / u128::from(window);
        initial - step
    }
}
