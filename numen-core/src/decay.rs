//! Half-life decay of ledger influence.
//!
//! Every ledger entry carries full weight on the tick it was recorded and
//! halves every `half_life` ticks after that:
//!   w = 0.5^(Δt / h)
//!
//! Where:
//!   w = weight in (0.0, 1.0]
//!   Δt = ticks elapsed since the entry was recorded
//!   h = configured half-life in ticks
//!
//! Weights are computed lazily at read time; nothing is ever decayed in place.

/// Smallest half-life accepted. Anything below (or non-finite) is raised to it.
pub const MIN_HALF_LIFE: f64 = 1e-6;

/// Weight of an entry `age_ticks` old under the given half-life.
///
/// Returns a value in (0.0, 1.0]. Ages so large that the exact power would
/// underflow are floored at `f64::MIN_POSITIVE`: entries fade but never vanish.
#[must_use]
pub fn half_life_weight(age_ticks: u64, half_life: f64) -> f64 {
    let h = sanitize_half_life(half_life);
    #[allow(clippy::cast_precision_loss)]
    let exponent = age_ticks as f64 / h;
    0.5_f64.powf(exponent).max(f64::MIN_POSITIVE)
}

/// Clamp a configured half-life into the accepted range.
#[must_use]
pub fn sanitize_half_life(half_life: f64) -> f64 {
    if half_life.is_finite() && half_life >= MIN_HALF_LIFE {
        half_life
    } else if half_life == f64::INFINITY {
        f64::MAX
    } else {
        MIN_HALF_LIFE
    }
}
