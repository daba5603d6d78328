//! Deterministic noise.
//!
//! The fuzzed mood read and the utterance gate need values that look
//! arbitrary to the caller but are pure functions of their inputs, so that
//! repeated reads within a tick agree bit for bit. No RNG state is involved.

/// Peak amplitude of the per-dimension perturbation on fuzzed reads.
pub const FUZZ_AMPLITUDE: f64 = 0.02;

/// Perturbation applied to a mood value at a given dimension index.
#[must_use]
pub fn fuzz_offset(value: f64, dimension_index: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let phase = value * 1000.0 + dimension_index as f64;
    phase.sin() * FUZZ_AMPLITUDE
}

/// Pseudo-uniform value in `[0, 1)` derived from a tick and a salt.
///
/// Classic sine-hash: the fractional part of a large multiple of a sine.
#[must_use]
pub fn unit(tick: u64, salt: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let t = (tick % 1_000_003) as f64;
    let x = (t * 12.9898 + salt * 78.233).sin() * 43_758.545_3;
    let frac = x - x.floor();
    // Guard against `x - floor(x)` rounding up to exactly 1.0.
    if frac >= 1.0 { 0.0 } else { frac }
}
