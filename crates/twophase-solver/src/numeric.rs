/// General tolerance for floating point comparisons
pub const EPS: f64 = 1e-9;

/// Tolerance for objective-row cleanup when reducing against the basis
pub const CLEANUP_EPS: f64 = 1e-12;

/// Tolerance for equality constraints in vertex enumeration
pub const EQUALITY_EPS: f64 = 1e-7;

/// Decimals kept in returned values
pub const DEFAULT_DECIMALS: u32 = 6;

/// Finest rounding an f64 can represent meaningfully
pub const MAX_DECIMALS: u32 = 15;

/// Iteration cap for Phase II
pub const PHASE_TWO_MAX_ITERATIONS: usize = 100;

/// Iteration cap for Phase I
pub const PHASE_ONE_MAX_ITERATIONS: usize = 200;

/// Rounds to `decimals` places, folding negative zero into zero
pub fn round(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}
