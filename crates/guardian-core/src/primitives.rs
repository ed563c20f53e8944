//! # Engine Limits
//!
//! Fixed bounds applied when a requirement snapshot crosses into the engine.
//! They are compiled into the binary and immutable at runtime.

/// Percentage reported for a stage with no requirements.
///
/// Nothing blocks progress, so the stage counts as complete.
pub const EMPTY_STAGE_PERCENT: u8 = 100;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum number of requirements in one stage snapshot.
///
/// Snapshots larger than this are rejected to keep every evaluation bounded.
pub const MAX_REQUIREMENTS: usize = 10_000;

/// Maximum length for requirement descriptions, in bytes.
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Percentage of `part` in `whole`, rounded half up with integer math only.
///
/// Returns [`EMPTY_STAGE_PERCENT`] when `whole` is zero.
#[must_use]
pub fn rounded_percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return EMPTY_STAGE_PERCENT;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    // round(part * 100 / whole) == (part * 200 + whole) / (2 * whole)
    let percent = part
        .saturating_mul(200)
        .saturating_add(whole)
        .checked_div(whole.saturating_mul(2))
        .unwrap_or(0);
    percent.min(100) as u8
}
