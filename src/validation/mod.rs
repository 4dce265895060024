/*!
 * Validation of parsed subtitle cues.
 *
 * The parser never fails on malformed content. Callers that want
 * user-visible diagnostics run this pass over its output:
 * - `timecodes`: NaN times, reversed ranges, overlaps, out-of-order cues,
 *   cues that start after the audio ends
 */

pub mod timecodes;

// Re-export main types
pub use timecodes::{TimecodeIssue, TimecodeValidator, TimecodeValidatorConfig, TimecodeValidationResult};
