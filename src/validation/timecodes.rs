/*!
 * Timecode validation for subtitle entries.
 *
 * This module validates that timecodes are:
 * - Numeric (no NaN from unparseable fields)
 * - Logically consistent (start <= end)
 * - In chronological document order
 * - Non-overlapping between consecutive entries
 * - Inside the audio duration, when one is known
 */

use log::debug;

use crate::subtitle_processor::SubtitleEntry;

/// Result of timecode validation for a single entry
#[derive(Debug, Clone)]
pub struct TimecodeEntryResult {
    /// Sequence number of the entry
    pub seq_num: usize,
    /// Whether the entry passed validation
    pub passed: bool,
    /// Issues found
    pub issues: Vec<TimecodeIssue>,
}

impl TimecodeEntryResult {
    /// Create a passing result
    pub fn passed(seq_num: usize) -> Self {
        Self {
            seq_num,
            passed: true,
            issues: vec![],
        }
    }

    /// Create a failing result
    pub fn failed(seq_num: usize, issues: Vec<TimecodeIssue>) -> Self {
        Self {
            seq_num,
            passed: false,
            issues,
        }
    }
}

/// Which side of a cue a problem refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
}

impl std::fmt::Display for TimeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeField::Start => write!(f, "start"),
            TimeField::End => write!(f, "end"),
        }
    }
}

/// Types of timecode issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeIssue {
    /// A time field is not a number
    NotANumber {
        field: TimeField,
    },
    /// End time is before start time
    InvalidTimeRange {
        start_secs: f64,
        end_secs: f64,
    },
    /// Starts before the previous cue in document order
    OutOfOrder {
        prev_seq_num: usize,
    },
    /// Overlaps with the previous cue
    OverlapsWithEntry {
        other_seq_num: usize,
        overlap_secs: f64,
    },
    /// Starts at or after the end of the audio
    BeyondTimeline {
        start_secs: f64,
        total_secs: f64,
    },
}

impl std::fmt::Display for TimecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimecodeIssue::NotANumber { field } => {
                write!(f, "Unparseable {} time", field)
            }
            TimecodeIssue::InvalidTimeRange { start_secs, end_secs } => {
                write!(f, "Invalid time range: start {:.3}s > end {:.3}s", start_secs, end_secs)
            }
            TimecodeIssue::OutOfOrder { prev_seq_num } => {
                write!(f, "Starts before entry {}", prev_seq_num)
            }
            TimecodeIssue::OverlapsWithEntry { other_seq_num, overlap_secs } => {
                write!(
                    f,
                    "Overlaps with entry {} by {:.3}s",
                    other_seq_num, overlap_secs
                )
            }
            TimecodeIssue::BeyondTimeline { start_secs, total_secs } => {
                write!(
                    f,
                    "Starts at {:.3}s, after the audio ends at {:.3}s",
                    start_secs, total_secs
                )
            }
        }
    }
}

/// Result of validating all timecodes in a collection
#[derive(Debug, Clone)]
pub struct TimecodeValidationResult {
    /// Overall pass/fail status
    pub passed: bool,
    /// Results for each entry
    pub entry_results: Vec<TimecodeEntryResult>,
    /// Total number of issues
    pub total_issues: usize,
    /// Number of overlapping entries
    pub overlap_count: usize,
}

impl TimecodeValidationResult {
    /// Get all failed entries
    pub fn failed_entries(&self) -> Vec<&TimecodeEntryResult> {
        self.entry_results.iter().filter(|r| !r.passed).collect()
    }
}

/// Configuration for timecode validation
#[derive(Debug, Clone)]
pub struct TimecodeValidatorConfig {
    /// Whether to check for overlaps between consecutive cues
    pub check_overlaps: bool,
    /// Whether to flag cues that start before their predecessor
    pub check_order: bool,
    /// Audio duration, when known
    pub total_duration: Option<f64>,
}

impl Default for TimecodeValidatorConfig {
    fn default() -> Self {
        Self {
            check_overlaps: true,
            check_order: true,
            total_duration: None,
        }
    }
}

/// Timecode validator for subtitle entries
#[derive(Debug, Clone, Default)]
pub struct TimecodeValidator {
    config: TimecodeValidatorConfig,
}

impl TimecodeValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimecodeValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a single subtitle entry
    pub fn validate_entry(&self, entry: &SubtitleEntry) -> TimecodeEntryResult {
        let mut issues = Vec::new();

        if entry.start_secs.is_nan() {
            issues.push(TimecodeIssue::NotANumber { field: TimeField::Start });
        }
        if entry.end_secs.is_nan() {
            issues.push(TimecodeIssue::NotANumber { field: TimeField::End });
        }
        if !issues.is_empty() {
            // Can't do further validation with invalid times
            return TimecodeEntryResult::failed(entry.seq_num, issues);
        }

        if entry.end_secs < entry.start_secs {
            issues.push(TimecodeIssue::InvalidTimeRange {
                start_secs: entry.start_secs,
                end_secs: entry.end_secs,
            });
        }

        if let Some(total_secs) = self.config.total_duration {
            if entry.start_secs >= total_secs {
                issues.push(TimecodeIssue::BeyondTimeline {
                    start_secs: entry.start_secs,
                    total_secs,
                });
            }
        }

        if issues.is_empty() {
            TimecodeEntryResult::passed(entry.seq_num)
        } else {
            TimecodeEntryResult::failed(entry.seq_num, issues)
        }
    }

    /// Validate a collection of subtitle entries in document order
    pub fn validate_collection(&self, entries: &[SubtitleEntry]) -> TimecodeValidationResult {
        let mut entry_results: Vec<TimecodeEntryResult> = entries
            .iter()
            .map(|e| self.validate_entry(e))
            .collect();

        let mut overlap_count = 0;

        for (i, pair) in entries.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);
            if !current.has_finite_times() || !next.has_finite_times() {
                continue;
            }

            let result = &mut entry_results[i + 1];

            if self.config.check_order && next.start_secs < current.start_secs {
                result.issues.push(TimecodeIssue::OutOfOrder {
                    prev_seq_num: current.seq_num,
                });
                result.passed = false;
            }

            if self.config.check_overlaps && current.end_secs > next.start_secs {
                overlap_count += 1;
                result.issues.push(TimecodeIssue::OverlapsWithEntry {
                    other_seq_num: current.seq_num,
                    overlap_secs: current.end_secs - next.start_secs,
                });
                result.passed = false;
            }
        }

        let total_issues: usize = entry_results.iter().map(|r| r.issues.len()).sum();
        let passed = entry_results.iter().all(|r| r.passed);

        debug!(
            "Timecode validation: {} entries, {} issues, {} overlaps",
            entries.len(),
            total_issues,
            overlap_count
        );

        TimecodeValidationResult {
            passed,
            entry_results,
            total_issues,
            overlap_count,
        }
    }
}
