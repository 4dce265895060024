/*!
 * Tests for timecode validation
 */

use slidereel::validation::{TimecodeIssue, TimecodeValidator, TimecodeValidatorConfig};
use crate::common;

#[test]
fn test_validate_collection_withCleanCues_shouldPass() {
    let cues = vec![
        common::cue(1, 0.0, 1.0, "a"),
        common::cue(2, 1.0, 2.0, "b"),
        common::cue(3, 2.5, 4.0, "c"),
    ];

    let result = TimecodeValidator::new().validate_collection(&cues);

    assert!(result.passed);
    assert_eq!(result.total_issues, 0);
    assert!(result.failed_entries().is_empty());
}

#[test]
fn test_validate_collection_withOverlapAndDisorder_shouldReportBoth() {
    let cues = vec![
        common::cue(1, 0.0, 3.0, "a"),
        common::cue(2, 2.0, 4.0, "overlaps a"),
        common::cue(3, 1.0, 1.5, "goes backwards"),
    ];

    let result = TimecodeValidator::new().validate_collection(&cues);

    assert!(!result.passed);
    assert_eq!(result.overlap_count, 2);

    let failed = result.failed_entries();
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0].seq_num, 2);
    assert!(matches!(
        failed[0].issues[0],
        TimecodeIssue::OverlapsWithEntry { other_seq_num: 1, .. }
    ));
    assert!(failed[1]
        .issues
        .contains(&TimecodeIssue::OutOfOrder { prev_seq_num: 2 }));
}

#[test]
fn test_validate_entry_withNaNAndReversed_shouldFail() {
    let validator = TimecodeValidator::new();

    let nan = validator.validate_entry(&common::cue(1, f64::NAN, 2.0, "nan"));
    assert!(!nan.passed);
    assert_eq!(nan.issues.len(), 1);

    let reversed = validator.validate_entry(&common::cue(2, 5.0, 3.0, "reversed"));
    assert!(matches!(reversed.issues[0], TimecodeIssue::InvalidTimeRange { .. }));
}

#[test]
fn test_validate_entry_withTotalDuration_shouldFlagLateCues() {
    let validator = TimecodeValidator::with_config(TimecodeValidatorConfig {
        total_duration: Some(10.0),
        ..Default::default()
    });

    assert!(validator.validate_entry(&common::cue(1, 9.0, 11.0, "tail")).passed);

    let late = validator.validate_entry(&common::cue(2, 10.0, 11.0, "late"));
    assert!(!late.passed);
    assert!(late.issues[0].to_string().contains("after the audio ends"));
}

#[test]
fn test_validate_collection_withChecksDisabled_shouldIgnorePairs() {
    let validator = TimecodeValidator::with_config(TimecodeValidatorConfig {
        check_overlaps: false,
        check_order: false,
        total_duration: None,
    });
    let cues = vec![common::cue(1, 0.0, 5.0, "a"), common::cue(2, 1.0, 2.0, "b")];

    assert!(validator.validate_collection(&cues).passed);
}
