/*!
 * Tests for timeline allocation and cue overlap
 */

use slidereel::errors::TimelineError;
use slidereel::timeline::{overlaps, per_image_duration, window_of, ImageWindow, Timeline};
use crate::common;

#[test]
fn test_per_image_duration_withEvenSplit_shouldDivideTotal() {
    assert_eq!(per_image_duration(10.0, 4), Ok(2.5));
    assert_eq!(per_image_duration(12.5, 5), Ok(2.5));
}

#[test]
fn test_per_image_duration_withZeroImages_shouldFail() {
    assert_eq!(per_image_duration(10.0, 0), Err(TimelineError::NoImages));
}

#[test]
fn test_per_image_duration_withZeroTotal_shouldReturnZero() {
    assert_eq!(per_image_duration(0.0, 3), Ok(0.0));
}

#[test]
fn test_per_image_duration_withInvalidTotal_shouldFail() {
    assert!(matches!(
        per_image_duration(-1.0, 2),
        Err(TimelineError::InvalidDuration(_))
    ));
    assert!(per_image_duration(f64::NAN, 2).is_err());
    assert!(per_image_duration(f64::INFINITY, 2).is_err());
}

#[test]
fn test_window_of_withFourImages_shouldTileTheTimeline() {
    let windows: Vec<(f64, f64)> = (0..4)
        .map(|i| window_of(i, 2.5))
        .map(|w| (w.start, w.end))
        .collect();

    assert_eq!(windows, vec![(0.0, 2.5), (2.5, 5.0), (5.0, 7.5), (7.5, 10.0)]);
}

#[test]
fn test_window_of_withBeyondCount_shouldStillCompute() {
    let window = window_of(10, 2.0);
    assert_eq!(window.index, 10);
    assert_eq!(window.start, 20.0);
    assert_eq!(window.end, 22.0);
}

#[test]
fn test_timeline_withFiveImages_shouldStartAtMultiples() {
    let timeline = Timeline::new(12.5, 5).unwrap();
    let starts: Vec<f64> = timeline.windows().map(|w| w.start).collect();

    assert_eq!(starts, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    assert_eq!(timeline.per_image_duration(), 2.5);
    assert_eq!(timeline.window(5), None);
}

#[test]
fn test_overlaps_withCueInsideWindow_shouldBeTrue() {
    let window = window_of(0, 2.5);
    assert!(overlaps(&common::cue(1, 1.0, 3.0, "a"), &window));
    assert!(overlaps(&common::cue(2, 0.0, 2.5, "b"), &window));
}

#[test]
fn test_overlaps_withDocumentedExamples_shouldHoldExactly() {
    let window = ImageWindow { index: 0, start: 0.0, end: 2.5 };

    assert!(overlaps(&common::cue(1, 2.4, 2.6, "crosses the edge"), &window));
    assert!(!overlaps(&common::cue(2, 2.5, 3.0, "starts at the edge"), &window));
}

#[test]
fn test_overlaps_withTouchingBoundaries_shouldBeFalse() {
    let window = ImageWindow { index: 1, start: 2.5, end: 5.0 };

    // Ends exactly where the window starts
    assert!(!overlaps(&common::cue(1, 1.0, 2.5, "a"), &window));
    // Starts exactly where the window ends
    assert!(!overlaps(&common::cue(2, 5.0, 6.0, "b"), &window));
}

#[test]
fn test_overlaps_withSpanningCue_shouldMatchEveryWindow() {
    let timeline = Timeline::new(10.0, 4).unwrap();
    let cue = common::cue(1, 1.0, 9.0, "long");

    assert!(timeline.windows().all(|w| overlaps(&cue, &w)));
}

#[test]
fn test_overlaps_withNaNTime_shouldBeFalse() {
    let timeline = Timeline::new(10.0, 4).unwrap();
    let nan_start = common::cue(1, f64::NAN, 2.0, "a");
    let nan_end = common::cue(2, 1.0, f64::NAN, "b");

    assert!(timeline.windows().all(|w| !overlaps(&nan_start, &w)));
    assert!(timeline.windows().all(|w| !overlaps(&nan_end, &w)));
}

#[test]
fn test_overlaps_withReversedCue_shouldFollowThePredicate() {
    let window = window_of(0, 5.0);
    // start < end of window and end > start of window both hold
    assert!(overlaps(&common::cue(1, 4.0, 1.0, "backwards"), &window));
    assert!(!overlaps(&common::cue(2, 9.0, 6.0, "backwards"), &window));
}

#[test]
fn test_align_withCues_shouldListOverlappingIdsPerWindow() {
    let timeline = Timeline::new(10.0, 4).unwrap();
    let cues = vec![
        common::cue(1, 0.5, 2.0, "first"),
        common::cue(2, 2.0, 3.0, "straddles"),
        common::cue(3, 5.0, 7.5, "exact third"),
        common::cue(4, 12.0, 13.0, "after the audio"),
    ];

    let alignment = timeline.align(&cues);
    let ids: Vec<Vec<usize>> = alignment.iter().map(|a| a.cue_ids.clone()).collect();

    assert_eq!(ids, vec![vec![1, 2], vec![2], vec![3], vec![]]);

    let unplaced = timeline.unplaced_cues(&cues);
    assert_eq!(unplaced.len(), 1);
    assert_eq!(unplaced[0].seq_num, 4);
}

#[test]
fn test_align_withZeroDuration_shouldMatchNothing() {
    let timeline = Timeline::new(0.0, 3).unwrap();
    let cues = vec![common::cue(1, 0.0, 1.0, "a")];

    assert!(!timeline.is_renderable());
    assert!(timeline.align(&cues).iter().all(|a| a.cue_ids.is_empty()));
}

#[test]
fn test_window_at_withTimes_shouldFindIndex() {
    let timeline = Timeline::new(10.0, 4).unwrap();

    assert_eq!(timeline.window_at(0.0), Some(0));
    assert_eq!(timeline.window_at(2.5), Some(1));
    assert_eq!(timeline.window_at(9.99), Some(3));
    assert_eq!(timeline.window_at(10.0), None);
    assert_eq!(timeline.window_at(-0.1), None);
}

#[test]
fn test_window_at_withTimesNearEdges_shouldReturnContainingWindow() {
    let timeline = Timeline::new(21.956, 30).unwrap();

    // time / d rounds up to 10 here, but the time sits below window 10's start
    let time = 7.318666666666666;
    let index = timeline.window_at(time).unwrap();
    let window = timeline.window(index).unwrap();
    assert!(window.start <= time && time < window.end, "{} not in {}", time, window);

    for window in timeline.windows() {
        let below = f64::from_bits(window.start.to_bits().saturating_sub(1));
        for edge_time in [window.start, below, window.end] {
            if let Some(found) = timeline.window_at(edge_time) {
                let containing = timeline.window(found).unwrap();
                assert!(
                    containing.start <= edge_time && edge_time < containing.end,
                    "{} not in {}",
                    edge_time,
                    containing
                );
            }
        }
    }
}

#[test]
fn test_alignment_withSerde_shouldSerializeWindow() {
    let timeline = Timeline::new(4.0, 2).unwrap();
    let alignment = timeline.align(&[common::cue(1, 0.0, 1.0, "a")]);

    let json = serde_json::to_value(&alignment).unwrap();
    assert_eq!(json[0]["window"]["index"], 0);
    assert_eq!(json[0]["window"]["end"], 2.0);
    assert_eq!(json[0]["cue_ids"][0], 1);
    assert_eq!(json[1]["cue_ids"].as_array().map(|a| a.len()), Some(0));
}
