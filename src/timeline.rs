/*!
 * Timeline allocation for slideshow rendering.
 *
 * The audio track is divided uniformly across the ordered images. Each image
 * owns the half-open window `[index * d, (index + 1) * d)` where
 * `d = total_duration / image_count`. No remainder correction is applied.
 *
 * Cues are associated with a window through [`overlaps`], a strict test on
 * both boundaries: a cue that ends exactly where a window starts, or starts
 * exactly where it ends, is not part of that window. The preview report and
 * the render plan both go through this one predicate.
 */

use std::fmt;

use log::trace;
use serde::Serialize;

use crate::errors::TimelineError;
use crate::subtitle_processor::SubtitleEntry;

/// Display interval of one image
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageWindow {
    /// 0-based position in the image sequence
    pub index: usize,
    /// Start in seconds, inclusive
    pub start: f64,
    /// End in seconds, exclusive
    pub end: f64,
}

impl ImageWindow {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `entry` intersects this window
    pub fn contains_cue(&self, entry: &SubtitleEntry) -> bool {
        overlaps(entry, self)
    }
}

impl fmt::Display for ImageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} [{:.3}s, {:.3}s)", self.index, self.start, self.end)
    }
}

/// Seconds each image is displayed.
///
/// Zero images is rejected rather than divided by. A zero total yields `0.0`,
/// which callers treat as "nothing to render".
pub fn per_image_duration(total_duration: f64, image_count: usize) -> Result<f64, TimelineError> {
    if image_count == 0 {
        return Err(TimelineError::NoImages);
    }

    if !total_duration.is_finite() || total_duration < 0.0 {
        return Err(TimelineError::InvalidDuration(total_duration));
    }

    Ok(total_duration / image_count as f64)
}

/// Window of the image at `index`. Not bounds-checked against any image count.
pub fn window_of(index: usize, per_image_duration: f64) -> ImageWindow {
    ImageWindow {
        index,
        start: index as f64 * per_image_duration,
        end: (index + 1) as f64 * per_image_duration,
    }
}

/// Strict half-open overlap between a cue and a window.
///
/// Any NaN time makes this false for every window.
pub fn overlaps(entry: &SubtitleEntry, window: &ImageWindow) -> bool {
    entry.start_secs < window.end && entry.end_secs > window.start
}

/// Cues associated with one window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowAlignment {
    pub window: ImageWindow,
    /// `seq_num` of every overlapping cue, in cue order
    pub cue_ids: Vec<usize>,
}

/// Uniform partition of an audio duration across a sequence of images
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    total_duration: f64,
    image_count: usize,
    per_image: f64,
}

impl Timeline {
    pub fn new(total_duration: f64, image_count: usize) -> Result<Self, TimelineError> {
        let per_image = per_image_duration(total_duration, image_count)?;
        trace!(
            "Timeline: {} image(s) over {:.3}s, {:.3}s each",
            image_count, total_duration, per_image
        );

        Ok(Self {
            total_duration,
            image_count,
            per_image,
        })
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    pub fn per_image_duration(&self) -> f64 {
        self.per_image
    }

    /// A zero-length timeline has nothing to show
    pub fn is_renderable(&self) -> bool {
        self.per_image > 0.0
    }

    pub fn window(&self, index: usize) -> Option<ImageWindow> {
        (index < self.image_count).then(|| window_of(index, self.per_image))
    }

    pub fn windows(&self) -> impl Iterator<Item = ImageWindow> + '_ {
        (0..self.image_count).map(move |index| window_of(index, self.per_image))
    }

    /// Index of the window that contains `time`, if any.
    ///
    /// Containment is judged against the bounds `window_of` produces, since
    /// `time / d` can round across an edge.
    pub fn window_at(&self, time: f64) -> Option<usize> {
        if !self.is_renderable() || !time.is_finite() || time < 0.0 {
            return None;
        }

        let last = self.image_count - 1;
        let mut index = ((time / self.per_image).floor() as usize).min(last);

        while index > 0 && time < window_of(index, self.per_image).start {
            index -= 1;
        }
        while index < last && time >= window_of(index, self.per_image).end {
            index += 1;
        }

        let window = window_of(index, self.per_image);
        (window.start <= time && time < window.end).then_some(index)
    }

    /// Overlapping cues for every window
    pub fn align(&self, entries: &[SubtitleEntry]) -> Vec<WindowAlignment> {
        self.windows()
            .map(|window| WindowAlignment {
                window,
                cue_ids: entries
                    .iter()
                    .filter(|entry| overlaps(entry, &window))
                    .map(|entry| entry.seq_num)
                    .collect(),
            })
            .collect()
    }

    /// Cues that intersect no window at all
    pub fn unplaced_cues<'a>(&self, entries: &'a [SubtitleEntry]) -> Vec<&'a SubtitleEntry> {
        entries
            .iter()
            .filter(|entry| !self.windows().any(|window| overlaps(entry, &window)))
            .collect()
    }
}
