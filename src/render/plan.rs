use std::path::PathBuf;

use crate::app_config::{AnimationStyle, ProjectConfig, VideoResolution};
use crate::errors::RenderError;
use crate::subtitle_processor::SubtitleEntry;
use crate::timeline::{ImageWindow, Timeline};

/// Everything needed to render one slideshow
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Images in display order
    pub images: Vec<PathBuf>,
    /// Audio track
    pub audio: Option<PathBuf>,
    /// Parsed cues, possibly empty
    pub subtitles: Vec<SubtitleEntry>,
    /// Opaque project settings
    pub project: ProjectConfig,
    /// Audio length in seconds
    pub audio_duration: f64,
}

/// One image and the part of the timeline it covers
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSegment {
    pub image: PathBuf,
    pub window: ImageWindow,
    /// `seq_num` of the cues shown over this image
    pub cue_ids: Vec<usize>,
}

/// Engine-facing description of a job
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub timeline: Timeline,
    pub segments: Vec<RenderSegment>,
    pub subtitles: Vec<SubtitleEntry>,
    pub audio: PathBuf,
    pub resolution: VideoResolution,
    pub animation: AnimationStyle,
}

impl RenderPlan {
    /// Derive the timeline and per-image segments for `job`
    pub fn build(job: &RenderJob) -> Result<Self, RenderError> {
        if job.images.is_empty() {
            return Err(RenderError::NoImages);
        }
        let audio = job.audio.clone().ok_or(RenderError::NoAudio)?;

        let timeline = Timeline::new(job.audio_duration, job.images.len())?;
        let segments = timeline
            .align(&job.subtitles)
            .into_iter()
            .zip(&job.images)
            .map(|(alignment, image)| RenderSegment {
                image: image.clone(),
                window: alignment.window,
                cue_ids: alignment.cue_ids,
            })
            .collect();

        Ok(Self {
            timeline,
            segments,
            subtitles: job.subtitles.clone(),
            audio,
            resolution: job.project.resolution,
            animation: job.project.animation,
        })
    }

    pub fn image_count(&self) -> usize {
        self.segments.len()
    }

    /// Cues referenced by `segment`
    pub fn cues_for<'a>(&'a self, segment: &'a RenderSegment) -> impl Iterator<Item = &'a SubtitleEntry> + 'a {
        self.subtitles
            .iter()
            .filter(move |entry| segment.cue_ids.contains(&entry.seq_num))
    }
}
