use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use crate::app_config::Config;
use crate::errors::MediaError;
use crate::file_utils::FileManager;
use crate::media::{self, ProjectMedia};
use crate::render::{RenderJob, RenderService};
use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};
use crate::timeline::{Timeline, WindowAlignment};
use crate::validation::{TimecodeValidationResult, TimecodeValidator, TimecodeValidatorConfig};

// @module: Application controller for slideshow assembly

// @const: Characters of cue text shown in timeline rows
const CUE_PREVIEW_CHARS: usize = 10;

/// Inputs for one controller run
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Image, audio and subtitle files or directories
    pub inputs: Vec<PathBuf>,
    /// Where the video is written
    pub output_dir: PathBuf,
    /// Skip probing and use this audio length
    pub audio_duration: Option<f64>,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Replace an existing output file
    pub force_overwrite: bool,
}

/// Everything resolved before rendering
#[derive(Debug, Clone)]
pub struct PreparedProject {
    pub media: ProjectMedia,
    pub subtitles: Option<SubtitleCollection>,
    pub audio_duration: f64,
    pub timeline: Timeline,
}

impl PreparedProject {
    pub fn entries(&self) -> &[SubtitleEntry] {
        self.subtitles
            .as_ref()
            .map(|s| s.entries.as_slice())
            .unwrap_or(&[])
    }

    /// Cue ids per image window. Empty when there is no timeline to render.
    pub fn alignment(&self) -> Vec<WindowAlignment> {
        if self.timeline.is_renderable() {
            self.timeline.align(self.entries())
        } else {
            Vec::new()
        }
    }
}

/// One image row of the timeline report
#[derive(Debug, Clone)]
pub struct TimelineRow {
    pub start: f64,
    pub width: f64,
    pub image_name: String,
    pub cue_previews: Vec<String>,
}

/// Text rendering of the cue/image alignment
#[derive(Debug, Clone)]
pub struct TimelineReport {
    pub total_duration: f64,
    pub per_image_duration: f64,
    pub rows: Vec<TimelineRow>,
}

impl TimelineReport {
    pub fn build(project: &PreparedProject) -> Self {
        let timeline = &project.timeline;
        let entries = project.entries();

        let rows = project
            .alignment()
            .into_iter()
            .zip(&project.media.images)
            .map(|(alignment, image)| TimelineRow {
                start: alignment.window.start,
                width: alignment.window.width(),
                image_name: image.name.clone(),
                cue_previews: entries
                    .iter()
                    .filter(|entry| alignment.cue_ids.contains(&entry.seq_num))
                    .map(|entry| entry.preview(CUE_PREVIEW_CHARS))
                    .collect(),
            })
            .collect();

        Self {
            total_duration: timeline.total_duration(),
            per_image_duration: timeline.per_image_duration(),
            rows,
        }
    }
}

impl fmt::Display for TimelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "No timeline to render");
        }

        writeln!(f, "Timeline Analysis (Total: {:.1}s)", self.total_duration)?;
        for row in &self.rows {
            write!(f, "{:>7.1}s  {:<32}", row.start, row.image_name)?;
            if !row.cue_previews.is_empty() {
                write!(f, "  {}", row.cue_previews.join(" | "))?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "Display Time: {:.2}s / image    {} Frames",
            self.per_image_duration,
            self.rows.len()
        )
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Render collaborator
    render_service: RenderService,
}

impl Controller {
    /// Create a controller with default configuration and a fast simulated engine
    pub fn new_for_test() -> Result<Self> {
        let mut config = Config::default();
        config.render.step_delay_ms = 1;
        Self::with_config(config)
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let render_service = RenderService::simulated(&config.render);
        Ok(Self {
            config,
            render_service,
        })
    }

    // @method: Create a controller with a specific render service
    pub fn with_service(config: Config, render_service: RenderService) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            render_service,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gather media, parse subtitles, resolve the audio length and derive the timeline
    pub async fn prepare(&self, request: &RunRequest) -> Result<PreparedProject> {
        let mut media = ProjectMedia::collect(&request.inputs, request.recursive)?;

        if self.config.project.randomize_order {
            debug!("Randomizing image order");
            media.shuffle_images(&mut rand::rng());
        }

        let subtitles = match &media.subtitle {
            Some(file) => {
                let collection = SubtitleCollection::from_file(&file.path, &self.config.subtitles)
                    .with_context(|| format!("Failed to load subtitles: {:?}", file.path))?;
                for diagnostic in &collection.diagnostics {
                    warn!("{}: {}", file.name, diagnostic);
                }
                Some(collection)
            }
            None => None,
        };

        let audio_duration = match request.audio_duration {
            Some(duration) => duration,
            None => {
                let audio = media.audio.as_ref().ok_or(MediaError::NoAudio)?;
                media::probe_audio_duration(&audio.path)
                    .await
                    .with_context(|| format!("Failed to read duration of {:?}", audio.path))?
            }
        };

        let timeline = Timeline::new(audio_duration, media.images.len())
            .context("Cannot build timeline")?;

        Ok(PreparedProject {
            media,
            subtitles,
            audio_duration,
            timeline,
        })
    }

    /// Build the cue/image alignment report
    pub async fn timeline_report(&self, request: &RunRequest) -> Result<TimelineReport> {
        let project = self.prepare(request).await?;
        Ok(TimelineReport::build(&project))
    }

    /// Validate a subtitle file's cues, optionally against an audio length
    pub fn check_subtitles<P: AsRef<Path>>(&self, path: P, total_duration: Option<f64>) -> Result<(SubtitleCollection, TimecodeValidationResult)> {
        let collection = SubtitleCollection::from_file(path.as_ref(), &self.config.subtitles)?;
        let validator = TimecodeValidator::with_config(TimecodeValidatorConfig {
            total_duration,
            ..Default::default()
        });
        let result = validator.validate_collection(&collection.entries);
        Ok((collection, result))
    }

    /// Run the full workflow. Returns the written file, or `None` when an
    /// existing output was left in place.
    pub async fn run(&self, request: RunRequest) -> Result<Option<PathBuf>> {
        let start_time = std::time::Instant::now();
        let project = self.prepare(&request).await?;

        if !project.timeline.is_renderable() {
            return Err(anyhow!("Audio duration is zero, nothing to render"));
        }

        let audio = project.media.audio.as_ref().ok_or(MediaError::NoAudio)?;

        FileManager::ensure_dir(&request.output_dir)?;
        let output_path = FileManager::generate_output_path(
            &audio.path,
            &request.output_dir,
            &self.config.render.output_extension,
        );
        if output_path.exists() && !request.force_overwrite {
            warn!("Skipping render, output already exists (use -f to force overwrite): {:?}", output_path);
            return Ok(None);
        }

        let job = RenderJob {
            images: project.media.images.iter().map(|i| i.path.clone()).collect(),
            audio: Some(audio.path.clone()),
            subtitles: project.entries().to_vec(),
            project: self.config.project.clone(),
            audio_duration: project.audio_duration,
        };

        info!(
            "Rendering {} images at {} ({})",
            job.images.len(),
            self.config.project.resolution,
            self.config.project.animation.display_name()
        );

        let progress_bar = ProgressBar::new(100);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}% {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Initializing engine...");

        let mut handle = self.render_service.start(job);
        let cancel = handle.cancel_token();
        let mut interrupted = false;

        loop {
            tokio::select! {
                event = handle.next_progress() => match event {
                    Some(event) => {
                        progress_bar.set_position(event.percent.round() as u64);
                        progress_bar.set_message(event.message);
                    }
                    None => break,
                },
                _ = tokio::signal::ctrl_c(), if !interrupted => {
                    warn!("Interrupt received, cancelling render");
                    cancel.cancel();
                    interrupted = true;
                }
            }
        }

        let status = handle.status();
        let output = match handle.wait().await {
            Ok(output) => output,
            Err(e) => {
                progress_bar.abandon_with_message(status.message);
                return Err(e).context("Video generation failed");
            }
        };
        progress_bar.finish_with_message(status.message);

        FileManager::write_bytes(&output_path, &output.data)?;
        info!(
            "Wrote {} ({} bytes, {}) in {:.1}s",
            output_path.display(),
            output.data.len(),
            output.mime_type,
            start_time.elapsed().as_secs_f64()
        );

        Ok(Some(output_path))
    }
}
