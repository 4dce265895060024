// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use slidereel::app_config::{self, AnimationStyle, Config, ParseMode, VideoResolution};
use slidereel::app_controller::{Controller, RunRequest, TimelineReport};

/// CLI Wrapper for VideoResolution to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliResolution {
    #[value(name = "720p", alias = "1280x720")]
    Hd720p,
    #[value(name = "1080p", alias = "1920x1080")]
    Fhd1080p,
}

impl From<CliResolution> for VideoResolution {
    fn from(cli_resolution: CliResolution) -> Self {
        match cli_resolution {
            CliResolution::Hd720p => VideoResolution::Hd720p,
            CliResolution::Fhd1080p => VideoResolution::Fhd1080p,
        }
    }
}

/// CLI Wrapper for AnimationStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliAnimation {
    Fade,
    SlideLeft,
    SlideRight,
    ZoomIn,
    ZoomOut,
    None,
}

impl From<CliAnimation> for AnimationStyle {
    fn from(cli_animation: CliAnimation) -> Self {
        match cli_animation {
            CliAnimation::Fade => AnimationStyle::Fade,
            CliAnimation::SlideLeft => AnimationStyle::SlideLeft,
            CliAnimation::SlideRight => AnimationStyle::SlideRight,
            CliAnimation::ZoomIn => AnimationStyle::ZoomIn,
            CliAnimation::ZoomOut => AnimationStyle::ZoomOut,
            CliAnimation::None => AnimationStyle::None,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "slidereel.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Report malformed subtitle blocks instead of skipping them silently
    #[arg(long, global = true)]
    strict: bool,

    /// Sort subtitle cues by start time
    #[arg(long, global = true)]
    sort_cues: bool,
}

/// Project intake options
#[derive(Args, Debug, Clone)]
struct ProjectArgs {
    /// Images, one audio file and an optional .srt file (files or directories)
    #[arg(value_name = "INPUT", required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,

    /// Audio length in seconds (skips ffprobe)
    #[arg(short = 'd', long)]
    audio_duration: Option<f64>,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Output resolution
    #[arg(long, value_enum)]
    resolution: Option<CliResolution>,

    /// Animation applied to each image
    #[arg(short, long, value_enum)]
    animation: Option<CliAnimation>,

    /// Shuffle image order
    #[arg(long)]
    randomize: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the slideshow video
    Render {
        #[command(flatten)]
        project: ProjectArgs,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Force overwrite of an existing output file
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Show which subtitle cues land on which image
    Timeline {
        #[command(flatten)]
        project: ProjectArgs,

        /// Print the alignment as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a subtitle file
    Check {
        /// Subtitle file
        #[arg(value_name = "SRT_FILE")]
        subtitle_path: PathBuf,

        /// Audio length in seconds, to flag cues past the end
        #[arg(short = 'd', long)]
        audio_duration: Option<f64>,
    },

    /// Generate shell completions for slidereel
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// slidereel - slideshow videos from stills, audio and subtitles
///
/// Divides the audio evenly across the images and aligns subtitle cues with
/// each image's display window.
#[derive(Parser, Debug)]
#[command(name = "slidereel")]
#[command(version)]
#[command(about = "Assemble slideshow videos from images, audio and subtitles")]
#[command(long_about = "slidereel divides an audio track evenly across a set of images, aligns SRT cues with each image, and hands the result to a render engine.

EXAMPLES:
    slidereel render photos/ song.mp3 lyrics.srt          # Render with default config
    slidereel render -d 12.5 photos/ song.mp3 -o out/     # Use a known audio length
    slidereel render --resolution 720p -a zoom-in photos/ song.mp3
    slidereel timeline -d 12.5 photos/ song.mp3 lyrics.srt
    slidereel check --strict lyrics.srt
    slidereel completions bash > slidereel.bash

CONFIGURATION:
    Configuration is stored in slidereel.json by default. You can specify a
    different file with --config-path. If the file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    common: CommonArgs,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The global max level is adjusted after config loading
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "slidereel", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.common)?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Render { project, output_dir, force_overwrite } => {
            let controller = Controller::with_config(apply_project_args(config, &project))?;
            let request = RunRequest {
                inputs: project.inputs,
                output_dir,
                audio_duration: project.audio_duration,
                recursive: project.recursive,
                force_overwrite,
            };

            if let Some(path) = controller.run(request).await? {
                info!("Success: {:?}", path);
            }
        }
        Commands::Timeline { project, json } => {
            let controller = Controller::with_config(apply_project_args(config, &project))?;
            let request = RunRequest {
                inputs: project.inputs,
                audio_duration: project.audio_duration,
                recursive: project.recursive,
                ..Default::default()
            };

            let prepared = controller.prepare(&request).await?;
            if json {
                if !prepared.timeline.is_renderable() {
                    warn!("No timeline to render");
                }
                println!("{}", serde_json::to_string_pretty(&prepared.alignment())?);
            } else {
                print!("{}", TimelineReport::build(&prepared));
            }
        }
        Commands::Check { subtitle_path, audio_duration } => {
            run_check(Controller::with_config(config)?, &subtitle_path, audio_duration)?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn run_check(controller: Controller, subtitle_path: &Path, audio_duration: Option<f64>) -> Result<()> {
    let (collection, result) = controller.check_subtitles(subtitle_path, audio_duration)?;

    for diagnostic in &collection.diagnostics {
        warn!("{}", diagnostic);
    }
    for entry in result.failed_entries() {
        for issue in &entry.issues {
            warn!("Cue {}: {}", entry.seq_num, issue);
        }
    }

    info!(
        "{} cue(s), {} dropped block(s), {} timecode issue(s)",
        collection.len(),
        collection.diagnostics.len(),
        result.total_issues
    );

    collection.ensure_clean()?;
    if !result.passed {
        error!("Subtitle check failed");
        return Err(anyhow!("{} timecode issue(s) found", result.total_issues));
    }

    Ok(())
}

/// Load the config file (creating a default one if missing) and apply common flags
fn load_config(common: &CommonArgs) -> Result<Config> {
    let config_path = &common.config_path;

    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)
            .context(format!("Failed to load config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    }
    if common.strict {
        config.subtitles.parse_mode = ParseMode::Strict;
    }
    if common.sort_cues {
        config.subtitles.sort_by_start = true;
    }

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

/// Override project settings from the command line
fn apply_project_args(mut config: Config, args: &ProjectArgs) -> Config {
    if let Some(resolution) = &args.resolution {
        config.project.resolution = resolution.clone().into();
    }
    if let Some(animation) = &args.animation {
        config.project.animation = animation.clone().into();
    }
    if args.randomize {
        config.project.randomize_order = true;
    }
    config
}
