use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the project configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Project settings passed through to the renderer
    #[serde(default)]
    pub project: ProjectConfig,

    /// Subtitle parsing settings
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// Render service settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Output video resolution
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoResolution {
    // @resolution: 720p HD
    #[serde(rename = "1280x720")]
    Hd720p,
    // @resolution: 1080p Full HD
    #[default]
    #[serde(rename = "1920x1080")]
    Fhd1080p,
}

impl VideoResolution {
    pub fn width(&self) -> u32 {
        match self {
            Self::Hd720p => 1280,
            Self::Fhd1080p => 1920,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Hd720p => 720,
            Self::Fhd1080p => 1080,
        }
    }

    // @returns: Human readable label
    pub fn display_name(&self) -> &str {
        match self {
            Self::Hd720p => "720p HD (1280x720)",
            Self::Fhd1080p => "1080p Full HD (1920x1080)",
        }
    }
}

impl std::fmt::Display for VideoResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width(), self.height())
    }
}

impl std::str::FromStr for VideoResolution {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "1280x720" | "720p" => Ok(Self::Hd720p),
            "1920x1080" | "1080p" => Ok(Self::Fhd1080p),
            _ => Err(anyhow!("Invalid resolution: {}", s)),
        }
    }
}

/// Per-image animation style
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnimationStyle {
    #[default]
    Fade,
    SlideLeft,
    SlideRight,
    ZoomIn,
    ZoomOut,
    None,
}

impl AnimationStyle {
    // @returns: Human readable label
    pub fn display_name(&self) -> &str {
        match self {
            Self::Fade => "Simple Fade",
            Self::SlideLeft => "Slide Left",
            Self::SlideRight => "Slide Right",
            Self::ZoomIn => "Ken Burns (Zoom In)",
            Self::ZoomOut => "Ken Burns (Zoom Out)",
            Self::None => "None (Static)",
        }
    }

    // @returns: Snake case identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::SlideLeft => "slide_left",
            Self::SlideRight => "slide_right",
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for AnimationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AnimationStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "fade" => Ok(Self::Fade),
            "slide_left" => Ok(Self::SlideLeft),
            "slide_right" => Ok(Self::SlideRight),
            "zoom_in" => Ok(Self::ZoomIn),
            "zoom_out" => Ok(Self::ZoomOut),
            "none" => Ok(Self::None),
            _ => Err(anyhow!("Invalid animation style: {}", s)),
        }
    }
}

/// Settings the renderer consumes as opaque parameters
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    /// Output resolution
    #[serde(default)]
    pub resolution: VideoResolution,

    /// Animation applied to every image
    #[serde(default)]
    pub animation: AnimationStyle,

    /// Shuffle image order before rendering
    #[serde(default)]
    pub randomize_order: bool,
}

/// How malformed subtitle blocks are handled
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Drop malformed blocks silently and keep degenerate timecodes
    #[default]
    Lenient,
    /// Drop malformed blocks and cues with unusable timecodes, reporting each one
    Strict,
}

/// Configuration for subtitle processing
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SubtitleConfig {
    /// Parser mode
    #[serde(default)]
    pub parse_mode: ParseMode,

    /// Whether to sort cues by start time after parsing
    #[serde(default)]
    pub sort_by_start: bool,
}

/// Render service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// Number of progress batches the simulated engine reports
    #[serde(default = "default_simulated_steps")]
    pub simulated_steps: u32,

    /// Delay between progress batches in milliseconds
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,

    /// Extension of the written output file
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            simulated_steps: default_simulated_steps(),
            step_delay_ms: default_step_delay_ms(),
            output_extension: default_output_extension(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_simulated_steps() -> u32 {
    10
}

fn default_step_delay_ms() -> u64 {
    300 // 300ms per simulated frame batch
}

fn default_output_extension() -> String {
    "mp4".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.render.simulated_steps == 0 {
            return Err(anyhow!("render.simulated_steps must be at least 1"));
        }

        if self.render.output_extension.trim().is_empty() {
            return Err(anyhow!("render.output_extension must not be empty"));
        }

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| anyhow!("Failed to open config file {:?}: {}", path, e))?;
        let reader = std::io::BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e))?;
        Ok(())
    }
}
