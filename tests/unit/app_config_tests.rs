/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::str::FromStr;
use slidereel::app_config::{AnimationStyle, Config, LogLevel, ParseMode, VideoResolution};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.project.resolution, VideoResolution::Fhd1080p);
    assert_eq!(config.project.animation, AnimationStyle::Fade);
    assert!(!config.project.randomize_order);
    assert_eq!(config.subtitles.parse_mode, ParseMode::Lenient);
    assert!(!config.subtitles.sort_by_start);
    assert_eq!(config.render.simulated_steps, 10);
    assert_eq!(config.render.step_delay_ms, 300);
    assert_eq!(config.render.output_extension, "mp4");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that invalid render settings are rejected
#[test]
fn test_validate_withInvalidRenderSettings_shouldFail() {
    let mut config = Config::default();
    config.render.simulated_steps = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.render.output_extension = "  ".to_string();
    assert!(config.validate().is_err());
}

/// Test saving and loading a config file
#[test]
fn test_save_and_from_file_withCustomValues_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("slidereel.json");

    let mut config = Config::default();
    config.project.resolution = VideoResolution::Hd720p;
    config.project.animation = AnimationStyle::ZoomIn;
    config.subtitles.parse_mode = ParseMode::Strict;
    config.render.step_delay_ms = 5;
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.project, config.project);
    assert_eq!(loaded.subtitles.parse_mode, ParseMode::Strict);
    assert_eq!(loaded.render.step_delay_ms, 5);
    Ok(())
}

/// Test that a partial file falls back to defaults for missing keys
#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "partial.json",
        r#"{"project": {"animation": "slide_left"}, "log_level": "debug"}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.project.animation, AnimationStyle::SlideLeft);
    assert_eq!(config.project.resolution, VideoResolution::Fhd1080p);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.render.simulated_steps, 10);
    Ok(())
}

/// Test that malformed files are reported
#[test]
fn test_from_file_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());
    Ok(())
}

/// Test resolution parsing and display
#[test]
fn test_video_resolution_withStrings_shouldParseAndDisplay() {
    assert_eq!(VideoResolution::from_str("720p").unwrap(), VideoResolution::Hd720p);
    assert_eq!(VideoResolution::from_str("1920x1080").unwrap(), VideoResolution::Fhd1080p);
    assert!(VideoResolution::from_str("4k").is_err());

    assert_eq!(VideoResolution::Hd720p.to_string(), "1280x720");
    assert_eq!(VideoResolution::Fhd1080p.width(), 1920);
    assert_eq!(VideoResolution::Fhd1080p.height(), 1080);
}

/// Test animation style parsing and labels
#[test]
fn test_animation_style_withStrings_shouldParseAndLabel() {
    assert_eq!(AnimationStyle::from_str("zoom-in").unwrap(), AnimationStyle::ZoomIn);
    assert_eq!(AnimationStyle::from_str("SLIDE_RIGHT").unwrap(), AnimationStyle::SlideRight);
    assert!(AnimationStyle::from_str("spin").is_err());

    assert_eq!(AnimationStyle::ZoomIn.display_name(), "Ken Burns (Zoom In)");
    assert_eq!(AnimationStyle::None.to_string(), "none");
}

/// Test log level mapping
#[test]
fn test_log_level_toLevelFilter_shouldMap() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
