/*!
 * # slidereel - slideshow videos from stills, audio and subtitles
 *
 * A Rust library for assembling a slideshow-style video from a set of still
 * images, one audio track and an optional SRT subtitle file.
 *
 * ## Features
 *
 * - Lenient and strict SRT parsing with line-numbered diagnostics
 * - Uniform division of the audio length across the ordered images
 * - Alignment of subtitle cues with each image's display window
 * - Timecode validation (NaN fields, reversed ranges, overlaps, ordering)
 * - Background render jobs with progress events and cancellation
 * - Configurable resolution, animation style and image ordering
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle_processor`: SRT parsing and subtitle collections
 * - `timeline`: Per-image windows and the cue overlap predicate
 * - `validation`: Post-parse timecode checks
 * - `media`: Media intake and audio duration probing
 * - `render`: Render jobs, engines and progress reporting
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod media;
pub mod render;
pub mod subtitle_processor;
pub mod timeline;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::{AnimationStyle, Config, ProjectConfig, VideoResolution};
pub use subtitle_processor::{SrtParser, SubtitleCollection, SubtitleEntry, parse_srt_time};
pub use timeline::{ImageWindow, Timeline, overlaps, per_image_duration, window_of};
pub use render::{RenderService, RenderHandle, ProcessingStatus};
pub use errors::{AppError, MediaError, RenderError, SubtitleError, TimelineError};
