use std::path::{Path, PathBuf};
use std::time::Duration;
use log::{debug, warn};
use rand::seq::SliceRandom;
use serde_json::Value;
use tokio::process::Command;
use walkdir::WalkDir;
use crate::errors::MediaError;
use crate::file_utils::{FileManager, FileType};

// @module: Project media intake

/// An input file and its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Path on disk
    pub path: PathBuf,
    /// File name, used for ordering and labels
    pub name: String,
    /// Detected kind
    pub kind: FileType,
}

impl MediaFile {
    pub fn new<P: AsRef<Path>>(path: P, kind: FileType) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Self { path, name, kind }
    }
}

/// Media gathered for one project
#[derive(Debug, Clone, Default)]
pub struct ProjectMedia {
    /// Ordered images
    pub images: Vec<MediaFile>,
    /// The audio track (first one supplied wins)
    pub audio: Option<MediaFile>,
    /// The subtitle file (first one supplied wins)
    pub subtitle: Option<MediaFile>,
}

impl ProjectMedia {
    /// Gather media from files and directories.
    ///
    /// Directories contribute their direct children, or all descendants when
    /// `recursive` is set, and are classified by extension alone. Images end
    /// up sorted by file name. Unknown files found in a directory are skipped;
    /// an unknown file named directly is an error.
    pub fn collect<P: AsRef<Path>>(inputs: &[P], recursive: bool) -> Result<Self, MediaError> {
        let mut media = ProjectMedia::default();

        for input in inputs {
            let input = input.as_ref();
            if !input.exists() {
                return Err(MediaError::NotFound(input.to_path_buf()));
            }

            if input.is_dir() {
                let max_depth = if recursive { usize::MAX } else { 1 };
                let mut children: Vec<PathBuf> = WalkDir::new(input)
                    .max_depth(max_depth)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.into_path())
                    .collect();
                children.sort();

                // Directory children are judged by extension only
                for child in children {
                    media.insert(&child, FileManager::file_type_from_extension(&child));
                }
            } else {
                match FileManager::detect_file_type(input) {
                    FileType::Unknown => {
                        return Err(MediaError::UnsupportedFile(input.to_path_buf()));
                    }
                    kind => media.insert(input, kind),
                }
            }
        }

        media.images.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        debug!(
            "Collected {} image(s), audio: {}, subtitles: {}",
            media.images.len(),
            media.audio.is_some(),
            media.subtitle.is_some()
        );

        Ok(media)
    }

    /// Classify and store one file
    pub fn add(&mut self, path: &Path) {
        self.insert(path, FileManager::detect_file_type(path));
    }

    fn insert(&mut self, path: &Path, kind: FileType) {
        match kind {
            FileType::Image => self.images.push(MediaFile::new(path, FileType::Image)),
            FileType::Audio => {
                if self.audio.is_none() {
                    self.audio = Some(MediaFile::new(path, FileType::Audio));
                } else {
                    warn!("Ignoring extra audio file: {:?}", path);
                }
            }
            FileType::Subtitle => {
                if self.subtitle.is_none() {
                    self.subtitle = Some(MediaFile::new(path, FileType::Subtitle));
                } else {
                    warn!("Ignoring extra subtitle file: {:?}", path);
                }
            }
            FileType::Unknown => debug!("Skipping unsupported file: {:?}", path),
        }
    }

    /// Shuffle the image order
    pub fn shuffle_images<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.images.shuffle(rng);
    }

    /// Remove an image by position
    pub fn remove_image(&mut self, index: usize) -> Option<MediaFile> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }
}

/// Probe the duration of an audio file in seconds with ffprobe
pub async fn probe_audio_duration<P: AsRef<Path>>(audio_path: P) -> Result<f64, MediaError> {
    let audio_path = audio_path.as_ref();
    if !audio_path.exists() {
        return Err(MediaError::NotFound(audio_path.to_path_buf()));
    }

    let ffprobe_future = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(audio_path)
        .output();

    let timeout_duration = Duration::from_secs(30);
    let output = tokio::select! {
        result = ffprobe_future => {
            result.map_err(|e| MediaError::ProbeFailed(format!("failed to execute ffprobe: {}", e)))?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(MediaError::ProbeFailed("ffprobe timed out after 30 seconds".to_string()));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::ProbeFailed(format!("ffprobe failed: {}", stderr.trim())));
    }

    parse_probe_duration(&String::from_utf8_lossy(&output.stdout))
}

/// Extract `format.duration` from ffprobe JSON output
pub fn parse_probe_duration(json: &str) -> Result<f64, MediaError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| MediaError::ProbeFailed(format!("invalid ffprobe JSON: {}", e)))?;

    // ffprobe reports duration as a string
    let duration = value
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|d| match d {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        })
        .ok_or_else(|| MediaError::ProbeFailed("no duration in ffprobe output".to_string()))?;

    if !duration.is_finite() || duration < 0.0 {
        return Err(MediaError::ProbeFailed(format!("invalid duration: {}", duration)));
    }

    Ok(duration)
}
