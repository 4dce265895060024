use anyhow::{Result, Context};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use once_cell::sync::Lazy;
use regex::Regex;

// @module: File and directory utilities

// @const: Extensions accepted as still images
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "tif", "avif",
];

// @const: Extensions accepted as audio tracks
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "aac", "opus"];

// @const: Bytes read when sniffing a file without a known extension
const SNIFF_BYTES: u64 = 4096;

// @const: Leading cue of an SRT file (index line followed by a timecode line)
static SRT_CUE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+\s*\r?\n\s*\d+:\d+:\d+(,\d+)?\s+-->\s+\d+:\d+:\d+").unwrap()
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for the rendered video
    // @params: reference_file, output_dir, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        reference_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let reference_file = reference_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = reference_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        if output_filename.is_empty() {
            output_filename.push_str("slideshow");
        }
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        output_dir.join(output_filename)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write bytes to a file, creating parent directories
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Classify a file by its extension alone
    pub fn file_type_from_extension<P: AsRef<Path>>(path: P) -> FileType {
        let Some(ext) = path.as_ref().extension() else {
            return FileType::Unknown;
        };
        let ext_str = ext.to_string_lossy().to_lowercase();

        if ext_str == "srt" {
            FileType::Subtitle
        } else if IMAGE_EXTENSIONS.contains(&ext_str.as_str()) {
            FileType::Image
        } else if AUDIO_EXTENSIONS.contains(&ext_str.as_str()) {
            FileType::Audio
        } else {
            FileType::Unknown
        }
    }

    /// Classify a file as image, audio or subtitle.
    ///
    /// The extension decides first; files without a known extension are
    /// checked for a leading SRT cue in their first few kilobytes.
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let path = path.as_ref();

        match Self::file_type_from_extension(path) {
            FileType::Unknown => {}
            known => return known,
        }

        match Self::read_prefix(path, SNIFF_BYTES) {
            Ok(head) if head.contains("-->") && SRT_CUE_REGEX.is_match(&head) => FileType::Subtitle,
            _ => FileType::Unknown,
        }
    }

    // @reads: At most `limit` bytes, lossily decoded
    fn read_prefix(path: &Path, limit: u64) -> Result<String> {
        let mut buffer = Vec::new();
        fs::File::open(path)
            .with_context(|| format!("Failed to open file: {:?}", path))?
            .take(limit)
            .read_to_end(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Enum representing different file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Still image
    Image,
    /// Audio track
    Audio,
    /// Subtitle file (SRT)
    Subtitle,
    /// Unknown file type
    Unknown,
}
