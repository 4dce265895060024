use std::cmp::Ordering;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::{debug, warn};
use crate::app_config::{ParseMode, SubtitleConfig};
use crate::errors::SubtitleError;

// @module: Subtitle parsing and manipulation

// @const: Separator between the two halves of a timecode line
const TIMECODE_SEPARATOR: &str = " --> ";

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Dense 1-based parse order index
    pub seq_num: usize,

    // @field: Start time in seconds
    pub start_secs: f64,

    // @field: End time in seconds
    pub end_secs: f64,

    // @field: Cue body, lines joined with '\n'
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_secs: f64, end_secs: f64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_secs,
            end_secs,
            text,
        }
    }

    /// Whether both timecodes are usable numbers
    pub fn has_finite_times(&self) -> bool {
        self.start_secs.is_finite() && self.end_secs.is_finite()
    }

    /// Duration in seconds, negative when the range is reversed
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Short single-line label used in timeline previews
    pub fn preview(&self, max_chars: usize) -> String {
        let head: String = self
            .text
            .chars()
            .take(max_chars)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        format!("{}...", head)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_secs)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_secs)
    }

    /// Format a time in seconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(secs: f64) -> String {
        if !secs.is_finite() || secs < 0.0 {
            return "--:--:--,---".to_string();
        }

        let ms = (secs * 1000.0).round() as u64;
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Parse one half of a timecode line (`HH:MM:SS,mmm`) into seconds.
///
/// Fewer than three colon-delimited fields yields `0.0`. A field without a
/// leading integer yields NaN, which propagates into the result.
pub fn parse_srt_time(timestamp: &str) -> f64 {
    if timestamp.is_empty() {
        return 0.0;
    }

    let parts: Vec<&str> = timestamp.split(':').collect();
    if parts.len() < 3 {
        return 0.0;
    }

    let hours = parse_leading_int(parts[0]);
    let minutes = parse_leading_int(parts[1]);

    let mut seconds_parts = parts[2].split(',');
    let seconds = parse_leading_int(seconds_parts.next().unwrap_or_default());
    let millis = match seconds_parts.next() {
        Some(field) if !field.is_empty() => parse_leading_int(field),
        _ => 0.0,
    };

    hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0
}

/// Read the leading base-10 integer of a field, ignoring trailing garbage.
fn parse_leading_int(field: &str) -> f64 {
    let trimmed = field.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return f64::NAN;
    }

    digits[..end]
        .parse::<f64>()
        .map(|value| sign * value)
        .unwrap_or(f64::NAN)
}

/// Reason a block was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// Fewer than three non-blank lines
    TooFewLines { found: usize },
    /// The timecode line does not contain exactly one ` --> `
    MissingSeparator,
    /// A timecode half did not parse to a number
    InvalidTimecode { raw: String },
    /// End time precedes start time
    ReversedRange { start_secs: f64, end_secs: f64 },
}

/// A line-numbered problem found by the strict parser
#[derive(Debug, Clone, PartialEq)]
pub struct ParseDiagnostic {
    /// 1-based line number in the normalized input
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::TooFewLines { found } => {
                write!(f, "line {}: block has {} line(s), expected at least 3", self.line, found)
            }
            DiagnosticKind::MissingSeparator => {
                write!(f, "line {}: timecode line must contain exactly one '-->'", self.line)
            }
            DiagnosticKind::InvalidTimecode { raw } => {
                write!(f, "line {}: unparseable timecode '{}'", self.line, raw)
            }
            DiagnosticKind::ReversedRange { start_secs, end_secs } => {
                write!(
                    f,
                    "line {}: end time {:.3}s precedes start time {:.3}s",
                    self.line, end_secs, start_secs
                )
            }
        }
    }
}

/// Parsed cues plus whatever the strict parser had to say about the rest
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub entries: Vec<SubtitleEntry>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Subtitle-exchange (SRT) parser
#[derive(Debug, Clone, Copy, Default)]
pub struct SrtParser {
    mode: ParseMode,
}

impl SrtParser {
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Parse SRT text into cues in document order.
    ///
    /// Blocks are separated by an empty line. A block needs three non-blank
    /// lines: an index (ignored), a timecode line and one or more text lines.
    /// Lenient mode drops bad blocks silently and keeps NaN or reversed
    /// timecodes; strict mode also drops those cues and records a diagnostic
    /// for every dropped block.
    pub fn parse(&self, content: &str) -> ParseOutcome {
        let strict = self.mode == ParseMode::Strict;
        let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

        let mut outcome = ParseOutcome::default();
        let mut block_line = 1;

        for block in normalized.split("\n\n") {
            let first_line = block_line;
            block_line += block.split('\n').count() + 1;

            let lines: Vec<(usize, &str)> = block
                .split('\n')
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(offset, line)| (first_line + offset, line))
                .collect();

            if lines.is_empty() {
                continue;
            }

            if lines.len() < 3 {
                debug!("Skipping block at line {}: only {} line(s)", lines[0].0, lines.len());
                if strict {
                    outcome.diagnostics.push(ParseDiagnostic {
                        line: lines[0].0,
                        kind: DiagnosticKind::TooFewLines { found: lines.len() },
                    });
                }
                continue;
            }

            let (timecode_line, timecode) = lines[1];
            let halves: Vec<&str> = timecode.split(TIMECODE_SEPARATOR).collect();
            if halves.len() != 2 {
                debug!("Skipping block at line {}: malformed timecode line", timecode_line);
                if strict {
                    outcome.diagnostics.push(ParseDiagnostic {
                        line: timecode_line,
                        kind: DiagnosticKind::MissingSeparator,
                    });
                }
                continue;
            }

            let start_secs = parse_srt_time(halves[0]);
            let end_secs = parse_srt_time(halves[1]);

            if strict {
                if let Some(raw) = [(start_secs, halves[0]), (end_secs, halves[1])]
                    .iter()
                    .find(|(secs, _)| secs.is_nan())
                    .map(|(_, raw)| raw.to_string())
                {
                    outcome.diagnostics.push(ParseDiagnostic {
                        line: timecode_line,
                        kind: DiagnosticKind::InvalidTimecode { raw },
                    });
                    continue;
                }

                if end_secs < start_secs {
                    outcome.diagnostics.push(ParseDiagnostic {
                        line: timecode_line,
                        kind: DiagnosticKind::ReversedRange { start_secs, end_secs },
                    });
                    continue;
                }
            }

            let text = lines[2..]
                .iter()
                .map(|(_, line)| *line)
                .collect::<Vec<_>>()
                .join("\n");

            let seq_num = outcome.entries.len() + 1;
            outcome
                .entries
                .push(SubtitleEntry::new(seq_num, start_secs, end_secs, text));
        }

        if !outcome.diagnostics.is_empty() {
            warn!("Dropped {} malformed subtitle block(s)", outcome.diagnostics.len());
        }

        outcome
    }
}

/// Collection of subtitle entries with metadata
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,

    /// Problems reported by a strict parse
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl SubtitleCollection {
    /// Create an empty subtitle collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Parse SRT format string into subtitle entries, dropping malformed blocks
    pub fn parse_srt_string(content: &str) -> Vec<SubtitleEntry> {
        SrtParser::new(ParseMode::Lenient).parse(content).entries
    }

    /// Build a collection from in-memory SRT text
    pub fn from_string(source_file: PathBuf, content: &str, config: &SubtitleConfig) -> Self {
        let outcome = SrtParser::new(config.parse_mode).parse(content);
        let mut collection = SubtitleCollection {
            source_file,
            entries: outcome.entries,
            diagnostics: outcome.diagnostics,
        };

        if config.sort_by_start {
            collection.sort_by_start();
        }

        collection
    }

    /// Read and parse an SRT file
    pub fn from_file<P: AsRef<Path>>(path: P, config: &SubtitleConfig) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubtitleError::Io(format!("{}: {}", path.display(), e)))?;

        let collection = Self::from_string(path.to_path_buf(), &content, config);
        debug!(
            "Parsed {} cue(s) from {}",
            collection.entries.len(),
            path.display()
        );

        Ok(collection)
    }

    /// Fail when the strict parser reported anything
    pub fn ensure_clean(&self) -> Result<(), SubtitleError> {
        match self.diagnostics.first() {
            None => Ok(()),
            Some(first) => Err(SubtitleError::Strict {
                count: self.diagnostics.len(),
                first: first.to_string(),
            }),
        }
    }

    /// Stable sort by start time. NaN start times go last and sequence
    /// numbers are left untouched.
    pub fn sort_by_start(&mut self) {
        self.entries.sort_by(|a, b| {
            match (a.start_secs.is_nan(), b.start_secs.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => a.start_secs.total_cmp(&b.start_secs),
            }
        });
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        if !self.diagnostics.is_empty() {
            writeln!(f, "Diagnostics: {}", self.diagnostics.len())?;
        }
        Ok(())
    }
}
