//! Acquisition verification
//!
//! Reconciles the expected manifest against the files the downloader left on
//! disk. Matching is by name: a manifest entry is a candidate for a file when
//! both its artist and title keys occur inside the file's stem key. A candidate
//! then has to agree on duration within the tolerance.
//!
//! Files with no candidate at all are accepted without a warning, while files
//! whose candidates all miss the tolerance are reported as mismatches. The two
//! paths stay distinct; the tests pin each one.

use std::path::{Path, PathBuf};

use super::manifest::TrackRecord;
use crate::audio::{is_audio_file, match_key};

/// Default allowed difference between expected and measured duration
pub const DEFAULT_TOLERANCE_SECS: f64 = 10.0;

/// A file whose name matched a manifest entry but whose length did not
#[derive(Debug, Clone, PartialEq)]
pub struct DurationMismatch {
    pub file: PathBuf,
    pub expected_duration: f64,
    pub actual_duration: f64,
}

/// Outcome of one verification pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationResult {
    /// Files whose name and duration both matched an entry
    pub matched_count: usize,
    pub expected_count: usize,
    /// Supported audio files present
    pub acquired_count: usize,
    pub mismatches: Vec<DurationMismatch>,
    /// Files with no usable name candidate; accepted silently
    pub unmatched: Vec<PathBuf>,
}

impl VerificationResult {
    /// Fewer files on disk than the manifest lists
    pub fn is_undercount(&self) -> bool {
        self.acquired_count < self.expected_count
    }
}

/// How a single file relates to the manifest
#[derive(Debug, Clone, PartialEq)]
pub enum FileMatch {
    /// A candidate's duration is within tolerance
    Matched,
    /// Candidates existed but none was within tolerance
    Mismatch { expected_duration: f64 },
    /// No candidate, or only candidates without a usable expected duration
    Unmatched,
}

/// Whether `record` is a name candidate for a file with key `file_key`
pub fn is_candidate(file_key: &str, record: &TrackRecord) -> bool {
    file_key.contains(&match_key(&record.artist)) && file_key.contains(&match_key(&record.title))
}

/// Match one file stem and its measured duration against the manifest
///
/// Scans entries in manifest order and stops at the first candidate within
/// tolerance. When none passes, the expected duration of the last failing
/// candidate is the one reported, and only if it is positive.
pub fn match_file(stem: &str, actual: f64, expected: &[TrackRecord], tolerance: f64) -> FileMatch {
    let file_key = match_key(stem);
    let mut candidate_duration = 0.0;

    for record in expected {
        if is_candidate(&file_key, record) {
            if (actual - record.duration_seconds).abs() < tolerance {
                return FileMatch::Matched;
            }
            candidate_duration = record.duration_seconds;
        }
    }

    if candidate_duration > 0.0 {
        FileMatch::Mismatch {
            expected_duration: candidate_duration,
        }
    } else {
        FileMatch::Unmatched
    }
}

/// Verify acquired files against the manifest
///
/// When the supported file count is below the manifest length only the counts
/// are filled in; the caller decides whether to retry. Otherwise every file is
/// measured with `measure` and cross-checked. Files that cannot be measured are
/// skipped. Never touches the files themselves.
pub fn verify(
    expected: &[TrackRecord],
    acquired_files: &[PathBuf],
    tolerance: f64,
    measure: impl Fn(&Path) -> Result<f64, String>,
) -> VerificationResult {
    let supported: Vec<&PathBuf> = acquired_files.iter().filter(|f| is_audio_file(f)).collect();

    let mut result = VerificationResult {
        expected_count: expected.len(),
        acquired_count: supported.len(),
        ..Default::default()
    };

    if result.is_undercount() {
        return result;
    }

    for file in supported {
        let actual = match measure(file.as_path()) {
            Ok(duration) => duration,
            Err(e) => {
                log::debug!("Skipping duration check for {}: {}", file.display(), e);
                continue;
            }
        };

        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        match match_file(&stem, actual, expected, tolerance) {
            FileMatch::Matched => result.matched_count += 1,
            FileMatch::Mismatch { expected_duration } => {
                let name = file.file_name().unwrap_or_default().to_string_lossy();
                log::warn!("Duration mismatch for '{}'", name);
                log::warn!(
                    "    Expected: {}s, Actual: {}s",
                    expected_duration as i64,
                    actual as i64
                );
                result.mismatches.push(DurationMismatch {
                    file: file.clone(),
                    expected_duration,
                    actual_duration: actual,
                });
            }
            FileMatch::Unmatched => {
                log::debug!("No manifest entry matches {}", file.display());
                result.unmatched.push(file.clone());
            }
        }
    }

    result
}
