//! Folder normalization to Red Book WAV
//!
//! Every recognized audio file in a job folder ends up as a 44.1 kHz / 16-bit /
//! stereo WAV with an ASCII-only name. Files that already qualify are at most
//! renamed, so running the normalizer twice does nothing the second time.

use std::fs;
use std::path::{Path, PathBuf};

use super::Transcoder;
use crate::audio::{CANONICAL_EXTENSION, is_canonical_container, probe_pcm_format, sanitize_stem};
use crate::core::list_audio_files;

/// Stem used when sanitizing leaves nothing behind
const FALLBACK_STEM: &str = "track";

/// What a normalization pass did
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    /// Canonical files present after the pass, in scan order
    pub tracks: Vec<PathBuf>,
    pub renamed: usize,
    pub converted: usize,
    /// Source files left in place because conversion failed
    pub failed: Vec<(PathBuf, String)>,
}

fn safe_stem_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let safe = sanitize_stem(&stem);
    if safe.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        safe
    }
}

/// First free `<stem>.wav`, then `<stem> (2).wav`, `<stem> (3).wav`, ...
fn unique_target(folder: &Path, stem: &str) -> PathBuf {
    let first = folder.join(format!("{}.{}", stem, CANONICAL_EXTENSION));
    if !first.exists() {
        return first;
    }
    (2..)
        .map(|n| folder.join(format!("{} ({}).{}", stem, n, CANONICAL_EXTENSION)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

fn is_red_book(path: &Path) -> bool {
    match probe_pcm_format(path) {
        Ok(format) => format.is_red_book(),
        Err(e) => {
            log::debug!("Could not probe {}: {}", path.display(), e);
            false
        }
    }
}

/// Rename a Red Book WAV to its sanitized name if that differs
fn sanitize_in_place(path: &Path, report: &mut NormalizeReport) -> Result<PathBuf, String> {
    let folder = path.parent().unwrap_or(Path::new("."));
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let safe = safe_stem_for(path);

    if safe == stem {
        return Ok(path.to_path_buf());
    }

    let target = unique_target(folder, &safe);
    fs::rename(path, &target).map_err(|e| format!("Failed to rename: {}", e))?;
    log::info!(
        "  Renamed: {} -> {}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        target.file_name().unwrap_or_default().to_string_lossy()
    );
    report.renamed += 1;
    Ok(target)
}

/// Re-encode a WAV that is not Red Book, replacing it under its sanitized name
fn reencode_in_place(
    path: &Path,
    transcoder: &dyn Transcoder,
    report: &mut NormalizeReport,
) -> Result<PathBuf, String> {
    let folder = path.parent().unwrap_or(Path::new("."));
    let safe = safe_stem_for(path);
    let scratch = folder.join(format!(".{}.normalizing.tmp", uuid::Uuid::new_v4()));

    if let Err(e) = transcoder.to_red_book(path, &scratch) {
        let _ = fs::remove_file(&scratch);
        return Err(e);
    }

    fs::remove_file(path).map_err(|e| format!("Failed to remove original: {}", e))?;
    let target = unique_target(folder, &safe);
    fs::rename(&scratch, &target).map_err(|e| format!("Failed to move converted file: {}", e))?;

    log::info!(
        "  Re-encoded: {} -> {}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        target.file_name().unwrap_or_default().to_string_lossy()
    );
    report.converted += 1;
    Ok(target)
}

/// Convert a non-WAV source and delete it
fn convert_and_replace(
    path: &Path,
    transcoder: &dyn Transcoder,
    report: &mut NormalizeReport,
) -> Result<PathBuf, String> {
    let folder = path.parent().unwrap_or(Path::new("."));
    let target = unique_target(folder, &safe_stem_for(path));

    if let Err(e) = transcoder.to_red_book(path, &target) {
        let _ = fs::remove_file(&target);
        return Err(e);
    }

    if let Err(e) = fs::remove_file(path) {
        log::warn!("Converted but could not delete {}: {}", path.display(), e);
    }

    log::info!(
        "  Converted: {} -> {}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        target.file_name().unwrap_or_default().to_string_lossy()
    );
    report.converted += 1;
    Ok(target)
}

/// Normalize every recognized audio file directly inside `folder`
///
/// Files are handled in lexicographic order. A failure on one file is logged
/// and recorded in the report; the rest of the folder is still processed.
pub fn normalize(folder: &Path, transcoder: &dyn Transcoder) -> Result<NormalizeReport, String> {
    let mut report = NormalizeReport::default();

    for path in list_audio_files(folder)? {
        let outcome = if is_canonical_container(&path) && is_red_book(&path) {
            sanitize_in_place(&path, &mut report)
        } else if is_canonical_container(&path) {
            reencode_in_place(&path, transcoder, &mut report)
        } else {
            convert_and_replace(&path, transcoder, &mut report)
        };

        match outcome {
            Ok(track) => report.tracks.push(track),
            Err(e) => {
                log::error!(
                    "  Failed: {} ({})",
                    path.file_name().unwrap_or_default().to_string_lossy(),
                    e
                );
                report.failed.push((path, e));
            }
        }
    }

    Ok(report)
}
