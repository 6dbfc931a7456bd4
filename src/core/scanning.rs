//! Job folder scanning
//!
//! Only the immediate files of a job folder are considered; the downloader
//! never creates subdirectories.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::audio::{is_audio_file, is_canonical_container};

fn list_files_matching(path: &Path, keep: fn(&Path) -> bool) -> Result<Vec<PathBuf>, String> {
    if !path.is_dir() {
        return Err(format!("Path is not a directory: {}", path.display()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        if entry.file_type().is_file() && keep(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// All recognized audio files in a folder, in lexicographic order
pub fn list_audio_files(path: &Path) -> Result<Vec<PathBuf>, String> {
    list_files_matching(path, is_audio_file)
}

/// All canonical (WAV) files in a folder, in lexicographic order
pub fn list_canonical_files(path: &Path) -> Result<Vec<PathBuf>, String> {
    list_files_matching(path, is_canonical_container)
}

/// Format duration as "Xm Ys"
pub fn format_duration(seconds: f64) -> String {
    let total_secs = seconds.round() as u64;
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{}m {}s", mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::touch_files;
    use tempfile::TempDir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0m 0s");
        assert_eq!(format_duration(90.0), "1m 30s");
        assert_eq!(format_duration(4800.4), "80m 0s");
    }

    #[test]
    fn test_list_nonexistent_directory() {
        assert!(list_audio_files(Path::new("/nonexistent/path")).is_err());
    }

    #[test]
    fn test_list_audio_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        touch_files(
            dir.path(),
            &["02 B - Two.mp3", "01 A - One.flac", "notes.txt", "burn_plan.cue", "03 C - Three.WAV"],
        );

        let files = list_audio_files(dir.path()).unwrap();
        assert_eq!(
            names(&files),
            vec!["01 A - One.flac", "02 B - Two.mp3", "03 C - Three.WAV"]
        );
    }

    #[test]
    fn test_list_ignores_subdirectories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("nested.wav")).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        touch_files(&dir.path().join("sub"), &["deep.wav"]);
        touch_files(dir.path(), &["top.wav"]);

        let files = list_canonical_files(dir.path()).unwrap();
        assert_eq!(names(&files), vec!["top.wav"]);
    }

    #[test]
    fn test_list_canonical_files_only_wav() {
        let dir = TempDir::new().unwrap();
        touch_files(dir.path(), &["a.mp3", "b.wav", "c.opus"]);

        let files = list_canonical_files(dir.path()).unwrap();
        assert_eq!(names(&files), vec!["b.wav"]);
    }
}
