//! Audio conversion module
//!
//! Handles transcoding downloaded audio to Red Book WAV using ffmpeg.

mod ffmpeg;
pub mod normalizer;

pub use normalizer::normalize;

use ffmpeg::convert_file;

use std::path::{Path, PathBuf};

/// Something that can turn any supported input into a Red Book WAV
pub trait Transcoder {
    fn to_red_book(&self, input_path: &Path, output_path: &Path) -> Result<(), String>;
}

/// Transcoder backed by an ffmpeg binary
pub struct FfmpegTranscoder {
    pub ffmpeg_path: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }
}

impl Transcoder for FfmpegTranscoder {
    fn to_red_book(&self, input_path: &Path, output_path: &Path) -> Result<(), String> {
        convert_file(&self.ffmpeg_path, input_path, output_path)
    }
}

/// Stands in when no converter could be found
///
/// Every conversion fails with the lookup error, so only files that actually
/// need transcoding are affected.
pub struct UnavailableTranscoder {
    pub reason: String,
}

impl UnavailableTranscoder {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl Transcoder for UnavailableTranscoder {
    fn to_red_book(&self, _input_path: &Path, _output_path: &Path) -> Result<(), String> {
        Err(self.reason.clone())
    }
}

fn executable_name() -> &'static str {
    if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" }
}

/// Locate the ffmpeg binary
///
/// Uses the configured path when given, otherwise searches PATH.
pub fn get_ffmpeg_path(configured: Option<&Path>) -> Result<PathBuf, String> {
    if let Some(path) = configured {
        if path.is_file() {
            log::debug!("Using configured ffmpeg at {:?}", path);
            return Ok(path.to_path_buf());
        }
        return Err(format!("ffmpeg not found at configured path {:?}", path));
    }

    if let Some(search_path) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&search_path) {
            let candidate = dir.join(executable_name());
            if candidate.is_file() {
                log::debug!("Found ffmpeg on PATH: {:?}", candidate);
                return Ok(candidate);
            }
        }
    }

    Err("ffmpeg binary not found. Install ffmpeg (e.g. `brew install ffmpeg`) or set ffmpeg_path in settings".to_string())
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_configured_path_must_exist() {
        let result = get_ffmpeg_path(Some(Path::new("/nonexistent/ffmpeg")));
        assert!(result.unwrap_err().contains("configured path"));
    }

    #[test]
    fn test_configured_path_is_used() {
        let dir = TempDir::new().unwrap();
        let fake = dir.path().join("my-ffmpeg");
        std::fs::write(&fake, b"").unwrap();

        assert_eq!(get_ffmpeg_path(Some(&fake)).unwrap(), fake);
    }

    #[test]
    fn test_transcoder_reports_spawn_failure() {
        let transcoder = FfmpegTranscoder::new(PathBuf::from("/nonexistent/ffmpeg"));
        let result = transcoder.to_red_book(Path::new("in.mp3"), Path::new("out.wav"));
        assert!(result.is_err());
    }
}
