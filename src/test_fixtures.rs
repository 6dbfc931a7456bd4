//! Test fixtures for pipeline tests
//!
//! Generates small WAV files with hound so that probing, verification and
//! normalization can be exercised without any external tool installed.

#![cfg(test)]

use std::path::{Path, PathBuf};

/// Shape of a generated WAV file (always 16-bit integer PCM)
#[derive(Debug, Clone)]
pub struct WavSpec {
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_secs: f64,
}

impl WavSpec {
    /// A 44.1 kHz stereo file of the given length
    pub fn red_book(duration_secs: f64) -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            duration_secs,
        }
    }
}

/// Write a 440 Hz tone with the given layout and return its path
pub fn write_wav(path: &Path, spec: &WavSpec) -> PathBuf {
    let wav_spec = hound::WavSpec {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, wav_spec).expect("Failed to create WAV");
    let total_frames = (spec.duration_secs * spec.sample_rate as f64) as usize;

    for i in 0..total_frames {
        let t = i as f32 / spec.sample_rate as f32;
        let sample = (0.3 * (2.0 * std::f32::consts::PI * 440.0 * t).sin() * i16::MAX as f32) as i16;
        for _ in 0..spec.channels {
            writer.write_sample(sample).expect("Failed to write sample");
        }
    }

    writer.finalize().expect("Failed to finalize WAV");
    path.to_path_buf()
}

/// Create empty files with the given names inside `dir`
pub fn touch_files(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, b"").expect("Failed to create file");
            path
        })
        .collect()
}

/// Sorted file names in `dir`
pub fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_wav_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = write_wav(&dir.path().join("tone.wav"), &WavSpec::red_book(0.25));
        assert!(path.exists());

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 44_100);
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.duration(), 11_025);
    }

    #[test]
    fn test_touch_and_list() {
        let dir = TempDir::new().unwrap();
        touch_files(dir.path(), &["b.mp3", "a.txt"]);
        assert_eq!(list_names(dir.path()), vec!["a.txt", "b.mp3"]);
    }
}
