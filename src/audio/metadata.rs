use std::fs::File;
use std::path::Path;

use lofty::AudioFile;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::{Hint, ProbeResult};

/// Red Book sample rate (Hz)
pub const RED_BOOK_SAMPLE_RATE: u32 = 44_100;
/// Red Book sample width (bits)
pub const RED_BOOK_BITS_PER_SAMPLE: u32 = 16;
/// Red Book channel count
pub const RED_BOOK_CHANNELS: usize = 2;

/// PCM layout of the default track of an audio file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub bits_per_sample: u32,
    pub channels: usize,
}

impl PcmFormat {
    /// 44.1 kHz / 16-bit / stereo
    pub const RED_BOOK: PcmFormat = PcmFormat {
        sample_rate: RED_BOOK_SAMPLE_RATE,
        bits_per_sample: RED_BOOK_BITS_PER_SAMPLE,
        channels: RED_BOOK_CHANNELS,
    };

    pub fn is_red_book(&self) -> bool {
        *self == Self::RED_BOOK
    }
}

fn probe(path: &Path) -> Result<ProbeResult, String> {
    let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension() {
        hint.with_extension(&ext.to_string_lossy());
    }

    symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| format!("Failed to probe audio format: {}", e))
}

/// Read the sample rate, bit depth and channel count of a file's default track
pub fn probe_pcm_format(path: &Path) -> Result<PcmFormat, String> {
    let probed = probe(path)?;
    let track = probed
        .format
        .default_track()
        .ok_or_else(|| "No default track found".to_string())?;
    let params = &track.codec_params;

    Ok(PcmFormat {
        sample_rate: params
            .sample_rate
            .ok_or_else(|| "Sample rate unknown".to_string())?,
        bits_per_sample: params
            .bits_per_sample
            .ok_or_else(|| "Bit depth unknown".to_string())?,
        channels: params
            .channels
            .map(|c| c.count())
            .ok_or_else(|| "Channel layout unknown".to_string())?,
    })
}

/// Measure the playing time of an audio file in seconds
///
/// Uses the frame count from the container header when symphonia reports one
/// (WAV, FLAC, most MP3s with a Xing header). Falls back to lofty's computed
/// properties for containers that only carry a duration in their metadata
/// (M4A, Opus).
pub fn measure_duration(path: &Path) -> Result<f64, String> {
    if let Ok(probed) = probe(path)
        && let Some(track) = probed.format.default_track()
    {
        let params = &track.codec_params;
        if let (Some(n_frames), Some(rate)) = (params.n_frames, params.sample_rate)
            && n_frames > 0
            && rate > 0
        {
            return Ok(n_frames as f64 / rate as f64);
        }
    }

    let tagged = lofty::read_from_path(path)
        .map_err(|e| format!("Failed to read audio properties: {}", e))?;
    let duration = tagged.properties().duration();
    if duration.is_zero() {
        return Err(format!("Could not determine duration of {}", path.display()));
    }
    Ok(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{WavSpec, write_wav};
    use tempfile::TempDir;

    #[test]
    fn test_red_book_constant() {
        assert!(PcmFormat::RED_BOOK.is_red_book());
        let dat = PcmFormat {
            sample_rate: 48_000,
            ..PcmFormat::RED_BOOK
        };
        assert!(!dat.is_red_book());
    }

    #[test]
    fn test_probe_red_book_wav() {
        let dir = TempDir::new().unwrap();
        let path = write_wav(&dir.path().join("cd.wav"), &WavSpec::red_book(1.0));

        let format = probe_pcm_format(&path).unwrap();
        assert_eq!(format, PcmFormat::RED_BOOK);
    }

    #[test]
    fn test_probe_non_red_book_wav() {
        let dir = TempDir::new().unwrap();
        let spec = WavSpec {
            sample_rate: 22_050,
            channels: 1,
            duration_secs: 0.5,
        };
        let path = write_wav(&dir.path().join("mono.wav"), &spec);

        let format = probe_pcm_format(&path).unwrap();
        assert_eq!(format.sample_rate, 22_050);
        assert_eq!(format.channels, 1);
        assert_eq!(format.bits_per_sample, 16);
        assert!(!format.is_red_book());
    }

    #[test]
    fn test_measure_duration_wav() {
        let dir = TempDir::new().unwrap();
        let path = write_wav(&dir.path().join("two.wav"), &WavSpec::red_book(2.0));

        let duration = measure_duration(&path).unwrap();
        assert!((duration - 2.0).abs() < 0.01, "got {}", duration);
    }

    #[test]
    fn test_measure_duration_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();

        assert!(measure_duration(&path).is_err());
    }

    #[test]
    fn test_probe_missing_file() {
        let result = probe_pcm_format(Path::new("/nonexistent/file.wav"));
        assert!(result.unwrap_err().contains("Failed to open"));
    }
}
