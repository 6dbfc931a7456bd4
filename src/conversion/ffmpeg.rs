//! FFmpeg subprocess handling for audio conversion

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::audio::metadata::{RED_BOOK_CHANNELS, RED_BOOK_SAMPLE_RATE};

/// Build the ffmpeg arguments for a Red Book WAV conversion
///
/// -i <input>           : Input file
/// -vn                  : Skip video streams (embedded cover art)
/// -map_metadata -1     : Drop tags so the WAV carries audio only
/// -ar 44100 -ac 2      : Resample and remix to CD layout
/// -codec:a pcm_s16le   : 16-bit little-endian PCM
/// -bitexact            : No encoder tag, so output is reproducible
/// -f wav               : Container, independent of the output extension
/// -y                   : Overwrite output file without asking
pub fn red_book_args(input_path: &Path, output_path: &Path) -> Vec<OsString> {
    let sample_rate = RED_BOOK_SAMPLE_RATE.to_string();
    let channels = RED_BOOK_CHANNELS.to_string();

    let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(input_path.into());
    args.extend(
        [
            "-vn",
            "-map_metadata",
            "-1",
            "-ar",
            sample_rate.as_str(),
            "-ac",
            channels.as_str(),
            "-codec:a",
            "pcm_s16le",
            "-bitexact",
            "-f",
            "wav",
            "-y",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(output_path.into());
    args
}

/// Convert a single audio file to a 44.1 kHz / 16-bit / stereo WAV
///
/// # Arguments
/// * `ffmpeg_path` - Path to the ffmpeg binary
/// * `input_path` - Path to the input audio file
/// * `output_path` - Path for the output WAV file
///
/// # Returns
/// `Err` with the last line of ffmpeg's stderr when conversion fails
pub fn convert_file(ffmpeg_path: &Path, input_path: &Path, output_path: &Path) -> Result<(), String> {
    log::debug!(
        "Converting: {} -> {}",
        input_path.display(),
        output_path.display()
    );

    let output = Command::new(ffmpeg_path)
        .args(red_book_args(input_path, output_path))
        .output()
        .map_err(|e| format!("Failed to spawn ffmpeg: {}", e))?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(format!(
        "ffmpeg exited with status {}: {}",
        output.status,
        stderr.lines().last().unwrap_or("Unknown error")
    ))
}
