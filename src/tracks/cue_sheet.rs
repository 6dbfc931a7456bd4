//! CUE sheet generation for disc-at-once burning
//!
//! One `FILE ... WAVE` entry per track with CD-TEXT title and performer. The
//! sheet references WAVs by bare file name, so it only resolves when the
//! burner runs from the job folder.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::NormalizedTrack;

/// File name of the generated sheet inside the job folder
pub const CUE_FILE_NAME: &str = "burn_plan.cue";

/// Performer used when the file name does not carry one
pub const UNKNOWN_PERFORMER: &str = "Unknown";

/// Audio CDs hold at most 99 tracks
pub const MAX_TRACKS: usize = 99;

/// Whether a file can be named in a `FILE` line
///
/// CUE strings have no escape for `"`, and rewriting the name would point the
/// burner at a file that does not exist.
pub fn is_referable(file_name: &str) -> bool {
    !file_name.contains('"')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTrack {
    /// 1-based track number
    pub index: usize,
    pub title: String,
    pub performer: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueSheet {
    pub album_title: String,
    pub tracks: Vec<CueTrack>,
}

/// Build a sheet from tracks already in burn order
pub fn emit_cue_sheet(ordered: &[NormalizedTrack], album_title: &str) -> CueSheet {
    if ordered.len() > MAX_TRACKS {
        log::warn!(
            "{} tracks exceed the {} track limit of an audio CD",
            ordered.len(),
            MAX_TRACKS
        );
    }

    let tracks = ordered
        .iter()
        .enumerate()
        .map(|(i, track)| CueTrack {
            index: i + 1,
            title: track.title.clone(),
            performer: track
                .artist
                .clone()
                .unwrap_or_else(|| UNKNOWN_PERFORMER.to_string()),
            file_name: track.file_name(),
        })
        .collect();

    CueSheet {
        album_title: album_title.to_string(),
        tracks,
    }
}

impl CueSheet {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "TITLE \"{}\"", quoted(&self.album_title));
        let _ = writeln!(out, "PERFORMER \"\"");

        for track in &self.tracks {
            let _ = writeln!(out, "FILE \"{}\" WAVE", track.file_name);
            let _ = writeln!(out, "  TRACK {:02} AUDIO", track.index);
            let _ = writeln!(out, "    TITLE \"{}\"", quoted(&track.title));
            let _ = writeln!(out, "    PERFORMER \"{}\"", quoted(&track.performer));
            let _ = writeln!(out, "    INDEX 01 00:00:00");
        }
        out
    }

    /// Write `burn_plan.cue` into `folder`
    pub fn write_to(&self, folder: &Path) -> Result<PathBuf, String> {
        let path = folder.join(CUE_FILE_NAME);
        std::fs::write(&path, self.render())
            .map_err(|e| format!("Failed to write cue sheet {:?}: {}", path, e))?;
        log::info!("Wrote {:?} ({} tracks)", path, self.tracks.len());
        Ok(path)
    }
}

/// CD-TEXT fields have no escape syntax for double quotes
fn quoted(text: &str) -> String {
    text.replace('"', "'")
}
