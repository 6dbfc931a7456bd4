//! Track ordering and burn metadata
//!
//! Reads the canonical WAVs of a job folder, puts them in burn order and emits
//! the cue sheet and tracklist that describe the disc.

pub mod cue_sheet;
pub mod names;
pub mod ordering;
pub mod tracklist;

pub use cue_sheet::{CUE_FILE_NAME, emit_cue_sheet, is_referable};
pub use names::parse_track_name;
pub use ordering::{OrderIndex, order_index};
pub use tracklist::write_tracklist;

use std::path::{Path, PathBuf};

use crate::core::list_canonical_files;

/// A canonical WAV with the fields recovered from its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTrack {
    pub order_index: OrderIndex,
    pub number: Option<String>,
    pub artist: Option<String>,
    pub title: String,
    pub path: PathBuf,
}

impl NormalizedTrack {
    pub fn from_path(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let parsed = parse_track_name(&stem);

        Self {
            order_index: order_index(&file_name),
            number: parsed.number,
            artist: parsed.performer,
            title: parsed.title,
            path,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Canonical WAVs of `folder` in burn order
///
/// Files are listed lexicographically and then stably sorted by order index,
/// so ties and unnumbered files keep name order. Names a cue sheet cannot
/// reference are left out with a warning.
pub fn ordered_tracks(folder: &Path) -> Result<Vec<NormalizedTrack>, String> {
    let mut tracks: Vec<NormalizedTrack> = list_canonical_files(folder)?
        .into_iter()
        .map(NormalizedTrack::from_path)
        .filter(|track| {
            let file_name = track.file_name();
            let referable = is_referable(&file_name);
            if !referable {
                log::warn!("Skipping '{}': double quotes cannot appear in a cue sheet", file_name);
            }
            referable
        })
        .collect();
    tracks.sort_by_key(|t| t.order_index);
    Ok(tracks)
}

/// Paths of the artifacts written by `emit_metadata`
#[derive(Debug, Clone)]
pub struct BurnMetadata {
    pub cue_path: PathBuf,
    pub tracklist_path: PathBuf,
    pub track_count: usize,
}

/// Write `burn_plan.cue` and `tracklist.txt` for the WAVs in `folder`
///
/// An empty folder still gets both files, each with only its header.
pub fn emit_metadata(folder: &Path, cd_name: &str) -> Result<BurnMetadata, String> {
    let tracks = ordered_tracks(folder)?;
    if tracks.is_empty() {
        log::warn!("No WAV tracks in {:?}; cue sheet will be empty", folder);
    }

    let cue_path = emit_cue_sheet(&tracks, cd_name).write_to(folder)?;
    let tracklist_path = write_tracklist(folder, &tracks, cd_name)?;

    Ok(BurnMetadata {
        cue_path,
        tracklist_path,
        track_count: tracks.len(),
    })
}
