//! Expected track manifest
//!
//! The manifest comes from `spotdl save`, which writes a JSON array of track
//! objects. Only `artist`, `name` and `duration` are read.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Playing time that fits on a standard 80 minute CD-R
pub const CD_CAPACITY_SECS: f64 = 80.0 * 60.0;

/// One expected track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub artist: String,
    #[serde(rename = "name", default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "duration", default, deserialize_with = "null_as_default")]
    pub duration_seconds: f64,
}

// spotdl writes `null` for fields the catalog did not provide
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
impl TrackRecord {
    pub fn new(artist: &str, title: &str, duration_seconds: f64) -> Self {
        Self {
            artist: artist.to_string(),
            title: title.to_string(),
            duration_seconds,
        }
    }
}

/// Source of the expected track list for a playlist
pub trait ManifestFetcher {
    fn fetch(&self, link: &str) -> Result<Vec<TrackRecord>, String>;
}

/// Fetches the manifest with `spotdl save <link> --save-file <tmp>`
pub struct SpotdlManifestFetcher {
    pub spotdl_path: PathBuf,
}

impl SpotdlManifestFetcher {
    pub fn new(spotdl_path: &Path) -> Self {
        Self {
            spotdl_path: spotdl_path.to_path_buf(),
        }
    }
}

impl ManifestFetcher for SpotdlManifestFetcher {
    fn fetch(&self, link: &str) -> Result<Vec<TrackRecord>, String> {
        let save_file =
            std::env::temp_dir().join(format!("manifest_{}.spotdl", uuid::Uuid::new_v4()));

        log::debug!("Fetching manifest for {} into {}", link, save_file.display());

        let status = Command::new(&self.spotdl_path)
            .arg("save")
            .arg(link)
            .arg("--save-file")
            .arg(&save_file)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| format!("Failed to execute {}: {}", self.spotdl_path.display(), e))?;

        if !status.success() {
            let _ = std::fs::remove_file(&save_file);
            return Err(format!("spotdl save exited with {}", status));
        }

        let tracks = load_manifest(&save_file);
        let _ = std::fs::remove_file(&save_file);
        tracks
    }
}

/// Parse a manifest from JSON text
pub fn parse_manifest(json: &str) -> Result<Vec<TrackRecord>, String> {
    serde_json::from_str(json).map_err(|e| format!("Failed to parse manifest: {}", e))
}

/// Read a manifest file written by `spotdl save`
pub fn load_manifest(path: &Path) -> Result<Vec<TrackRecord>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read manifest {}: {}", path.display(), e))?;
    parse_manifest(&contents)
}

/// Fetch a manifest, treating any failure as "no manifest available"
pub fn fetch_or_degrade(fetcher: &dyn ManifestFetcher, link: &str) -> Vec<TrackRecord> {
    match fetcher.fetch(link) {
        Ok(tracks) => tracks,
        Err(e) => {
            log::warn!("No manifest available, downloads will not be verified: {}", e);
            Vec::new()
        }
    }
}

/// Sum of all expected durations in seconds
pub fn total_duration(tracks: &[TrackRecord]) -> f64 {
    tracks.iter().map(|t| t.duration_seconds).sum()
}

/// Whether the playlist runs longer than a standard CD holds
pub fn exceeds_cd_capacity(tracks: &[TrackRecord]) -> bool {
    total_duration(tracks) > CD_CAPACITY_SECS
}
