//! Job definitions
//!
//! A job is one playlist destined for one disc.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Playlist link handed to the manifest fetcher and downloader
    pub source_link: String,
    /// Folder that receives the audio, cue sheet and tracklist
    pub output_folder: PathBuf,
    /// Album title written to the cue sheet and tracklist
    pub cd_name: String,
}

impl Job {
    /// Create a job whose folder is `<base_dir>/cd_<YYYYMMDD>_<cd_name>`
    pub fn new(source_link: &str, cd_name: &str, base_dir: &Path, date: NaiveDate) -> Self {
        let cd_name = cd_name.trim().to_string();
        let output_folder = base_dir.join(folder_name(&cd_name, date));
        Self {
            source_link: source_link.trim().to_string(),
            output_folder,
            cd_name,
        }
    }

    /// Same as `new`, dated with the local clock
    pub fn dated_today(source_link: &str, cd_name: &str, base_dir: &Path) -> Self {
        Self::new(source_link, cd_name, base_dir, chrono::Local::now().date_naive())
    }

    /// Parse a `NAME=LINK` pair as given on the command line
    ///
    /// Splits on the first `=` so query strings in the link survive.
    pub fn parse_pair(pair: &str, base_dir: &Path) -> Result<Self, String> {
        let (name, link) = pair
            .split_once('=')
            .ok_or_else(|| format!("Expected NAME=LINK, got '{}'", pair))?;

        if name.trim().is_empty() {
            return Err(format!("Missing CD name in '{}'", pair));
        }
        if link.trim().is_empty() {
            return Err(format!("Missing playlist link in '{}'", pair));
        }

        Ok(Self::dated_today(link, name, base_dir))
    }
}

/// Folder name for a disc: `cd_<YYYYMMDD>_<cd_name>`
pub fn folder_name(cd_name: &str, date: NaiveDate) -> String {
    format!("cd_{}_{}", date.format("%Y%m%d"), cd_name)
}
