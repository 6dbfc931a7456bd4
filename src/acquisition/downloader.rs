//! Playlist downloader invocation

use std::path::{Path, PathBuf};
use std::process::Command;

/// Why a download run did not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadFailure {
    /// The tool ran but reported failure; worth retrying
    Exited(String),
    /// The tool could not be started at all
    Unavailable(String),
}

/// Something that writes a playlist's audio files into a folder
pub trait Downloader {
    fn download(&self, link: &str, output_folder: &Path) -> Result<(), DownloadFailure>;
}

/// Downloads with `spotdl <link> --output <template>`
pub struct SpotdlDownloader {
    pub spotdl_path: PathBuf,
}

impl SpotdlDownloader {
    pub fn new(spotdl_path: &Path) -> Self {
        Self {
            spotdl_path: spotdl_path.to_path_buf(),
        }
    }
}

/// Output template producing `<folder>/<position> <artist> - <title>.<ext>`
pub fn output_template(output_folder: &Path) -> String {
    format!(
        "{}/{{list-position}} {{artist}} - {{title}}.{{output-ext}}",
        output_folder.display()
    )
}

impl Downloader for SpotdlDownloader {
    fn download(&self, link: &str, output_folder: &Path) -> Result<(), DownloadFailure> {
        let template = output_template(output_folder);
        log::debug!("Running {} {} --output {}", self.spotdl_path.display(), link, template);

        // Output is inherited so the user sees per-track progress
        let status = Command::new(&self.spotdl_path)
            .arg(link)
            .arg("--output")
            .arg(&template)
            .status()
            .map_err(|e| {
                DownloadFailure::Unavailable(format!(
                    "Failed to execute {}: {}",
                    self.spotdl_path.display(),
                    e
                ))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(DownloadFailure::Exited(format!("spotdl exited with {}", status)))
        }
    }
}
