//! Acquisition stage
//!
//! Runs the downloader under a retry policy and verifies what it produced
//! against the expected manifest.

pub mod downloader;
pub mod manifest;
pub mod retry;
pub mod verifier;

pub use downloader::{DownloadFailure, Downloader, SpotdlDownloader};
pub use manifest::{
    ManifestFetcher, SpotdlManifestFetcher, TrackRecord, exceeds_cd_capacity, fetch_or_degrade,
    load_manifest, total_duration,
};
pub use retry::{AttemptOutcome, RetryPolicy};
pub use verifier::{VerificationResult, verify};

use std::path::Path;

use crate::core::list_audio_files;

/// Summary of a successful acquisition
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionReport {
    /// Attempts used, including the successful one
    pub attempts: u32,
    /// None when no manifest was available to verify against
    pub verification: Option<VerificationResult>,
}

/// Download a playlist into `output_folder` and verify the result
///
/// Each attempt runs the downloader, then (when a manifest is available)
/// counts the supported files in the folder. A failing exit code or an
/// under-count is retried under `policy`; a downloader that cannot start ends
/// the acquisition at once. Once the count is satisfied the duration
/// cross-check runs and its findings are advisory only.
pub fn acquire(
    link: &str,
    output_folder: &Path,
    expected: &[TrackRecord],
    downloader: &dyn Downloader,
    policy: &RetryPolicy,
    tolerance: f64,
    measure: impl Fn(&Path) -> Result<f64, String>,
) -> Result<AcquisitionReport, String> {
    std::fs::create_dir_all(output_folder)
        .map_err(|e| format!("Failed to create output folder: {}", e))?;

    if !expected.is_empty() {
        log::info!("Expecting {} tracks.", expected.len());
    }

    policy.run(|attempt| {
        if let Err(failure) = downloader.download(link, output_folder) {
            return match failure {
                DownloadFailure::Exited(e) => {
                    AttemptOutcome::Retry(format!("download failed on attempt {}: {}", attempt, e))
                }
                DownloadFailure::Unavailable(e) => AttemptOutcome::Abort(e),
            };
        }

        if expected.is_empty() {
            return AttemptOutcome::Done(AcquisitionReport {
                attempts: attempt,
                verification: None,
            });
        }

        let files = match list_audio_files(output_folder) {
            Ok(files) => files,
            Err(e) => return AttemptOutcome::Abort(e),
        };

        if files.len() < expected.len() {
            log::warn!("Found {}/{} files.", files.len(), expected.len());
            return AttemptOutcome::Retry(format!(
                "found {}/{} files",
                files.len(),
                expected.len()
            ));
        }

        log::info!("Verifying audio integrity...");
        let verification = verify(expected, &files, tolerance, &measure);
        AttemptOutcome::Done(AcquisitionReport {
            attempts: attempt,
            verification: Some(verification),
        })
    })
}
