//! Batch workflow execution
//!
//! Phase one prepares every job in order: manifest, download, verification,
//! normalization and burn metadata. A job that fails is logged and left out.
//! Phase two walks the prepared jobs and burns each one the gate approves.

use std::path::{Path, PathBuf};

use super::writer::{BurnOutcome, burn_disc};
use crate::acquisition::{
    Downloader, ManifestFetcher, VerificationResult, acquire, exceeds_cd_capacity,
    fetch_or_degrade, total_duration,
};
use crate::conversion::{Transcoder, UnavailableTranscoder, normalize};
use crate::core::{Job, Settings, format_duration};
use crate::tracks::emit_metadata;

/// Measures the duration of an audio file in seconds
pub type DurationProbe<'a> = &'a dyn Fn(&Path) -> Result<f64, String>;

/// Everything a job needs from the outside world
pub struct Pipeline<'a> {
    pub settings: &'a Settings,
    pub fetcher: &'a dyn ManifestFetcher,
    pub downloader: &'a dyn Downloader,
    /// Err holds the reason no transcoder is available (e.g. ffmpeg missing)
    pub transcoder: Result<&'a dyn Transcoder, String>,
    pub measure: DurationProbe<'a>,
}

/// A job whose folder holds Red Book WAVs, a cue sheet and a tracklist
#[derive(Debug, Clone)]
pub struct PreparedJob {
    pub job: Job,
    pub cue_path: PathBuf,
    pub track_count: usize,
    pub verification: Option<VerificationResult>,
}

#[derive(Debug, Clone)]
pub enum JobOutcome {
    Ready(PreparedJob),
    Failed(String),
}

/// Answer to "burn this job now?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Burn,
    Skip,
    /// Stop the burn phase; remaining jobs are left unburned
    Quit,
}

/// Asked once before each prepared job is burned
pub trait BurnGate {
    fn ask(&mut self, job: &PreparedJob) -> GateDecision;
}

/// Burns every prepared job without asking
pub struct AlwaysBurn;

impl BurnGate for AlwaysBurn {
    fn ask(&mut self, _job: &PreparedJob) -> GateDecision {
        GateDecision::Burn
    }
}

/// Counts for a whole batch
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub prepared: usize,
    /// (cd name, reason)
    pub failed: Vec<(String, String)>,
    pub burned: usize,
    pub skipped: usize,
    /// (cd name, reason)
    pub burn_failures: Vec<(String, String)>,
    pub quit: bool,
}

impl BatchSummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.burn_failures.is_empty()
    }
}

impl Pipeline<'_> {
    /// Run one job through download, normalization and metadata emission
    pub fn process_job(&self, job: &Job) -> JobOutcome {
        log::info!("\n=== Processing: {} ===", job.output_folder.display());

        log::info!("Fetching playlist metadata...");
        let expected = fetch_or_degrade(self.fetcher, &job.source_link);
        if !expected.is_empty() {
            log::info!(
                "Playlist has {} tracks, total {}",
                expected.len(),
                format_duration(total_duration(&expected))
            );
            if exceeds_cd_capacity(&expected) {
                log::warn!(
                    "Playlist runs {} which exceeds the 80 minutes of a standard CD",
                    format_duration(total_duration(&expected))
                );
            }
        }

        let acquisition = match acquire(
            &job.source_link,
            &job.output_folder,
            &expected,
            self.downloader,
            &self.settings.retry_policy(),
            self.settings.duration_tolerance_secs,
            self.measure,
        ) {
            Ok(report) => report,
            Err(e) => return JobOutcome::Failed(format!("Download failed: {}", e)),
        };

        log::info!("Download complete after {} attempt(s)", acquisition.attempts);
        if let Some(verification) = &acquisition.verification {
            log::info!(
                "Verified {}/{} tracks ({} duration mismatches)",
                verification.matched_count,
                verification.expected_count,
                verification.mismatches.len()
            );
        }

        let unavailable;
        let transcoder: &dyn Transcoder = match &self.transcoder {
            Ok(transcoder) => *transcoder,
            Err(reason) => {
                unavailable = UnavailableTranscoder::new(reason.clone());
                &unavailable
            }
        };

        log::info!("Converting to CD audio (44.1 kHz / 16-bit / stereo WAV)...");
        let report = match normalize(&job.output_folder, transcoder) {
            Ok(report) => report,
            Err(e) => return JobOutcome::Failed(format!("Conversion failed: {}", e)),
        };
        if let Err(reason) = &self.transcoder
            && !report.failed.is_empty()
        {
            return JobOutcome::Failed(format!("Cannot convert audio: {}", reason));
        }
        log::info!(
            "{} tracks ready ({} converted, {} renamed, {} failed)",
            report.tracks.len(),
            report.converted,
            report.renamed,
            report.failed.len()
        );

        match emit_metadata(&job.output_folder, &job.cd_name) {
            Ok(metadata) => JobOutcome::Ready(PreparedJob {
                job: job.clone(),
                cue_path: metadata.cue_path,
                track_count: metadata.track_count,
                verification: acquisition.verification,
            }),
            Err(e) => JobOutcome::Failed(format!("Could not write burn metadata: {}", e)),
        }
    }

    /// Prepare every job in order, collecting failures instead of stopping
    pub fn prepare_batch(&self, jobs: &[Job], summary: &mut BatchSummary) -> Vec<PreparedJob> {
        let mut prepared = Vec::new();

        for job in jobs {
            match self.process_job(job) {
                JobOutcome::Ready(ready) => prepared.push(ready),
                JobOutcome::Failed(reason) => {
                    log::error!("Job '{}' failed: {}", job.cd_name, reason);
                    summary.failed.push((job.cd_name.clone(), reason));
                }
            }
        }

        summary.prepared = prepared.len();
        log::info!(
            "\n=== Batch processing complete. {} jobs ready. ===",
            prepared.len()
        );
        prepared
    }

    /// Prepare all jobs, then burn the ones the gate approves
    pub fn run_batch(&self, jobs: &[Job], gate: &mut dyn BurnGate) -> BatchSummary {
        let mut summary = BatchSummary::default();
        let prepared = self.prepare_batch(jobs, &mut summary);
        burn_phase(&prepared, gate, self.settings, &mut summary);
        summary
    }
}

/// Burn prepared jobs one at a time
///
/// A quit is only honored between jobs. A failed or impossible burn is
/// recorded against its job and the next job is still offered.
pub fn burn_phase(
    prepared: &[PreparedJob],
    gate: &mut dyn BurnGate,
    settings: &Settings,
    summary: &mut BatchSummary,
) {
    burn_each(prepared, gate, summary, &|cue_path| burn_disc(cue_path, settings));
}

fn burn_each(
    prepared: &[PreparedJob],
    gate: &mut dyn BurnGate,
    summary: &mut BatchSummary,
    burn: &dyn Fn(&Path) -> BurnOutcome,
) {
    for ready in prepared {
        log::info!("\n>>> Burning job: {}", ready.job.output_folder.display());

        match gate.ask(ready) {
            GateDecision::Quit => {
                log::info!("Quitting burn phase.");
                summary.quit = true;
                break;
            }
            GateDecision::Skip => {
                log::info!("Skipped.");
                summary.skipped += 1;
                continue;
            }
            GateDecision::Burn => {}
        }

        match burn(&ready.cue_path) {
            BurnOutcome::Success | BurnOutcome::Simulated => summary.burned += 1,
            BurnOutcome::Failed(e) => {
                log::error!("Burning failed: {}", e);
                summary.burn_failures.push((ready.job.cd_name.clone(), e));
            }
            BurnOutcome::MissingTool { tool, remedy } => {
                log::error!("{} not found. {}", tool, remedy);
                summary
                    .burn_failures
                    .push((ready.job.cd_name.clone(), format!("{} not found", tool)));
            }
        }
    }
}
