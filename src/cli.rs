//! CLI command definitions and handlers.
//!
//! Each subcommand is implemented as a function that takes the parsed
//! arguments plus the effective settings and returns `Result<(), String>`.

use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::acquisition::{
    SpotdlDownloader, SpotdlManifestFetcher, load_manifest, total_duration, verify,
};
use crate::audio::measure_duration;
use crate::burning::{
    AlwaysBurn, BatchSummary, BurnGate, BurnOutcome, GateDecision, JobOutcome, Pipeline,
    PreparedJob, burn_disc,
};
use crate::conversion::{
    FfmpegTranscoder, Transcoder, UnavailableTranscoder, get_ffmpeg_path, normalize,
};
use crate::core::{Job, Settings, format_duration, list_audio_files};
use crate::tracks::{CUE_FILE_NAME, emit_metadata};

/// Playlist to audio CD
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that override the saved settings for this run
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Show debug output in the terminal
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Log the burn command instead of writing a disc
    #[arg(long, global = true)]
    pub simulate: bool,
    /// Burn speed such as "8x" or "max"
    #[arg(long, global = true)]
    pub speed: Option<String>,
    /// Target drive (ImgBurn /DEST, or cdrdao --device)
    #[arg(long, global = true)]
    pub drive: Option<String>,
    /// Directory that receives the per-disc folders
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Prepare every job, then burn them one disc at a time
    Run {
        /// A job as NAME=LINK; repeat for several discs
        #[arg(long = "job", value_name = "NAME=LINK", required = true)]
        jobs: Vec<String>,
        /// Burn every prepared job without prompting
        #[arg(short, long)]
        yes: bool,
    },
    /// Download, convert and write burn metadata for one playlist
    Prepare {
        /// Playlist link
        link: String,
        /// CD name used for the folder and the cue sheet title
        #[arg(short, long)]
        name: String,
    },
    /// Check a folder's audio against a saved manifest
    Verify {
        folder: PathBuf,
        /// Manifest file written by `spotdl save`
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// Convert a folder's audio to CD-ready WAV in place
    Normalize { folder: PathBuf },
    /// Write burn_plan.cue and tracklist.txt for a folder of WAVs
    Cue {
        folder: PathBuf,
        /// Album title for the cue sheet and tracklist
        #[arg(short, long)]
        name: String,
    },
    /// Burn a prepared folder (or a cue sheet path)
    Burn { path: PathBuf },
    /// Print the effective settings and where settings and logs live
    Config {
        /// Also write them to the settings file
        #[arg(long)]
        save: bool,
    },
}

impl GlobalArgs {
    /// Apply command-line overrides on top of the loaded settings
    pub fn apply_to(&self, settings: &mut Settings) {
        if self.simulate {
            settings.simulate_burn = true;
        }
        if let Some(speed) = &self.speed {
            settings.burn_speed = speed.clone();
        }
        if let Some(drive) = &self.drive {
            settings.drive = Some(drive.clone());
            if !cfg!(target_os = "windows") {
                settings.cdrdao_device = drive.clone();
            }
        }
        if let Some(base_dir) = &self.base_dir {
            settings.base_dir = base_dir.clone();
        }
    }
}

/// Interprets an answer to the insert-disc prompt
pub fn parse_gate_answer(answer: &str) -> GateDecision {
    match answer.trim().to_lowercase().as_str() {
        "q" => GateDecision::Quit,
        "s" => GateDecision::Skip,
        _ => GateDecision::Burn,
    }
}

/// Prompts on the terminal before each burn
pub struct StdinGate;

impl BurnGate for StdinGate {
    fn ask(&mut self, job: &PreparedJob) -> GateDecision {
        print!(
            "[{}] Insert blank CD and press Enter (or 's' to skip, 'q' to quit): ",
            job.job.cd_name
        );
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => GateDecision::Quit,
            Ok(_) => parse_gate_answer(&line),
        }
    }
}

/// Run a CLI command
pub fn run_command(cli: &Cli, settings: &Settings) -> Result<(), String> {
    match &cli.command {
        Commands::Run { jobs, yes } => cmd_run(settings, jobs, *yes),
        Commands::Prepare { link, name } => cmd_prepare(settings, link, name),
        Commands::Verify { folder, manifest } => cmd_verify(settings, folder, manifest),
        Commands::Normalize { folder } => cmd_normalize(settings, folder),
        Commands::Cue { folder, name } => cmd_cue(folder, name),
        Commands::Burn { path } => cmd_burn(settings, path),
        Commands::Config { save } => cmd_config(settings, *save),
    }
}

fn find_transcoder(settings: &Settings) -> Result<FfmpegTranscoder, String> {
    get_ffmpeg_path(settings.ffmpeg_path.as_deref()).map(FfmpegTranscoder::new)
}

fn with_pipeline<T>(settings: &Settings, body: impl FnOnce(&Pipeline<'_>) -> T) -> T {
    let fetcher = SpotdlManifestFetcher::new(&settings.spotdl_path);
    let downloader = SpotdlDownloader::new(&settings.spotdl_path);
    let transcoder = find_transcoder(settings);
    if let Err(e) = &transcoder {
        log::warn!("{}", e);
    }

    let pipeline = Pipeline {
        settings,
        fetcher: &fetcher,
        downloader: &downloader,
        transcoder: transcoder
            .as_ref()
            .map(|t| t as &dyn Transcoder)
            .map_err(Clone::clone),
        measure: &measure_duration,
    };
    body(&pipeline)
}

fn cmd_run(settings: &Settings, pairs: &[String], yes: bool) -> Result<(), String> {
    let jobs = pairs
        .iter()
        .map(|pair| Job::parse_pair(pair, &settings.base_dir))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = with_pipeline(settings, |pipeline| {
        if yes {
            pipeline.run_batch(&jobs, &mut AlwaysBurn)
        } else {
            pipeline.run_batch(&jobs, &mut StdinGate)
        }
    });

    report_summary(&summary);
    if summary.is_clean() {
        Ok(())
    } else {
        Err(format!(
            "{} job(s) failed to prepare, {} burn(s) failed",
            summary.failed.len(),
            summary.burn_failures.len()
        ))
    }
}

fn report_summary(summary: &BatchSummary) {
    println!("\nBatch summary");
    println!("  Prepared: {}", summary.prepared);
    println!("  Burned:   {}", summary.burned);
    println!("  Skipped:  {}", summary.skipped);
    for (name, reason) in &summary.failed {
        println!("  Failed:   {} ({})", name, reason);
    }
    for (name, reason) in &summary.burn_failures {
        println!("  Not burned: {} ({})", name, reason);
    }
    if summary.quit {
        println!("  Burn phase ended early by request");
    }
}

fn cmd_prepare(settings: &Settings, link: &str, name: &str) -> Result<(), String> {
    let job = Job::dated_today(link, name, &settings.base_dir);

    match with_pipeline(settings, |pipeline| pipeline.process_job(&job)) {
        JobOutcome::Ready(ready) => {
            println!("Prepared {} tracks in {}", ready.track_count, job.output_folder.display());
            if let Some(verification) = &ready.verification {
                println!(
                    "Verified {}/{} tracks, {} duration mismatches",
                    verification.matched_count,
                    verification.expected_count,
                    verification.mismatches.len()
                );
            }
            println!("Cue sheet: {}", ready.cue_path.display());
            Ok(())
        }
        JobOutcome::Failed(reason) => Err(reason),
    }
}

fn cmd_verify(settings: &Settings, folder: &Path, manifest_path: &Path) -> Result<(), String> {
    let expected = load_manifest(manifest_path)?;
    let files = list_audio_files(folder)?;

    println!(
        "Manifest: {} tracks, {}",
        expected.len(),
        format_duration(total_duration(&expected))
    );

    let result = verify(&expected, &files, settings.duration_tolerance_secs, measure_duration);

    if result.is_undercount() {
        return Err(format!(
            "Found {}/{} files",
            result.acquired_count, result.expected_count
        ));
    }

    println!("Matched:    {}/{}", result.matched_count, result.expected_count);
    println!("Unmatched:  {}", result.unmatched.len());
    println!("Mismatches: {}", result.mismatches.len());
    for mismatch in &result.mismatches {
        println!(
            "  {}: expected {:.0}s, actual {:.0}s",
            mismatch.file.file_name().unwrap_or_default().to_string_lossy(),
            mismatch.expected_duration,
            mismatch.actual_duration
        );
    }
    Ok(())
}

fn cmd_normalize(settings: &Settings, folder: &Path) -> Result<(), String> {
    let transcoder: Box<dyn Transcoder> = match find_transcoder(settings) {
        Ok(ffmpeg) => Box::new(ffmpeg),
        Err(e) => {
            log::warn!("{}", e);
            Box::new(UnavailableTranscoder::new(e))
        }
    };
    let report = normalize(folder, transcoder.as_ref())?;

    println!(
        "{} tracks ready ({} converted, {} renamed)",
        report.tracks.len(),
        report.converted,
        report.renamed
    );
    if report.failed.is_empty() {
        Ok(())
    } else {
        for (path, e) in &report.failed {
            println!("  Failed: {} ({})", path.display(), e);
        }
        Err(format!("{} file(s) could not be converted", report.failed.len()))
    }
}

fn cmd_cue(folder: &Path, name: &str) -> Result<(), String> {
    let metadata = emit_metadata(folder, name)?;
    println!("{} tracks", metadata.track_count);
    println!("Cue sheet: {}", metadata.cue_path.display());
    println!("Tracklist: {}", metadata.tracklist_path.display());
    Ok(())
}

fn cmd_burn(settings: &Settings, path: &Path) -> Result<(), String> {
    let cue_path = if path.is_dir() {
        path.join(CUE_FILE_NAME)
    } else {
        path.to_path_buf()
    };

    match burn_disc(&cue_path, settings) {
        BurnOutcome::Success => Ok(()),
        BurnOutcome::Simulated => {
            println!("Simulated burn of {}", cue_path.display());
            Ok(())
        }
        BurnOutcome::MissingTool { tool, remedy } => Err(format!("{} not found. {}", tool, remedy)),
        BurnOutcome::Failed(e) => Err(e),
    }
}

fn cmd_config(settings: &Settings, save: bool) -> Result<(), String> {
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;
    println!("{}", json);

    if let Ok(path) = Settings::default_path() {
        println!("Settings file: {}", path.display());
    }
    if let Some(path) = crate::logging::get_log_file_path() {
        println!("Log file: {}", path.display());
    }

    if save {
        let path = settings.save()?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}
