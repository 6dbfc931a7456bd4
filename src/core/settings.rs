//! Pipeline settings
//!
//! All tool paths, burn options and retry parameters live in one `Settings`
//! value that is passed explicitly into the pipeline.
//!
//! Persisted to `<data dir>/Playlist2Disc/settings.json`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::acquisition::RetryPolicy;
use crate::acquisition::verifier::DEFAULT_TOLERANCE_SECS;

const DEFAULT_IMGBURN_PATH: &str = r"C:\Program Files (x86)\ImgBurn\ImgBurn.exe";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory that receives one `cd_<date>_<name>` folder per job
    pub base_dir: PathBuf,
    /// Write speed such as "8x", or "MAX"
    pub burn_speed: String,
    /// ImgBurn destination drive (e.g. "D:"); the first writer when unset
    pub drive: Option<String>,
    pub imgburn_path: PathBuf,
    /// cdrdao `--device` argument
    pub cdrdao_device: String,
    pub spotdl_path: PathBuf,
    /// Explicit ffmpeg binary; looked up on PATH when unset
    pub ffmpeg_path: Option<PathBuf>,
    pub max_attempts: u32,
    pub retry_backoff_secs: u64,
    pub duration_tolerance_secs: f64,
    /// Log the burn command instead of running it
    pub simulate_burn: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("cd"),
            burn_speed: "8x".to_string(),
            drive: None,
            imgburn_path: PathBuf::from(DEFAULT_IMGBURN_PATH),
            cdrdao_device: default_cdrdao_device().to_string(),
            spotdl_path: PathBuf::from("spotdl"),
            ffmpeg_path: None,
            max_attempts: 3,
            retry_backoff_secs: 2,
            duration_tolerance_secs: DEFAULT_TOLERANCE_SECS,
            simulate_burn: false,
        }
    }
}

fn default_cdrdao_device() -> &'static str {
    if cfg!(target_os = "macos") {
        "IOCompactDiscServices"
    } else {
        "/dev/cdrom"
    }
}

impl Settings {
    const SETTINGS_FILE: &'static str = "settings.json";

    /// Get the app data directory (e.g. ~/Library/Application Support/Playlist2Disc/)
    fn get_app_data_dir() -> Result<PathBuf, String> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| "Could not determine data directory".to_string())?;
        Ok(data_dir.join("Playlist2Disc"))
    }

    /// Path of the persisted settings file
    pub fn default_path() -> Result<PathBuf, String> {
        Ok(Self::get_app_data_dir()?.join(Self::SETTINGS_FILE))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        match Self::default_path().and_then(|path| Self::load_from(&path)) {
            Ok(settings) => {
                log::debug!("Loaded settings from disk");
                settings
            }
            Err(e) => {
                log::debug!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Err("Settings file not found".to_string());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings: {}", e))?;

        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse settings: {}", e))
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<PathBuf, String> {
        let path = Self::default_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create settings directory: {}", e))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(path, json).map_err(|e| format!("Failed to write settings: {}", e))?;

        log::debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Retry policy for the download stage
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            backoff: Duration::from_secs(self.retry_backoff_secs),
        }
    }
}
