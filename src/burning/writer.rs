//! Audio CD burning from a cue sheet
//!
//! macOS and Linux burn disc-at-once with cdrdao, run from the job folder so
//! the sheet's bare file names resolve. Windows hands the absolute cue path to
//! ImgBurn, which waits for media itself.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::Settings;

const CDRDAO: &str = "cdrdao";

/// Host family that decides which writer is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

/// Result of a burn request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurnOutcome {
    Success,
    /// Command was logged but not run
    Simulated,
    MissingTool { tool: String, remedy: String },
    Failed(String),
}

/// A fully resolved writer invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl fmt::Display for BurnCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Parse a configured speed for cdrdao
///
/// `"8x"`, `"8X"` and `"8"` give `Some(8)`; `"max"` (any case) or an empty
/// string means the drive's fastest speed and gives `None`.
pub fn parse_speed(speed: &str) -> Result<Option<u32>, String> {
    let speed = speed.trim().to_lowercase();
    if speed.is_empty() || speed == "max" {
        return Ok(None);
    }

    let digits = speed.strip_suffix('x').unwrap_or(&speed);
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => Err(format!("Invalid burn speed '{}'", speed)),
        Ok(n) => Ok(Some(n)),
    }
}

pub fn cdrdao_command(cue_path: &Path, device: &str, speed: Option<u32>) -> Result<BurnCommand, String> {
    let file_name = cue_path
        .file_name()
        .ok_or_else(|| format!("Invalid cue path: {}", cue_path.display()))?;

    let mut args: Vec<OsString> = ["write", "--eject", "--driver", "generic-mmc", "--device", device]
        .into_iter()
        .map(OsString::from)
        .collect();
    if let Some(speed) = speed {
        args.push("--speed".into());
        args.push(speed.to_string().into());
    }
    args.push(file_name.to_os_string());

    Ok(BurnCommand {
        program: PathBuf::from(CDRDAO),
        args,
        cwd: cue_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf),
    })
}

/// ImgBurn invocation
///
/// /MODE WRITE      : Write an image to disc
/// /SRC <cue>       : Absolute cue path
/// /SPEED <s>       : Passed through as configured
/// /START /EJECT /CLOSE /NOIMAGEDETAILS : Run unattended
/// /WAITFORMEDIA    : Block until a blank disc is present
/// /DEST <drive>    : Only when a drive is configured
pub fn imgburn_command(imgburn_path: &Path, cue_abs: &Path, speed: &str, drive: Option<&str>) -> BurnCommand {
    let mut args: Vec<OsString> = vec!["/MODE".into(), "WRITE".into(), "/SRC".into()];
    args.push(cue_abs.into());
    args.push("/SPEED".into());
    args.push(speed.into());
    args.extend(
        ["/START", "/EJECT", "/CLOSE", "/NOIMAGEDETAILS", "/WAITFORMEDIA"]
            .into_iter()
            .map(OsString::from),
    );
    if let Some(drive) = drive {
        args.push("/DEST".into());
        args.push(drive.into());
    }

    BurnCommand {
        program: imgburn_path.to_path_buf(),
        args,
        cwd: None,
    }
}

/// Whether cdrdao can be started at all
///
/// Only a spawn failure counts as missing; the exit code of `--version`
/// varies between builds.
pub fn probe_cdrdao() -> bool {
    Command::new(CDRDAO)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

fn cdrdao_remedy(platform: Platform) -> String {
    match platform {
        Platform::MacOs => "Install it via Homebrew: brew install cdrdao".to_string(),
        _ => "Install the cdrdao package from your distribution".to_string(),
    }
}

/// Burn the disc described by `cue_path` on this host
pub fn burn_disc(cue_path: &Path, settings: &Settings) -> BurnOutcome {
    burn_disc_for(Platform::current(), cue_path, settings)
}

/// Burn with the writer for `platform`
pub fn burn_disc_for(platform: Platform, cue_path: &Path, settings: &Settings) -> BurnOutcome {
    if !cue_path.is_file() {
        return BurnOutcome::Failed(format!("Cue sheet not found: {}", cue_path.display()));
    }

    let command = match platform {
        Platform::Windows => {
            if !settings.simulate_burn && !settings.imgburn_path.is_file() {
                return BurnOutcome::MissingTool {
                    tool: format!("ImgBurn ({})", settings.imgburn_path.display()),
                    remedy: "Install ImgBurn or set imgburn_path in settings".to_string(),
                };
            }
            let cue_abs = match std::path::absolute(cue_path) {
                Ok(p) => p,
                Err(e) => return BurnOutcome::Failed(format!("Failed to resolve cue path: {}", e)),
            };
            imgburn_command(
                &settings.imgburn_path,
                &cue_abs,
                &settings.burn_speed,
                settings.drive.as_deref(),
            )
        }
        Platform::MacOs | Platform::Linux => {
            let speed = match parse_speed(&settings.burn_speed) {
                Ok(speed) => speed,
                Err(e) => return BurnOutcome::Failed(e),
            };
            match cdrdao_command(cue_path, &settings.cdrdao_device, speed) {
                Ok(command) => command,
                Err(e) => return BurnOutcome::Failed(e),
            }
        }
    };

    if settings.simulate_burn {
        log::info!("\n=== SIMULATED BURN ===");
        log::info!("Would run: {}", command);
        return BurnOutcome::Simulated;
    }

    if platform == Platform::Windows {
        log::info!("Waiting for ImgBurn to finish; it will wait for a blank disc if none is present.");
    } else if !probe_cdrdao() {
        return BurnOutcome::MissingTool {
            tool: CDRDAO.to_string(),
            remedy: cdrdao_remedy(platform),
        };
    }

    run_writer(&command)
}

fn run_writer(command: &BurnCommand) -> BurnOutcome {
    log::info!("Running: {}", command);

    let mut process = Command::new(&command.program);
    process.args(&command.args);
    if let Some(cwd) = &command.cwd {
        process.current_dir(cwd);
    }

    match process.status() {
        Ok(status) if status.success() => {
            log::info!("Burning complete, disc ejected.");
            BurnOutcome::Success
        }
        Ok(status) => BurnOutcome::Failed(format!(
            "{} exited with {}; ensure a blank CD is inserted",
            command.program.display(),
            status
        )),
        Err(e) => BurnOutcome::Failed(format!("Failed to execute {}: {}", command.program.display(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(command: &BurnCommand) -> Vec<String> {
        command
            .args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    fn cue_in(dir: &TempDir) -> PathBuf {
        let cue = dir.path().join("burn_plan.cue");
        std::fs::write(&cue, "TITLE \"Mix\"\nPERFORMER \"\"\n").unwrap();
        cue
    }

    #[test]
    fn test_parse_speed() {
        assert_eq!(parse_speed("8x").unwrap(), Some(8));
        assert_eq!(parse_speed("16X").unwrap(), Some(16));
        assert_eq!(parse_speed(" 4 ").unwrap(), Some(4));
        assert_eq!(parse_speed("max").unwrap(), None);
        assert_eq!(parse_speed("MAX").unwrap(), None);
        assert_eq!(parse_speed("").unwrap(), None);
        assert!(parse_speed("fast").is_err());
        assert!(parse_speed("0x").is_err());
    }

    #[test]
    fn test_cdrdao_command() {
        let command = cdrdao_command(
            Path::new("/cd/cd_20240101_Mix/burn_plan.cue"),
            "IOCompactDiscServices",
            Some(8),
        )
        .unwrap();

        assert_eq!(command.program, PathBuf::from("cdrdao"));
        assert_eq!(
            strings(&command),
            vec![
                "write",
                "--eject",
                "--driver",
                "generic-mmc",
                "--device",
                "IOCompactDiscServices",
                "--speed",
                "8",
                "burn_plan.cue",
            ]
        );
        assert_eq!(command.cwd, Some(PathBuf::from("/cd/cd_20240101_Mix")));
    }

    #[test]
    fn test_cdrdao_command_max_speed() {
        let command = cdrdao_command(Path::new("/cd/x/burn_plan.cue"), "/dev/cdrom", None).unwrap();
        let args = strings(&command);
        assert!(!args.contains(&"--speed".to_string()));
        assert_eq!(args.last().unwrap(), "burn_plan.cue");
    }

    #[test]
    fn test_imgburn_command() {
        let command = imgburn_command(
            Path::new("C:/ImgBurn/ImgBurn.exe"),
            Path::new("C:/cd/cd_20240101_Mix/burn_plan.cue"),
            "8x",
            Some("D:"),
        );

        assert_eq!(
            strings(&command),
            vec![
                "/MODE",
                "WRITE",
                "/SRC",
                "C:/cd/cd_20240101_Mix/burn_plan.cue",
                "/SPEED",
                "8x",
                "/START",
                "/EJECT",
                "/CLOSE",
                "/NOIMAGEDETAILS",
                "/WAITFORMEDIA",
                "/DEST",
                "D:",
            ]
        );
        assert_eq!(command.cwd, None);
    }

    #[test]
    fn test_imgburn_without_drive() {
        let command = imgburn_command(Path::new("ImgBurn.exe"), Path::new("/a.cue"), "MAX", None);
        let args = strings(&command);
        assert_eq!(args.last().unwrap(), "/WAITFORMEDIA");
    }

    #[test]
    fn test_cdrdao_relative_cue_has_no_cwd() {
        let command = cdrdao_command(Path::new("burn_plan.cue"), "dev", None).unwrap();
        assert_eq!(command.cwd, None);
    }

    #[test]
    fn test_display_joins_args() {
        let command = cdrdao_command(Path::new("/cd/x/burn_plan.cue"), "dev", None).unwrap();
        assert_eq!(
            command.to_string(),
            "cdrdao write --eject --driver generic-mmc --device dev burn_plan.cue"
        );
    }

    #[test]
    fn test_missing_cue_fails() {
        let outcome = burn_disc_for(Platform::Linux, Path::new("/nonexistent/burn_plan.cue"), &Settings::default());
        assert!(matches!(outcome, BurnOutcome::Failed(e) if e.contains("not found")));
    }

    #[test]
    fn test_simulated_burn_on_each_platform() {
        let dir = TempDir::new().unwrap();
        let cue = cue_in(&dir);
        let settings = Settings {
            simulate_burn: true,
            ..Settings::default()
        };

        for platform in [Platform::MacOs, Platform::Linux, Platform::Windows] {
            assert_eq!(burn_disc_for(platform, &cue, &settings), BurnOutcome::Simulated);
        }
    }

    #[test]
    fn test_invalid_speed_fails_before_burning() {
        let dir = TempDir::new().unwrap();
        let cue = cue_in(&dir);
        let settings = Settings {
            burn_speed: "turbo".to_string(),
            simulate_burn: true,
            ..Settings::default()
        };

        let outcome = burn_disc_for(Platform::MacOs, &cue, &settings);
        assert!(matches!(outcome, BurnOutcome::Failed(e) if e.contains("turbo")));
    }

    #[test]
    fn test_missing_imgburn() {
        let dir = TempDir::new().unwrap();
        let cue = cue_in(&dir);
        let settings = Settings {
            imgburn_path: dir.path().join("ImgBurn.exe"),
            ..Settings::default()
        };

        let outcome = burn_disc_for(Platform::Windows, &cue, &settings);
        assert!(matches!(outcome, BurnOutcome::MissingTool { remedy, .. } if remedy.contains("imgburn_path")));
    }
}
