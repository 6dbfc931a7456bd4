//! Playlist2Disc
//!
//! Turns streaming playlists into burned audio CDs: downloads each playlist,
//! verifies it against its manifest, converts everything to Red Book WAV and
//! burns it disc-at-once from a generated cue sheet.

mod acquisition;
mod audio;
mod burning;
mod cli;
mod conversion;
mod core;
mod logging;
#[cfg(test)]
mod test_fixtures;
mod tracks;

use clap::Parser;
use std::process::ExitCode;

use core::Settings;

fn main() -> ExitCode {
    let args = cli::Cli::parse();

    logging::init_logging(args.global.verbose);

    let mut settings = Settings::load();
    args.global.apply_to(&mut settings);

    match cli::run_command(&args, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
