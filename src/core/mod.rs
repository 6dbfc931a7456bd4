//! Core application types
//!
//! This module contains:
//! - Pipeline settings (tool paths, burn options, retry parameters)
//! - Job definitions
//! - Job folder scanning

mod job;
mod scanning;
mod settings;

pub use job::Job;
pub use scanning::{format_duration, list_audio_files, list_canonical_files};
pub use settings::Settings;
