// Audio module - extension detection, stream probing and filename normalization

pub mod detection;
pub mod metadata;
pub mod naming;

pub use detection::{CANONICAL_EXTENSION, is_audio_file, is_canonical_container};
pub use metadata::{measure_duration, probe_pcm_format};
pub use naming::{match_key, sanitize_stem};
