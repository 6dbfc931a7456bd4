use std::path::Path;

/// Extensions the downloader may produce and the normalizer can ingest
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "m4a", "ogg", "opus", "flac", "wav"];

/// Extension of the container handed to the disc writer
pub const CANONICAL_EXTENSION: &str = "wav";

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Check if a file is an audio file based on its extension
pub fn is_audio_file(path: &Path) -> bool {
    match lowercase_extension(path) {
        Some(ext) => SUPPORTED_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

/// Check if a file is already in the canonical (WAV) container
pub fn is_canonical_container(path: &Path) -> bool {
    lowercase_extension(path).as_deref() == Some(CANONICAL_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizes_audio_formats() {
        assert!(is_audio_file(Path::new("test.mp3")));
        assert!(is_audio_file(Path::new("test.m4a")));
        assert!(is_audio_file(Path::new("test.opus")));
        assert!(is_audio_file(Path::new("test.flac")));
        assert!(is_audio_file(Path::new("test.wav")));
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        assert!(is_audio_file(Path::new("01 A - B.MP3")));
        assert!(is_canonical_container(Path::new("01 A - B.WAV")));
    }

    #[test]
    fn test_rejects_non_audio() {
        assert!(!is_audio_file(Path::new("test.txt")));
        assert!(!is_audio_file(Path::new("burn_plan.cue")));
        assert!(!is_audio_file(Path::new("test")));
        // Formats the downloader never emits are not part of the set
        assert!(!is_audio_file(Path::new("test.aiff")));
    }

    #[test]
    fn test_canonical_container() {
        assert!(is_canonical_container(Path::new("song.wav")));
        assert!(!is_canonical_container(Path::new("song.flac")));
        assert!(!is_canonical_container(Path::new("wav")));
    }
}
