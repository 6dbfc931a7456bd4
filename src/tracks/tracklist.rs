//! Human-readable track listing written next to the cue sheet

use std::path::{Path, PathBuf};

use super::NormalizedTrack;

pub const TRACKLIST_FILE_NAME: &str = "tracklist.txt";

/// Render the listing for tracks already in burn order
///
/// Tracks whose name parsed into number/performer/title print as
/// `"<number>. <performer> - <title>"`; anything else prints its bare stem.
pub fn emit_tracklist(tracks: &[NormalizedTrack], album_title: &str) -> String {
    let mut lines = vec![format!("Mix for {}", album_title), "-".repeat(40)];

    for track in tracks {
        match (&track.number, &track.artist) {
            (Some(number), Some(artist)) => {
                lines.push(format!("{}. {} - {}", number, artist, track.title))
            }
            _ => lines.push(track.stem()),
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Write `tracklist.txt` into `folder`
pub fn write_tracklist(folder: &Path, tracks: &[NormalizedTrack], album_title: &str) -> Result<PathBuf, String> {
    let path = folder.join(TRACKLIST_FILE_NAME);
    std::fs::write(&path, emit_tracklist(tracks, album_title))
        .map_err(|e| format!("Failed to write tracklist {:?}: {}", path, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn track(name: &str) -> NormalizedTrack {
        NormalizedTrack::from_path(PathBuf::from("/cd").join(name))
    }

    #[test]
    fn test_header_and_rule() {
        let text = emit_tracklist(&[], "Road Trip");
        assert_eq!(text, format!("Mix for Road Trip\n{}\n", "-".repeat(40)));
    }

    #[test]
    fn test_parsed_and_bare_lines() {
        let text = emit_tracklist(
            &[track("01 - Artist - Title.wav"), track("02 B - Song.wav"), track("weird.wav")],
            "Mix",
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "01. Artist - Title");
        assert_eq!(lines[3], "02 B - Song");
        assert_eq!(lines[4], "weird");
        assert_eq!(lines.len(), 5);
    }
}
