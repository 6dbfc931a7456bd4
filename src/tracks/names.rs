//! Performer/title parsing from canonical file stems

/// Separator between number, performer and title in a file name
pub const SEPARATOR: &str = " - ";

/// Fields recovered from a stem such as `"01 - Artist - Title"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub number: Option<String>,
    pub performer: Option<String>,
    pub title: String,
}

/// Split a stem on `" - "`
///
/// With at least three segments the first is the track number, the second the
/// performer and the rest (re-joined) the title. Anything shorter keeps the
/// whole stem as the title with no number or performer.
pub fn parse_track_name(stem: &str) -> ParsedName {
    let parts: Vec<&str> = stem.split(SEPARATOR).collect();

    if parts.len() >= 3 {
        ParsedName {
            number: Some(parts[0].to_string()),
            performer: Some(parts[1].to_string()),
            title: parts[2..].join(SEPARATOR),
        }
    } else {
        ParsedName {
            number: None,
            performer: None,
            title: stem.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_segments() {
        let parsed = parse_track_name("01 - Artist - Title");
        assert_eq!(parsed.number.as_deref(), Some("01"));
        assert_eq!(parsed.performer.as_deref(), Some("Artist"));
        assert_eq!(parsed.title, "Title");
    }

    #[test]
    fn test_title_keeps_extra_separators() {
        let parsed = parse_track_name("04 - Band - Song - 2011 Remaster");
        assert_eq!(parsed.performer.as_deref(), Some("Band"));
        assert_eq!(parsed.title, "Song - 2011 Remaster");
    }

    #[test]
    fn test_two_segments_use_whole_stem() {
        let parsed = parse_track_name("01 A - Other");
        assert_eq!(parsed.number, None);
        assert_eq!(parsed.performer, None);
        assert_eq!(parsed.title, "01 A - Other");
    }

    #[test]
    fn test_no_separator() {
        let parsed = parse_track_name("weird");
        assert_eq!(parsed.title, "weird");
        assert_eq!(parsed.performer, None);
    }

    #[test]
    fn test_hyphen_without_spaces_is_not_a_separator() {
        let parsed = parse_track_name("01-Artist-Title");
        assert_eq!(parsed.title, "01-Artist-Title");
    }
}
