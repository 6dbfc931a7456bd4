//! Burn order derived from file names

use super::names::SEPARATOR;

/// Sort key of a track file
///
/// Numbered files sort ascending by their number; everything else sorts after
/// all numbered files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OrderIndex {
    Number(u64),
    Last,
}

/// Order key for a file name such as `"01 Artist - Title.wav"`
///
/// Takes the text before the first `" - "` and parses its first
/// whitespace-delimited token as an integer. A missing separator or a
/// non-numeric token yields `OrderIndex::Last`.
pub fn order_index(file_name: &str) -> OrderIndex {
    let Some((head, _)) = file_name.split_once(SEPARATOR) else {
        return OrderIndex::Last;
    };

    head.split_whitespace()
        .next()
        .and_then(|token| token.parse::<u64>().ok())
        .map(OrderIndex::Number)
        .unwrap_or(OrderIndex::Last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_by_key(|n| order_index(n));
        names
    }

    #[test]
    fn test_numbered_names() {
        assert_eq!(order_index("01 A - Other.wav"), OrderIndex::Number(1));
        assert_eq!(order_index("12 - Artist - Title.wav"), OrderIndex::Number(12));
        assert_eq!(order_index("007 Bond - Theme - Live.wav"), OrderIndex::Number(7));
    }

    #[test]
    fn test_unparsable_names_sort_last() {
        assert_eq!(order_index("weird.wav"), OrderIndex::Last);
        assert_eq!(order_index("05 No Separator.wav"), OrderIndex::Last);
        assert_eq!(order_index("Intro - Theme.wav"), OrderIndex::Last);
        assert_eq!(order_index(" - Empty Head.wav"), OrderIndex::Last);
        assert_eq!(order_index("-3 Neg - X.wav"), OrderIndex::Last);
    }

    #[test]
    fn test_numbers_before_last() {
        assert!(OrderIndex::Number(u64::MAX) < OrderIndex::Last);
        assert!(OrderIndex::Number(2) < OrderIndex::Number(10));
    }

    #[test]
    fn test_sort_is_numeric_and_stable() {
        let names = sorted(vec![
            "zeta.wav",
            "10 J - Ten.wav",
            "alpha.wav",
            "2 B - Two.wav",
            "Intro - X.wav",
            "01 A - One.wav",
        ]);
        assert_eq!(
            names,
            vec![
                "01 A - One.wav",
                "2 B - Two.wav",
                "10 J - Ten.wav",
                // Unparsable names keep their relative input order
                "zeta.wav",
                "alpha.wav",
                "Intro - X.wav",
            ]
        );
    }

    #[test]
    fn test_duplicate_numbers_keep_input_order() {
        let names = sorted(vec!["03 Y - Second.wav", "03 X - First.wav", "01 Z - Zero.wav"]);
        assert_eq!(names, vec!["01 Z - Zero.wav", "03 Y - Second.wav", "03 X - First.wav"]);
    }
}
