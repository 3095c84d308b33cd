pub(crate) fn normalize_cell(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reads the `Correct` column: an option letter (`A`..) or a zero-based index.
pub(crate) fn parse_correct(value: &str) -> Option<i64> {
    let trimmed = normalize_cell(value);
    if let Ok(index) = trimmed.parse::<i64>() {
        return Some(index);
    }

    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => {
            Some(i64::from(letter.to_ascii_uppercase() as u8 - b'A'))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_strips_invisible_marks() {
        assert_eq!(
            normalize_cell("\u{feff}  Control of  Substances\u{200b} Hazardous "),
            "Control of Substances Hazardous"
        );
    }

    #[test]
    fn correct_column_accepts_letters_and_indices() {
        assert_eq!(parse_correct("b"), Some(1));
        assert_eq!(parse_correct(" D "), Some(3));
        assert_eq!(parse_correct("2"), Some(2));
        assert_eq!(parse_correct("-1"), Some(-1));
        assert_eq!(parse_correct("BC"), None);
        assert_eq!(parse_correct(""), None);
    }
}
