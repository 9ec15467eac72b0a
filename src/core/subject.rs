//! Text helpers shared by the transaction handlers

use crate::types::ImportRow;
use deunicode::deunicode;

/// Concatenate the non-blank description columns in index order
///
/// No separator is inserted between parts.
pub fn build_subject(row: &ImportRow) -> String {
    row.descriptions.iter().flatten().map(String::as_str).collect()
}

/// Transliterate a name to ASCII and drop everything that is not a word
/// character, whitespace or `^`
pub fn ascii_name(name: &str) -> String {
    deunicode(name)
        .chars()
        .filter(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '^') || c.is_ascii_whitespace()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::row_from_columns;
    use rstest::rstest;

    #[test]
    fn test_build_subject_concatenates() {
        let row = row_from_columns([("DESC1", "Sub"), ("DESC2", "ject")]);
        assert_eq!(build_subject(&row), "Subject");
    }

    #[test]
    fn test_build_subject_skips_blanks_and_keeps_index_order() {
        let row = row_from_columns([
            ("DESC14", "end"),
            ("DESC3", "  "),
            ("DESC2", "mid"),
            ("DESC1", "start-"),
        ]);
        assert_eq!(build_subject(&row), "start-midend");
    }

    #[test]
    fn test_build_subject_empty() {
        assert_eq!(build_subject(&ImportRow::default()), "");
    }

    #[rstest]
    #[case::umlauts("Max Müstermänn", "Max Mustermann")]
    #[case::punctuation("O'Brien & Söhne GmbH.", "OBrien  Sohne GmbH")]
    #[case::sharp_s("Straße", "Strasse")]
    #[case::caret("A^B", "A^B")]
    #[case::underscore("Max_Mustermann", "Max_Mustermann")]
    #[case::plain("Bob Baumeiter", "Bob Baumeiter")]
    fn test_ascii_name(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(ascii_name(name), expected);
    }
}
