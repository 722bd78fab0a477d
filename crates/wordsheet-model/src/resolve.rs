// Resolve input terms against a local dictionary.
//
// Lookup is two-phase: an exact match on the trimmed term, then a
// case-insensitive prefix scan over the dictionary in file order. The scan
// returns the first key that matches, which depends only on where the key
// sits in the file. It is not the shortest or alphabetically first match.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::dictionary::DictionaryMapping;
use crate::schema::Row;

static SENSE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("valid regex"));

/// Look up the definition for `term`.
///
/// 1. The term is trimmed. If the trimmed term is a key (case-sensitive),
///    its definition is returned even when other keys would also match
///    as prefixes.
/// 2. Otherwise keys are scanned in dictionary order and the first key whose
///    case-folded form starts with the case-folded term wins.
///
/// The tie-break in step 2 is file order and nothing else. A term of only
/// whitespace matches the first key in the dictionary.
pub fn resolve<'a>(mapping: &'a DictionaryMapping, term: &str) -> Option<&'a str> {
    let term = term.trim();

    if let Some(definition) = mapping.get(term) {
        return Some(definition);
    }

    let needle = fold_case(term);
    mapping
        .iter()
        .find(|(key, _)| fold_case(key).starts_with(&needle))
        .map(|(_, definition)| definition)
}

/// Comparison key for prefix matching: NFC, lower-cased.
fn fold_case(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

/// Split a dictionary definition into its senses.
///
/// Senses are separated by one or more line breaks and each one is
/// trimmed. Pieces left blank by a leading or trailing break, or by a line of
/// only spaces, are kept as empty senses, so every piece gets its own row.
pub fn split_senses(definition: &str) -> Vec<String> {
    SENSE_BREAK
        .split(definition)
        .map(|s| s.trim().to_string())
        .collect()
}

/// Rows for a resolved local definition.
///
/// The first sense is paired with the term; later senses are continuation
/// rows with an empty word column.
pub fn local_rows(term: &str, definition: &str) -> Vec<Row> {
    let term = term.trim();
    split_senses(definition)
        .into_iter()
        .enumerate()
        .map(|(i, sense)| {
            let word = if i == 0 { term.to_string() } else { String::new() };
            vec![word, sense]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DictionaryMapping {
        DictionaryMapping::from_pairs([
            ("Abandonment", "The act of abandoning."),
            ("abandon", "To give up wholly."),
            ("Cat", "A small domesticated carnivore.\nA spiteful woman."),
            ("catalog", "A list or enumeration."),
        ])
    }

    #[test]
    fn test_exact_match_wins_over_prefix() {
        let mapping = sample();
        // "Abandonment" comes first and would match "abandon" as a prefix
        assert_eq!(resolve(&mapping, "abandon"), Some("To give up wholly."));
    }

    #[test]
    fn test_exact_match_trims_input() {
        let mapping = sample();
        assert_eq!(resolve(&mapping, "  catalog \n"), Some("A list or enumeration."));
    }

    #[test]
    fn test_prefix_fallback_is_case_insensitive() {
        let mapping = sample();
        assert_eq!(resolve(&mapping, "ABANDONM"), Some("The act of abandoning."));
        assert_eq!(resolve(&mapping, "cata"), Some("A list or enumeration."));
    }

    #[test]
    fn test_prefix_fallback_takes_first_in_file_order() {
        let mapping = sample();
        // Both "Abandonment" and "abandon" start with "aban"; file order decides
        assert_eq!(resolve(&mapping, "aban"), Some("The act of abandoning."));
        // "cat" is not an exact key ("Cat" is), so the scan finds "Cat" first
        assert_eq!(
            resolve(&mapping, "cat"),
            Some("A small domesticated carnivore.\nA spiteful woman.")
        );
    }

    #[test]
    fn test_no_match() {
        let mapping = sample();
        assert_eq!(resolve(&mapping, "dog"), None);
        assert!(local_rows_for(&mapping, "dog").is_empty());
    }

    #[test]
    fn test_prefix_fallback_normalizes_unicode() {
        // Decomposed "e" + combining acute in the key, precomposed in the query
        let mapping = DictionaryMapping::from_pairs([("Cafe\u{0301}", "A coffee house.")]);
        assert_eq!(resolve(&mapping, "caf\u{00e9}"), Some("A coffee house."));
    }

    #[test]
    fn test_split_senses() {
        assert_eq!(
            split_senses("a sense\nb sense\n\n\nc sense"),
            vec!["a sense", "b sense", "c sense"]
        );
        assert_eq!(split_senses("  only one  "), vec!["only one"]);
        assert_eq!(split_senses(""), vec![""]);
    }

    #[test]
    fn test_split_senses_keeps_blank_pieces() {
        assert_eq!(split_senses("a sense\n   \nc sense\n"), vec!["a sense", "", "c sense", ""]);
        assert_eq!(split_senses("\nfirst"), vec!["", "first"]);
    }

    #[test]
    fn test_local_rows_blank_middle_line_and_trailing_break() {
        let rows = local_rows("w", "a sense\n   \nc sense\n");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec!["w".to_string(), "a sense".to_string()]);
        assert_eq!(rows[1], vec![String::new(), String::new()]);
        assert_eq!(rows[2], vec![String::new(), "c sense".to_string()]);
        assert_eq!(rows[3], vec![String::new(), String::new()]);
    }

    #[test]
    fn test_local_rows_continuations() {
        let rows = local_rows("Word ", "a sense\nb sense\nc sense");
        assert_eq!(
            rows,
            vec![
                vec!["Word".to_string(), "a sense".to_string()],
                vec![String::new(), "b sense".to_string()],
                vec![String::new(), "c sense".to_string()],
            ]
        );
    }

    fn local_rows_for(mapping: &DictionaryMapping, term: &str) -> Vec<Row> {
        resolve(mapping, term)
            .map(|d| local_rows(term, d))
            .unwrap_or_default()
    }
}
