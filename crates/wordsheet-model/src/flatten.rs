// Flatten a dictionary API response into output rows.
//
// The response nests word entries → meanings → definitions. Each meaning
// becomes one row by default, built from its first definition entry. Later
// definition entries of the same meaning are dropped unless
// `SenseMode::All` is requested, which emits one row per definition entry.

use crate::api_response::{DefinitionEntry, Meaning, WordEntry};
use crate::schema::{Column, Row, NOT_AVAILABLE};

/// Which definition entries of a meaning produce rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SenseMode {
    /// Only the first definition entry of each meaning.
    #[default]
    First,
    /// Every definition entry of each meaning.
    All,
}

/// Values that do not come from the API but are attached to every row
/// of a term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Auxiliary {
    /// Comma-joined word forms scraped from the dictionary page, if the page
    /// was fetched and parsed.
    pub word_form: Option<String>,
}

impl Auxiliary {
    /// Build the word form value from scraped forms. Commas inside a form
    /// are removed so the joined value splits back cleanly.
    pub fn from_word_forms<S: AsRef<str>>(forms: &[S]) -> Self {
        let joined = forms
            .iter()
            .map(|f| f.as_ref().replace(',', ""))
            .collect::<Vec<_>>()
            .join(",");
        Auxiliary {
            word_form: Some(joined),
        }
    }
}

/// Flatten word entries into rows laid out by `columns`.
pub fn flatten(
    entries: &[WordEntry],
    aux: &Auxiliary,
    columns: &[Column],
    senses: SenseMode,
) -> Vec<Row> {
    let mut rows = Vec::new();

    for entry in entries {
        for meaning in &entry.meanings {
            let selected: &[DefinitionEntry] = match senses {
                SenseMode::First => meaning.definitions.get(..1).unwrap_or(&[]),
                SenseMode::All => &meaning.definitions,
            };
            for definition in selected {
                let row = columns
                    .iter()
                    .map(|&column| field(column, entry, meaning, definition, aux))
                    .collect();
                rows.push(row);
            }
        }
    }

    rows
}

fn field(
    column: Column,
    entry: &WordEntry,
    meaning: &Meaning,
    definition: &DefinitionEntry,
    aux: &Auxiliary,
) -> String {
    match column {
        Column::Word => entry.word.clone(),
        Column::Pronunciation => or_not_available(entry.phonetic.as_deref()),
        Column::PartOfSpeech => or_not_available(meaning.part_of_speech.as_deref()),
        Column::Definition | Column::Definitions => definition.definition.clone(),
        Column::Synonyms => definition.synonyms.join(","),
        Column::Antonyms => definition.antonyms.join(","),
        Column::Origin => or_not_available(entry.origin.as_deref()),
        Column::WordForm => aux
            .word_form
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        Column::Stem => NOT_AVAILABLE.to_string(),
        // An example that is present but empty is kept as-is
        Column::Example => definition
            .example
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

fn or_not_available(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
