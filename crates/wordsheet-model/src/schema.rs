// Output column schema.
//
// Every output file is described by an ordered list of columns. The same
// list drives the header line, the flattener and the width check in the
// row writer, so the three can never disagree about column order.

/// Placeholder written for optional values the source did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// A single output row, one value per schema column.
pub type Row = Vec<String>;

/// A named output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Word,
    Pronunciation,
    PartOfSpeech,
    Definition,
    Synonyms,
    Antonyms,
    Origin,
    WordForm,
    /// Never populated by any source; always `N/A`.
    Stem,
    Example,
    /// All senses of a local dictionary definition, one per row.
    Definitions,
}

impl Column {
    /// The header text written for this column.
    pub fn header(self) -> &'static str {
        match self {
            Column::Word => "Word",
            Column::Pronunciation => "Pronunciation",
            Column::PartOfSpeech => "POS",
            Column::Definition => "Definition",
            Column::Synonyms => "Synonyms",
            Column::Antonyms => "Antonyms",
            Column::Origin => "Origin",
            Column::WordForm => "Word form",
            Column::Stem => "Stem",
            Column::Example => "Example",
            Column::Definitions => "Definitions",
        }
    }
}

/// Columns written when definitions come from the dictionary API.
pub const API_COLUMNS: [Column; 10] = [
    Column::Word,
    Column::Pronunciation,
    Column::PartOfSpeech,
    Column::Definition,
    Column::Synonyms,
    Column::Antonyms,
    Column::Origin,
    Column::WordForm,
    Column::Stem,
    Column::Example,
];

/// Columns written when definitions come from a local dictionary file.
pub const LOCAL_COLUMNS: [Column; 2] = [Column::Word, Column::Definitions];

/// Build the header row for a schema.
pub fn header_row(columns: &[Column]) -> Row {
    columns.iter().map(|c| c.header().to_string()).collect()
}
