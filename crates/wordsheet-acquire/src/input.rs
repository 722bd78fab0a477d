use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use wordsheet_model::DictionaryMapping;

/// Load terms from a text file, one per line.
///
/// Lines are kept as written apart from the line terminator, so leading and
/// trailing spaces survive until lookup trims them. Blank lines are terms too.
pub fn load_terms(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read terms file {}", path.display()))?;

    let terms: Vec<String> = text
        .lines()
        .map(str::to_string)
        .collect();

    tracing::debug!(path = %path.display(), terms = terms.len(), "Loaded terms");
    Ok(terms)
}

/// Load a local dictionary from a JSON object file.
pub fn load_dictionary(path: &Path) -> Result<DictionaryMapping> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dictionary {}", path.display()))?;
    let mapping = DictionaryMapping::from_json(&text)
        .with_context(|| format!("Failed to parse dictionary {}", path.display()))?;

    for term in mapping.skipped() {
        tracing::warn!(term = %term, "Skipping dictionary entry with a non-string definition");
    }
    tracing::info!(path = %path.display(), entries = mapping.len(), "Loaded dictionary");

    Ok(mapping)
}
