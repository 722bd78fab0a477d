// Per-run orchestration.
//
// Terms are processed strictly in input order, one at a time. The output
// header is written before the first term. A term that runs out of API
// attempts aborts the whole run; terms after it are never looked at.

use anyhow::Result;
use wordsheet_model::flatten::{flatten, Auxiliary, SenseMode};
use wordsheet_model::resolve::{local_rows, resolve};
use wordsheet_model::{Column, DictionaryMapping, API_COLUMNS, LOCAL_COLUMNS};

use crate::api::{fetch, DefinitionSource, RetryPolicy};
use crate::page::PageSource;
use crate::sink::RowSink;

/// Settings for a dictionary API run.
#[derive(Debug, Clone)]
pub struct ApiRunConfig {
    pub columns: Vec<Column>,
    pub retry: RetryPolicy,
    pub senses: SenseMode,
}

impl Default for ApiRunConfig {
    fn default() -> Self {
        Self {
            columns: API_COLUMNS.to_vec(),
            retry: RetryPolicy::default(),
            senses: SenseMode::First,
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub terms: usize,
    /// Terms that produced at least one row.
    pub found: usize,
    pub rows: usize,
}

/// Fetch every term from the dictionary API and write the flattened rows.
///
/// When `page` is given, its word forms are attached to the term's rows;
/// a page failure only costs the word form column.
pub async fn run_api<S, P>(
    terms: &[String],
    source: &S,
    page: Option<&P>,
    sink: &mut RowSink,
    config: &ApiRunConfig,
) -> Result<RunSummary>
where
    S: DefinitionSource,
    P: PageSource,
{
    tracing::info!(terms = terms.len(), "Getting definitions");
    sink.write_header(&config.columns)?;

    let mut summary = RunSummary {
        terms: terms.len(),
        ..Default::default()
    };

    for term in terms {
        let aux = match page {
            Some(page) => match page.page_data(term).await {
                Ok(data) => {
                    tracing::debug!(term = %term.trim(), parts_of_speech = ?data.parts_of_speech, "Page data");
                    Auxiliary::from_word_forms(data.word_forms.as_slice())
                }
                Err(e) => {
                    tracing::warn!(term = %term.trim(), error = %e, "Could not get page data, word form unavailable");
                    Auxiliary::default()
                }
            },
            None => Auxiliary::default(),
        };

        let fetched = fetch(source, term, &config.retry).await?;
        let rows = flatten(&fetched.entries, &aux, &config.columns, config.senses);
        for row in &rows {
            sink.write_row(row)?;
        }

        tracing::info!(term = %term.trim(), rows = rows.len(), attempts = fetched.attempts, "Wrote definitions");
        if !rows.is_empty() {
            summary.found += 1;
        }
        summary.rows += rows.len();
    }

    Ok(summary)
}

/// Look every term up in a local dictionary and write the resolved senses.
/// Terms with no match produce no rows.
pub fn run_local(
    terms: &[String],
    mapping: &DictionaryMapping,
    sink: &mut RowSink,
) -> Result<RunSummary> {
    tracing::info!(terms = terms.len(), "Getting definitions");
    sink.write_header(&LOCAL_COLUMNS)?;

    let mut summary = RunSummary {
        terms: terms.len(),
        ..Default::default()
    };

    for term in terms {
        let Some(definition) = resolve(mapping, term) else {
            tracing::debug!(term = %term.trim(), "No dictionary match");
            continue;
        };

        let rows = local_rows(term, definition);
        for row in &rows {
            sink.write_row(row)?;
        }
        summary.found += 1;
        summary.rows += rows.len();
    }

    Ok(summary)
}
