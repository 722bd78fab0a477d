use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use wordsheet_model::{header_row, Column};

/// How field values that collide with the output syntax are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quoting {
    /// Quote fields containing the delimiter, a quote or a line break.
    #[default]
    Necessary,
    /// Write every field raw. A value containing the delimiter shifts the
    /// columns of its row.
    Never,
}

impl From<Quoting> for csv::QuoteStyle {
    fn from(quoting: Quoting) -> Self {
        match quoting {
            Quoting::Necessary => csv::QuoteStyle::Necessary,
            Quoting::Never => csv::QuoteStyle::Never,
        }
    }
}

/// Delimited output file.
///
/// The header write truncates the file; every row write reopens it in
/// append mode and closes it again, so no handle is held between rows.
pub struct RowSink {
    path: PathBuf,
    delimiter: u8,
    quoting: Quoting,
    width: Option<usize>,
}

impl RowSink {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8, quoting: Quoting) -> Self {
        Self {
            path: path.into(),
            delimiter,
            quoting,
            width: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a new output file with the header line for `columns`.
    pub fn write_header(&mut self, columns: &[Column]) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        self.write_record(file, &header_row(columns))?;
        self.width = Some(columns.len());
        tracing::debug!(path = %self.path.display(), columns = columns.len(), "Wrote header");
        Ok(())
    }

    /// Append one row. The row must have one value per header column.
    pub fn write_row(&self, values: &[String]) -> Result<()> {
        if let Some(width) = self.width {
            anyhow::ensure!(
                values.len() == width,
                "Row has {} values but the header has {width} columns",
                values.len()
            );
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        self.write_record(file, values)
    }

    fn write_record(&self, file: File, values: &[String]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(self.quoting.into())
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(values)
            .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        writer.flush()?;
        Ok(())
    }
}
