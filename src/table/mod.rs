// src/table/mod.rs
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::{
    fs,
    io::{Read, Write},
    path::Path,
};
use tracing::debug;

use crate::error::ImportError;

/// A named-column table held fully in memory, every cell a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Used in error messages, e.g. "constituents".
    pub name: String,
    pub headers: Vec<String>,
    /// Each row has exactly `headers.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(name: impl Into<String>, headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Index of a column the caller cannot proceed without.
    pub fn require_column(&self, name: &str) -> Result<usize, ImportError> {
        self.column(name).ok_or_else(|| ImportError::MissingColumn {
            table: self.name.clone(),
            column: name.to_string(),
        })
    }

    /// Cell at (`row`, `col`), or "" when `col` is absent.
    pub fn cell(&self, row: usize, col: Option<usize>) -> &str {
        col.and_then(|c| self.rows.get(row).and_then(|r| r.get(c)))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// All values of a named column, in row order.
    pub fn column_values<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let idx = self.column(name)?;
        Some(self.rows.iter().map(move |r| r[idx].as_str()))
    }

    /// Parse CSV with a header row. Short rows are padded with empty cells.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self, csv::Error> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let mut table = Table::new(name, headers);

        for record in rdr.records() {
            let record = record?;
            table.push_row(record.iter());
        }
        Ok(table)
    }

    #[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn read_csv(name: &str, path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let csv_err = |source| ImportError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let file = fs::File::open(path).map_err(|e| csv_err(csv::Error::from(e)))?;
        let table = Table::from_reader(name, file).map_err(csv_err)?;
        debug!(rows = table.len(), cols = table.headers.len(), "loaded {}", name);
        Ok(table)
    }

    /// Write header + rows. The header is written even for an empty table.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
        wtr.write_record(&self.headers)
            .context("writing header row")?;
        for row in &self.rows {
            wtr.write_record(row).context("writing data row")?;
        }
        wtr.flush().context("flushing CSV writer")?;
        Ok(())
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
        let file = fs::File::create(path)
            .with_context(|| format!("creating output file {}", path.display()))?;
        self.to_writer(file)
            .with_context(|| format!("writing {} to {}", self.name, path.display()))
    }
}
