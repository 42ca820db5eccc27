//! Delimited-text reading under a single parse configuration.

use crate::decode::decode;
use demanda_core::{normalize_name, NormalizedTable, ParseConfig, Result};

/// Headers and cells split under one configuration, with no column checks.
///
/// Headers are trimmed and upper-cased; cells are kept as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of a column. Duplicate names resolve to the last occurrence.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_name(name);
        self.headers.iter().rposition(|h| *h == wanted)
    }
}

/// Reads raw bytes into a [`NormalizedTable`] using one fixed configuration.
#[derive(Debug, Clone, Copy)]
pub struct TableReader {
    config: ParseConfig,
    leading_whitespace: bool,
}

impl TableReader {
    /// Create a reader for one configuration.
    pub fn new(config: ParseConfig) -> Self {
        Self {
            config,
            leading_whitespace: true,
        }
    }

    /// Whether whitespace after a delimiter is dropped (default: yes).
    pub fn leading_whitespace(mut self, skip: bool) -> Self {
        self.leading_whitespace = skip;
        self
    }

    /// Parse, then validate `CONSUMO` for ingestion.
    ///
    /// Every step must succeed; the first failure is returned unchanged.
    pub fn read(&self, bytes: &[u8]) -> Result<NormalizedTable> {
        let raw = self.parse(bytes)?;
        NormalizedTable::from_records(raw.headers, raw.rows, self.config)
    }

    /// Decode, split into records, and normalize headers.
    ///
    /// Any delimited text the configuration can read is accepted, including
    /// exported results.
    pub fn parse(&self, bytes: &[u8]) -> Result<RawTable> {
        let text = decode(bytes, self.config.encoding)?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter.byte())
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(normalize_name)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| self.cell(c)).collect());
        }

        Ok(RawTable { headers, rows })
    }

    fn cell(&self, raw: &str) -> String {
        if self.leading_whitespace {
            raw.trim_start().to_string()
        } else {
            raw.to_string()
        }
    }
}
