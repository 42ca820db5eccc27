//! Multi-configuration probing.
//!
//! Tries each configured (delimiter, decimal, encoding) triple in order and
//! accepts the first that yields a table with a numeric `CONSUMO` column.

use crate::reader::TableReader;
use demanda_core::{Config, Error, IngestionConfig, NormalizedTable, ParseConfig, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Receives progress while configurations are probed.
///
/// Hooks only observe; they cannot change which configuration is accepted.
pub trait ProbeObserver {
    /// A configuration is about to be tried. `index` is zero-based.
    fn on_attempt(&mut self, _index: usize, _total: usize, _config: &ParseConfig) {}

    /// A configuration failed.
    fn on_failure(&mut self, _index: usize, _config: &ParseConfig, _error: &Error) {}

    /// A configuration succeeded; probing stops.
    fn on_success(&mut self, _index: usize, _config: &ParseConfig) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProbeObserver for NoopObserver {}

/// Observer that reports progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProbeObserver for TracingObserver {
    fn on_attempt(&mut self, index: usize, total: usize, config: &ParseConfig) {
        debug!(attempt = index + 1, total, "trying {config}");
    }

    fn on_failure(&mut self, index: usize, config: &ParseConfig, error: &Error) {
        debug!(attempt = index + 1, "{config} failed: {error}");
    }

    fn on_success(&mut self, index: usize, config: &ParseConfig) {
        info!(attempt = index + 1, "accepted {config}");
    }
}

/// Ingestion normalizer.
#[derive(Debug, Clone)]
pub struct Normalizer {
    candidates: Vec<ParseConfig>,
    leading_whitespace: bool,
}

impl Normalizer {
    /// Create a normalizer from configuration.
    pub fn new(config: &Config) -> Self {
        Self::from_ingestion_config(&config.ingestion)
    }

    pub fn from_ingestion_config(config: &IngestionConfig) -> Self {
        Self {
            candidates: config.candidates.clone(),
            leading_whitespace: config.leading_whitespace,
        }
    }

    /// Candidates in probing order.
    pub fn candidates(&self) -> &[ParseConfig] {
        &self.candidates
    }

    /// Normalize raw bytes, logging progress through `tracing`.
    pub fn normalize(&self, bytes: &[u8]) -> Result<NormalizedTable> {
        self.normalize_with_observer(bytes, &mut TracingObserver)
    }

    /// Read a file and normalize its contents.
    pub fn normalize_path(&self, path: impl AsRef<Path>) -> Result<NormalizedTable> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "read input file");
        self.normalize(&bytes)
    }

    /// Normalize raw bytes, reporting each attempt to `observer`.
    ///
    /// Strict priority: the first successful candidate is returned and no
    /// later candidate is tried.
    pub fn normalize_with_observer(
        &self,
        bytes: &[u8],
        observer: &mut dyn ProbeObserver,
    ) -> Result<NormalizedTable> {
        let total = self.candidates.len();
        let mut last_error = Error::config("no parse configurations to try");

        for (index, config) in self.candidates.iter().enumerate() {
            observer.on_attempt(index, total, config);

            let reader = TableReader::new(*config).leading_whitespace(self.leading_whitespace);
            match reader.read(bytes) {
                Ok(table) => {
                    observer.on_success(index, config);
                    return Ok(table);
                }
                Err(e) => {
                    observer.on_failure(index, config, &e);
                    last_error = e;
                }
            }
        }

        warn!(attempts = total, "no configuration could read the input: {last_error}");
        Err(Error::Ingestion {
            attempts: total,
            last: Box::new(last_error),
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
