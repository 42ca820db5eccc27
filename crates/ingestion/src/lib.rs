//! Ingestion and normalization for the demand estimator.
//!
//! This crate handles:
//! - Decoding raw bytes as Latin-1 or UTF-8
//! - Reading delimited text under one parse configuration
//! - Probing configurations in priority order until one yields a numeric `CONSUMO` column

pub mod decode;
pub mod normalizer;
pub mod reader;

pub use normalizer::{NoopObserver, Normalizer, ProbeObserver, TracingObserver};
pub use reader::{RawTable, TableReader};
