//! Core types and configuration for the demand estimator.
//!
//! This crate provides shared types used across all other crates:
//! - Normalized input tables and the estimation result table
//! - Parse configurations probed during ingestion
//! - Decimal-aware numeric coercion
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod numeric;
pub mod types;

pub use config::{Config, IngestionConfig};
pub use error::{Error, Result};
pub use types::*;
