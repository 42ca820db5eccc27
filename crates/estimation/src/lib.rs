//! Aggregation and estimation for the demand estimator.
//!
//! This crate handles:
//! - Grouping each period's consumption by (department, tariff)
//! - Outer-joining both periods and extrapolating one period ahead
//! - Chart views over the result (total, per department, per tariff)
//! - CSV export of the result
//! - Session state for interactive front ends

pub mod aggregate;
pub mod engine;
pub mod export;
pub mod session;
pub mod view;

pub use aggregate::{aggregate, PeriodAggregate};
pub use engine::estimate;
pub use export::{save_csv, to_csv_string, write_csv};
pub use session::EstimationSession;
pub use view::{grouped, totals};
