//! Session state for a front end driving the estimator.

use crate::engine::estimate;
use demanda_core::{Error, EstimationTable, NormalizedTable, Period, Result};
use tracing::debug;

/// Holds the two loaded periods and the latest estimation.
///
/// Storing either period discards the current estimation. A failed
/// [`process`](Self::process) leaves the session unchanged.
#[derive(Debug, Clone, Default)]
pub struct EstimationSession {
    table_a: Option<NormalizedTable>,
    table_b: Option<NormalizedTable>,
    result: Option<EstimationTable>,
}

impl EstimationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one period's table. Returns its row count.
    pub fn store(&mut self, period: Period, table: NormalizedTable) -> usize {
        let rows = table.len();
        match period {
            Period::A => self.table_a = Some(table),
            Period::B => self.table_b = Some(table),
        }
        if self.result.take().is_some() {
            debug!(period = %period, "discarded stale estimation");
        }
        rows
    }

    /// The loaded table for a period, if any.
    pub fn table(&self, period: Period) -> Option<&NormalizedTable> {
        match period {
            Period::A => self.table_a.as_ref(),
            Period::B => self.table_b.as_ref(),
        }
    }

    /// Whether both periods are loaded.
    pub fn is_ready(&self) -> bool {
        self.table_a.is_some() && self.table_b.is_some()
    }

    /// Run the estimation over both periods. Returns the number of groups.
    pub fn process(&mut self) -> Result<usize> {
        let a = self.table_a.as_ref().ok_or(Error::PeriodNotLoaded(Period::A))?;
        let b = self.table_b.as_ref().ok_or(Error::PeriodNotLoaded(Period::B))?;
        let table = estimate(a, b)?;
        let groups = table.len();
        self.result = Some(table);
        Ok(groups)
    }

    /// The latest estimation, if one is current.
    pub fn result(&self) -> Option<&EstimationTable> {
        self.result.as_ref()
    }
}
