//! Per-period grouping.
//!
//! Sums `CONSUMO` by (department, tariff) for one normalized table.

use demanda_core::numeric::coerce_number;
use demanda_core::{Error, GroupKey, NormalizedTable, Period, Result, CONSUMO, DEPARTAMENTO, TARIFA};
use std::collections::BTreeMap;

/// Summed consumption per group for one period.
pub type PeriodAggregate = BTreeMap<GroupKey, f64>;

/// Positions of the required columns in one table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequiredColumns {
    department: usize,
    tariff: usize,
    consumption: usize,
}

impl RequiredColumns {
    /// Locate the required columns, failing on the first one missing
    /// (DEPARTAMENTO, then TARIFA, then CONSUMO).
    pub(crate) fn resolve(table: &NormalizedTable, period: Period) -> Result<Self> {
        let index = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| Error::processing(name, period))
        };
        Ok(Self {
            department: index(DEPARTAMENTO)?,
            tariff: index(TARIFA)?,
            consumption: index(CONSUMO)?,
        })
    }
}

/// Group one table by (department, tariff), summing consumption.
///
/// Consumption is re-coerced leniently: missing or unparseable cells count
/// as 0. The input table is not modified.
pub fn aggregate(table: &NormalizedTable, period: Period) -> Result<PeriodAggregate> {
    let columns = RequiredColumns::resolve(table, period)?;
    Ok(aggregate_resolved(table, columns))
}

pub(crate) fn aggregate_resolved(table: &NormalizedTable, columns: RequiredColumns) -> PeriodAggregate {
    let decimal = table.config().decimal;
    let mut groups = PeriodAggregate::new();

    for row in table.rows() {
        let key = GroupKey::new(&row[columns.department], &row[columns.tariff]);
        let value = coerce_number(&row[columns.consumption], decimal);
        *groups.entry(key).or_insert(0.0) += value;
    }

    groups
}
