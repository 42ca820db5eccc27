//! Estimation engine.
//!
//! Joins both period aggregates and extrapolates one period ahead.

use crate::aggregate::{aggregate_resolved, PeriodAggregate, RequiredColumns};
use demanda_core::{EstimationRow, EstimationTable, NormalizedTable, Period, Result};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Estimate next-period consumption per (department, tariff) group.
///
/// Both tables are validated before any work is done (A first, then B).
/// Every group seen in either table yields exactly one row; a group absent
/// from one side gets 0 for that side. Inputs are only read.
pub fn estimate(table_a: &NormalizedTable, table_b: &NormalizedTable) -> Result<EstimationTable> {
    let columns_a = RequiredColumns::resolve(table_a, Period::A)?;
    let columns_b = RequiredColumns::resolve(table_b, Period::B)?;

    let agg_a = aggregate_resolved(table_a, columns_a);
    let agg_b = aggregate_resolved(table_b, columns_b);
    debug!(
        rows_a = table_a.len(),
        rows_b = table_b.len(),
        groups_a = agg_a.len(),
        groups_b = agg_b.len(),
        "aggregated periods"
    );

    let table = EstimationTable::new(outer_join(agg_a, agg_b));
    info!(groups = table.len(), "estimation complete");
    Ok(table)
}

/// Full outer join on the group key, filling the absent side with 0.
fn outer_join(agg_a: PeriodAggregate, agg_b: PeriodAggregate) -> Vec<EstimationRow> {
    let mut joined: BTreeMap<_, (f64, f64)> = agg_a
        .into_iter()
        .map(|(key, a)| (key, (a, 0.0)))
        .collect();

    for (key, b) in agg_b {
        joined.entry(key).or_insert((0.0, 0.0)).1 = b;
    }

    joined
        .into_iter()
        .map(|(key, (a, b))| EstimationRow::from_consumption(key, a, b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use demanda_core::{Error, GroupKey, ParseConfig};
    use demanda_ingestion::Normalizer;

    fn table(rows: &[(&str, &str, &str)]) -> NormalizedTable {
        NormalizedTable::from_records(
            vec!["DEPARTAMENTO".into(), "TARIFA".into(), "CONSUMO".into()],
            rows.iter()
                .map(|(d, t, c)| vec![d.to_string(), t.to_string(), c.to_string()])
                .collect(),
            ParseConfig::standard(),
        )
        .unwrap()
    }

    #[test]
    fn test_growth_scenario() {
        let a = table(&[("X", "RESIDENTIAL", "10"), ("X", "RESIDENTIAL", "20")]);
        let b = table(&[("X", "RESIDENTIAL", "50")]);
        let result = estimate(&a, &b).unwrap();

        assert_eq!(result.len(), 1);
        let row = result.get(&GroupKey::new("X", "RESIDENTIAL")).unwrap();
        assert_eq!(row.consumo_2023, 30.0);
        assert_eq!(row.consumo_2024, 50.0);
        assert_eq!(row.crecimiento, 20.0);
        assert_eq!(row.consumo_2025_estimado, 70.0);
    }

    #[test]
    fn test_group_only_in_a_is_clamped() {
        let a = table(&[("Y", "COMMERCIAL", "40"), ("X", "RES", "1")]);
        let b = table(&[("X", "RES", "1")]);
        let result = estimate(&a, &b).unwrap();

        let row = result.get(&GroupKey::new("Y", "COMMERCIAL")).unwrap();
        assert_eq!(row.consumo_2023, 40.0);
        assert_eq!(row.consumo_2024, 0.0);
        assert_eq!(row.crecimiento, -40.0);
        assert_eq!(row.consumo_2025_estimado, 0.0);
    }

    #[test]
    fn test_outer_join_completeness() {
        let a = table(&[("A", "1", "5"), ("B", "1", "5"), ("B", "2", "1")]);
        let b = table(&[("B", "1", "7"), ("C", "3", "2"), ("C", "3", "2")]);
        let result = estimate(&a, &b).unwrap();

        let keys: Vec<_> = result.iter().map(|r| r.key.clone()).collect();
        assert_eq!(
            keys,
            vec![
                GroupKey::new("A", "1"),
                GroupKey::new("B", "1"),
                GroupKey::new("B", "2"),
                GroupKey::new("C", "3"),
            ]
        );
        assert!(result.get(&GroupKey::new("D", "1")).is_none());

        let only_b = result.get(&GroupKey::new("C", "3")).unwrap();
        assert_eq!(only_b.consumo_2023, 0.0);
        assert_eq!(only_b.consumo_2024, 4.0);
        assert_eq!(only_b.consumo_2025_estimado, 8.0);
    }

    #[test]
    fn test_arithmetic_and_non_negativity_hold_for_every_row() {
        let a = table(&[
            ("A", "R", "100"),
            ("B", "R", "10.5"),
            ("C", "R", "3"),
            ("D", "R", "0"),
        ]);
        let b = table(&[("A", "R", "20"), ("B", "R", "12.25"), ("C", "R", "1.5"), ("E", "R", "9")]);
        let result = estimate(&a, &b).unwrap();
        assert_eq!(result.len(), 5);

        for row in result.iter() {
            assert_eq!(row.crecimiento, row.consumo_2024 - row.consumo_2023);
            assert!(row.consumo_2025_estimado >= 0.0);
            assert_relative_eq!(
                row.consumo_2025_estimado,
                (2.0 * row.consumo_2024 - row.consumo_2023).max(0.0),
                epsilon = 1e-9
            );
        }
        assert_eq!(result.get(&GroupKey::new("C", "R")).unwrap().consumo_2025_estimado, 0.0);
    }

    #[test]
    fn test_inputs_are_not_modified() {
        let a = table(&[(" x", "res ", "1")]);
        let b = table(&[("X", "RES", "2")]);
        let before = a.clone();
        let result = estimate(&a, &b).unwrap();
        assert_eq!(a, before);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_missing_column_in_a_reported_first() {
        let bad = NormalizedTable::from_records(
            vec!["TARIFA".into(), "CONSUMO".into()],
            vec![],
            ParseConfig::standard(),
        )
        .unwrap();
        let good = table(&[("X", "R", "1")]);

        let err = estimate(&bad, &bad).unwrap_err();
        assert!(matches!(err, Error::Processing { ref column, period: Period::A } if column == "DEPARTAMENTO"));

        let err = estimate(&good, &bad).unwrap_err();
        assert!(matches!(err, Error::Processing { period: Period::B, .. }));
    }

    #[test]
    fn test_empty_tables() {
        let empty = table(&[]);
        let result = estimate(&empty, &empty).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_end_to_end_mixed_formats() {
        let normalizer = Normalizer::default();
        let a = normalizer
            .normalize(b"Departamento;Tarifa; Consumo \nX;RESIDENTIAL;10,5\nX;RESIDENTIAL;19,5\nY;COMMERCIAL;40,0\n")
            .unwrap();
        let b = normalizer
            .normalize(b"DEPARTAMENTO,TARIFA,CONSUMO,EXTRA\nx , residential,50,foo\n")
            .unwrap();

        let result = estimate(&a, &b).unwrap();
        assert_eq!(result.len(), 2);

        let x = result.get(&GroupKey::new("X", "RESIDENTIAL")).unwrap();
        assert_relative_eq!(x.consumo_2023, 30.0);
        assert_relative_eq!(x.consumo_2025_estimado, 70.0);

        let y = result.get(&GroupKey::new("Y", "COMMERCIAL")).unwrap();
        assert_relative_eq!(y.crecimiento, -40.0);
        assert_eq!(y.consumo_2025_estimado, 0.0);
    }
}
