//! Read-only chart views over an estimation table.

use demanda_core::{ChartGrouping, EstimationRow, EstimationTable, GroupedConsumption};
use std::collections::BTreeMap;

/// Label used for the unsplit total.
pub const TOTAL_LABEL: &str = "TOTAL";

#[derive(Debug, Clone, Copy, Default)]
struct Sums {
    consumo_2023: f64,
    consumo_2024: f64,
    consumo_2025_estimado: f64,
}

impl Sums {
    fn add(&mut self, row: &EstimationRow) {
        self.consumo_2023 += row.consumo_2023;
        self.consumo_2024 += row.consumo_2024;
        self.consumo_2025_estimado += row.consumo_2025_estimado;
    }

    fn labelled(self, label: String) -> GroupedConsumption {
        GroupedConsumption {
            label,
            consumo_2023: self.consumo_2023,
            consumo_2024: self.consumo_2024,
            consumo_2025_estimado: self.consumo_2025_estimado,
        }
    }
}

/// Sum of every row.
pub fn totals(table: &EstimationTable) -> GroupedConsumption {
    let mut sums = Sums::default();
    for row in table.iter() {
        sums.add(row);
    }
    sums.labelled(TOTAL_LABEL.to_string())
}

/// Sum the table by the chosen dimension, ascending by label.
///
/// `Total` yields a single entry even for an empty table.
pub fn grouped(table: &EstimationTable, grouping: ChartGrouping) -> Vec<GroupedConsumption> {
    let label_of: fn(&EstimationRow) -> &str = match grouping {
        ChartGrouping::Total => return vec![totals(table)],
        ChartGrouping::Department => |row| row.key.department.as_str(),
        ChartGrouping::Tariff => |row| row.key.tariff.as_str(),
    };

    let mut groups: BTreeMap<&str, Sums> = BTreeMap::new();
    for row in table.iter() {
        groups.entry(label_of(row)).or_default().add(row);
    }

    groups
        .into_iter()
        .map(|(label, sums)| sums.labelled(label.to_string()))
        .collect()
}
