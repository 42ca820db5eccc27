//! CSV export of estimation results.
//!
//! Comma-delimited, dot decimal, UTF-8, header row first, columns in
//! [`OUTPUT_COLUMNS`](demanda_core::OUTPUT_COLUMNS) order.

use demanda_core::{Error, EstimationRow, EstimationTable, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Serialize)]
struct OutputRecord<'a> {
    #[serde(rename = "DEPARTAMENTO")]
    department: &'a str,
    #[serde(rename = "TARIFA")]
    tariff: &'a str,
    #[serde(rename = "CONSUMO_2023")]
    consumo_2023: f64,
    #[serde(rename = "CONSUMO_2024")]
    consumo_2024: f64,
    #[serde(rename = "CRECIMIENTO")]
    crecimiento: f64,
    #[serde(rename = "CONSUMO_2025_ESTIMADO")]
    consumo_2025_estimado: f64,
}

impl<'a> From<&'a EstimationRow> for OutputRecord<'a> {
    fn from(row: &'a EstimationRow) -> Self {
        Self {
            department: &row.key.department,
            tariff: &row.key.tariff,
            consumo_2023: row.consumo_2023,
            consumo_2024: row.consumo_2024,
            crecimiento: row.crecimiento,
            consumo_2025_estimado: row.consumo_2025_estimado,
        }
    }
}

/// Write the table as CSV to any writer.
pub fn write_csv<W: Write>(table: &EstimationTable, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(demanda_core::OUTPUT_COLUMNS)?;
    for row in table.iter() {
        wtr.serialize(OutputRecord::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render the table as a CSV string.
pub fn to_csv_string(table: &EstimationTable) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::decode(e.to_string()))
}

/// Write the table to a file, replacing it if present.
pub fn save_csv(table: &EstimationTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_csv(table, std::io::BufWriter::new(file))?;
    info!(path = %path.display(), groups = table.len(), "saved estimation");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use demanda_core::{
        numeric::parse_number, GroupKey, CONSUMO_2023, CONSUMO_2024, CONSUMO_2025_ESTIMADO,
        CRECIMIENTO, DEPARTAMENTO, OUTPUT_COLUMNS, TARIFA,
    };
    use demanda_ingestion::TableReader;

    fn sample() -> EstimationTable {
        EstimationTable::new(vec![
            EstimationRow::from_consumption(GroupKey::new("X", "RESIDENTIAL"), 30.0, 50.0),
            EstimationRow::from_consumption(GroupKey::new("Y", "COMMERCIAL"), 40.0, 0.0),
            EstimationRow::from_consumption(GroupKey::new("Peñalolén", "BT-1, rural"), 1.5, 2.25),
        ])
    }

    #[test]
    fn test_header_and_layout() {
        let csv = to_csv_string(&sample()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), OUTPUT_COLUMNS.join(","));
        assert_eq!(lines.next().unwrap(), "PEÑALOLÉN,\"BT-1, RURAL\",1.5,2.25,0.75,3.0");
        assert_eq!(lines.next().unwrap(), "X,RESIDENTIAL,30.0,50.0,20.0,70.0");
        assert_eq!(lines.next().unwrap(), "Y,COMMERCIAL,40.0,0.0,-40.0,0.0");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_round_trip_with_standard_config() {
        let original = sample();
        let csv = to_csv_string(&original).unwrap();
        let config = demanda_core::ParseConfig::standard();
        let parsed = TableReader::new(config).parse(csv.as_bytes()).unwrap();

        assert_eq!(parsed.headers, OUTPUT_COLUMNS);
        assert_eq!(parsed.rows.len(), original.len());

        let number = |cells: &[String], name: &str| {
            let idx = parsed.column_index(name).unwrap();
            parse_number(&cells[idx], config.decimal).unwrap().unwrap()
        };

        for (cells, row) in parsed.rows.iter().zip(original.iter()) {
            assert_eq!(cells[parsed.column_index(DEPARTAMENTO).unwrap()], row.key.department);
            assert_eq!(cells[parsed.column_index(TARIFA).unwrap()], row.key.tariff);
            assert_relative_eq!(number(cells, CONSUMO_2023), row.consumo_2023);
            assert_relative_eq!(number(cells, CONSUMO_2024), row.consumo_2024);
            assert_relative_eq!(number(cells, CRECIMIENTO), row.crecimiento);
            assert_relative_eq!(number(cells, CONSUMO_2025_ESTIMADO), row.consumo_2025_estimado);
        }
    }

    #[test]
    fn test_export_is_not_ingestible() {
        // Results carry no raw CONSUMO column, so ingestion rejects them.
        let csv = to_csv_string(&sample()).unwrap();
        let err = demanda_ingestion::Normalizer::default()
            .normalize(csv.as_bytes())
            .unwrap_err();
        assert!(err.is_ingestion());
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let csv = to_csv_string(&EstimationTable::default()).unwrap();
        assert_eq!(csv, format!("{}\n", OUTPUT_COLUMNS.join(",")));
    }

    #[test]
    fn test_save_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estimacion.csv");
        save_csv(&sample(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_csv_string(&sample()).unwrap());
    }
}
