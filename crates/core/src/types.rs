//! Core data types for the demand estimator.

use crate::error::{Error, Result};
use crate::numeric::parse_number;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Department column.
pub const DEPARTAMENTO: &str = "DEPARTAMENTO";
/// Tariff column.
pub const TARIFA: &str = "TARIFA";
/// Consumption column.
pub const CONSUMO: &str = "CONSUMO";
/// Period A aggregate.
pub const CONSUMO_2023: &str = "CONSUMO_2023";
/// Period B aggregate.
pub const CONSUMO_2024: &str = "CONSUMO_2024";
/// Growth between periods.
pub const CRECIMIENTO: &str = "CRECIMIENTO";
/// Next-period estimate.
pub const CONSUMO_2025_ESTIMADO: &str = "CONSUMO_2025_ESTIMADO";

/// Columns every input table must carry at estimation time.
pub const REQUIRED_COLUMNS: [&str; 3] = [DEPARTAMENTO, TARIFA, CONSUMO];

/// Output columns, in order.
pub const OUTPUT_COLUMNS: [&str; 6] = [
    DEPARTAMENTO,
    TARIFA,
    CONSUMO_2023,
    CONSUMO_2024,
    CRECIMIENTO,
    CONSUMO_2025_ESTIMADO,
];

/// Trim surrounding whitespace and upper-case.
///
/// Used both for column names and for department/tariff values.
#[inline]
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Field delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Delimiter {
    #[serde(rename = ",")]
    Comma,
    #[serde(rename = ";")]
    Semicolon,
}

impl Delimiter {
    /// Byte value for the CSV reader.
    #[inline]
    pub fn byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }
}

/// Decimal mark used in numeric cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecimalSeparator {
    #[serde(rename = ".")]
    Dot,
    #[serde(rename = ",")]
    Comma,
}

impl DecimalSeparator {
    #[inline]
    pub fn as_char(self) -> char {
        match self {
            DecimalSeparator::Dot => '.',
            DecimalSeparator::Comma => ',',
        }
    }
}

/// Text encoding of the raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "latin-1")]
    Latin1,
    #[serde(rename = "utf-8")]
    Utf8,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Utf8 => "utf-8",
        }
    }
}

/// One (delimiter, decimal, encoding) combination tried during ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParseConfig {
    pub delimiter: Delimiter,
    pub decimal: DecimalSeparator,
    pub encoding: TextEncoding,
}

impl ParseConfig {
    pub const fn new(delimiter: Delimiter, decimal: DecimalSeparator, encoding: TextEncoding) -> Self {
        Self {
            delimiter,
            decimal,
            encoding,
        }
    }

    /// Comma, dot, UTF-8: the format results are exported in.
    pub const fn standard() -> Self {
        Self::new(Delimiter::Comma, DecimalSeparator::Dot, TextEncoding::Utf8)
    }
}

impl fmt::Display for ParseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sep='{}' dec='{}' enc='{}'",
            self.delimiter.byte() as char,
            self.decimal.as_char(),
            self.encoding.label()
        )
    }
}

/// Default probing order. Earlier entries win.
pub const DEFAULT_CANDIDATES: [ParseConfig; 6] = [
    ParseConfig::new(Delimiter::Comma, DecimalSeparator::Dot, TextEncoding::Latin1),
    ParseConfig::new(Delimiter::Semicolon, DecimalSeparator::Dot, TextEncoding::Latin1),
    ParseConfig::new(Delimiter::Comma, DecimalSeparator::Comma, TextEncoding::Latin1),
    ParseConfig::new(Delimiter::Semicolon, DecimalSeparator::Comma, TextEncoding::Latin1),
    ParseConfig::new(Delimiter::Comma, DecimalSeparator::Dot, TextEncoding::Utf8),
    ParseConfig::new(Delimiter::Semicolon, DecimalSeparator::Dot, TextEncoding::Utf8),
];

/// Which of the two input periods a table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    /// The earlier period (2023).
    A,
    /// The later period (2024).
    B,
}

impl Period {
    pub fn year(self) -> u16 {
        match self {
            Period::A => 2023,
            Period::B => 2024,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::A => write!(f, "A ({})", self.year()),
            Period::B => write!(f, "B ({})", self.year()),
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" | "2023" => Ok(Period::A),
            "B" | "2024" => Ok(Period::B),
            other => Err(Error::config(format!("unknown period '{other}'"))),
        }
    }
}

/// Aggregation identity: (department, tariff), both trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub department: String,
    pub tariff: String,
}

impl GroupKey {
    /// Build a key, normalizing both parts.
    pub fn new(department: &str, tariff: &str) -> Self {
        Self {
            department: normalize_name(department),
            tariff: normalize_name(tariff),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.department, self.tariff)
    }
}

/// Ingestion output: normalized headers plus raw cells.
///
/// Construction guarantees a `CONSUMO` column whose every cell is numeric
/// (or missing) under `config.decimal`. Rows always have exactly one cell
/// per column.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    config: ParseConfig,
}

impl NormalizedTable {
    /// Build a table from headers and rows read with `config`.
    ///
    /// Headers are trimmed and upper-cased. Short rows are padded with empty
    /// cells; long rows are rejected.
    pub fn from_records(
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        config: ParseConfig,
    ) -> Result<Self> {
        let columns: Vec<String> = headers.iter().map(|h| normalize_name(h)).collect();
        let width = columns.len();

        let mut padded = Vec::with_capacity(rows.len());
        for (i, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(Error::RaggedRow {
                    row: i + 1,
                    expected: width,
                    found: row.len(),
                });
            }
            row.resize(width, String::new());
            padded.push(row);
        }

        let table = Self {
            columns,
            rows: padded,
            config,
        };
        table.validate_consumption()?;
        Ok(table)
    }

    fn validate_consumption(&self) -> Result<()> {
        let idx = self
            .column_index(CONSUMO)
            .ok_or_else(|| Error::ColumnNotFound(CONSUMO.to_string()))?;

        for (i, row) in self.rows.iter().enumerate() {
            let cell = &row[idx];
            if parse_number(cell, self.config.decimal).is_err() {
                return Err(Error::NonNumeric {
                    column: CONSUMO.to_string(),
                    row: i + 1,
                    value: cell.clone(),
                });
            }
        }
        Ok(())
    }

    /// Normalized column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Configuration that produced this table.
    pub fn config(&self) -> ParseConfig {
        self.config
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a column exists (name is normalized before lookup).
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Index of a column. Duplicate names resolve to the last occurrence.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_name(name);
        self.columns.iter().rposition(|c| *c == wanted)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &str> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| r[idx].as_str()))
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// One result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationRow {
    /// Group identity.
    pub key: GroupKey,
    /// Period A aggregate (0 when the group is absent from A).
    pub consumo_2023: f64,
    /// Period B aggregate (0 when the group is absent from B).
    pub consumo_2024: f64,
    /// B minus A. Never clamped.
    pub crecimiento: f64,
    /// B plus growth, floored at 0.
    pub consumo_2025_estimado: f64,
}

impl EstimationRow {
    /// Linear extrapolation from two period aggregates.
    pub fn from_consumption(key: GroupKey, consumo_2023: f64, consumo_2024: f64) -> Self {
        let crecimiento = consumo_2024 - consumo_2023;
        let raw = consumo_2024 + crecimiento;
        Self {
            key,
            consumo_2023,
            consumo_2024,
            crecimiento,
            consumo_2025_estimado: raw.max(0.0),
        }
    }
}

/// The full result: one row per group, ascending by key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EstimationTable {
    rows: Vec<EstimationRow>,
}

impl EstimationTable {
    /// Build a table, ordering rows by key.
    ///
    /// Keys must be unique.
    pub fn new(mut rows: Vec<EstimationRow>) -> Self {
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        debug_assert!(rows.windows(2).all(|w| w[0].key != w[1].key));
        Self { rows }
    }

    pub fn rows(&self) -> &[EstimationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up the row for a group.
    pub fn get(&self, key: &GroupKey) -> Option<&EstimationRow> {
        self.rows
            .binary_search_by(|r| r.key.cmp(key))
            .ok()
            .map(|i| &self.rows[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &EstimationRow> {
        self.rows.iter()
    }
}

/// Dimension a chart view splits totals by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartGrouping {
    /// One overall total.
    #[default]
    Total,
    /// Per department.
    Department,
    /// Per tariff.
    Tariff,
}

impl FromStr for ChartGrouping {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "total" | "none" => Ok(ChartGrouping::Total),
            "department" | "departamento" => Ok(ChartGrouping::Department),
            "tariff" | "tarifa" => Ok(ChartGrouping::Tariff),
            other => Err(Error::config(format!("unknown grouping '{other}'"))),
        }
    }
}

/// Summed consumption for one chart bar group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedConsumption {
    /// Department, tariff, or `TOTAL`.
    pub label: String,
    pub consumo_2023: f64,
    pub consumo_2024: f64,
    pub consumo_2025_estimado: f64,
}
