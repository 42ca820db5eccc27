//! PyO3 bindings for the demand estimator.
//!
//! Exposes a `Session` that a Python front end drives:
//! - Loading the two period files (with automatic format detection)
//! - Running the aggregation and estimation
//! - Chart views and CSV export of the result

use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use demanda_core::{
    ChartGrouping, Error as RustError, EstimationRow as RustEstimationRow, EstimationTable,
    GroupedConsumption as RustGroupedConsumption, Period,
};
use demanda_estimation::{grouped, save_csv, to_csv_string, EstimationSession};
use demanda_ingestion::Normalizer;
use std::path::PathBuf;

create_exception!(demanda, IngestionError, PyException);
create_exception!(demanda, ProcessingError, PyException);

fn to_py_err(err: RustError) -> PyErr {
    match err {
        e @ RustError::Ingestion { .. } => IngestionError::new_err(e.to_string()),
        e @ RustError::Processing { .. } => ProcessingError::new_err(e.to_string()),
        RustError::Io(e) => PyIOError::new_err(e.to_string()),
        e @ RustError::PeriodNotLoaded(_) => PyRuntimeError::new_err(e.to_string()),
        e => PyValueError::new_err(e.to_string()),
    }
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// One estimation result row.
#[pyclass]
#[derive(Clone)]
pub struct EstimationRow {
    #[pyo3(get)]
    pub department: String,
    #[pyo3(get)]
    pub tariff: String,
    #[pyo3(get)]
    pub consumo_2023: f64,
    #[pyo3(get)]
    pub consumo_2024: f64,
    #[pyo3(get)]
    pub crecimiento: f64,
    #[pyo3(get)]
    pub consumo_2025_estimado: f64,
}

#[pymethods]
impl EstimationRow {
    fn __repr__(&self) -> String {
        format!(
            "EstimationRow(department={:?}, tariff={:?}, consumo_2023={}, consumo_2024={}, crecimiento={}, consumo_2025_estimado={})",
            self.department,
            self.tariff,
            self.consumo_2023,
            self.consumo_2024,
            self.crecimiento,
            self.consumo_2025_estimado
        )
    }
}

impl From<&RustEstimationRow> for EstimationRow {
    fn from(r: &RustEstimationRow) -> Self {
        EstimationRow {
            department: r.key.department.clone(),
            tariff: r.key.tariff.clone(),
            consumo_2023: r.consumo_2023,
            consumo_2024: r.consumo_2024,
            crecimiento: r.crecimiento,
            consumo_2025_estimado: r.consumo_2025_estimado,
        }
    }
}

/// Summed consumption for one chart group.
#[pyclass]
#[derive(Clone)]
pub struct GroupedConsumption {
    #[pyo3(get)]
    pub label: String,
    #[pyo3(get)]
    pub consumo_2023: f64,
    #[pyo3(get)]
    pub consumo_2024: f64,
    #[pyo3(get)]
    pub consumo_2025_estimado: f64,
}

#[pymethods]
impl GroupedConsumption {
    fn __repr__(&self) -> String {
        format!(
            "GroupedConsumption(label={:?}, consumo_2023={}, consumo_2024={}, consumo_2025_estimado={})",
            self.label, self.consumo_2023, self.consumo_2024, self.consumo_2025_estimado
        )
    }
}

impl From<RustGroupedConsumption> for GroupedConsumption {
    fn from(g: RustGroupedConsumption) -> Self {
        GroupedConsumption {
            label: g.label,
            consumo_2023: g.consumo_2023,
            consumo_2024: g.consumo_2024,
            consumo_2025_estimado: g.consumo_2025_estimado,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Holds the two loaded periods and the latest estimation.
///
/// Loading either period discards the current estimation. A failed
/// `process` leaves the session unchanged.
#[pyclass]
pub struct Session {
    normalizer: Normalizer,
    inner: EstimationSession,
}

impl Session {
    fn result(&self) -> PyResult<&EstimationTable> {
        self.inner
            .result()
            .ok_or_else(|| PyRuntimeError::new_err("no estimation available; call process() first"))
    }
}

#[pymethods]
impl Session {
    #[new]
    fn new() -> Self {
        Session {
            normalizer: Normalizer::default(),
            inner: EstimationSession::new(),
        }
    }

    /// Load a period ("A"/"2023" or "B"/"2024") from a file. Returns the row count.
    fn load(&mut self, period: &str, path: PathBuf) -> PyResult<usize> {
        let period: Period = period.parse().map_err(to_py_err)?;
        let table = self.normalizer.normalize_path(&path).map_err(to_py_err)?;
        Ok(self.inner.store(period, table))
    }

    /// Load a period from raw bytes. Returns the row count.
    fn load_bytes(&mut self, period: &str, data: &[u8]) -> PyResult<usize> {
        let period: Period = period.parse().map_err(to_py_err)?;
        let table = self.normalizer.normalize(data).map_err(to_py_err)?;
        Ok(self.inner.store(period, table))
    }

    /// Parse configuration that read a loaded period, e.g. "sep=';' dec=',' enc='latin-1'".
    fn detected_format(&self, period: &str) -> PyResult<Option<String>> {
        let period: Period = period.parse().map_err(to_py_err)?;
        Ok(self.inner.table(period).map(|t| t.config().to_string()))
    }

    /// Whether both periods are loaded.
    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    /// Run the estimation. Returns the number of groups.
    fn process(&mut self) -> PyResult<usize> {
        self.inner.process().map_err(to_py_err)
    }

    /// Result rows, ascending by (department, tariff).
    fn rows(&self) -> PyResult<Vec<EstimationRow>> {
        Ok(self.result()?.iter().map(EstimationRow::from).collect())
    }

    /// Chart view: "total", "department" or "tariff".
    #[pyo3(signature = (grouping = "total"))]
    fn grouped(&self, grouping: &str) -> PyResult<Vec<GroupedConsumption>> {
        let grouping: ChartGrouping = grouping.parse().map_err(to_py_err)?;
        Ok(grouped(self.result()?, grouping)
            .into_iter()
            .map(GroupedConsumption::from)
            .collect())
    }

    /// Write the result as CSV.
    fn export(&self, path: PathBuf) -> PyResult<()> {
        save_csv(self.result()?, &path).map_err(to_py_err)
    }

    /// The result as CSV text.
    fn to_csv(&self) -> PyResult<String> {
        to_csv_string(self.result()?).map_err(to_py_err)
    }
}

// ============================================================================
// Module Definition
// ============================================================================

/// Demand estimator - consumption ingestion and one-period-ahead estimation.
#[pymodule]
fn demanda(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<EstimationRow>()?;
    m.add_class::<GroupedConsumption>()?;
    m.add_class::<Session>()?;

    m.add("IngestionError", m.py().get_type_bound::<IngestionError>())?;
    m.add("ProcessingError", m.py().get_type_bound::<ProcessingError>())?;

    Ok(())
}
