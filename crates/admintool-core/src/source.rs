//! Boundary between data sources and the table engine.
//!
//! A data source (cloud inventory, directory, database report, HTTP proxy) hands
//! over its column definitions and a list of loosely typed [`Record`]s. Sources
//! that could not be initialized are kept as [`Source::Disabled`] so that call
//! sites render a placeholder table instead of special-casing the failure.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::fmt::{format_decimal, format_integer};
use crate::table::{CellValue, Column, Filter, FilterTable, Row, Status};

/// One raw field value as produced by a data source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Pre-built link, span or list descriptor, used as-is.
    Cell(CellValue),
}

impl RawValue {
    /// Display text. Numbers are grouped when `grouped` is set.
    pub fn to_text(&self, grouped: bool) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(v) if grouped => format_integer(*v),
            Self::Int(v) => v.to_string(),
            Self::Float(v) if grouped => format_decimal(*v),
            Self::Float(v) => v.to_string(),
            Self::Text(s) => s.clone(),
            Self::Cell(c) => c.value(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<CellValue> for RawValue {
    fn from(c: CellValue) -> Self {
        Self::Cell(c)
    }
}

/// Column key to raw value. The reserved key `cssclass` tags the row.
pub type Record = BTreeMap<String, RawValue>;

/// Build a [`Record`] from `(key, value)` pairs.
pub fn record<K, V, I>(pairs: I) -> Record
where
    K: Into<String>,
    V: Into<RawValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Request-level parameters passed to a data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub route: String,
    pub params: BTreeMap<String, String>,
    pub limit: Option<usize>,
    pub offset: usize,
}

/// Error raised by a data source while fetching.
#[derive(Debug)]
pub enum SourceError {
    /// The requested resource does not exist.
    NotFound(String),
    /// The backing system failed or returned unusable data.
    Backend(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotFound(what) => write!(f, "not found: {}", what),
            SourceError::Backend(msg) => write!(f, "backend error: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

/// Everything a data source hands over for one table.
#[derive(Debug, Clone, Default)]
pub struct TableSpec {
    pub columns: Vec<Column>,
    /// Already windowed by `limit`/`offset` if paginated.
    pub records: Vec<Record>,
    /// Markdown shown above the table.
    pub description: String,
    /// Checkbox filters offered above the table.
    pub filters: Vec<Filter>,
    /// Whether the table gets a totals footer.
    pub totals: bool,
}

impl TableSpec {
    pub fn new(columns: Vec<Column>, records: Vec<Record>) -> Self {
        Self {
            columns,
            records,
            ..Self::default()
        }
    }
}

/// Anything that can supply table data.
///
/// A table is built from a single [`DataSource::fetch`] call.
pub trait DataSource: Send + Sync {
    /// Short name used in logs and status messages.
    fn name(&self) -> &str;

    fn fetch(&self, query: &Query) -> Result<TableSpec, SourceError>;
}

/// A data source that is either usable or known to be unavailable.
pub enum Source {
    Enabled(Box<dyn DataSource>),
    Disabled { name: String, reason: String },
}

impl Source {
    /// Wrap the outcome of a fallible source constructor.
    pub fn from_init<E: fmt::Display>(
        name: &str,
        init: Result<Box<dyn DataSource>, E>,
    ) -> Self {
        match init {
            Ok(source) => Self::Enabled(source),
            Err(e) => {
                warn!(source = name, error = %e, "data source disabled");
                Self::Disabled {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Enabled(s) => s.name(),
            Self::Disabled { name, .. } => name,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// Fetch and shape a table.
    ///
    /// A disabled source yields a `SKIP` placeholder and a backend error yields
    /// an `ERROR` placeholder carrying the error text. Only `NotFound` is
    /// returned to the caller.
    pub fn table(&self, query: &Query) -> Result<FilterTable, SourceError> {
        let source = match self {
            Self::Disabled { name, reason } => {
                return Ok(FilterTable::empty(
                    &format!("{} is not available", name),
                    Status::Skip,
                    reason,
                ));
            }
            Self::Enabled(source) => source,
        };

        let spec = match source.fetch(query) {
            Ok(spec) => spec,
            Err(SourceError::NotFound(what)) => return Err(SourceError::NotFound(what)),
            Err(e) => {
                warn!(source = source.name(), route = %query.route, error = %e, "fetch failed");
                return Ok(failed(source.name(), &e.to_string()));
            }
        };
        debug!(source = source.name(), rows = spec.records.len(), "fetched records");

        let rows: Vec<Row> = spec
            .records
            .iter()
            .map(|rec| Row::make_row(&spec.columns, rec))
            .collect();
        let mut table = match FilterTable::new(spec.columns) {
            Ok(table) => table,
            Err(e) => {
                warn!(source = source.name(), route = %query.route, error = %e, "bad columns");
                return Ok(failed(source.name(), &e.to_string()));
            }
        };
        if spec.totals {
            table = table.with_totals();
        }
        table.set_description(spec.description);
        for filter in spec.filters {
            table.add_filter(filter);
        }
        if let Some(limit) = query.limit {
            table.paginate(limit, query.offset, &query.route, query.params.clone());
        }
        for row in rows {
            table.add_row(row);
        }
        Ok(table)
    }
}

fn failed(name: &str, error: &str) -> FilterTable {
    FilterTable::empty(&format!("{} request failed", name), Status::Error, error)
}
