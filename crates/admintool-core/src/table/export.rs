//! Machine-readable projections of a [`FilterTable`]: CSV, text and
//! structured data for JSON responses.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{FilterTable, Status};

/// Column metadata carried in structured output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct ColumnData {
    pub key: String,
    pub header: String,
}

/// Structured view of a table: one map of column key to bare value per row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct TableData {
    pub status: Status,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status_message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub columns: Vec<ColumnData>,
    #[cfg_attr(feature = "api", schema(value_type = Vec<Object>))]
    pub rows: Vec<Map<String, Value>>,
}

impl FilterTable {
    /// Structured projection. Links and spans collapse to their bare value,
    /// lists to arrays of bare values.
    pub fn to_data(&self) -> TableData {
        let rows = self
            .rows()
            .iter()
            .map(|row| {
                self.columns()
                    .iter()
                    .zip(&row.cells)
                    .map(|(col, cell)| (col.key.clone(), col.render_data(cell)))
                    .collect()
            })
            .collect();
        TableData {
            status: self.status(),
            status_message: self.status_message().to_string(),
            description: self.description().to_string(),
            columns: self
                .columns()
                .iter()
                .map(|c| ColumnData {
                    key: c.key.clone(),
                    header: c.header.clone(),
                })
                .collect(),
            rows,
        }
    }

    /// CSV with a header row of column headers.
    ///
    /// Grouped decimals are written as plain decimals; quoting follows RFC 4180.
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        if self.is_blank() {
            return Ok(String::new());
        }
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        wtr.write_record(self.columns().iter().map(|c| c.header.as_str()))?;
        for row in self.rows() {
            wtr.write_record(
                self.columns()
                    .iter()
                    .zip(&row.cells)
                    .map(|(col, cell)| col.render_text(cell)),
            )?;
        }
        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Plain-text rendering; same body as CSV, served as `text/plain`.
    pub fn to_text(&self) -> Result<String, csv::Error> {
        self.to_csv()
    }
}

/// Download filename embedding the route and a timestamp, e.g.
/// `ops_collections.20261017-093000.csv`.
pub fn csv_filename<Tz: TimeZone>(route: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let path = route.split('?').next().unwrap_or_default();
    let stem = path
        .replace(['/', '.', ' '], "_")
        .trim_matches('_')
        .to_string();
    let stem = if stem.is_empty() { "index".to_string() } else { stem };
    format!("{}.{}.csv", stem, at.format("%Y%m%d-%H%M%S"))
}
