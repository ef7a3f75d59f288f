//! Filterable tables: the data model shared by every dashboard page.
//!
//! A [`FilterTable`] owns ordered [`Column`]s and [`Row`]s whose cells line up
//! with the columns by position. It keeps an aggregate [`Status`] that tracks
//! the worst row status seen so far and renders to HTML ([`FilterTable::render`]),
//! CSV/text ([`FilterTable::to_csv`]) and structured data ([`FilterTable::to_data`]).

mod cell;
mod column;
mod export;
mod filter;
mod html;
mod pagination;
mod row;
mod status;

pub use cell::{CellValue, Link, Span};
pub use column::Column;
pub use export::{ColumnData, TableData, csv_filename};
pub use filter::{Filter, FilterMode};
pub use pagination::{PageLinks, Pagination};
pub use row::{CSS_CLASS_KEY, DEFAULT_ROW_CLASS, Row};
pub use status::{Status, UnknownStatus};

use std::collections::BTreeMap;
use std::fmt;

/// Key of the column whose values feed status aggregation.
pub const STATUS_KEY: &str = "status";

/// A column key was added twice to one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateColumn(pub String);

impl fmt::Display for DuplicateColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column {:?} defined twice", self.0)
    }
}

impl std::error::Error for DuplicateColumn {}

/// Columns, rows, filters and presentation state for one rendered table.
#[derive(Debug, Clone, Default)]
pub struct FilterTable {
    columns: Vec<Column>,
    rows: Vec<Row>,
    filters: Vec<Filter>,
    status: Status,
    status_message: String,
    description: String,
    pagination: Pagination,
    totals: bool,
}

impl FilterTable {
    /// Table with `columns`. Keys must be unique.
    pub fn new(columns: Vec<Column>) -> Result<Self, DuplicateColumn> {
        let mut table = Self::default();
        for column in columns {
            table.add_column(column)?;
        }
        Ok(table)
    }

    /// Placeholder for "no data" and error conditions.
    ///
    /// An empty `message` yields a table with no columns and no rows, which
    /// callers treat as "nothing to render". Otherwise the table has a single
    /// `message` column and one row holding the message.
    pub fn empty(message: &str, status: Status, status_message: &str) -> Self {
        let mut table = if message.is_empty() {
            Self::default()
        } else {
            Self {
                columns: vec![Column::new("message").header("Message")],
                rows: vec![Row::new(vec![CellValue::from(message)])],
                ..Self::default()
            }
        };
        table.set_status(status, status_message);
        table
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn has_totals(&self) -> bool {
        self.totals
    }

    /// True when no column exists, i.e. nothing should be rendered.
    pub fn is_blank(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether any column gets a dropdown filter.
    pub fn is_filterable(&self) -> bool {
        self.columns.iter().any(|c| c.filterable)
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Append a column. Existing rows get an empty cell for it.
    pub fn add_column(&mut self, column: Column) -> Result<(), DuplicateColumn> {
        if self.column_index(&column.key).is_some() {
            return Err(DuplicateColumn(column.key));
        }
        self.columns.push(column);
        for row in &mut self.rows {
            row.cells.push(CellValue::default());
        }
        Ok(())
    }

    /// Append a row, aligning it with the columns and folding its status into
    /// the table status.
    pub fn add_row(&mut self, mut row: Row) {
        row.cells.resize_with(self.columns.len(), CellValue::default);
        if let Some(idx) = self.column_index(STATUS_KEY)
            && let Ok(status) = row.cells[idx].value().parse::<Status>()
        {
            self.status = self.status.worst(status);
        }
        self.rows.push(row);
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn set_description(&mut self, markdown: impl Into<String>) {
        self.description = markdown.into();
    }

    pub fn set_status(&mut self, status: Status, message: &str) {
        self.status = status;
        self.status_message = message.to_string();
    }

    /// Enable pagination links for a page of at most `limit` rows at `offset`.
    pub fn paginate(
        &mut self,
        limit: usize,
        offset: usize,
        path: &str,
        url_params: BTreeMap<String, String>,
    ) {
        self.pagination = Pagination {
            enabled: limit > 0,
            limit,
            offset,
            path: path.to_string(),
            url_params,
        };
    }

    /// Render a footer row with per-column totals filled in client-side.
    pub fn with_totals(mut self) -> Self {
        self.totals = true;
        self
    }

    /// Links for the current page, given the rows actually returned.
    pub fn page_links(&self) -> PageLinks {
        self.pagination.links(self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::record;

    fn status_table(statuses: &[&str]) -> FilterTable {
        let mut table =
            FilterTable::new(vec![Column::new("name"), Column::new("status")]).unwrap();
        for (i, s) in statuses.iter().enumerate() {
            let rec = record([("name", format!("check{}", i)), ("status", s.to_string())]);
            let row = Row::make_row(table.columns(), &rec);
            table.add_row(row);
        }
        table
    }

    #[test]
    fn test_status_aggregates_worst() {
        assert_eq!(status_table(&["PASS", "WARN", "FAIL", "PASS"]).status(), Status::Fail);
        assert_eq!(status_table(&["PASS", "WARN"]).status(), Status::Warn);
        assert_eq!(status_table(&["PASS", "ERROR", "WARN"]).status(), Status::Error);
        assert_eq!(status_table(&["bogus"]).status(), Status::Skip);
    }

    #[test]
    fn test_no_status_column_keeps_initial_status() {
        let mut table = FilterTable::new(vec![Column::new("name")]).unwrap();
        table.add_row(Row::new(vec!["FAIL".into()]));
        assert_eq!(table.status(), Status::Skip);

        let mut table = FilterTable::new(vec![Column::new("name")]).unwrap();
        table.set_status(Status::Pass, "");
        table.add_row(Row::new(vec!["x".into()]));
        assert_eq!(table.status(), Status::Pass);
    }

    #[test]
    fn test_rows_aligned_on_add() {
        let mut table = FilterTable::new(vec![Column::new("a"), Column::new("b")]).unwrap();
        table.add_row(Row::new(vec!["1".into()]));
        table.add_row(Row::new(vec!["1".into(), "2".into(), "3".into()]));
        assert!(table.rows().iter().all(|r| r.cells.len() == 2));

        table.add_column(Column::new("c").filterable()).unwrap();
        assert!(table.is_filterable());
        assert!(table.rows().iter().all(|r| r.cells.len() == 3));
    }

    #[test]
    fn test_duplicate_column_keys_rejected() {
        let err = FilterTable::new(vec![
            Column::new("n").header("First"),
            Column::new("n").header("Second"),
        ])
        .unwrap_err();
        assert_eq!(err, DuplicateColumn("n".into()));

        let mut table = FilterTable::new(vec![Column::new("n"), Column::new("m")]).unwrap();
        table.add_row(Row::new(vec!["a".into(), "b".into()]));
        assert!(table.add_column(Column::new("m").header("Again")).is_err());
        assert_eq!(table.columns().len(), 2);
        assert_eq!(table.rows()[0].cells.len(), 2);
        let data = table.to_data();
        assert_eq!(data.rows[0].len(), 2);
        assert_eq!(data.rows[0]["n"], serde_json::json!("a"));
    }

    #[test]
    fn test_empty_factory() {
        let blank = FilterTable::empty("", Status::Skip, "");
        assert!(blank.columns().is_empty());
        assert!(blank.rows().is_empty());
        assert!(blank.is_blank());

        let msg = FilterTable::empty("No data", Status::Error, "ldap down");
        assert_eq!(msg.columns().len(), 1);
        assert_eq!(msg.rows().len(), 1);
        assert_eq!(msg.rows()[0].cells[0].value(), "No data");
        assert_eq!(msg.status(), Status::Error);
        assert_eq!(msg.status_message(), "ldap down");
    }
}
