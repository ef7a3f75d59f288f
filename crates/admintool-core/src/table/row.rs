//! Table rows and their construction from loosely typed records.

use super::cell::{CellValue, Link};
use super::column::Column;
use crate::source::{RawValue, Record};

/// Record key whose value becomes the row's CSS class.
pub const CSS_CLASS_KEY: &str = "cssclass";

/// Default CSS class of a data row.
pub const DEFAULT_ROW_CLASS: &str = "data";

/// Cells aligned by position with a table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<CellValue>,
    pub css_class: String,
}

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self {
            cells,
            css_class: DEFAULT_ROW_CLASS.to_string(),
        }
    }

    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.css_class = class.into();
        self
    }

    /// Build a row with one cell per column.
    ///
    /// Missing keys take the column default; null becomes empty. Plain numbers
    /// are grouped (`1,234` / `1,234.50`) unless the column turns values into
    /// links, where the raw digits are kept so hrefs stay valid.
    pub fn make_row(columns: &[Column], rec: &Record) -> Self {
        let cells = columns
            .iter()
            .map(|col| match rec.get(&col.key) {
                Some(RawValue::Cell(cell)) => cell.clone(),
                Some(raw) => wrap_value(col, raw.to_text(!is_linked(col))),
                None => wrap_value(col, col.default_value.clone()),
            })
            .collect();
        let css_class = rec
            .get(CSS_CLASS_KEY)
            .map(|v| v.to_text(false))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_ROW_CLASS.to_string());
        Self { cells, css_class }
    }
}

fn is_linked(col: &Column) -> bool {
    (col.is_identifier && !col.prefix.is_empty()) || col.is_link || col.is_id_list
}

fn wrap_value(col: &Column, value: String) -> CellValue {
    if value.is_empty() {
        return CellValue::Scalar(value);
    }
    if col.is_identifier && !col.prefix.is_empty() {
        let href = format!("{}{}", col.prefix, value);
        return Link::new(value, href).into();
    }
    if col.is_link {
        return Link::new(value.clone(), value).into();
    }
    if col.is_id_list {
        let parts = value
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|part| {
                if col.prefix.is_empty() {
                    CellValue::from(part)
                } else {
                    Link::new(part, format!("{}{}", col.prefix, part))
                        .title(part)
                        .into()
                }
            })
            .collect();
        return CellValue::List(parts);
    }
    CellValue::Scalar(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::record;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name"),
            Column::new("count"),
            Column::new("size"),
            Column::new("ark").identifier("/object/"),
            Column::new("url").link(),
            Column::new("nodes").id_list("/node/"),
            Column::new("tags").id_list(""),
            Column::new("owner").default_value("merritt"),
        ]
    }

    #[test]
    fn test_cells_align_with_columns() {
        let cols = columns();
        for rec in [Record::new(), record([("name", "x")]), record([("unknown", "y")])] {
            assert_eq!(Row::make_row(&cols, &rec).cells.len(), cols.len());
        }
    }

    #[test]
    fn test_numeric_formatting_and_defaults() {
        let cols = columns();
        let mut rec = record([("count", RawValue::Int(1234567)), ("size", RawValue::Float(1234.5))]);
        rec.insert("name".into(), RawValue::Null);
        let row = Row::make_row(&cols, &rec);
        assert_eq!(row.cells[0], CellValue::from(""));
        assert_eq!(row.cells[1], CellValue::from("1,234,567"));
        assert_eq!(row.cells[2], CellValue::from("1,234.50"));
        assert_eq!(row.cells[7], CellValue::from("merritt"));
        assert_eq!(row.css_class, "data");
    }

    #[test]
    fn test_identifier_and_link_wrapping() {
        let cols = columns();
        let rec = record([
            ("ark", RawValue::Int(12345)),
            ("url", RawValue::from("https://example.org/x")),
        ]);
        let row = Row::make_row(&cols, &rec);
        assert_eq!(row.cells[3], Link::new("12345", "/object/12345").into());
        assert_eq!(
            row.cells[4],
            Link::new("https://example.org/x", "https://example.org/x").into()
        );
    }

    #[test]
    fn test_id_list_with_and_without_prefix() {
        let cols = columns();
        let rec = record([("nodes", "101, 102"), ("tags", "a,b")]);
        let row = Row::make_row(&cols, &rec);
        assert_eq!(
            row.cells[5],
            CellValue::List(vec![
                Link::new("101", "/node/101").title("101").into(),
                Link::new("102", "/node/102").title("102").into(),
            ])
        );
        assert_eq!(row.cells[6], CellValue::List(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_prebuilt_cell_and_row_class() {
        let cols = columns();
        let mut rec = record([("cssclass", "FAIL")]);
        rec.insert(
            "name".into(),
            RawValue::Cell(Link::new("Restart", "/restart").post("Sure?").into()),
        );
        let row = Row::make_row(&cols, &rec);
        assert!(matches!(&row.cells[0], CellValue::Link(l) if l.post));
        assert_eq!(row.css_class, "FAIL");
    }

    #[test]
    fn test_identifier_without_prefix_stays_scalar() {
        let cols = vec![Column::new("id").identifier("")];
        let row = Row::make_row(&cols, &record([("id", RawValue::Int(4200))]));
        assert_eq!(row.cells[0], CellValue::from("4,200"));
    }
}
