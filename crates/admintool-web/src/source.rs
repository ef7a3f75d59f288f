//! Tables backed by YAML files in a data directory.
//!
//! `<data-dir>/<name>.yaml`:
//!
//! ```yaml
//! description: Objects per collection
//! totals: true
//! filters:
//!   - { label: Hide passing, value: PASS }
//! columns:
//!   - { key: ark, header: Ark, identifier: /ark/ }
//!   - { key: count, header: Count, class: float }
//!   - { key: status, header: Status, class: status, filterable: true }
//! rows:
//!   - { ark: "ark:/13030/m5", count: 1234, status: PASS, cssclass: PASS }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use admintool_core::source::{DataSource, Query, Record, SourceError, TableSpec};
use admintool_core::table::{Column, Filter, FilterMode};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableFile {
    #[serde(default)]
    description: String,
    #[serde(default)]
    totals: bool,
    #[serde(default)]
    filters: Vec<FilterSpec>,
    columns: Vec<ColumnSpec>,
    #[serde(default)]
    rows: Vec<Record>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ColumnSpec {
    key: String,
    header: Option<String>,
    class: Option<String>,
    span_class: Option<String>,
    default: Option<String>,
    #[serde(default)]
    filterable: bool,
    /// Link prefix for identifier columns.
    identifier: Option<String>,
    #[serde(default)]
    link: bool,
    /// Link prefix for comma-separated identifier lists.
    id_list: Option<String>,
}

impl ColumnSpec {
    fn to_column(&self) -> Column {
        let mut col = Column::new(&self.key);
        if let Some(h) = &self.header {
            col = col.header(h);
        }
        if let Some(c) = &self.class {
            col = col.css_class(c);
        }
        if let Some(c) = &self.span_class {
            col = col.span_class(c);
        }
        if let Some(d) = &self.default {
            col = col.default_value(d);
        }
        if self.filterable {
            col = col.filterable();
        }
        if let Some(p) = &self.identifier {
            col = col.identifier(p);
        }
        if self.link {
            col = col.link();
        }
        if let Some(p) = &self.id_list {
            col = col.id_list(p);
        }
        col
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FilterSpec {
    label: String,
    value: String,
    #[serde(default)]
    mode: FilterMode,
    #[serde(default)]
    checked: bool,
}

/// Reads `<dir>/<name>.yaml` for `/tables/<name>`.
pub(crate) struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub(crate) fn open(dir: &Path) -> Result<Self, SourceError> {
        if !dir.is_dir() {
            return Err(SourceError::Backend(format!(
                "data directory {} does not exist",
                dir.display()
            )));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn load(&self, query: &Query) -> Result<TableFile, SourceError> {
        let name = table_name(&query.route)
            .ok_or_else(|| SourceError::NotFound(query.route.clone()))?;
        let path = self.dir.join(format!("{}.yaml", name));
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(name.to_string()));
            }
            Err(e) => return Err(SourceError::Backend(format!("{}: {}", path.display(), e))),
        };
        debug!(path = %path.display(), "loading table file");
        serde_yaml::from_str(&text)
            .map_err(|e| SourceError::Backend(format!("{}: {}", path.display(), e)))
    }
}

/// Last path segment, restricted to a safe file stem.
fn table_name(route: &str) -> Option<&str> {
    let name = route.rsplit('/').next()?;
    let ok = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    ok.then_some(name)
}

impl DataSource for FileSource {
    fn name(&self) -> &str {
        "tables"
    }

    fn fetch(&self, query: &Query) -> Result<TableSpec, SourceError> {
        let file = self.load(query)?;
        let rows = file.rows.into_iter().skip(query.offset);
        let records = match query.limit {
            Some(limit) => rows.take(limit).collect(),
            None => rows.collect(),
        };
        Ok(TableSpec {
            columns: file.columns.iter().map(ColumnSpec::to_column).collect(),
            records,
            description: file.description,
            filters: file
                .filters
                .into_iter()
                .map(|f| Filter {
                    label: f.label,
                    value: f.value,
                    mode: f.mode,
                    checked: f.checked,
                })
                .collect(),
            totals: file.totals,
        })
    }
}
