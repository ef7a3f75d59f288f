//! Offset/limit pagination links.

use std::collections::BTreeMap;

/// Query parameters owned by the paginator; stripped from `url_params`.
const PAGE_PARAMS: &[&str] = &["limit", "offset"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub enabled: bool,
    pub limit: usize,
    pub offset: usize,
    /// Path the links point at.
    pub path: String,
    /// Extra query parameters preserved in every link.
    pub url_params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub first: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl PageLinks {
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.prev.is_none() && self.next.is_none()
    }
}

impl Pagination {
    /// Links for a page that returned `rows` rows.
    ///
    /// `first` only appears when `prev` does not already point at offset 0.
    /// `next` only appears for a full page, since more rows may follow.
    pub fn links(&self, rows: usize) -> PageLinks {
        if !self.enabled || self.limit == 0 {
            return PageLinks::default();
        }
        let mut links = PageLinks::default();
        if self.offset > 0 {
            let prev = self.offset.saturating_sub(self.limit);
            links.prev = Some(self.url(prev));
            if prev > 0 {
                links.first = Some(self.url(0));
            }
        }
        if rows == self.limit {
            links.next = Some(self.url(self.offset.saturating_add(self.limit)));
        }
        links
    }

    /// Caption text, e.g. `"Rows 11-20"`.
    pub fn caption(&self, rows: usize) -> String {
        if !self.enabled || rows == 0 {
            return format!("{} rows", rows);
        }
        format!(
            "Rows {}-{}",
            self.offset.saturating_add(1),
            self.offset.saturating_add(rows)
        )
    }

    fn url(&self, offset: usize) -> String {
        let mut query: Vec<String> = self
            .url_params
            .iter()
            .filter(|(k, _)| !PAGE_PARAMS.contains(&k.as_str()))
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        query.push(format!("limit={}", self.limit));
        query.push(format!("offset={}", offset));
        format!("{}?{}", self.path, query.join("&"))
    }
}
