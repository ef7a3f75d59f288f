//! HTML rendering of a [`FilterTable`].

use std::collections::BTreeSet;

use maud::{Markup, PreEscaped, html};

use super::{CellValue, FilterTable};
use crate::markdown;

impl FilterTable {
    /// Render the table with its status badge, caption, description, filter
    /// checkboxes, optional dropdown filters and optional totals footer.
    ///
    /// A blank table (no columns) renders nothing.
    pub fn render(&self) -> Markup {
        if self.is_blank() {
            return html! {};
        }
        let links = self.page_links();
        html! {
            div.filter-table {
                div.table-status {
                    span class=(format!("status {}", self.status)) { (self.status.as_str()) }
                    @if !self.status_message.is_empty() {
                        " "
                        span.status-message { (self.status_message) }
                    }
                }
                div.caption {
                    span.row-count { (self.pagination.caption(self.rows.len())) }
                    @if !links.is_empty() {
                        span.pagination {
                            @if let Some(href) = &links.first {
                                a class="first" href=(href) { "First" } " "
                            }
                            @if let Some(href) = &links.prev {
                                a class="prev" href=(href) { "Prev" } " "
                            }
                            @if let Some(href) = &links.next {
                                a class="next" href=(href) { "Next" }
                            }
                        }
                    }
                }
                @if !self.description.is_empty() {
                    div.description { (PreEscaped(markdown::to_html(&self.description))) }
                }
                @if !self.filters.is_empty() {
                    div.filters {
                        @for filter in &self.filters {
                            (filter.render())
                        }
                    }
                }
                table.data {
                    thead {
                        tr.header {
                            @for col in &self.columns {
                                th class=(col.css_class) data-col=(col.key) { (col.header) }
                            }
                        }
                        @if self.is_filterable() {
                            tr.dropdown-filters {
                                @for (idx, col) in self.columns.iter().enumerate() {
                                    th class=(col.css_class) {
                                        @if col.filterable {
                                            select class="column-filter" data-col=(col.key) {
                                                option value="" { "All" }
                                                @for value in self.distinct_values(idx) {
                                                    option value=(value) { (value) }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    tbody {
                        @for row in &self.rows {
                            tr class=(row.css_class) {
                                @for (col, cell) in self.columns.iter().zip(&row.cells) {
                                    td class=(col.css_class) { (col.render_html(cell)) }
                                }
                            }
                        }
                    }
                    @if self.totals {
                        tfoot {
                            tr.totals {
                                @for (idx, col) in self.columns.iter().enumerate() {
                                    @if idx == 0 {
                                        th class=(col.css_class) { "Total" }
                                    } @else {
                                        td class=(format!("total {}", col.css_class)) data-col=(col.key) {}
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Sorted distinct non-empty values of one column, for dropdown filters.
    /// List cells contribute each member separately.
    fn distinct_values(&self, idx: usize) -> BTreeSet<String> {
        let mut values = BTreeSet::new();
        for row in &self.rows {
            let Some(cell) = row.cells.get(idx) else {
                continue;
            };
            match cell {
                CellValue::List(items) => {
                    values.extend(items.iter().map(|i| i.value()));
                }
                other => {
                    values.insert(other.value());
                }
            }
        }
        values.remove("");
        values
    }
}
