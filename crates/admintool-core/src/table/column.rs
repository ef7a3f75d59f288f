//! Column definitions and per-cell rendering.

use maud::{Markup, html};
use serde::Serialize;
use serde_json::Value;

use super::cell::{CellValue, Link, Span};
use crate::fmt::plain_decimal;

/// CSS classes whose values are status tokens.
const STATUS_CLASSES: &[&str] = &["status", "check_status"];

/// Describes one field of a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct Column {
    pub key: String,
    pub header: String,
    pub css_class: String,
    /// Wrapper class for each member of a multi-valued cell.
    pub span_class: String,
    pub default_value: String,
    pub filterable: bool,
    pub is_identifier: bool,
    pub is_link: bool,
    pub is_id_list: bool,
    /// Prepended to the value to build hrefs for identifier and id-list cells.
    pub prefix: String,
}

impl Column {
    /// Column whose header and CSS class default to `key`.
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            header: key.clone(),
            css_class: key.clone(),
            key,
            span_class: String::new(),
            default_value: String::new(),
            filterable: false,
            is_identifier: false,
            is_link: false,
            is_id_list: false,
            prefix: String::new(),
        }
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.css_class = class.into();
        self
    }

    pub fn span_class(mut self, class: impl Into<String>) -> Self {
        self.span_class = class.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Values link to `prefix + value`.
    pub fn identifier(mut self, prefix: impl Into<String>) -> Self {
        self.is_identifier = true;
        self.prefix = prefix.into();
        self
    }

    /// Values are URLs and link to themselves.
    pub fn link(mut self) -> Self {
        self.is_link = true;
        self
    }

    /// Values are comma-joined ids, each linking to `prefix + id`.
    pub fn id_list(mut self, prefix: impl Into<String>) -> Self {
        self.is_id_list = true;
        self.prefix = prefix.into();
        self
    }

    pub fn is_status(&self) -> bool {
        STATUS_CLASSES.contains(&self.css_class.as_str())
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// HTML fragment for one cell of this column.
    pub fn render_html(&self, cell: &CellValue) -> Markup {
        if cell.is_empty() {
            return html! {};
        }
        if self.is_status() {
            let token = cell.value();
            return html! { span class=(token) { (token) } };
        }
        match cell {
            CellValue::Scalar(s) => html! { (s) },
            CellValue::Link(link) => render_link(link),
            CellValue::Span(span) => render_span(span),
            CellValue::List(items) => {
                let wrapper = if self.span_class.is_empty() {
                    "item"
                } else {
                    self.span_class.as_str()
                };
                html! {
                    @for item in items.iter().filter(|i| !i.is_empty()) {
                        span class=(wrapper) { (self.render_html(item)) }
                        " "
                    }
                }
            }
        }
    }

    /// Plain text for CSV / text output.
    pub fn render_text(&self, cell: &CellValue) -> String {
        match cell {
            CellValue::Scalar(s) => plain_decimal(s).unwrap_or_else(|| s.clone()),
            other => other.value(),
        }
    }

    /// JSON value for the structured-data projection.
    pub fn render_data(&self, cell: &CellValue) -> Value {
        cell.to_data()
    }
}

fn render_link(link: &Link) -> Markup {
    if link.post {
        let payload = link.data.as_ref().map(Value::to_string);
        let class = join_classes(&["post-action", link_class(link), disabled_class(link)]);
        return html! {
            a href="#"
                class=(class)
                title=[link.title.as_deref()]
                data-href=(link.href)
                data-method="post"
                data-confirm=[link.confirm_message.as_deref()]
                data-payload=[payload.as_deref()]
                aria-disabled=[link.disabled.then_some("true")]
            { (link.value) }
        };
    }
    if link.disabled {
        let class = join_classes(&[link_class(link), "disabled"]);
        return html! {
            span class=(class) title=[link.title.as_deref()] { (link.value) }
        };
    }
    html! {
        a href=(link.href) class=[link.css_class.as_deref()] title=[link.title.as_deref()] {
            (link.value)
        }
    }
}

fn link_class(link: &Link) -> &str {
    link.css_class.as_deref().unwrap_or_default()
}

fn disabled_class(link: &Link) -> &'static str {
    if link.disabled { "disabled" } else { "" }
}

fn join_classes(classes: &[&str]) -> String {
    classes
        .iter()
        .filter(|c| !c.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_span(span: &Span) -> Markup {
    html! {
        span class=[span.css_class.as_deref()] title=[span.title.as_deref()] { (span.value) }
    }
}
