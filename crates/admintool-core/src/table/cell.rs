//! Cell values: the closed set of shapes a table cell can hold.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A navigable or actionable value.
///
/// With `post` set the link renders as a client-side confirm + POST action
/// instead of a plain anchor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub value: String,
    pub href: String,
    #[serde(default, alias = "class", skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub post: bool,
    /// Opaque payload submitted with a POST action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, alias = "confirm", skip_serializing_if = "Option::is_none")]
    pub confirm_message: Option<String>,
}

impl Link {
    pub fn new(value: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.css_class = Some(class.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Turn the link into a POST action guarded by a confirmation prompt.
    pub fn post(mut self, confirm_message: impl Into<String>) -> Self {
        self.post = true;
        let msg = confirm_message.into();
        self.confirm_message = (!msg.is_empty()).then_some(msg);
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// A styled value without an href.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, alias = "class", skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
}

impl Span {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.css_class = Some(class.into());
        self
    }
}

/// One (row, column) value.
///
/// Deserializes from a bare string, an array, or a map (`href` present means
/// [`Link`], otherwise [`Span`]), so producers can hand over nested cell
/// descriptors inside loosely typed records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Scalar(String),
    List(Vec<CellValue>),
    Link(Link),
    Span(Span),
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Scalar(String::new())
    }
}

impl CellValue {
    /// Bare value as text. List members are joined with `", "`.
    pub fn value(&self) -> String {
        match self {
            Self::Scalar(s) => s.clone(),
            Self::Link(l) => l.value.clone(),
            Self::Span(s) => s.value.clone(),
            Self::List(items) => items
                .iter()
                .map(CellValue::value)
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Whether the cell renders as nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(s) => s.is_empty(),
            Self::Link(l) => l.value.is_empty(),
            Self::Span(s) => s.value.is_empty(),
            Self::List(items) => items.iter().all(CellValue::is_empty),
        }
    }

    /// Machine-readable projection: presentation metadata is dropped.
    pub fn to_data(&self) -> Value {
        match self {
            Self::List(items) => Value::Array(items.iter().map(CellValue::to_data).collect()),
            other => Value::String(other.value()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<Link> for CellValue {
    fn from(l: Link) -> Self {
        Self::Link(l)
    }
}

impl From<Span> for CellValue {
    fn from(s: Span) -> Self {
        Self::Span(s)
    }
}

impl From<Vec<CellValue>> for CellValue {
    fn from(items: Vec<CellValue>) -> Self {
        Self::List(items)
    }
}
