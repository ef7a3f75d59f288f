//! Checkbox facets that show or hide rows by CSS class.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};

/// How a checked filter affects the rows carrying its class token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Checked filters of this mode narrow the table to rows matching any of them.
    Match,
    /// A checked filter hides the rows matching it.
    #[default]
    Hide,
}

impl FilterMode {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Hide => "hide",
        }
    }
}

/// A named boolean facet, evaluated client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct Filter {
    pub label: String,
    /// CSS class token toggled by this filter.
    pub value: String,
    pub mode: FilterMode,
    pub checked: bool,
}

impl Filter {
    pub fn hide(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            mode: FilterMode::Hide,
            checked: false,
        }
    }

    pub fn matching(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            mode: FilterMode::Match,
            ..Self::hide(label, value)
        }
    }

    pub fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    pub fn render(&self) -> Markup {
        html! {
            label.filter {
                input type="checkbox"
                    class="filter"
                    value=(self.value)
                    data-mode=(self.mode.as_str())
                    checked[self.checked];
                " " (self.label)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_modes() {
        let html = Filter::hide("Hide passing", "PASS").checked().render().into_string();
        assert!(html.contains(r#"value="PASS""#));
        assert!(html.contains(r#"data-mode="hide""#));
        assert!(html.contains("checked"));
        assert!(html.contains("Hide passing"));

        let html = Filter::matching("Only failures", "FAIL").render().into_string();
        assert!(html.contains(r#"data-mode="match""#));
        assert!(!html.contains("checked"));
    }
}
