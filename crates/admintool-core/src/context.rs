//! Per-request page context: title, rendered description, breadcrumbs and
//! the CSS classes that flag unreachable backends.

use std::fmt;
use std::path::Path;

use maud::html;
use serde::Serialize;
use tracing::debug;

use crate::markdown;
use crate::menu::{Breadcrumb, TopMenu};

/// Static page settings shared by every request.
#[derive(Debug, Clone, Default)]
pub struct ContextConfig {
    /// Stylesheet href for the page layout.
    pub stylesheet: String,
    /// Markdown body of the index page.
    pub index_markdown: String,
}

impl ContextConfig {
    pub fn new(stylesheet: &str) -> Self {
        Self {
            stylesheet: stylesheet.to_string(),
            index_markdown: String::new(),
        }
    }

    pub fn with_index_markdown(mut self, markdown: &str) -> Self {
        self.index_markdown = markdown.to_string();
        self
    }

    pub fn load_index(self, path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.with_index_markdown(&text))
    }

    /// Index page body as HTML with `{{NAME}}` tokens expanded.
    pub fn index_html(&self) -> String {
        render_markdown(&self.index_markdown)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthError(pub String);

impl fmt::Display for HealthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for HealthError {}

/// Reachability probe for one backend.
///
/// An unreachable backend adds [`HealthCheck::flag`] to the page classes so
/// the stylesheet can grey out the affected menu entries.
pub trait HealthCheck: Send + Sync {
    /// Class added when the backend is down, e.g. `no-db`.
    fn flag(&self) -> &str;

    fn check(&self) -> Result<bool, HealthError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct Context {
    pub route: String,
    pub title: String,
    /// Rendered HTML.
    pub description: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub classes: Vec<String>,
    pub stylesheet: String,
}

impl Context {
    /// Context for `route`. Probe errors are logged and do not add a class.
    pub fn build(
        route: &str,
        menu: &TopMenu,
        config: &ContextConfig,
        checks: &[Box<dyn HealthCheck>],
    ) -> Self {
        let mut classes = Vec::new();
        for check in checks {
            match check.check() {
                Ok(true) => {}
                Ok(false) => classes.push(check.flag().to_string()),
                Err(e) => debug!(flag = check.flag(), error = %e, "health check failed"),
            }
        }
        Self {
            route: route.to_string(),
            title: menu.title_for_route(route),
            description: render_markdown(&menu.description_for_route(route)),
            breadcrumbs: menu.breadcrumbs_for_route(route),
            classes,
            stylesheet: config.stylesheet.clone(),
        }
    }

    /// Context for pages outside the menu.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn class_list(&self) -> String {
        self.classes.join(" ")
    }
}

/// Markdown to HTML with `{{NAME}}` taken from the process environment.
fn render_markdown(text: &str) -> String {
    render_markdown_with(text, |name| std::env::var(name).ok())
}

/// Markdown to HTML, then `{{NAME}}` substitution with HTML-escaped values.
fn render_markdown_with<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if text.is_empty() {
        return String::new();
    }
    let rendered = markdown::to_html(text);
    markdown::expand_with(&rendered, |name| {
        lookup(name).map(|value| html! { (value) }.into_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::RegisterPath;

    struct Probe(&'static str, Result<bool, HealthError>);

    impl HealthCheck for Probe {
        fn flag(&self) -> &str {
            self.0
        }

        fn check(&self) -> Result<bool, HealthError> {
            self.1.clone()
        }
    }

    fn menu() -> TopMenu {
        let mut menu = TopMenu::default();
        menu.register_path(RegisterPath::breadcrumb("/ops", "Operations")).unwrap();
        menu.register_path(RegisterPath::item("/ops/coll", "/ops/coll", "Collections"))
            .unwrap();
        menu
    }

    #[test]
    fn test_build_context() {
        let checks: Vec<Box<dyn HealthCheck>> = vec![
            Box::new(Probe("no-db", Ok(false))),
            Box::new(Probe("no-zk", Ok(true))),
            Box::new(Probe("no-ldap", Err(HealthError("timeout".into())))),
        ];
        let ctx = Context::build("/ops/coll", &menu(), &ContextConfig::new("/assets/admin.css"), &checks);
        assert_eq!(ctx.title, "Collections");
        assert_eq!(ctx.breadcrumbs.len(), 1);
        assert_eq!(ctx.breadcrumbs[0].url, "/ops");
        assert_eq!(ctx.class_list(), "no-db");
        assert_eq!(ctx.stylesheet, "/assets/admin.css");
    }

    #[test]
    fn test_breadcrumb_description_rendered() {
        let ctx = Context::build("/ops", &menu(), &ContextConfig::default(), &[]);
        assert!(ctx.description.contains(r#"<a href="/ops/coll">Collections</a>"#));
        assert!(ctx.classes.is_empty());
    }

    #[test]
    fn test_unknown_route_gets_fallback_title() {
        let ctx = Context::build("/ops/missing", &menu(), &ContextConfig::default(), &[]);
        assert_eq!(ctx.title, "Missing");
        assert_eq!(ctx.description, "");
        assert_eq!(Context::none().title, "");
    }

    #[test]
    fn test_index_html_drops_unset_variables() {
        let config = ContextConfig::default()
            .with_index_markdown("Built by {{ADMINTOOL_TEST_UNSET_VAR}}x **here**");
        let html = config.index_html();
        assert!(html.contains("Built by x <strong>here</strong>"));
    }

    #[test]
    fn test_substituted_values_are_escaped() {
        let html = render_markdown_with("Env: {{STAGE}} **now**", |name| {
            (name == "STAGE").then(|| "<b>&".to_string())
        });
        assert!(html.contains("Env: &lt;b&gt;&amp; <strong>now</strong>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_environment_lookup() {
        let Some(path) = std::env::var("PATH").ok().filter(|p| !p.is_empty()) else {
            return;
        };
        let html = render_markdown("{{PATH}}");
        assert!(html.contains(&html! { (path) }.into_string()));
    }
}
