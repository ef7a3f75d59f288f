//! YAML menu definitions.
//!
//! ```yaml
//! title: Home
//! menus:
//!   - path: /ops
//!     title: Operations
//!     route: /ops
//!     breadcrumb: true
//!     items:
//!       - path: /ops/collections
//!         route: /ops/collections
//!         title: Collections
//!       - path: /ops/restart
//!         route: /ops/restart
//!         title: Restart ingest
//!         method: post
//!         confirm: Restart the ingest service?
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use super::{MenuError, Method, RegisterPath, TopMenu};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub menus: Vec<MenuEntry>,
}

fn default_title() -> String {
    "Home".to_string()
}

/// One submenu, item or route-metadata entry. Entries nest via `items`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuEntry {
    pub path: String,
    pub route: String,
    pub title: String,
    pub description: String,
    pub tbd: bool,
    pub breadcrumb: bool,
    pub external: bool,
    pub method: Method,
    #[serde(alias = "confirm_message")]
    pub confirm: String,
    pub classes: Vec<String>,
    pub items: Vec<MenuEntry>,
}

impl MenuEntry {
    fn to_register(&self) -> RegisterPath {
        RegisterPath {
            path: self.path.clone(),
            route: self.route.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            tbd: self.tbd,
            breadcrumb: self.breadcrumb,
            external: self.external,
            method: self.method,
            confirm_message: self.confirm.clone(),
            css_classes: self.classes.clone(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_yaml::Error },
    Menu(MenuError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid menu file {}: {}", path.display(), source)
            }
            ConfigError::Menu(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Menu(e) => Some(e),
        }
    }
}

impl From<MenuError> for ConfigError {
    fn from(e: MenuError) -> Self {
        ConfigError::Menu(e)
    }
}

impl MenuConfig {
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Build a fresh registry from this configuration.
    pub fn build(&self) -> Result<TopMenu, MenuError> {
        let mut menu = TopMenu::new(&self.title);
        self.register(&mut menu)?;
        info!(
            nodes = menu.paths().len(),
            routes = menu.route_names().count(),
            "menu registered"
        );
        Ok(menu)
    }

    /// Register every entry depth-first: an entry before its nested items.
    pub fn register(&self, menu: &mut TopMenu) -> Result<(), MenuError> {
        let mut stack: Vec<&MenuEntry> = self.menus.iter().rev().collect();
        while let Some(entry) = stack.pop() {
            let reg = entry.to_register();
            if entry.items.is_empty() {
                menu.register_path(reg)?;
            } else {
                // An entry with nested items is always a submenu; its route
                // only contributes metadata.
                menu.register_route(&reg);
                if !reg.path.is_empty() {
                    menu.create_menu_item_for_path(RegisterPath {
                        route: String::new(),
                        ..reg
                    })?;
                }
                stack.extend(entry.items.iter().rev());
            }
        }
        Ok(())
    }
}

/// Read and parse a menu file.
pub fn load_menu_file(path: &Path) -> Result<MenuConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = MenuConfig::from_yaml(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), entries = config.menus.len(), "menu file parsed");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::menu::MenuNode;

    const SAMPLE: &str = r#"
title: Merritt Admin
menus:
  - path: /ops
    route: /ops
    title: Operations
    breadcrumb: true
    items:
      - path: /ops/collections
        route: /ops/collections
        title: Collections
      - path: /ops/restart
        route: /ops/restart
        title: Restart
        method: post
        confirm: Restart now?
  - route: /state
    title: State
    breadcrumb: true
    description: Queue state
"#;

    #[test]
    fn test_parse_and_register() {
        let menu = MenuConfig::from_yaml(SAMPLE).unwrap().build().unwrap();
        assert_eq!(menu.root().unwrap().title, "Merritt Admin");
        assert!(matches!(menu.node("/ops"), Some(MenuNode::Menu(m)) if m.title == "Operations"));
        assert!(matches!(
            menu.node("/ops/restart"),
            Some(MenuNode::Item(i)) if i.method == Method::Post && i.confirm_message == "Restart now?"
        ));
        assert_eq!(menu.title_for_route("/state"), "State");
        assert_eq!(menu.description_for_route("/state"), "Queue state");
        assert_eq!(
            menu.description_for_route("/ops"),
            "- [Collections](/ops/collections)\n- Restart ⚙"
        );
    }

    #[test]
    fn test_load_file_and_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let menu = load_menu_file(file.path()).unwrap().build().unwrap();
        assert!(menu.node("/ops/collections").is_some());

        let missing = load_menu_file(Path::new("/nonexistent/menu.yml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));

        let dup = "menus:\n  - path: /a\n    title: A\n  - path: /a\n    title: B\n";
        let err = MenuConfig::from_yaml(dup).unwrap().build().unwrap_err();
        assert_eq!(err, MenuError::DuplicatePath("/a".into()));

        assert!(MenuConfig::from_yaml("menus:\n  - bogus: 1\n").is_err());
    }
}
