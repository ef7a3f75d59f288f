//! Menu tree and route registry.
//!
//! [`TopMenu`] holds two structures that are filled once at startup:
//! - `paths`: the navigation tree, keyed by unique menu path (`"/"` is the root)
//! - `route_names`: metadata per normalized route (title, description,
//!   breadcrumb flag), used for page titles, breadcrumb trails and generated
//!   descriptions of routes that are not themselves menu entries.
//!
//! After startup the registry is shared read-only (`Arc<TopMenu>`).

pub mod config;
mod html;
mod route;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fmt::title_from_route;

pub use route::{normalize_route, parent_dir};

/// Path of the root menu.
pub const ROOT_PATH: &str = "/";

/// How a menu item is invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Delete => "delete",
        }
    }

    /// POST and DELETE items are actions, not navigation.
    pub fn is_action(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

/// A submenu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub path: String,
    pub title: String,
    /// `None` only for the root.
    pub parent: Option<String>,
    /// Root is 0.
    pub depth: usize,
    /// Child node paths in registration order.
    pub children: Vec<String>,
    pub css_classes: Vec<String>,
}

/// A leaf entry linking to, or acting on, a concrete route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub path: String,
    pub parent: String,
    pub route: String,
    pub title: String,
    pub description: String,
    /// Not implemented yet; rendered disabled.
    pub tbd: bool,
    /// Registers route metadata only; not rendered as a link.
    pub breadcrumb: bool,
    /// Opens in a new window.
    pub external: bool,
    pub method: Method,
    pub confirm_message: String,
    pub css_classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    Menu(Menu),
    Item(MenuItem),
}

impl MenuNode {
    pub fn path(&self) -> &str {
        match self {
            Self::Menu(m) => &m.path,
            Self::Item(i) => &i.path,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Menu(m) => &m.title,
            Self::Item(i) => &i.title,
        }
    }
}

/// Route metadata used by page contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct RouteName {
    pub route: String,
    pub title: String,
    pub description: String,
    pub breadcrumb: bool,
    pub method: Method,
}

/// One step of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct Breadcrumb {
    pub title: String,
    pub url: String,
}

/// Arguments of a registration call.
///
/// An empty `route` registers a submenu at `path`; an empty `path` registers
/// route metadata only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterPath {
    pub path: String,
    pub route: String,
    pub title: String,
    pub description: String,
    pub tbd: bool,
    pub breadcrumb: bool,
    pub external: bool,
    pub method: Method,
    pub confirm_message: String,
    pub css_classes: Vec<String>,
}

impl RegisterPath {
    pub fn item(path: &str, route: &str, title: &str) -> Self {
        Self {
            path: path.to_string(),
            route: route.to_string(),
            title: title.to_string(),
            ..Self::default()
        }
    }

    pub fn submenu(path: &str, title: &str) -> Self {
        Self::item(path, "", title)
    }

    /// Route metadata with the breadcrumb flag set and no menu node.
    pub fn breadcrumb(route: &str, title: &str) -> Self {
        Self {
            breadcrumb: true,
            ..Self::item("", route, title)
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn method(mut self, method: Method, confirm_message: &str) -> Self {
        self.method = method;
        self.confirm_message = confirm_message.to_string();
        self
    }

    pub fn tbd(mut self) -> Self {
        self.tbd = true;
        self
    }

    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }
}

/// Menu registration failure. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// Path is empty or not absolute.
    InvalidPath(String),
    /// A node already exists at this path.
    DuplicatePath(String),
    /// The nearest existing ancestor is a leaf item.
    ParentIsLeaf { path: String, parent: String },
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuError::InvalidPath(p) => write!(f, "invalid menu path {:?}", p),
            MenuError::DuplicatePath(p) => write!(f, "menu path {:?} registered twice", p),
            MenuError::ParentIsLeaf { path, parent } => {
                write!(f, "cannot attach {:?}: parent {:?} is a menu item", path, parent)
            }
        }
    }
}

impl std::error::Error for MenuError {}

/// Root of the menu tree plus the route registry.
#[derive(Debug, Clone)]
pub struct TopMenu {
    paths: HashMap<String, MenuNode>,
    route_names: HashMap<String, RouteName>,
    /// Normalized routes in registration order.
    route_order: Vec<String>,
}

impl Default for TopMenu {
    fn default() -> Self {
        Self::new("Home")
    }
}

impl TopMenu {
    pub fn new(root_title: &str) -> Self {
        let root = Menu {
            path: ROOT_PATH.to_string(),
            title: root_title.to_string(),
            parent: None,
            depth: 0,
            children: Vec::new(),
            css_classes: Vec::new(),
        };
        Self {
            paths: HashMap::from([(ROOT_PATH.to_string(), MenuNode::Menu(root))]),
            route_names: HashMap::new(),
            route_order: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Registration (startup only)
    // ------------------------------------------------------------------

    /// Register route metadata and, when `path` is set, a menu node.
    ///
    /// Metadata is only recorded once the node has been attached.
    pub fn register_path(&mut self, reg: RegisterPath) -> Result<(), MenuError> {
        if !reg.path.is_empty() {
            self.create_menu_item_for_path(reg.clone())?;
        }
        self.register_route(&reg);
        Ok(())
    }

    /// Record title/description metadata for `reg.route`.
    ///
    /// When several registrations share a route, later non-empty fields win
    /// and the breadcrumb flag is sticky.
    pub fn register_route(&mut self, reg: &RegisterPath) {
        if reg.route.is_empty() {
            return;
        }
        let key = normalize_route(&reg.route);
        match self.route_names.get_mut(&key) {
            Some(existing) => {
                if !reg.title.is_empty() {
                    existing.title = reg.title.clone();
                }
                if !reg.description.is_empty() {
                    existing.description = reg.description.clone();
                }
                existing.breadcrumb |= reg.breadcrumb;
            }
            None => {
                self.route_names.insert(
                    key.clone(),
                    RouteName {
                        route: reg.route.clone(),
                        title: reg.title.clone(),
                        description: reg.description.clone(),
                        breadcrumb: reg.breadcrumb,
                        method: reg.method,
                    },
                );
                self.route_order.push(key);
            }
        }
    }

    /// Attach a submenu (empty `route`) or item at `reg.path`, creating any
    /// missing ancestor submenus on the way down from the nearest existing one.
    pub fn create_menu_item_for_path(&mut self, reg: RegisterPath) -> Result<(), MenuError> {
        let path = route::clean_path(&reg.path)
            .ok_or_else(|| MenuError::InvalidPath(reg.path.clone()))?;
        if self.paths.contains_key(&path) {
            return Err(MenuError::DuplicatePath(path));
        }

        let mut missing = Vec::new();
        let mut cursor = parent_dir(&path);
        while let Some(dir) = cursor {
            if self.paths.contains_key(&dir) {
                break;
            }
            cursor = parent_dir(&dir);
            missing.push(dir);
        }
        for dir in missing.into_iter().rev() {
            let title = title_from_route(&dir);
            debug!(path = %dir, "creating intermediate submenu");
            self.attach_menu(&dir, &title, Vec::new())?;
        }

        if reg.route.is_empty() {
            self.attach_menu(&path, &reg.title, reg.css_classes)
        } else {
            let parent = self.parent_menu(&path)?;
            let item = MenuItem {
                path: path.clone(),
                parent: parent.clone(),
                route: reg.route,
                title: reg.title,
                description: reg.description,
                tbd: reg.tbd,
                breadcrumb: reg.breadcrumb,
                external: reg.external,
                method: reg.method,
                confirm_message: reg.confirm_message,
                css_classes: reg.css_classes,
            };
            self.link_child(&parent, &path);
            self.paths.insert(path, MenuNode::Item(item));
            Ok(())
        }
    }

    fn attach_menu(
        &mut self,
        path: &str,
        title: &str,
        css_classes: Vec<String>,
    ) -> Result<(), MenuError> {
        let parent = self.parent_menu(path)?;
        let depth = match self.paths.get(&parent) {
            Some(MenuNode::Menu(m)) => m.depth + 1,
            _ => 1,
        };
        let menu = Menu {
            path: path.to_string(),
            title: title.to_string(),
            parent: Some(parent.clone()),
            depth,
            children: Vec::new(),
            css_classes,
        };
        self.link_child(&parent, path);
        self.paths.insert(path.to_string(), MenuNode::Menu(menu));
        Ok(())
    }

    /// Parent directory of `path`, which must exist and be a submenu.
    fn parent_menu(&self, path: &str) -> Result<String, MenuError> {
        let parent = parent_dir(path).ok_or_else(|| MenuError::InvalidPath(path.to_string()))?;
        match self.paths.get(&parent) {
            Some(MenuNode::Menu(_)) => Ok(parent),
            Some(MenuNode::Item(_)) => Err(MenuError::ParentIsLeaf {
                path: path.to_string(),
                parent,
            }),
            None => Err(MenuError::InvalidPath(path.to_string())),
        }
    }

    fn link_child(&mut self, parent: &str, child: &str) {
        if let Some(MenuNode::Menu(m)) = self.paths.get_mut(parent) {
            m.children.push(child.to_string());
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn root(&self) -> Option<&Menu> {
        match self.paths.get(ROOT_PATH) {
            Some(MenuNode::Menu(m)) => Some(m),
            _ => None,
        }
    }

    pub fn paths(&self) -> &HashMap<String, MenuNode> {
        &self.paths
    }

    pub fn node(&self, path: &str) -> Option<&MenuNode> {
        self.paths.get(path)
    }

    /// Child nodes of the submenu at `path`, in registration order.
    pub fn children(&self, path: &str) -> Vec<&MenuNode> {
        match self.paths.get(path) {
            Some(MenuNode::Menu(m)) => m
                .children
                .iter()
                .filter_map(|c| self.paths.get(c))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn route_name(&self, route: &str) -> Option<&RouteName> {
        self.route_names.get(&normalize_route(route))
    }

    /// Registered routes in registration order.
    pub fn route_names(&self) -> impl Iterator<Item = &RouteName> {
        self.route_order
            .iter()
            .filter_map(|k| self.route_names.get(k))
    }

    /// Whether the route is known to the registry or the menu tree.
    pub fn is_known(&self, route: &str) -> bool {
        self.route_name(route).is_some() || self.paths.contains_key(route)
    }

    /// Registered title, or the capitalized last path segment.
    pub fn title_for_route(&self, route: &str) -> String {
        self.route_name(route)
            .map(|r| r.title.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| title_from_route(route))
    }

    /// Breadcrumb entries registered on the ancestors of `route`, root first.
    /// The root itself and the route itself are not included.
    pub fn breadcrumbs_for_route(&self, route: &str) -> Vec<Breadcrumb> {
        let mut crumbs = Vec::new();
        let mut cursor = parent_dir(&normalize_route(route));
        while let Some(dir) = cursor {
            if dir == ROOT_PATH {
                break;
            }
            if let Some(rn) = self.route_names.get(&dir)
                && rn.breadcrumb
            {
                crumbs.push(Breadcrumb {
                    title: rn.title.clone(),
                    url: rn.route.clone(),
                });
            }
            cursor = parent_dir(&dir);
        }
        crumbs.reverse();
        crumbs
    }

    /// Markdown description for `route`.
    ///
    /// A breadcrumb route without its own description gets a generated list of
    /// its child routes: links for GET routes, a gear marker for actions.
    pub fn description_for_route(&self, route: &str) -> String {
        let key = normalize_route(route);
        let Some(rn) = self.route_names.get(&key) else {
            return String::new();
        };
        if !rn.description.is_empty() || !rn.breadcrumb {
            return rn.description.clone();
        }
        self.route_order
            .iter()
            .filter(|k| **k != key && parent_dir(k).as_deref() == Some(key.as_str()))
            .filter_map(|k| self.route_names.get(k))
            .map(|child| {
                if child.method.is_action() {
                    format!("- {} ⚙", child.title)
                } else {
                    format!("- [{}]({})", child.title, child.route)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
