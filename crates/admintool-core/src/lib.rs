//! admintool-core: presentation engine for the admin dashboard.
//!
//! Provides:
//! - `table`: filterable table model and its HTML, CSV and structured-data renderings
//! - `menu`: menu tree and route registry (titles, breadcrumbs, descriptions)
//! - `context`: per-request page context built from the route registry
//! - `source`: boundary types for the data sources that feed tables
//! - `markdown`: description rendering and `{{NAME}}` expansion
//! - `fmt`: shared number and text formatting helpers
//!
//! Nothing in this crate performs network I/O. Data sources do their fetching
//! before handing records over, and the menu registry is populated once at
//! startup and only read afterwards.

pub mod context;
pub mod fmt;
pub mod markdown;
pub mod menu;
pub mod source;
pub mod table;

/// Crate version with git SHA, e.g. `"0.2.0-abc1234"`.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "-", env!("GIT_SHA"));
