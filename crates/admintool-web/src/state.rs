//! Shared application state.

use std::sync::Arc;

use axum::extract::State;

use admintool_core::context::{Context, ContextConfig, HealthCheck};
use admintool_core::menu::TopMenu;
use admintool_core::source::Source;

/// Read-only after startup.
pub(crate) struct WebAppInner {
    pub(crate) menu: TopMenu,
    pub(crate) context: ContextConfig,
    pub(crate) tables: Source,
    pub(crate) checks: Vec<Box<dyn HealthCheck>>,
}

pub(crate) type SharedState = Arc<WebAppInner>;

pub(crate) type AppState = State<SharedState>;

impl WebAppInner {
    /// Page context for `route`. Health probes block, so this runs off the
    /// async workers.
    pub(crate) async fn page_context(self: &Arc<Self>, route: &str) -> Context {
        let state = Arc::clone(self);
        let route = route.to_string();
        let fallback = route.clone();
        tokio::task::spawn_blocking(move || {
            Context::build(&route, &state.menu, &state.context, &state.checks)
        })
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, route = %fallback, "context task failed");
            Context::none()
        })
    }
}
