//! HTTP handlers for menu, context, table and route-description endpoints.

use std::collections::BTreeMap;

use axum::Json;
use axum::body::Body;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use maud::{PreEscaped, html};
use rust_embed::Embed;
use serde::Deserialize;
use tracing::{error, warn};
use utoipa::IntoParams;

use admintool_core::context::Context;
use admintool_core::menu::RouteName;
use admintool_core::source::{self, SourceError};
use admintool_core::table::{FilterTable, TableData, csv_filename};

use crate::layout;
use crate::state::AppState;

// ============================================================
// Embedded assets
// ============================================================

#[derive(Embed)]
#[folder = "assets"]
pub(crate) struct Assets;

pub(crate) async fn serve_asset(Path(file): Path<String>) -> Response {
    match Assets::get(&file) {
        Some(asset) => {
            let mime = mime_guess::from_path(&file).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                Body::from(asset.data.to_vec()),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

// ============================================================
// Health
// ============================================================

#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
pub(crate) async fn handle_health() -> &'static str {
    "ok"
}

// ============================================================
// Menu / context
// ============================================================

#[utoipa::path(
    get,
    path = "/api/v1/menu",
    responses(
        (status = 200, description = "Registered routes in menu order", body = Vec<RouteName>)
    )
)]
pub(crate) async fn handle_menu(State(state): AppState) -> Json<Vec<RouteName>> {
    Json(state.menu.route_names().cloned().collect())
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct ContextQuery {
    /// Route path, including its query string if any.
    route: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/context",
    params(ContextQuery),
    responses(
        (status = 200, description = "Page context for the route", body = Context),
        (status = 404, description = "Unknown route; body is an empty context", body = Context)
    )
)]
pub(crate) async fn handle_context(
    State(state): AppState,
    Query(query): Query<ContextQuery>,
) -> (StatusCode, Json<Context>) {
    if !state.menu.is_known(&query.route) {
        return (StatusCode::NOT_FOUND, Json(Context::none()));
    }
    (StatusCode::OK, Json(state.page_context(&query.route).await))
}

// ============================================================
// Pages
// ============================================================

pub(crate) async fn handle_index(State(state): AppState) -> Html<String> {
    let ctx = state.page_context("/").await;
    let body = html! {
        div.index { (PreEscaped(state.context.index_html())) }
    };
    Html(layout::page(&ctx, &state.menu, body).into_string())
}

/// Any other GET: a route registered in the menu renders its description.
pub(crate) async fn handle_route(
    State(state): AppState,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let full = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let route = if state.menu.is_known(&full) {
        full
    } else if state.menu.is_known(uri.path()) {
        uri.path().to_string()
    } else {
        let body = html! { p.not-found { "No page is registered at " code { (full) } } };
        return (
            StatusCode::NOT_FOUND,
            Html(layout::page(&Context::none(), &state.menu, body).into_string()),
        )
            .into_response();
    };
    let ctx = state.page_context(&route).await;
    Html(layout::page(&ctx, &state.menu, html! {}).into_string()).into_response()
}

// ============================================================
// Tables
// ============================================================

/// Output representation of a table response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    Html,
    Json,
    Csv,
    Text,
}

impl Format {
    /// `?format=` wins over `Accept`; anything unrecognized is HTML.
    pub(crate) fn negotiate(param: Option<&str>, headers: &HeaderMap) -> Self {
        if let Some(f) = param {
            return match f.to_ascii_lowercase().as_str() {
                "json" => Self::Json,
                "csv" => Self::Csv,
                "text" | "txt" => Self::Text,
                _ => Self::Html,
            };
        }
        let accept = headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        for media in accept.split(',') {
            let media = media.split(';').next().unwrap_or_default().trim();
            match media {
                "text/html" => return Self::Html,
                "application/json" => return Self::Json,
                "text/csv" => return Self::Csv,
                "text/plain" => return Self::Text,
                _ => {}
            }
        }
        Self::Html
    }
}

/// Query parameters that steer the response rather than the data.
const CONTROL_PARAMS: &[&str] = &["format", "limit", "offset"];

#[utoipa::path(
    get,
    path = "/tables/{name}",
    params(
        ("name" = String, Path, description = "Table file stem"),
        ("format" = Option<String>, Query, description = "html, json, csv or text"),
        ("limit" = Option<usize>, Query, description = "Page size"),
        ("offset" = Option<usize>, Query, description = "Rows to skip")
    ),
    responses(
        (status = 200, description = "Table in the negotiated format", body = TableData),
        (status = 404, description = "No such table")
    )
)]
pub(crate) async fn handle_table(
    State(state): AppState,
    Path(name): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let route = format!("/tables/{}", name);
    let format = Format::negotiate(params.get("format").map(String::as_str), &headers);
    let limit = params.get("limit").and_then(|v| v.parse().ok());
    let offset = params
        .get("offset")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let query = source::Query {
        route: route.clone(),
        params: params
            .into_iter()
            .filter(|(k, _)| !CONTROL_PARAMS.contains(&k.as_str()))
            .collect(),
        limit,
        offset,
    };

    let worker = state.clone();
    let fetched = tokio::task::spawn_blocking(move || worker.tables.table(&query)).await;
    let table = match fetched {
        Ok(Ok(table)) => table,
        Ok(Err(SourceError::NotFound(what))) => {
            warn!(route = %route, what = %what, "table not found");
            return (StatusCode::NOT_FOUND, "not found").into_response();
        }
        Ok(Err(e)) => {
            error!(route = %route, error = %e, "table request failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        Err(e) => {
            error!(route = %route, error = %e, "table task failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match format {
        Format::Json => Json(table.to_data()).into_response(),
        Format::Csv => csv_response(&table, &route),
        Format::Text => match table.to_text() {
            Ok(text) => ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response(),
            Err(e) => {
                error!(route = %route, error = %e, "text export failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        Format::Html => {
            let ctx = state.page_context(&route).await;
            Html(layout::page(&ctx, &state.menu, table.render()).into_string()).into_response()
        }
    }
}

fn csv_response(table: &FilterTable, route: &str) -> Response {
    let body = match table.to_csv() {
        Ok(b) => b,
        Err(e) => {
            error!(route = %route, error = %e, "csv export failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let filename = csv_filename(route, &chrono::Local::now());
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::http::{HeaderValue, Request};
    use tower::ServiceExt;

    use admintool_core::context::ContextConfig;
    use admintool_core::menu::{RegisterPath, TopMenu};
    use admintool_core::source::Source;

    use super::*;
    use crate::source::FileSource;
    use crate::state::WebAppInner;

    const TABLE: &str = r#"
description: Collections
columns:
  - { key: name, header: Name }
  - { key: count, header: Count }
  - { key: status, header: Status, class: status }
rows:
  - { name: "Foo", count: 42, status: PASS }
  - { name: "Bar, Inc", count: 1234, status: FAIL }
"#;

    fn app(dir: &tempfile::TempDir) -> Router {
        std::fs::write(dir.path().join("colls.yaml"), TABLE).unwrap();
        let mut menu = TopMenu::default();
        menu.register_path(RegisterPath::breadcrumb("/tables", "Tables")).unwrap();
        menu.register_path(RegisterPath::item("/ops/coll", "/tables/colls", "Collections"))
            .unwrap();
        let state = Arc::new(WebAppInner {
            menu,
            context: ContextConfig::new("/assets/admin.css").with_index_markdown("# Welcome"),
            tables: Source::Enabled(Box::new(FileSource::open(dir.path()).unwrap())),
            checks: Vec::new(),
        });
        crate::router(state, None)
    }

    async fn get(app: Router, uri: &str, accept: Option<&str>) -> (StatusCode, HeaderMap, String) {
        let mut req = Request::builder().uri(uri);
        if let Some(a) = accept {
            req = req.header(header::ACCEPT, a);
        }
        let resp = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_negotiate() {
        let mut headers = HeaderMap::new();
        assert_eq!(Format::negotiate(None, &headers), Format::Html);
        assert_eq!(Format::negotiate(Some("CSV"), &headers), Format::Csv);
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/csv;q=0.9, */*"));
        assert_eq!(Format::negotiate(None, &headers), Format::Csv);
        assert_eq!(Format::negotiate(Some("json"), &headers), Format::Json);
        assert_eq!(Format::negotiate(Some("xml"), &headers), Format::Html);
    }

    #[tokio::test]
    async fn test_table_csv() {
        let dir = tempfile::tempdir().unwrap();
        let (status, headers, body) = get(app(&dir), "/tables/colls?format=csv", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Name,Count,Status\nFoo,42,PASS\n\"Bar, Inc\",\"1,234\",FAIL\n");
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"tables_colls."));
        assert!(disposition.ends_with(".csv\""));
    }

    #[tokio::test]
    async fn test_table_json_via_accept() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, body) = get(app(&dir), "/tables/colls", Some("application/json")).await;
        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["status"], "FAIL");
        assert_eq!(v["rows"][1]["name"], "Bar, Inc");
        assert_eq!(v["columns"][0]["header"], "Name");
    }

    #[tokio::test]
    async fn test_table_html_page() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, body) = get(app(&dir), "/tables/colls", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Collections - Admin Tool</title>"));
        assert!(body.contains(r#"<table class="data">"#));
        assert!(body.contains("2 rows"));
    }

    #[tokio::test]
    async fn test_unknown_table_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, _) = get(app(&dir), "/tables/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_menu_and_context_api() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, body) = get(app(&dir), "/api/v1/menu", None).await;
        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v[0]["route"], "/tables");
        assert_eq!(v[1]["title"], "Collections");

        let (status, _, body) = get(app(&dir), "/api/v1/context?route=/tables", None).await;
        assert_eq!(status, StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["title"], "Tables");
        assert!(v["description"].as_str().unwrap().contains("/tables/colls"));

        let (status, _, body) = get(app(&dir), "/api/v1/context?route=/nowhere", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["title"], "");
    }

    #[tokio::test]
    async fn test_pages() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, body) = get(app(&dir), "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Welcome</h1>"));

        let (status, _, body) = get(app(&dir), "/tables", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<a href="/tables/colls">Collections</a>"#));

        let (status, _, _) = get(app(&dir), "/missing/page", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, headers, _) = get(app(&dir), "/assets/admin.css", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/css");

        let (_, _, body) = get(app(&dir), "/api/v1/health", None).await;
        assert_eq!(body, "ok");
    }
}
