mod auth;
mod handlers;
mod health;
mod layout;
mod openapi;
mod source;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context as _, bail};
use axum::Router;
use axum::routing::get;
use clap::Parser;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use admintool_core::context::ContextConfig;
use admintool_core::menu::TopMenu;
use admintool_core::menu::config::load_menu_file;
use admintool_core::source::{DataSource, Source};

use auth::{AccessLogLayer, Credentials};
use openapi::ApiDoc;
use state::{SharedState, WebAppInner};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(name = "admintool-web", about = "Admin tool web server", version = admintool_core::VERSION)]
struct Args {
    /// Listen address.
    #[arg(long, default_value = "0.0.0.0:8080", env = "ADMINTOOL_LISTEN")]
    listen: String,

    /// Menu definition (YAML). Without it only the index page is registered.
    #[arg(long, env = "ADMINTOOL_MENU")]
    menu: Option<PathBuf>,

    /// Directory of `<name>.yaml` table files served under /tables.
    #[arg(long, env = "ADMINTOOL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Markdown file for the index page (default: built-in page).
    #[arg(long, env = "ADMINTOOL_INDEX")]
    index: Option<PathBuf>,

    /// Stylesheet href.
    #[arg(long, default_value = "/assets/admin.css", env = "ADMINTOOL_STYLESHEET")]
    stylesheet: String,

    /// Basic Auth username. If set, --auth-password is also required.
    #[arg(long, env = "ADMINTOOL_AUTH_USER")]
    auth_user: Option<String>,

    /// Basic Auth password.
    #[arg(long, env = "ADMINTOOL_AUTH_PASSWORD")]
    auth_password: Option<String>,

    /// Database host:port; pages get class `no-db` when unreachable.
    #[arg(long, env = "ADMINTOOL_DB_ADDR")]
    db_addr: Option<String>,

    /// ZooKeeper host:port; pages get class `no-zk` when unreachable.
    #[arg(long, env = "ADMINTOOL_ZK_ADDR")]
    zk_addr: Option<String>,

    /// LDAP host:port; pages get class `no-ldap` when unreachable.
    #[arg(long, env = "ADMINTOOL_LDAP_ADDR")]
    ldap_addr: Option<String>,
}

// ============================================================
// Main
// ============================================================

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("admintool_web=info,admintool_core=info")
                }),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(async_main(args)) {
        error!("{e:#}");
        process::exit(1);
    }
}

async fn async_main(args: Args) -> anyhow::Result<()> {
    info!(version = admintool_core::VERSION, "starting");

    let menu = match &args.menu {
        Some(path) => load_menu_file(path)?
            .build()
            .with_context(|| format!("failed to register menu from {}", path.display()))?,
        None => TopMenu::default(),
    };

    let context = ContextConfig::new(&args.stylesheet);
    let context = match &args.index {
        Some(path) => context
            .load_index(path)
            .with_context(|| format!("failed to read index page {}", path.display()))?,
        None => match handlers::Assets::get("index.md") {
            Some(f) => context.with_index_markdown(&String::from_utf8_lossy(&f.data)),
            None => context,
        },
    };

    let tables = match &args.data_dir {
        Some(dir) => Source::from_init(
            "tables",
            source::FileSource::open(dir).map(|s| Box::new(s) as Box<dyn DataSource>),
        ),
        None => Source::Disabled {
            name: "tables".to_string(),
            reason: "no data directory configured".to_string(),
        },
    };

    let checks = health::probes(&[
        ("no-db", args.db_addr.as_ref()),
        ("no-zk", args.zk_addr.as_ref()),
        ("no-ldap", args.ldap_addr.as_ref()),
    ]);
    info!(probes = checks.len(), tables = tables.is_enabled(), "backends configured");

    let auth = match (&args.auth_user, &args.auth_password) {
        (Some(user), Some(password)) => {
            info!("basic auth enabled");
            Some(Arc::new(Credentials {
                user: user.clone(),
                password: password.clone(),
            }))
        }
        (Some(_), None) | (None, Some(_)) => {
            bail!("--auth-user and --auth-password must both be set");
        }
        _ => None,
    };

    let state: SharedState = Arc::new(WebAppInner {
        menu,
        context,
        tables,
        checks,
    });

    let app = router(state, auth).into_make_service_with_connect_info::<SocketAddr>();

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("invalid listen address {}", args.listen))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "listening");

    axum::serve(listener, app).await.context("server error")
}

pub(crate) fn router(state: SharedState, credentials: Option<Arc<Credentials>>) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::handle_index))
        .route("/api/v1/health", get(handlers::handle_health))
        .route("/api/v1/menu", get(handlers::handle_menu))
        .route("/api/v1/context", get(handlers::handle_context))
        .route("/tables/{name}", get(handlers::handle_table))
        .route("/assets/{file}", get(handlers::serve_asset))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(get(handlers::handle_route))
        .with_state(state);

    // Layers added later wrap earlier ones; the access log must see the
    // response after auth has tagged it.
    if let Some(creds) = credentials {
        app = app.layer(axum::middleware::from_fn_with_state(
            creds,
            auth::basic_auth_middleware,
        ));
    }

    app.layer(AccessLogLayer)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use base64::Engine;
    use tower::ServiceExt;

    use super::*;

    fn state() -> SharedState {
        Arc::new(WebAppInner {
            menu: TopMenu::default(),
            context: ContextConfig::default(),
            tables: Source::Disabled {
                name: "tables".into(),
                reason: "none".into(),
            },
            checks: Vec::new(),
        })
    }

    fn creds() -> Option<Arc<Credentials>> {
        Some(Arc::new(Credentials {
            user: "admin".into(),
            password: "pw".into(),
        }))
    }

    async fn status(app: Router, uri: &str, auth: Option<&str>) -> StatusCode {
        let mut req = Request::builder().uri(uri);
        if let Some(pair) = auth {
            let token = base64::engine::general_purpose::STANDARD.encode(pair);
            req = req.header(header::AUTHORIZATION, format!("Basic {token}"));
        }
        app.oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_basic_auth() {
        assert_eq!(status(router(state(), creds()), "/", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(router(state(), creds()), "/", Some("admin:wrong")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status(router(state(), creds()), "/", Some("admin:pw")).await, StatusCode::OK);
        assert_eq!(
            status(router(state(), creds()), "/api/v1/health", None).await,
            StatusCode::OK
        );
        assert_eq!(status(router(state(), None), "/", None).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_disabled_tables_render_placeholder() {
        let resp = router(state(), None)
            .oneshot(
                Request::builder()
                    .uri("/tables/anything?format=json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["status"], "SKIP");
        assert_eq!(v["status_message"], "none");
    }
}
