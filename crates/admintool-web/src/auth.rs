//! Access logging and Basic Auth middleware.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, info, warn};

/// Paths served without credentials.
const PUBLIC_PATHS: &[&str] = &["/api/v1/health"];

// ============================================================
// Access log layer (tower Layer + Service)
// ============================================================

#[derive(Clone)]
pub(crate) struct AccessLogLayer;

impl<S> tower::Layer<S> for AccessLogLayer {
    type Service = AccessLogService<S>;
    fn layer(&self, inner: S) -> Self::Service {
        AccessLogService { inner }
    }
}

/// Authenticated username, inserted into request extensions by auth middleware.
#[derive(Clone)]
pub(crate) struct AuthUser(pub(crate) String);

#[derive(Clone)]
pub(crate) struct AccessLogService<S> {
    inner: S,
}

impl<S> tower::Service<Request> for AccessLogService<S>
where
    S: tower::Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        let client = req
            .extensions()
            .get::<axum::extract::ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip().to_string())
            .unwrap_or_else(|| "-".to_owned());
        let t0 = Instant::now();

        let mut inner = self.inner.clone();
        Box::pin(async move {
            let response = inner.call(req).await?;
            let latency_ms = t0.elapsed().as_millis() as u64;
            let status = response.status().as_u16();
            // Basic auth runs inside this layer and tags the response.
            let user = response
                .extensions()
                .get::<AuthUser>()
                .map(|u| u.0.clone())
                .unwrap_or_else(|| "-".to_owned());
            if !path.starts_with("/assets/") && path != "/favicon.ico" {
                info!(client, user, status, latency_ms, "{method} {path}");
            }
            Ok(response)
        })
    }
}

// ============================================================
// Basic Auth middleware
// ============================================================

pub(crate) struct Credentials {
    pub(crate) user: String,
    pub(crate) password: String,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"admintool\"")],
        Body::from("Unauthorized"),
    )
        .into_response()
}

/// `user:password` from a `Basic` authorization header.
fn decode_basic(value: &str) -> Result<(String, String), &'static str> {
    use base64::Engine;

    let encoded = value.strip_prefix("Basic ").ok_or("not basic auth")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| "invalid base64")?;
    let decoded = String::from_utf8(decoded).map_err(|_| "invalid utf8")?;
    let (user, pass) = decoded.split_once(':').ok_or("malformed credentials")?;
    Ok((user.to_owned(), pass.to_owned()))
}

pub(crate) async fn basic_auth_middleware(
    State(creds): State<Arc<Credentials>>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    if PUBLIC_PATHS.contains(&path.as_str()) {
        return next.run(req).await;
    }

    let header_value = match req.headers().get(header::AUTHORIZATION) {
        Some(v) => v.to_str().map_err(|_| "invalid header encoding"),
        None => Err("no authorization header"),
    };
    let (user, pass) = match header_value.and_then(decode_basic) {
        Ok(pair) => pair,
        Err(reason) => {
            warn!(path = %path, "auth failed: {reason}");
            return unauthorized();
        }
    };

    if user != creds.user || pass != creds.password {
        warn!(user = %user, path = %path, "auth failed: invalid credentials");
        return unauthorized();
    }

    debug!(user = %user, path = %path, "authenticated");
    req.extensions_mut().insert(AuthUser(user.clone()));
    let mut response = next.run(req).await;
    response.extensions_mut().insert(AuthUser(user));
    response
}
