//! http
//!
//! Read-only HTTP surface over the process-wide snapshot.
//!
//! # Routes
//!
//! | Route          | Response                                             |
//! |----------------|------------------------------------------------------|
//! | `GET /version` | The snapshot as JSON, `Cache-Control: public, max-age=300` |
//! | `GET /health`  | `{status, version, timestamp}`, 503 if loading failed |
//!
//! Every response also carries `X-App-Version` and, when a commit is known,
//! `X-Git-Commit`. Header values containing control characters are dropped.
//!
//! Handlers only read the snapshot through an [`InfoProvider`]. They never
//! run the load pipeline themselves beyond what [`crate::engine::get`] does,
//! and a load failure never takes the server down.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::middleware::{self as axum_mw, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::errors::VersionError;
use crate::core::info::Info;
use crate::engine;

/// Source of the snapshot served by the handlers.
pub type InfoProvider = Arc<dyn Fn() -> Result<Arc<Info>, VersionError> + Send + Sync>;

pub const APP_VERSION_HEADER: &str = "x-app-version";
pub const GIT_COMMIT_HEADER: &str = "x-git-commit";

const VERSION_CACHE_CONTROL: &str = "public, max-age=300";

/// Router serving the process-wide instance.
pub fn router() -> Router {
    router_with(Arc::new(engine::get))
}

/// Router serving whatever `provider` returns.
pub fn router_with(provider: InfoProvider) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/health", get(health_handler))
        .layer(axum_mw::from_fn(version_headers))
        .layer(Extension(provider))
}

/// Bind `addr` and serve [`router`] until the process exits.
pub async fn serve(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "serving version endpoints");
    axum::serve(listener, router()).await
}

async fn version_handler(Extension(provider): Extension<InfoProvider>) -> Response {
    match provider() {
        Ok(info) => (
            [(header::CACHE_CONTROL, VERSION_CACHE_CONTROL)],
            Json(Info::clone(&info)),
        )
            .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "version requested but not available");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "version information not available",
                }),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum HealthBody {
    Ok {
        status: &'static str,
        version: String,
        timestamp: DateTime<Utc>,
    },
    Error {
        status: &'static str,
        error: &'static str,
        timestamp: DateTime<Utc>,
    },
}

async fn health_handler(Extension(provider): Extension<InfoProvider>) -> Response {
    let timestamp = Utc::now();
    match provider() {
        Ok(info) => Json(HealthBody::Ok {
            status: "ok",
            version: info.project().version.clone(),
            timestamp,
        })
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthBody::Error {
                    status: "error",
                    error: "version not available",
                    timestamp,
                }),
            )
                .into_response()
        }
    }
}

async fn version_headers(
    Extension(provider): Extension<InfoProvider>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    if let Ok(info) = provider() {
        let headers = response.headers_mut();
        if let Some(value) = header_value(&info.project().version) {
            headers.insert(HeaderName::from_static(APP_VERSION_HEADER), value);
        }
        if info.git().has_commit() {
            if let Some(value) = header_value(&info.git().commit) {
                headers.insert(HeaderName::from_static(GIT_COMMIT_HEADER), value);
            }
        }
    }
    response
}

fn header_value(raw: &str) -> Option<HeaderValue> {
    if raw.chars().any(char::is_control) {
        tracing::warn!(value = ?raw, "refusing header value with control characters");
        return None;
    }
    HeaderValue::from_str(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::hermetic;
    use crate::core::errors::ValidationError;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn fixed(info: Info) -> InfoProvider {
        let info = Arc::new(info);
        Arc::new(move || Ok(Arc::clone(&info)))
    }

    fn failing() -> InfoProvider {
        Arc::new(|| {
            Err(VersionError::NotInitialized {
                cause: Box::new(VersionError::ValidationFailed(ValidationError::custom(
                    "test", "rejected",
                ))),
            })
        })
    }

    fn svc(commit: &str) -> Info {
        let mut info =
            engine::new_info(hermetic("project: {name: svc, version: 1.2.3}")).unwrap();
        info.git.commit = commit.to_string();
        info
    }

    async fn call(app: Router, method: &str, uri: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn version_endpoint_serves_snapshot() {
        let resp = call(router_with(fixed(svc("abc1234"))), "GET", "/version").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CACHE_CONTROL],
            "public, max-age=300"
        );
        assert_eq!(resp.headers()[APP_VERSION_HEADER], "1.2.3");
        assert_eq!(resp.headers()[GIT_COMMIT_HEADER], "abc1234");

        let body = json(resp).await;
        assert_eq!(body["project"]["name"], "svc");
        assert_eq!(body["git"]["commit"], "abc1234");
        assert!(body.get("loaded_at").is_none());
    }

    #[tokio::test]
    async fn default_commit_header_is_omitted() {
        let resp = call(router_with(fixed(svc("dev"))), "GET", "/health").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(GIT_COMMIT_HEADER).is_none());

        let body = json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], "1.2.3");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn control_characters_never_reach_headers() {
        let resp = call(router_with(fixed(svc("abc\n1234"))), "GET", "/health").await;
        assert!(resp.headers().get(GIT_COMMIT_HEADER).is_none());
        assert_eq!(resp.headers()[APP_VERSION_HEADER], "1.2.3");
    }

    #[tokio::test]
    async fn failed_load_reports_unavailable() {
        let resp = call(router_with(failing()), "GET", "/health").await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(resp.headers().get(APP_VERSION_HEADER).is_none());
        let body = json(resp).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "version not available");

        let resp = call(router_with(failing()), "GET", "/version").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn only_get_is_allowed() {
        let resp = call(router_with(fixed(svc("dev"))), "POST", "/version").await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
