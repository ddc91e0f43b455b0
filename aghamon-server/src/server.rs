//! HTTP server implementation

use crate::assets::{self, AssetError};
use crate::views;
use crate::AppState;
use anyhow::Result;
use bytes::Bytes;
use http_body_util::{combinators::BoxBody, BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Run the HTTP server
pub async fn run_server(state: Arc<AppState>) -> Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", state.port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on http://{}", addr);

    loop {
        let (stream, remote_addr) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let state = state.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let state = state.clone();
                async move { handle_request(state, req, remote_addr).await }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Connection error: {:?}", err);
            }
        });
    }
}

/// Handle incoming HTTP request
async fn handle_request(
    state: Arc<AppState>,
    req: Request<Incoming>,
    remote_addr: SocketAddr,
) -> Result<Response<BoxBody<Bytes, Infallible>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = if method == Method::GET {
        match path.as_str() {
            "/" => home(),
            "/clients" => clients(&state).await,
            "/stats" => stats(&state).await,
            "/upstreams" => upstreams(&state).await,
            p if p == "/static" || p.starts_with("/static/") => static_asset(p),
            _ => error_response(StatusCode::NOT_FOUND, "Not Found"),
        }
    } else {
        error_response(StatusCode::NOT_FOUND, "Not Found")
    };

    info!(
        "{} {} {} - {}",
        remote_addr.ip(),
        method,
        path,
        response.status().as_u16()
    );

    Ok(response)
}

// ---------------------------------------------------------------------------
// Page handlers
// ---------------------------------------------------------------------------

fn home() -> Response<BoxBody<Bytes, Infallible>> {
    match views::home_page() {
        Ok(html) => html_response(StatusCode::OK, html),
        Err(e) => render_failure("home", &e),
    }
}

async fn clients(state: &AppState) -> Response<BoxBody<Bytes, Infallible>> {
    let response = match state.adguard.fetch_clients().await {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to fetch clients: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Error fetching clients: {}", e),
            );
        }
    };

    // Configured clients first, then auto-discovered, in API order
    let all_clients: Vec<_> = response.all_clients().cloned().collect();

    match views::clients_page(&all_clients) {
        Ok(html) => html_response(StatusCode::OK, html),
        Err(e) => render_failure("clients", &e),
    }
}

async fn stats(state: &AppState) -> Response<BoxBody<Bytes, Infallible>> {
    let stats = match state.adguard.fetch_stats().await {
        Ok(stats) => stats,
        Err(e) => {
            error!("Failed to fetch stats: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Error fetching stats: {}", e),
            );
        }
    };

    match views::stats_page(&stats) {
        Ok(html) => html_response(StatusCode::OK, html),
        Err(e) => render_failure("stats", &e),
    }
}

async fn upstreams(state: &AppState) -> Response<BoxBody<Bytes, Infallible>> {
    let stats = match state.adguard.fetch_stats().await {
        Ok(stats) => stats,
        Err(e) => {
            error!("Failed to fetch upstreams: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Error fetching upstreams: {}", e),
            );
        }
    };

    match views::upstreams_page(&stats) {
        Ok(html) => html_response(StatusCode::OK, html),
        Err(e) => render_failure("upstreams", &e),
    }
}

fn static_asset(path: &str) -> Response<BoxBody<Bytes, Infallible>> {
    let name = path
        .strip_prefix("/static")
        .unwrap_or(path)
        .trim_start_matches('/');

    match assets::lookup(name) {
        Ok(asset) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", asset.content_type)
            .body(full_body(asset.data))
            .unwrap(),
        Err(AssetError::Forbidden) => error_response(StatusCode::FORBIDDEN, "Forbidden"),
        Err(AssetError::NotFound) => error_response(StatusCode::NOT_FOUND, "File not found"),
    }
}

fn render_failure(page: &str, e: &views::RenderError) -> Response<BoxBody<Bytes, Infallible>> {
    error!("Failed to render {} page: {}", page, e);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &format!("Error rendering {} page: {}", page, e),
    )
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Create a full body response
fn full_body(data: Vec<u8>) -> BoxBody<Bytes, Infallible> {
    Full::new(Bytes::from(data))
        .map_err(|_| unreachable!())
        .boxed()
}

/// Create an HTML response
fn html_response(status: StatusCode, html: String) -> Response<BoxBody<Bytes, Infallible>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(full_body(html.into_bytes()))
        .unwrap()
}

/// Create an error response
fn error_response(status: StatusCode, message: &str) -> Response<BoxBody<Bytes, Infallible>> {
    let body = format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{} Aghamon</title></head>
<body>
    <h1>{}</h1>
    <p>{}</p>
    <hr>
    <p>Aghamon</p>
</body>
</html>"#,
        status.as_u16(),
        status.as_u16(),
        message
    );

    Response::builder()
        .status(status)
        .header("Content-Type", "text/html")
        .body(full_body(body.into_bytes()))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adguard::AdguardClient;
    use aghamon_common::AdguardConfig;

    async fn body_string(response: Response<BoxBody<Bytes, Infallible>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// State whose appliance URL points at a closed local port, so every
    /// fetch fails with connection refused.
    fn unreachable_state() -> AppState {
        AppState {
            adguard: AdguardClient::new(AdguardConfig {
                server_url: "http://127.0.0.1:1".to_string(),
                username: "a".to_string(),
                password: "b".to_string(),
            }),
            port: 0,
        }
    }

    #[tokio::test]
    async fn test_error_response_carries_message() {
        let response = error_response(StatusCode::INTERNAL_SERVER_ERROR, "connection refused");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert!(body.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_clients_returns_500_when_appliance_unreachable() {
        let state = unreachable_state();
        let response = clients(&state).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert!(body.contains("Error fetching clients:"));
        assert!(body.contains("request to AdGuard Home failed"));
    }

    #[tokio::test]
    async fn test_stats_returns_500_when_appliance_unreachable() {
        let state = unreachable_state();
        let response = stats(&state).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert!(body.contains("Error fetching stats:"));
        assert!(body.contains("request to AdGuard Home failed"));
    }

    #[tokio::test]
    async fn test_upstreams_returns_500_when_appliance_unreachable() {
        let state = unreachable_state();
        let response = upstreams(&state).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert!(body.contains("Error fetching upstreams:"));
    }

    #[test]
    fn test_static_asset_traversal_is_forbidden() {
        let response = static_asset("/static/../config.yaml");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_static_asset_missing_is_not_found() {
        let response = static_asset("/static/missing.png");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_static_asset_logo_is_png() {
        let response = static_asset("/static/logo_small.png");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "image/png"
        );
    }

    #[test]
    fn test_static_root_serves_index() {
        let response = static_asset("/static/");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
