use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use cirview_context::config::ViewerConfig;
use console::style;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct AppState {
    config: Arc<ViewerConfig>,
}

/// Bind the listener and serve until the process is killed.
pub async fn run(config: ViewerConfig) -> Result<()> {
    let app = router(&config);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    banner(&config);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the route table: the index page, the two diagram routes, and the
/// css/js asset mounts. Registration happens once; handlers only ever read
/// the already-resolved paths.
pub fn router(config: &ViewerConfig) -> Router {
    tracing::info!(
        css = %config.css_dir.display(),
        js = %config.js_dir.display(),
        "Serving static assets"
    );

    let state = AppState {
        config: Arc::new(config.clone()),
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/net", get(net_handler))
        .route("/pcb", get(pcb_handler))
        .nest_service("/css", ServeDir::new(&config.css_dir))
        .nest_service("/js", ServeDir::new(&config.js_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Response {
    serve_file(&state.config.index_path)
}

async fn net_handler(State(state): State<AppState>) -> Response {
    serve_file(&state.config.net_path)
}

async fn pcb_handler(State(state): State<AppState>) -> Response {
    serve_file(&state.config.pcb_path)
}

/// Serve one file verbatim, with a content type guessed from the extension.
/// A missing file answers 404 naming the resolved path.
fn serve_file(path: &Path) -> Response {
    let content_type = mime_guess::from_path(path).first_or_octet_stream();

    match std::fs::read(path) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type.to_string())],
            bytes,
        )
            .into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            format!("File not found: {}", path.display()),
        )
            .into_response(),
    }
}

/// Startup banner on stdout. Diagnostic only.
fn banner(config: &ViewerConfig) {
    println!();
    println!("  {}", style("cirview").bold().cyan());
    println!();
    println!(
        "  Viewer listening at {}",
        style(format!("http://localhost:{}", config.port)).bold()
    );
    println!("  net diagram  {}", style(config.net_path.display()).dim());
    println!("  pcb diagram  {}", style(config.pcb_path.display()).dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::fs;
    use tower::ServiceExt;

    const NET_SVG: &[u8] = b"<svg><g id=\"net\"/></svg>";
    const PCB_SVG: &[u8] = b"<svg><g id=\"pcb\"/></svg>";

    fn test_config(root: &Path) -> ViewerConfig {
        let asset_dir = root.join("assets");
        fs::create_dir_all(asset_dir.join("css")).unwrap();
        fs::create_dir_all(asset_dir.join("js")).unwrap();
        fs::write(asset_dir.join("index.html"), "<html>viewer</html>").unwrap();

        ViewerConfig {
            port: 0,
            index_path: asset_dir.join("index.html"),
            net_path: root.join("net.dot.svg"),
            pcb_path: root.join("pcb.svg"),
            css_dir: asset_dir.join("css"),
            js_dir: asset_dir.join("js"),
        }
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, body.to_vec())
    }

    #[tokio::test]
    async fn test_index_served_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let (status, content_type, body) = get(router(&config), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/html"));
        assert_eq!(body, b"<html>viewer</html>");
    }

    #[tokio::test]
    async fn test_diagram_routes_serve_configured_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        fs::write(&config.net_path, NET_SVG).unwrap();
        fs::write(&config.pcb_path, PCB_SVG).unwrap();

        let (status, content_type, body) = get(router(&config), "/net").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("image/svg+xml"));
        assert_eq!(body, NET_SVG);

        let (status, _, body) = get(router(&config), "/pcb").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, PCB_SVG);
    }

    #[tokio::test]
    async fn test_missing_diagram_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let (status, _, body) = get(router(&config), "/net").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(String::from_utf8(body).unwrap().contains("net.dot.svg"));
    }

    #[tokio::test]
    async fn test_repeated_requests_return_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        fs::write(&config.net_path, NET_SVG).unwrap();

        let (_, _, first) = get(router(&config), "/net").await;
        let (_, _, second) = get(router(&config), "/net").await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_css_mount_serves_asset_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        fs::write(config.css_dir.join("a.css"), "body { margin: 0; }").unwrap();

        let (status, _, body) = get(router(&config), "/css/a.css").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"body { margin: 0; }");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let (status, _, _) = get(router(&config), "/files/anything").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
