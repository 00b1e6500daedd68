mod error;
mod handlers;
mod response;

pub use error::RequestError;
pub use response::OpenResponse;

use crate::browser::UrlOpener;
use crate::config::Config;
use anyhow::{Context, Result};
use axum::extract::{ConnectInfo, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Shared by every request
pub struct AppState<O> {
    opener: O,
    launch_lock: Mutex<()>,
}

/// Build the router: GET and POST on any path. HEAD is refused so it never
/// opens anything.
pub fn router<O: UrlOpener + 'static>(opener: O) -> Router {
    let state = Arc::new(AppState {
        opener,
        launch_lock: Mutex::new(()),
    });

    Router::new()
        .route(
            "/",
            get(handlers::open_from_query::<O>)
                .head(handlers::method_not_allowed)
                .post(handlers::open_from_body::<O>),
        )
        .route(
            "/{*path}",
            get(handlers::open_from_query::<O>)
                .head(handlers::method_not_allowed)
                .post(handlers::open_from_body::<O>),
        )
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C
pub async fn run<O: UrlOpener + 'static>(config: Config, opener: O) -> Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind listener on {}", addr))?;

    print_banner(config.port);

    serve(listener, opener, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve<O, F>(listener: TcpListener, opener: O, shutdown: F) -> Result<()>
where
    O: UrlOpener + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(opener).into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn print_banner(port: u16) {
    println!("Browser Launcher Service");
    println!("========================");
    println!("Listening on: http://localhost:{}", port);
    println!("Access from another device: http://<host-ip>:{}?url=<device-url>", port);
    println!("Press Ctrl+C to stop\n");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    println!("\nShutting down server...");
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if response.status().is_success() {
        tracing::info!(%peer, %method, %uri, status, elapsed_ms, "request");
    } else {
        tracing::warn!(%peer, %method, %uri, status, elapsed_ms, "request");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::OpenError;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;

    /// Records every URL it is asked to open; optionally fails
    #[derive(Clone, Default)]
    struct RecordingOpener {
        opened: Arc<StdMutex<Vec<String>>>,
        fail_with: Option<String>,
    }

    impl RecordingOpener {
        fn failing(msg: &str) -> Self {
            Self {
                fail_with: Some(msg.to_string()),
                ..Self::default()
            }
        }

        fn opened(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }
    }

    impl UrlOpener for RecordingOpener {
        async fn open(&self, url: &str) -> Result<(), OpenError> {
            self.opened.lock().unwrap().push(url.to_string());
            match &self.fail_with {
                Some(msg) => Err(OpenError::Failed(msg.clone())),
                None => Ok(()),
            }
        }
    }

    struct TestServer {
        base: String,
        stop: oneshot::Sender<()>,
        handle: JoinHandle<Result<()>>,
    }

    async fn start(opener: RecordingOpener) -> TestServer {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(listener, opener, async {
            let _ = stopped.await;
        }));
        TestServer {
            base: format!("http://{}", addr),
            stop,
            handle,
        }
    }

    #[tokio::test]
    async fn test_get_normalizes_and_opens() {
        let opener = RecordingOpener::default();
        let server = start(opener.clone()).await;

        let resp = reqwest::get(format!("{}/?url=example.com", server.base))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert!(resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .starts_with("application/json"));

        let body: OpenResponse = resp.json().await.unwrap();
        assert_eq!(body, OpenResponse::success("http://example.com".to_string()));
        assert_eq!(body.message, "Opened http://example.com");
        assert_eq!(opener.opened(), vec!["http://example.com"]);
    }

    #[tokio::test]
    async fn test_get_any_path_and_encoded_url() {
        let opener = RecordingOpener::default();
        let server = start(opener.clone()).await;

        let resp = reqwest::get(format!(
            "{}/launch/now?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc",
            server.base
        ))
        .await
        .unwrap();
        assert_eq!(resp.status(), 200);

        let body: OpenResponse = resp.json().await.unwrap();
        assert_eq!(body.url, "https://example.com/a?b=c");
        assert_eq!(opener.opened(), vec!["https://example.com/a?b=c"]);
    }

    #[tokio::test]
    async fn test_get_without_url_is_bad_request() {
        let opener = RecordingOpener::default();
        let server = start(opener.clone()).await;

        let resp = reqwest::get(format!("{}/", server.base)).await.unwrap();
        assert_eq!(resp.status(), 400);
        assert_eq!(resp.text().await.unwrap(), "Missing 'url' parameter");

        let resp = reqwest::get(format!("{}/?url=", server.base)).await.unwrap();
        assert_eq!(resp.status(), 400);

        assert!(opener.opened().is_empty());
    }

    #[tokio::test]
    async fn test_post_json_opens_url() {
        let opener = RecordingOpener::default();
        let server = start(opener.clone()).await;

        let resp = reqwest::Client::new()
            .post(format!("{}/", server.base))
            .json(&serde_json::json!({ "url": "https://example.com" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body: OpenResponse = resp.json().await.unwrap();
        assert_eq!(body.url, "https://example.com");
        assert_eq!(body.status, "success");
        assert_eq!(opener.opened(), vec!["https://example.com"]);
    }

    #[tokio::test]
    async fn test_post_bad_bodies_are_bad_request() {
        let opener = RecordingOpener::default();
        let server = start(opener.clone()).await;
        let client = reqwest::Client::new();

        let cases = [
            ("not json", "Invalid JSON"),
            ("{}", "Missing 'url' in JSON body"),
            (r#"{"url": 7}"#, "'url' in JSON body must be a string"),
        ];

        for (body, expected) in cases {
            let resp = client
                .post(format!("{}/", server.base))
                .header("content-type", "application/json")
                .body(body)
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), 400, "body: {}", body);
            assert_eq!(resp.text().await.unwrap(), expected);
        }

        assert!(opener.opened().is_empty());
    }

    #[tokio::test]
    async fn test_open_failure_is_server_error() {
        let opener = RecordingOpener::failing("LSOpenURLsWithRole() failed");
        let server = start(opener.clone()).await;

        let resp = reqwest::get(format!("{}/?url=example.com", server.base))
            .await
            .unwrap();
        assert_eq!(resp.status(), 500);

        let text = resp.text().await.unwrap();
        assert!(text.contains("LSOpenURLsWithRole() failed"), "got: {}", text);
        assert_eq!(opener.opened(), vec!["http://example.com"]);
    }

    #[tokio::test]
    async fn test_server_survives_failed_requests() {
        let server = start(RecordingOpener::default()).await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{}/", server.base))
            .body("not json")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);

        let resp = client
            .get(format!("{}/?url=example.org", server.base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn test_other_methods_rejected() {
        let opener = RecordingOpener::default();
        let server = start(opener.clone()).await;
        let client = reqwest::Client::new();

        let resp = client
            .put(format!("{}/?url=example.com", server.base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 405);

        for path in ["/?url=example.com", "/some/path?url=example.com"] {
            let resp = client
                .head(format!("{}{}", server.base, path))
                .send()
                .await
                .unwrap();
            assert_eq!(resp.status(), 405, "path: {}", path);
        }

        assert!(opener.opened().is_empty());
    }

    #[tokio::test]
    async fn test_graceful_shutdown() {
        let server = start(RecordingOpener::default()).await;

        server.stop.send(()).unwrap();
        let result = server.handle.await.unwrap();
        assert!(result.is_ok());
    }
}
