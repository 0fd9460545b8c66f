//! Local page server for exercising the fetch strategies without the internet.

use std::net::SocketAddr;
use std::thread;
use std::time::Duration;

use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use pagebench_fetch::FetchOptions;
use tokio::sync::oneshot;

pub struct PageServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl PageServer {
    pub fn start() -> Self {
        let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                let shutdown = async {
                    let _ = rx.await;
                };
                axum::serve(listener, app())
                    .with_graceful_shutdown(shutdown)
                    .await
                    .unwrap();
            });
        });
        Self { addr, shutdown: Some(tx) }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for PageServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

fn app() -> Router {
    Router::new()
        .route("/repeat/:text/:count", get(repeat))
        .route("/slow/:ms", get(slow))
        .route("/status/:code", get(status))
        .route("/latin1", get(latin1))
}

async fn repeat(Path((text, count)): Path<(String, usize)>) -> String {
    text.repeat(count)
}

async fn slow(Path(ms): Path<u64>) -> String {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    "s".repeat(300)
}

async fn status(Path(code): Path<u16>) -> impl IntoResponse {
    let code = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, "e".repeat(300))
}

async fn latin1() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=iso-8859-1")], vec![0xE9_u8; 300])
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

pub fn local_opts() -> FetchOptions {
    FetchOptions { use_env_proxy: false, ..FetchOptions::default() }
}
