use std::net::SocketAddr;
use std::sync::Arc;

use log::info;
use tokio::net::TcpListener;
use warp::{Filter, Rejection, Reply};

use super::handlers::AppContext;
use super::routes::todo_routes;
use crate::error_handling::types::StartupError;
use crate::rendering::PageRenderer;
use crate::storage::Storage;

/// Web server for the todo pages
pub struct WebServer {
    context: Arc<AppContext>,
}

impl WebServer {
    /// Create a new WebServer instance
    pub fn new(storage: Arc<dyn Storage>, renderer: PageRenderer, page_title: String) -> Self {
        Self {
            context: Arc::new(AppContext {
                storage,
                renderer,
                page_title,
            }),
        }
    }

    /// Application routes with access logging attached.
    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        todo_routes(self.context.clone()).with(warp::log("todo_web::access"))
    }

    /// Bind the listening socket. A taken port or a refused address comes back
    /// as an error instead of aborting the process.
    pub async fn bind(addr: SocketAddr) -> Result<TcpListener, StartupError> {
        TcpListener::bind(addr)
            .await
            .map_err(|e| StartupError::Bind(addr, e))
    }

    /// Serve on an already bound listener until the process is stopped.
    pub async fn serve(&self, listener: TcpListener) {
        if let Ok(addr) = listener.local_addr() {
            info!("Listening on http://{}", addr);
        }
        warp::serve(self.routes()).incoming(listener).run().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory_storage::MemoryStorage;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn test_bind_reports_port_in_use() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let err = WebServer::bind(addr).await.unwrap_err();
        assert!(matches!(err, StartupError::Bind(a, _) if a == addr));
    }

    #[tokio::test]
    async fn test_serve_answers_on_bound_listener() {
        let listener = WebServer::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = WebServer::new(
            Arc::new(MemoryStorage::new()),
            PageRenderer::embedded().unwrap(),
            "Served".to_string(),
        );
        let handle = tokio::spawn(async move { server.serve(listener).await });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("<h1>Served</h1>"));

        handle.abort();
    }
}
