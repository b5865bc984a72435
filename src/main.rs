use log::{error, info};
use tokio::net::TcpListener;
use todo_web::configuration::Config;
use todo_web::error_handling::types::StartupError;
use todo_web::rendering::PageRenderer;
use todo_web::storage::open_storage;
use todo_web::web_interface::WebServer;

/// Everything that must succeed before serving. The port is bound last, so a
/// bad store or template never leaves a half-started listener behind.
async fn prepare(config: Config) -> Result<(WebServer, TcpListener), StartupError> {
    let config = config.resolve()?;
    info!("Configuration imported successfully");

    let addr = config.socket_addr()?;
    let storage = open_storage(&config.database_url).await?;
    info!("Storage reachable");

    let renderer =
        PageRenderer::from_config(config.template_path.as_deref(), config.reload_template)?;
    info!("Page template compiled");

    let listener = WebServer::bind(addr).await?;
    Ok((WebServer::new(storage, renderer, config.page_title), listener))
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    info!("Starting todo-web v{}", env!("CARGO_PKG_VERSION"));

    let (server, listener) = match prepare(Config::from_args()).await {
        Ok(ready) => ready,
        Err(e) => {
            error!("Startup failed: {}, exiting...", e);
            std::process::exit(1);
        }
    };

    server.serve(listener).await;
}
