use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::GeminiClient;
use crate::infrastructure::storage::ensure_data_dir;
use crate::interfaces::http::{add_log, start_server, LogEntry};
use crate::interfaces::state::AppState;

pub fn run() -> std::io::Result<()> {
    actix_web::rt::System::new().block_on(serve())
}

async fn serve() -> std::io::Result<()> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
            error!(error = %e, "Failed to load configuration");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let vocabulary = config
        .load_vocabulary()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    ensure_data_dir(&config.data_dir)?;

    if config.llm.api_key.is_none() {
        warn!("No Gemini API key configured; insights will use the fallback text");
    }

    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));
    let (host, port) = config.bind_address();
    let state = Arc::new(AppState::new(
        config,
        vocabulary,
        Arc::new(GeminiClient::new()),
    ));

    add_log(
        &logs,
        "INFO",
        "Server",
        &format!("Listening on http://{}:{}", host, port),
    );
    info!(host = %host, port, "Starting HTTP server");

    start_server(state, logs)?.await
}
