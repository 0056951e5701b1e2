use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use docsmith::api::{describe_router, AppState};
use docsmith::config::{self, Backend, ServiceConfig};
use docsmith::describe::types::TextGenerator;
use docsmith::generate::OllamaGenerator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let cfg = ServiceConfig::from_env();
    tracing::info!(
        "{} starting v{}",
        config::SERVICE_NAME,
        config::SERVICE_VERSION
    );

    let generator = build_generator(&cfg)?;
    tracing::info!(
        backend = generator.info().backend,
        model = %generator.info().model,
        default_mode = cfg.default_mode.as_str(),
        "generator configured"
    );

    let addr = SocketAddr::new(cfg.bind_addr, cfg.port);
    let state = AppState::new(cfg, generator);
    let app = describe_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "describe server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}

fn build_generator(
    cfg: &ServiceConfig,
) -> Result<Arc<dyn TextGenerator>, Box<dyn std::error::Error>> {
    match &cfg.backend {
        Backend::Ollama => Ok(Arc::new(OllamaGenerator::new(&cfg.ollama))),
        #[cfg(feature = "onnx-generator")]
        Backend::Local { model_dir } => Ok(Arc::new(
            docsmith::generate::LocalGenerator::new(model_dir.clone()),
        )),
        #[cfg(not(feature = "onnx-generator"))]
        Backend::Local { .. } => {
            Err("GENERATOR_BACKEND=local requires the 'onnx-generator' feature".into())
        }
    }
}
