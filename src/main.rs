use anyhow::Context;
use tracing_subscriber::EnvFilter;

use delivery_predictor::{
    config::ServiceConfig,
    service::{self, AppState},
    Artifacts, InferenceReporter,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = ServiceConfig::from_env()?;

    // Nothing is served unless both artifacts load
    let artifacts = match Artifacts::load(&cfg.model_path, &cfg.columns_path) {
        Ok(a) => a,
        Err(e) => {
            tracing::error!("error loading model: {}", e);
            return Err(e).context("startup aborted");
        }
    };
    let n_cols = artifacts.schema().len();

    // Warmup forward on an all-zero row
    let _ = artifacts
        .classifier()
        .predict_proba(&vec![0.0; n_cols])
        .context("warmup forward failed")?;
    tracing::info!(
        "model loaded; columns[{}], importances={}",
        n_cols,
        artifacts.classifier().feature_importances().is_some()
    );

    let mut state = AppState::new(artifacts, InferenceReporter::new(cfg.top_k));
    state.log_pred = cfg.log_pred;
    let app = service::router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
