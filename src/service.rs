use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::artifacts::Artifacts;
use crate::catalog::{self, FormOptions};
use crate::encoder::{self, FeatureVector};
use crate::error::PredictorError;
use crate::reporter::{InferenceReporter, PredictionView};
use crate::types::OrderForm;

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub artifacts: Arc<Artifacts>,
    pub reporter: InferenceReporter,
    pub log_pred: bool,
}

impl AppState {
    pub fn new(artifacts: Artifacts, reporter: InferenceReporter) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
            reporter,
            log_pred: false,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/options", get(options))
        .route("/preview", post(preview))
        .route("/predict", post(predict))
        .with_state(state)
}

// ---------- Errors ----------

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(e: PredictorError) -> ApiError {
    let status = match e {
        PredictorError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": e.to_string() })))
}

// ---------- Handlers ----------

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "columns": state.artifacts.schema().len() }))
}

async fn options() -> Json<FormOptions> {
    Json(catalog::form_options())
}

/// The processed record and its aligned encoding, without running the model.
async fn preview(
    State(state): State<AppState>,
    Json(form): Json<OrderForm>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let input = form.validate().map_err(api_error)?;
    let vector = encoder::encode(&input, state.artifacts.schema()).map_err(api_error)?;
    Ok(Json(json!({
        "record": input,
        "encoded": vector.named(),
        "dropped": vector.dropped(),
    })))
}

async fn predict(
    State(state): State<AppState>,
    Json(form): Json<OrderForm>,
) -> Result<Json<PredictionView>, ApiError> {
    let input = form.validate().map_err(|e| {
        tracing::info!("rejected order: {}", e);
        api_error(e)
    })?;
    let vector = encoder::encode(&input, state.artifacts.schema()).map_err(api_error)?;

    if state.log_pred {
        log_vector(&vector);
    }

    let result = state
        .reporter
        .report(state.artifacts.classifier(), &vector)
        .map_err(|e| {
            tracing::error!("inference failed: {}", e);
            api_error(e)
        })?;
    tracing::debug!(
        "label={:?} p_delayed={:.4} state={}",
        result.label,
        result.probability,
        input.customer_state()
    );

    Ok(Json(PredictionView::new(result, input.customer_state())))
}

// Per-request summary of the aligned row, including zero-filled unknown categories
fn log_vector(vector: &FeatureVector<'_>) {
    let vals = vector.values();
    let nz = vals.iter().filter(|x| **x != 0.0).count();
    let mean = if vals.is_empty() { 0.0 } else { vals.iter().sum::<f64>() / (vals.len() as f64) };
    let sample: Vec<String> = vector
        .named()
        .iter()
        .take(6)
        .map(|nv| format!("{}={:.3}", nv.column, nv.value))
        .collect();
    tracing::info!(
        "in_dim={} nonzero={} mean={:.3} dropped={:?} sample=[{}]",
        vals.len(),
        nz,
        mean,
        vector.dropped(),
        sample.join(", ")
    );
}
