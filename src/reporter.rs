//! Runs the classifier on an aligned vector and shapes the answer for display.

use serde::Serialize;

use crate::catalog;
use crate::encoder::FeatureVector;
use crate::error::{PredictorError, Result};
use crate::model::Classifier;

/// Number of importances shown by default.
pub const DEFAULT_TOP_K: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryLabel {
    OnTime,
    Delayed,
}

impl DeliveryLabel {
    pub fn from_class(class: u8) -> Result<Self> {
        match class {
            0 => Ok(Self::OnTime),
            1 => Ok(Self::Delayed),
            other => Err(PredictorError::Inference(format!(
                "classifier returned label {other}, expected 0 or 1"
            ))),
        }
    }

    pub fn class(self) -> u8 {
        match self {
            Self::OnTime => 0,
            Self::Delayed => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub column: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: DeliveryLabel,
    /// Probability of the delayed class.
    pub probability: f64,
    pub feature_importance_ranking: Option<Vec<FeatureImportance>>,
}

#[derive(Debug, Clone)]
pub struct InferenceReporter {
    top_k: usize,
}

impl Default for InferenceReporter {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl InferenceReporter {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// One predict + predict_proba round on the oracle. Errors are returned as-is.
    pub fn report(&self, model: &dyn Classifier, vector: &FeatureVector<'_>) -> Result<PredictionResult> {
        let label = DeliveryLabel::from_class(model.predict(vector.values())?)?;

        let proba = model.predict_proba(vector.values())?;
        let probability = proba[1];
        if !(0.0..=1.0).contains(&probability) {
            return Err(PredictorError::Inference(format!(
                "delayed-class probability {probability} outside [0, 1]"
            )));
        }

        let feature_importance_ranking = match model.feature_importances() {
            Some(scores) => Some(rank_importances(vector.columns(), scores, self.top_k)?),
            None => None,
        };

        Ok(PredictionResult {
            label,
            probability,
            feature_importance_ranking,
        })
    }
}

/// Pairs scores with column names and keeps the `k` largest. Ties keep column order.
pub fn rank_importances(columns: &[String], scores: &[f64], k: usize) -> Result<Vec<FeatureImportance>> {
    if columns.len() != scores.len() {
        return Err(PredictorError::SchemaMismatch(format!(
            "{} importances for {} columns",
            scores.len(),
            columns.len()
        )));
    }
    let mut ranked: Vec<FeatureImportance> = columns
        .iter()
        .zip(scores)
        .map(|(column, &score)| FeatureImportance {
            column: column.clone(),
            score,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(k);
    Ok(ranked)
}

// ---------- Display values ----------

/// What the result panel shows for one prediction.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    pub label: DeliveryLabel,
    pub prediction: u8,
    pub headline: &'static str,
    pub detail: &'static str,
    pub probability: f64,
    /// e.g. "30.00%"
    pub probability_pct: String,
    /// 0..=100, for a progress bar
    pub progress: u8,
    pub delivery_estimate: &'static str,
    pub top_features: Option<Vec<FeatureImportance>>,
}

impl PredictionView {
    pub fn new(result: PredictionResult, customer_state: &str) -> Self {
        let (headline, detail) = match result.label {
            DeliveryLabel::Delayed => (
                "ALERTA: Retraso Detectado",
                "Se estima que este pedido llegará tarde.",
            ),
            DeliveryLabel::OnTime => (
                "Envío A Tiempo",
                "El sistema no detecta riesgos significativos.",
            ),
        };
        Self {
            label: result.label,
            prediction: result.label.class(),
            headline,
            detail,
            probability: result.probability,
            probability_pct: format!("{:.2}%", result.probability * 100.0),
            progress: (result.probability * 100.0) as u8,
            delivery_estimate: catalog::delivery_estimate(customer_state),
            top_features: result.feature_importance_ranking,
        }
    }
}
