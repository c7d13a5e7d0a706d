use std::{fs, path::Path};

use serde::Deserialize;

use crate::encoder::ExpectedSchema;
use crate::error::{PredictorError, Result};
use crate::model::{Classifier, RandomForest};

/// Column file layouts: a bare list, or the `{feat_list, in_dim}` meta object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnsFile {
    List(Vec<String>),
    Meta {
        feat_list: Vec<String>,
        in_dim: Option<usize>,
    },
}

/// Classifier plus the column list it was trained on. Built once at startup, read-only after.
pub struct Artifacts {
    classifier: Box<dyn Classifier>,
    schema: ExpectedSchema,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("columns", &self.schema.len())
            .field("has_importances", &self.classifier.feature_importances().is_some())
            .finish()
    }
}

impl Artifacts {
    pub fn load(model_path: &Path, columns_path: &Path) -> Result<Self> {
        let schema = load_schema(columns_path)?;
        let classifier = load_classifier(model_path, schema.len())?;
        Self::new(classifier, schema)
            .map_err(|e| PredictorError::artifact(model_path.display().to_string(), e))
    }

    /// Pairs an already-loaded classifier with its schema, checking that the widths agree.
    pub fn new(classifier: Box<dyn Classifier>, schema: ExpectedSchema) -> Result<Self> {
        if let Some(n) = classifier.n_features() {
            if n != schema.len() {
                return Err(PredictorError::SchemaMismatch(format!(
                    "model expects {} features, column list has {}",
                    n,
                    schema.len()
                )));
            }
        }
        if let Some(imp) = classifier.feature_importances() {
            if imp.len() != schema.len() {
                return Err(PredictorError::SchemaMismatch(format!(
                    "{} importances for {} columns",
                    imp.len(),
                    schema.len()
                )));
            }
        }
        Ok(Self { classifier, schema })
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn schema(&self) -> &ExpectedSchema {
        &self.schema
    }
}

pub fn load_schema(path: &Path) -> Result<ExpectedSchema> {
    let shown = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|e| PredictorError::artifact(&shown, e))?;
    let parsed: ColumnsFile =
        serde_json::from_str(&text).map_err(|e| PredictorError::artifact(&shown, e))?;

    let columns = match parsed {
        ColumnsFile::List(cols) => cols,
        ColumnsFile::Meta { feat_list, in_dim } => {
            if let Some(d) = in_dim {
                if d != feat_list.len() {
                    tracing::warn!(
                        "meta.in_dim ({}) != feat_list.len() ({}); using feat_list.len()",
                        d,
                        feat_list.len()
                    );
                }
            }
            feat_list
        }
    };
    if columns.is_empty() {
        return Err(PredictorError::artifact(&shown, "column list is empty"));
    }
    Ok(ExpectedSchema::new(columns))
}

pub fn load_classifier(path: &Path, in_dim: usize) -> Result<Box<dyn Classifier>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Box::new(RandomForest::load(path)?)),
        Some("pt") => load_torch(path, in_dim),
        _ => Err(PredictorError::artifact(
            path.display().to_string(),
            "unknown model format (expected .json or .pt)",
        )),
    }
}

#[cfg(feature = "torch")]
fn load_torch(path: &Path, in_dim: usize) -> Result<Box<dyn Classifier>> {
    let shown = path.display().to_string();
    crate::model::TorchClassifier::load(&shown, in_dim)
        .map(|m| Box::new(m) as Box<dyn Classifier>)
        .map_err(|e| PredictorError::artifact(&shown, format!("{e:#}")))
}

#[cfg(not(feature = "torch"))]
fn load_torch(path: &Path, _in_dim: usize) -> Result<Box<dyn Classifier>> {
    Err(PredictorError::artifact(
        path.display().to_string(),
        "TorchScript models need the `torch` feature",
    ))
}
