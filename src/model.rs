use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::{PredictorError, Result};

#[cfg(feature = "torch")]
mod torch;
#[cfg(feature = "torch")]
pub use torch::TorchClassifier;

/// Opaque pre-trained binary classifier. Class 0 = on time, class 1 = delayed.
///
/// Implementations are read-only after loading and may be shared across threads.
pub trait Classifier: Send + Sync {
    fn predict(&self, x: &[f64]) -> Result<u8>;

    /// `[p_class0, p_class1]`
    fn predict_proba(&self, x: &[f64]) -> Result<[f64; 2]>;

    /// Global importances, parallel to the expected column list.
    fn feature_importances(&self) -> Option<&[f64]> {
        None
    }

    /// Input width, when the model records it.
    fn n_features(&self) -> Option<usize> {
        None
    }
}

// ---------- Random forest (JSON export) ----------

#[derive(Deserialize)]
struct ForestJson {
    n_features: usize,
    #[serde(default)]
    classes: Option<Vec<i64>>,
    trees: Vec<TreeJson>,
    #[serde(default)]
    feature_importances: Option<Vec<f64>>,
}

#[derive(Deserialize)]
struct TreeJson {
    nodes: Vec<NodeJson>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeJson {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: [f64; 2],
    },
}

#[derive(Debug, Clone)]
enum Node {
    /// Go left when `x[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class distribution, normalised to sum 1.
    Leaf([f64; 2]),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn leaf_for(&self, x: &[f64]) -> [f64; 2] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if x[*feature] <= *threshold { *left } else { *right },
                Node::Leaf(dist) => return *dist,
            }
        }
    }
}

/// Random forest classifier: probability is the mean of per-tree leaf distributions.
#[derive(Debug, Clone)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<Tree>,
    importances: Option<Vec<f64>>,
}

impl RandomForest {
    pub fn from_json(text: &str) -> std::result::Result<Self, String> {
        let raw: ForestJson = serde_json::from_str(text).map_err(|e| e.to_string())?;

        if let Some(classes) = &raw.classes {
            if classes.as_slice() != [0, 1] {
                return Err(format!("expected classes [0, 1], got {:?}", classes));
            }
        }
        if raw.trees.is_empty() {
            return Err("forest has no trees".into());
        }
        if let Some(imp) = &raw.feature_importances {
            if imp.len() != raw.n_features {
                return Err(format!(
                    "feature_importances has {} entries, n_features is {}",
                    imp.len(),
                    raw.n_features
                ));
            }
        }

        let trees = raw
            .trees
            .into_iter()
            .enumerate()
            .map(|(t, tree)| build_tree(tree, raw.n_features).map_err(|e| format!("tree {t}: {e}")))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            n_features: raw.n_features,
            trees,
            importances: raw.feature_importances,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let shown = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| PredictorError::artifact(&shown, e))?;
        Self::from_json(&text).map_err(|e| PredictorError::artifact(&shown, e))
    }
}

// Children must come after their parent, which rules out cycles.
fn build_tree(tree: TreeJson, n_features: usize) -> std::result::Result<Tree, String> {
    let n = tree.nodes.len();
    if n == 0 {
        return Err("empty tree".into());
    }
    let mut nodes = Vec::with_capacity(n);
    for (i, node) in tree.nodes.into_iter().enumerate() {
        nodes.push(match node {
            NodeJson::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature >= n_features {
                    return Err(format!("node {i} splits on feature {feature} >= {n_features}"));
                }
                if left <= i || right <= i || left >= n || right >= n {
                    return Err(format!("node {i} has bad children ({left}, {right})"));
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }
            }
            NodeJson::Leaf { value } => {
                let total = value[0] + value[1];
                if value.iter().any(|v| !v.is_finite() || *v < 0.0) || total <= 0.0 {
                    return Err(format!("node {i} has invalid leaf value {value:?}"));
                }
                Node::Leaf([value[0] / total, value[1] / total])
            }
        });
    }
    Ok(Tree { nodes })
}

impl Classifier for RandomForest {
    fn predict(&self, x: &[f64]) -> Result<u8> {
        let [p0, p1] = self.predict_proba(x)?;
        Ok(if p1 > p0 { 1 } else { 0 })
    }

    fn predict_proba(&self, x: &[f64]) -> Result<[f64; 2]> {
        if x.len() != self.n_features {
            return Err(PredictorError::SchemaMismatch(format!(
                "feature length mismatch: got {}, expected {}",
                x.len(),
                self.n_features
            )));
        }
        let mut acc = [0.0f64; 2];
        for tree in &self.trees {
            let dist = tree.leaf_for(x);
            acc[0] += dist[0];
            acc[1] += dist[1];
        }
        let n = self.trees.len() as f64;
        Ok([acc[0] / n, acc[1] / n])
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.importances.as_deref()
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }
}
