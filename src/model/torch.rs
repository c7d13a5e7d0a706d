use anyhow::{bail, Context};
use tch::{kind::Kind, CModule, Device, Tensor};

use super::Classifier;
use crate::error::{PredictorError, Result};

/// TorchScript classifier returning `[1, 2]` logits per row.
pub struct TorchClassifier {
    model: CModule,
    device: Device,
    in_dim: i64,
}

impl TorchClassifier {
    pub fn load(model_path: &str, in_dim: usize) -> anyhow::Result<Self> {
        let device = Device::Cpu;
        let model = CModule::load_on_device(model_path, device)
            .with_context(|| format!("failed to load TorchScript {}", model_path))?;

        // Probe output shape with a dummy forward, expect [B=1, 2]
        let dummy = Tensor::zeros([1, in_dim as i64], (Kind::Float, device));
        let t = model.forward_ts(&[dummy])?;
        let sz = t.size();
        if sz.len() != 2 || sz[0] != 1 || sz[1] != 2 {
            bail!("unexpected model output size: {:?}", sz);
        }

        Ok(Self {
            model,
            device,
            in_dim: in_dim as i64,
        })
    }
}

impl Classifier for TorchClassifier {
    fn predict(&self, x: &[f64]) -> Result<u8> {
        let [p0, p1] = self.predict_proba(x)?;
        Ok(if p1 > p0 { 1 } else { 0 })
    }

    fn predict_proba(&self, x: &[f64]) -> Result<[f64; 2]> {
        if x.len() as i64 != self.in_dim {
            return Err(PredictorError::SchemaMismatch(format!(
                "feature length mismatch: got {}, expected {}",
                x.len(),
                self.in_dim
            )));
        }
        let row: Vec<f32> = x.iter().map(|v| *v as f32).collect();
        let input = Tensor::from_slice(&row)
            .reshape([1, self.in_dim])
            .to_device(self.device);

        let logits = self
            .model
            .forward_ts(&[input])
            .map_err(|e| PredictorError::Inference(e.to_string()))?;
        let probs = logits.softmax(-1, Kind::Float);

        Ok([probs.double_value(&[0, 0]), probs.double_value(&[0, 1])])
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.in_dim as usize)
    }
}
