use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::reporter::DEFAULT_TOP_K;

pub const DEFAULT_MODEL_PATH: &str = "artifacts/modelo_entregas_peru.json";
pub const DEFAULT_COLUMNS_PATH: &str = "artifacts/modelo_entregas_columnas.json";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub model_path: PathBuf,
    pub columns_path: PathBuf,
    pub port: u16,
    pub top_k: usize,
    /// Per-request feature summary in the logs.
    pub log_pred: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            columns_path: PathBuf::from(DEFAULT_COLUMNS_PATH),
            port: 8080,
            top_k: DEFAULT_TOP_K,
            log_pred: false,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reads from any key lookup.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let model_path = get("MODEL_PATH").map(PathBuf::from).unwrap_or(defaults.model_path);
        let columns_path = get("COLUMNS_PATH")
            .or_else(|| get("META_PATH"))
            .map(PathBuf::from)
            .unwrap_or(defaults.columns_path);

        let port = match get("PORT") {
            Some(s) => s.trim().parse().with_context(|| format!("invalid PORT {:?}", s))?,
            None => defaults.port,
        };
        let top_k = match get("TOP_K") {
            Some(s) => s.trim().parse().with_context(|| format!("invalid TOP_K {:?}", s))?,
            None => defaults.top_k,
        };
        if top_k == 0 {
            bail!("TOP_K must be at least 1");
        }
        let log_pred = get("LOG_PRED").as_deref() == Some("1");

        Ok(Self {
            model_path,
            columns_path,
            port,
            top_k,
            log_pred,
        })
    }
}
