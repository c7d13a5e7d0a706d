//! Delivery delay predictor: aligns an order form to a trained classifier's
//! column layout and reports whether the order is likely to arrive late.

pub mod artifacts;
pub mod catalog;
pub mod config;
pub mod encoder;
pub mod error;
pub mod model;
pub mod reporter;
pub mod service;
pub mod types;

pub use artifacts::Artifacts;
pub use encoder::{encode, indicator_column, ExpectedSchema, FeatureVector};
pub use error::{PredictorError, Result};
pub use model::{Classifier, RandomForest};
pub use reporter::{DeliveryLabel, InferenceReporter, PredictionResult, PredictionView};
pub use types::{OrderForm, OrderInput};
