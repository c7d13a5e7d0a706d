//! Turns an [`OrderInput`] into the exact column layout the classifier was trained on.
//!
//! Numeric fields are copied as-is, each categorical field becomes a single
//! `{field}_{value}` indicator set to 1, and the result is reindexed onto the
//! expected column list with zero fill. Indicators the schema does not know
//! (categories never seen in training) are dropped without error; the model
//! then sees "all known categories = 0" for that field.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::{PredictorError, Result};
use crate::types::OrderInput;

/// Ordered column names the classifier expects.
#[derive(Debug, Clone)]
pub struct ExpectedSchema {
    columns: Vec<String>,
    members: HashSet<String>,
}

impl ExpectedSchema {
    pub fn new(columns: Vec<String>) -> Self {
        let members = columns.iter().cloned().collect();
        Self { columns, members }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.members.contains(column)
    }
}

/// Encoded values aligned 1:1 with an [`ExpectedSchema`].
#[derive(Debug, Clone)]
pub struct FeatureVector<'s> {
    schema: &'s ExpectedSchema,
    values: Vec<f64>,
    dropped: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NamedValue<'a> {
    pub column: &'a str,
    pub value: f64,
}

impl<'s> FeatureVector<'s> {
    pub fn columns(&self) -> &'s [String] {
        self.schema.columns()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column, `None` if the schema has no such column.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns()
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    /// Indicator columns that were generated but are unknown to the schema.
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    pub fn named(&self) -> Vec<NamedValue<'s>> {
        self.columns()
            .iter()
            .zip(&self.values)
            .map(|(column, &value)| NamedValue { column, value })
            .collect()
    }
}

/// Column name for a one-hot indicator: `{field}_{value}`.
pub fn indicator_column(field: &str, value: &str) -> String {
    format!("{field}_{value}")
}

/// Numeric columns followed by one indicator per categorical field, before alignment.
pub fn raw_record(input: &OrderInput) -> Vec<(String, f64)> {
    let mut record: Vec<(String, f64)> = input
        .numeric_fields()
        .iter()
        .map(|(name, v)| (name.to_string(), *v))
        .collect();
    for (field, value) in input.categorical_fields() {
        record.push((indicator_column(field, value), 1.0));
    }
    record
}

/// Reindex-with-fill: one value per schema column, zero where the record has none.
pub fn encode<'s>(input: &OrderInput, schema: &'s ExpectedSchema) -> Result<FeatureVector<'s>> {
    if schema.is_empty() {
        return Err(PredictorError::SchemaMismatch(
            "expected column list is empty".into(),
        ));
    }

    let record = raw_record(input);
    let dropped: Vec<String> = record
        .iter()
        .filter(|(name, _)| !schema.contains(name))
        .map(|(name, _)| name.clone())
        .collect();
    let by_name: HashMap<String, f64> = record.into_iter().collect();

    let values: Vec<f64> = schema
        .columns()
        .iter()
        .map(|c| by_name.get(c).copied().unwrap_or(0.0))
        .collect();

    if !dropped.is_empty() {
        tracing::debug!("columns unknown to the model, zero-filled: {:?}", dropped);
    }

    Ok(FeatureVector {
        schema,
        values,
        dropped,
    })
}
