use serde::{Deserialize, Serialize};

use crate::catalog::{self, MAX_DIMENSION_CM};
use crate::error::{PredictorError, Result};

/// Numeric columns, in the order the classifier saw them during training.
pub const NUMERIC_FIELDS: [&str; 7] = [
    "payment_value",
    "price",
    "freight_value",
    "product_weight_g",
    "product_length_cm",
    "product_height_cm",
    "product_width_cm",
];

/// Categorical columns that get one-hot expanded.
pub const CATEGORICAL_FIELDS: [&str; 6] = [
    "customer_city",
    "customer_state",
    "seller_city",
    "seller_state",
    "payment_type",
    "product_category_name",
];

// ---------- Request ----------

/// Raw order form as the user fills it in. Missing keys take the form defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderForm {
    pub customer_city: String,
    pub customer_state: String,
    pub seller_city: String,
    pub seller_state: String,
    pub payment_type: String,
    pub product_category: String,
    pub price: f64,
    pub freight: f64,
    pub weight: i64, // grams
    pub length: i64, // cm
    pub height: i64,
    pub width: i64,
}

impl Default for OrderForm {
    fn default() -> Self {
        Self {
            customer_city: catalog::CITIES[0].to_string(),
            customer_state: catalog::REGIONS[0].to_string(),
            seller_city: catalog::CITIES[0].to_string(),
            seller_state: catalog::REGIONS[0].to_string(),
            payment_type: catalog::PAYMENT_TYPES[0].to_string(),
            product_category: catalog::PRODUCT_CATEGORIES[0].to_string(),
            price: 120.0,
            freight: 30.0,
            weight: 800,
            length: 30,
            height: 10,
            width: 20,
        }
    }
}

impl OrderForm {
    /// Boundary check: every select must hold one of its listed choices and
    /// every number must sit inside its bounds.
    pub fn validate(&self) -> Result<OrderInput> {
        check_choice("customer_city", &self.customer_city, &catalog::CITIES)?;
        check_choice("customer_state", &self.customer_state, &catalog::REGIONS)?;
        check_choice("seller_city", &self.seller_city, &catalog::CITIES)?;
        check_choice("seller_state", &self.seller_state, &catalog::REGIONS)?;
        check_choice("payment_type", &self.payment_type, &catalog::PAYMENT_TYPES)?;
        check_choice(
            "product_category",
            &self.product_category,
            &catalog::PRODUCT_CATEGORIES,
        )?;
        OrderInput::new(self)
    }
}

fn check_choice(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(PredictorError::InvalidInput(format!(
            "{field}={value:?} is not one of {allowed:?}"
        )))
    }
}

fn non_negative_amount(field: &str, v: f64) -> Result<f64> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(PredictorError::InvalidInput(format!("{field} must be >= 0, got {v}")))
    }
}

fn bounded_int(field: &str, v: i64, max: Option<u32>) -> Result<u32> {
    let upper = max.map(i64::from).unwrap_or(i64::from(u32::MAX));
    if (0..=upper).contains(&v) {
        Ok(v as u32)
    } else {
        Err(PredictorError::InvalidInput(format!(
            "{field} must be in [0, {upper}], got {v}"
        )))
    }
}

// ---------- Model input ----------

/// One order, ready for encoding. `payment_value` is always `price + freight_value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderInput {
    payment_value: f64,
    price: f64,
    freight_value: f64,
    product_weight_g: u32,
    product_length_cm: u32,
    product_height_cm: u32,
    product_width_cm: u32,
    customer_city: String,
    customer_state: String,
    seller_city: String,
    seller_state: String,
    payment_type: String,
    product_category_name: String,
}

impl OrderInput {
    /// Checks numeric bounds only; categorical values are taken as given.
    pub fn new(form: &OrderForm) -> Result<Self> {
        let price = non_negative_amount("price", form.price)?;
        let freight_value = non_negative_amount("freight", form.freight)?;
        let payment_value = price + freight_value;
        if !payment_value.is_finite() {
            return Err(PredictorError::InvalidInput(format!(
                "price + freight overflows: {price} + {freight_value}"
            )));
        }
        Ok(Self {
            payment_value,
            price,
            freight_value,
            product_weight_g: bounded_int("weight", form.weight, None)?,
            product_length_cm: bounded_int("length", form.length, Some(MAX_DIMENSION_CM))?,
            product_height_cm: bounded_int("height", form.height, Some(MAX_DIMENSION_CM))?,
            product_width_cm: bounded_int("width", form.width, Some(MAX_DIMENSION_CM))?,
            customer_city: form.customer_city.clone(),
            customer_state: form.customer_state.clone(),
            seller_city: form.seller_city.clone(),
            seller_state: form.seller_state.clone(),
            payment_type: form.payment_type.clone(),
            product_category_name: form.product_category.clone(),
        })
    }

    pub fn payment_value(&self) -> f64 {
        self.payment_value
    }

    pub fn customer_state(&self) -> &str {
        &self.customer_state
    }

    /// Numeric group, paired with column names, in `NUMERIC_FIELDS` order.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 7] {
        [
            (NUMERIC_FIELDS[0], self.payment_value),
            (NUMERIC_FIELDS[1], self.price),
            (NUMERIC_FIELDS[2], self.freight_value),
            (NUMERIC_FIELDS[3], f64::from(self.product_weight_g)),
            (NUMERIC_FIELDS[4], f64::from(self.product_length_cm)),
            (NUMERIC_FIELDS[5], f64::from(self.product_height_cm)),
            (NUMERIC_FIELDS[6], f64::from(self.product_width_cm)),
        ]
    }

    /// Categorical group, paired with column names, in `CATEGORICAL_FIELDS` order.
    pub fn categorical_fields(&self) -> [(&'static str, &str); 6] {
        [
            (CATEGORICAL_FIELDS[0], self.customer_city.as_str()),
            (CATEGORICAL_FIELDS[1], self.customer_state.as_str()),
            (CATEGORICAL_FIELDS[2], self.seller_city.as_str()),
            (CATEGORICAL_FIELDS[3], self.seller_state.as_str()),
            (CATEGORICAL_FIELDS[4], self.payment_type.as_str()),
            (CATEGORICAL_FIELDS[5], self.product_category_name.as_str()),
        ]
    }
}
