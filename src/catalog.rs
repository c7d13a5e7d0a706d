use serde::Serialize;

use crate::types::OrderForm;

// ---------- Form choices ----------

pub const CITIES: [&str; 6] = ["Lima", "Trujillo", "Arequipa", "Cusco", "Piura", "Chiclayo"];
pub const REGIONS: [&str; 6] = ["LIMA", "LA_LIBERTAD", "AREQUIPA", "CUSCO", "PIURA", "LAMBAYEQUE"];
pub const PAYMENT_TYPES: [&str; 4] = ["credit_card", "boleto", "voucher", "debit_card"];
pub const PRODUCT_CATEGORIES: [&str; 5] = [
    "utilidades_domesticas",
    "perfumaria",
    "automotivo",
    "bebes",
    "relogios_presentes",
];

/// Upper bound shared by the three dimension sliders (cm).
pub const MAX_DIMENSION_CM: u32 = 100;

/// Everything a client needs to render the order form.
#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub cities: &'static [&'static str],
    pub regions: &'static [&'static str],
    pub payment_types: &'static [&'static str],
    pub product_categories: &'static [&'static str],
    pub bounds: NumericBounds,
    pub defaults: OrderForm,
}

#[derive(Debug, Serialize)]
pub struct NumericBounds {
    pub price_min: f64,
    pub freight_min: f64,
    pub weight_min: u32,
    pub dimension_min: u32,
    pub dimension_max: u32,
}

pub fn form_options() -> FormOptions {
    FormOptions {
        cities: &CITIES,
        regions: &REGIONS,
        payment_types: &PAYMENT_TYPES,
        product_categories: &PRODUCT_CATEGORIES,
        bounds: NumericBounds {
            price_min: 0.0,
            freight_min: 0.0,
            weight_min: 0,
            dimension_min: 0,
            dimension_max: MAX_DIMENSION_CM,
        },
        defaults: OrderForm::default(),
    }
}

// ---------- Delivery estimate ----------

/// Static delivery window for a destination region. Not model-derived.
pub fn delivery_estimate(customer_state: &str) -> &'static str {
    match customer_state {
        "LIMA" => "1 - 3 días",
        "LA_LIBERTAD" | "LAMBAYEQUE" | "PIURA" => "3 - 5 días (Costa Norte)",
        _ => "5 - 8 días (Sierra/Sur)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_by_region() {
        assert_eq!(delivery_estimate("LIMA"), "1 - 3 días");
        assert_eq!(delivery_estimate("PIURA"), "3 - 5 días (Costa Norte)");
        assert_eq!(delivery_estimate("LAMBAYEQUE"), "3 - 5 días (Costa Norte)");
        assert_eq!(delivery_estimate("CUSCO"), "5 - 8 días (Sierra/Sur)");
        assert_eq!(delivery_estimate("AREQUIPA"), "5 - 8 días (Sierra/Sur)");
    }

    #[test]
    fn defaults_come_from_the_choice_lists() {
        let opts = form_options();
        assert_eq!(opts.defaults.customer_city, CITIES[0]);
        assert_eq!(opts.defaults.seller_state, REGIONS[0]);
        assert_eq!(opts.defaults.payment_type, PAYMENT_TYPES[0]);
        assert_eq!(opts.defaults.product_category, PRODUCT_CATEGORIES[0]);
    }
}
