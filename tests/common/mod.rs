#![allow(dead_code)]

use std::path::PathBuf;

use delivery_predictor::{Artifacts, OrderForm};

pub fn artifact_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("artifacts")
}

pub fn fixture_artifacts() -> Artifacts {
    let dir = artifact_dir();
    Artifacts::load(
        &dir.join("modelo_entregas_peru.json"),
        &dir.join("modelo_entregas_columnas.json"),
    )
    .expect("fixture artifacts should load")
}

/// price=120, freight=30, Lima/LIMA -> Trujillo/LA_LIBERTAD, credit card, perfumaria.
pub fn scenario_form() -> OrderForm {
    OrderForm {
        customer_city: "Lima".into(),
        customer_state: "LIMA".into(),
        seller_city: "Trujillo".into(),
        seller_state: "LA_LIBERTAD".into(),
        payment_type: "credit_card".into(),
        product_category: "perfumaria".into(),
        price: 120.0,
        freight: 30.0,
        weight: 800,
        length: 30,
        height: 10,
        width: 20,
    }
}
