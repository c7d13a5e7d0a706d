/// Integration tests for the feature encoder
///
/// Run with: cargo test --test encoder_tests -- --nocapture

mod common;

use common::{fixture_artifacts, scenario_form};
use delivery_predictor::{
    catalog, encode, indicator_column, types::CATEGORICAL_FIELDS, ExpectedSchema, OrderForm,
    OrderInput, PredictorError,
};

fn indicator_columns<'a>(schema: &'a ExpectedSchema, field: &str) -> Vec<&'a String> {
    let prefix = format!("{field}_");
    schema
        .columns()
        .iter()
        .filter(|c| c.starts_with(&prefix))
        .collect()
}

#[test]
fn test_scenario_order() {
    println!("\n=== Test: Scenario Order ===");
    let artifacts = fixture_artifacts();
    let schema = artifacts.schema();
    let input = scenario_form().validate().unwrap();

    let v = encode(&input, schema).unwrap();

    assert_eq!(v.get("payment_value"), Some(150.0));
    assert_eq!(v.get("price"), Some(120.0));
    assert_eq!(v.get("freight_value"), Some(30.0));
    assert_eq!(v.get("product_weight_g"), Some(800.0));

    let hot = [
        "customer_city_Lima",
        "customer_state_LIMA",
        "seller_city_Trujillo",
        "seller_state_LA_LIBERTAD",
        "payment_type_credit_card",
        "product_category_name_perfumaria",
    ];
    for field in CATEGORICAL_FIELDS {
        for col in indicator_columns(schema, field) {
            let expected = if hot.contains(&col.as_str()) { 1.0 } else { 0.0 };
            assert_eq!(v.get(col), Some(expected), "column {col}");
        }
    }
    assert!(v.dropped().is_empty());
    println!("✓ {} columns, payment_value={:?}", v.len(), v.get("payment_value"));
}

#[test]
fn test_columns_match_schema_for_every_choice() {
    println!("\n=== Test: Column Layout Over All Choices ===");
    let artifacts = fixture_artifacts();
    let schema = artifacts.schema();
    let mut checked = 0;

    for city in catalog::CITIES {
        for region in catalog::REGIONS {
            for payment in catalog::PAYMENT_TYPES {
                for category in catalog::PRODUCT_CATEGORIES {
                    let form = OrderForm {
                        customer_city: city.into(),
                        customer_state: region.into(),
                        seller_city: city.into(),
                        seller_state: region.into(),
                        payment_type: payment.into(),
                        product_category: category.into(),
                        ..OrderForm::default()
                    };
                    let input = form.validate().unwrap();
                    let v = encode(&input, schema).unwrap();

                    assert_eq!(v.columns(), schema.columns());
                    assert_eq!(v.len(), schema.len());

                    for (field, value) in input.categorical_fields() {
                        let ones = indicator_columns(schema, field)
                            .iter()
                            .filter(|c| v.get(c) == Some(1.0))
                            .count();
                        let known = schema.contains(&indicator_column(field, value));
                        assert_eq!(ones, usize::from(known), "{field}={value}");
                    }
                    checked += 1;
                }
            }
        }
    }
    println!("✓ checked {} combinations", checked);
}

#[test]
fn test_unseen_category_is_zero_filled() {
    println!("\n=== Test: Unseen Category ===");
    let artifacts = fixture_artifacts();
    let schema = artifacts.schema();

    // Chiclayo / LAMBAYEQUE are valid choices the model never saw
    let form = OrderForm {
        customer_city: "Chiclayo".into(),
        customer_state: "LAMBAYEQUE".into(),
        ..scenario_form()
    };
    let v = encode(&form.validate().unwrap(), schema).unwrap();

    for col in indicator_columns(schema, "customer_city")
        .into_iter()
        .chain(indicator_columns(schema, "customer_state"))
    {
        assert_eq!(v.get(col), Some(0.0), "column {col}");
    }
    assert_eq!(
        v.dropped(),
        ["customer_city_Chiclayo".to_string(), "customer_state_LAMBAYEQUE".to_string()]
    );
    assert_eq!(v.get("customer_city_Chiclayo"), None);

    // Values outside the form lists reach the encoder only through the library API
    let off_list = OrderInput::new(&OrderForm {
        payment_type: "pix".into(),
        ..scenario_form()
    })
    .unwrap();
    let v = encode(&off_list, schema).unwrap();
    for col in indicator_columns(schema, "payment_type") {
        assert_eq!(v.get(col), Some(0.0));
    }
    println!("✓ dropped: {:?}", v.dropped());
}

#[test]
fn test_encoding_is_idempotent() {
    println!("\n=== Test: Idempotence ===");
    let artifacts = fixture_artifacts();
    let input = scenario_form().validate().unwrap();

    let a = encode(&input, artifacts.schema()).unwrap();
    let b = encode(&input, artifacts.schema()).unwrap();

    let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(a.values()), bits(b.values()));
    println!("✓ identical encodings");
}

#[test]
fn test_empty_schema_is_rejected() {
    println!("\n=== Test: Empty Schema ===");
    let schema = ExpectedSchema::new(vec![]);
    let input = scenario_form().validate().unwrap();

    let err = encode(&input, &schema).unwrap_err();
    assert!(matches!(err, PredictorError::SchemaMismatch(_)), "got {err:?}");
    println!("✓ {}", err);
}

#[test]
fn test_schema_order_wins() {
    println!("\n=== Test: Schema Order ===");
    let schema = ExpectedSchema::new(vec![
        "payment_type_credit_card".into(),
        "not_a_feature".into(),
        "price".into(),
        "payment_value".into(),
    ]);
    let input = scenario_form().validate().unwrap();

    let v = encode(&input, &schema).unwrap();
    assert_eq!(v.values(), &[1.0, 0.0, 120.0, 150.0]);
    println!("✓ {:?}", v.values());
}

#[test]
fn test_numeric_bounds_are_enforced_at_the_boundary() {
    println!("\n=== Test: Input Bounds ===");
    let cases = [
        OrderForm { price: -1.0, ..OrderForm::default() },
        OrderForm { freight: f64::NAN, ..OrderForm::default() },
        OrderForm { weight: -5, ..OrderForm::default() },
        OrderForm { length: 101, ..OrderForm::default() },
        OrderForm { width: -1, ..OrderForm::default() },
        OrderForm { seller_city: "Tumbes".into(), ..OrderForm::default() },
        OrderForm { price: 1e308, freight: 1e308, ..OrderForm::default() },
    ];
    for form in cases {
        let err = form.validate().unwrap_err();
        assert!(matches!(err, PredictorError::InvalidInput(_)), "got {err:?}");
        println!("✓ {}", err);
    }

    let edge = OrderForm {
        price: 0.0,
        freight: 0.0,
        weight: 0,
        length: 100,
        height: 0,
        width: 100,
        ..OrderForm::default()
    };
    let input = edge.validate().unwrap();
    assert_eq!(input.payment_value(), 0.0);

    // Each amount is finite on its own; the derived sum must be too
    let err = OrderInput::new(&OrderForm {
        price: f64::MAX,
        freight: f64::MAX,
        ..OrderForm::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("overflows"), "{err}");
}
