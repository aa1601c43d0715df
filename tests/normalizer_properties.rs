//! Property tests for option selection.

use proptest::prelude::*;
use serde_json::{json, Value};

use storefront_shipping::shipping::{normalize, Normalized};

fn option_strategy() -> impl Strategy<Value = (u32, u32)> {
    // price in cents, delivery time in business days
    (0u32..100_000, 0u32..30)
}

fn body(options: &[(u32, u32)]) -> Vec<Value> {
    options
        .iter()
        .enumerate()
        .map(|(i, (cents, days))| json!({
            "id": i as i64 + 1,
            "name": format!("Service {}", i + 1),
            "price": format!("{}.{:02}", cents / 100, cents % 100),
            "delivery_time": days,
            "company": {"name": "Carrier"}
        }))
        .collect()
}

proptest! {
    #[test]
    fn picks_minimum_price_and_time(options in prop::collection::vec(option_strategy(), 1..20)) {
        let entries = body(&options);
        let Normalized::Quoted(quote) = normalize(&Value::Array(entries)) else {
            return Err(TestCaseError::fail("valid options produced no quote"));
        };

        prop_assert_eq!(quote.all_options.len(), options.len());
        let min_cents = options.iter().map(|(c, _)| *c).min().unwrap();
        prop_assert!((quote.cheapest.price - f64::from(min_cents) / 100.0).abs() < 1e-9);

        let min_days = options.iter().map(|(_, d)| *d).min().unwrap();
        let fastest = quote.fastest_or_cheapest();
        prop_assert_eq!(fastest.delivery_time, min_days);
        if let Some(f) = &quote.fastest {
            prop_assert_ne!(&f.id, &quote.cheapest.id);
        }
    }

    #[test]
    fn envelopes_do_not_change_the_result(options in prop::collection::vec(option_strategy(), 1..10)) {
        let entries = body(&options);
        let bare = normalize(&Value::Array(entries.clone()));
        prop_assert_eq!(&normalize(&json!({"data": entries.clone()})), &bare);
        prop_assert_eq!(&normalize(&json!({"shipping_options": entries})), &bare);
    }

    #[test]
    fn normalizing_is_repeatable(options in prop::collection::vec(option_strategy(), 0..10)) {
        let raw = Value::Array(body(&options));
        prop_assert_eq!(normalize(&raw), normalize(&raw));
    }

    #[test]
    fn garbage_prices_never_become_options(price in "[a-z]{1,8}") {
        let raw = json!([{"id": 1, "name": "PAC", "price": price, "delivery_time": 4, "company": {"name": "Correios"}}]);
        let is_empty = matches!(normalize(&raw), Normalized::NoOptionsAvailable { .. });
        prop_assert!(is_empty);
    }
}
