//! Tests for catalog validation.

use pricecast::{CatalogPolicy, Field, InputRecord, catalog};
use serde_json::json;

#[test]
fn validation_policy_round_trips_by_wire_name() {
    for (policy, name) in [
        (CatalogPolicy::Ignore, "ignore"),
        (CatalogPolicy::Warn, "warn"),
        (CatalogPolicy::Reject, "reject"),
    ] {
        let json = serde_json::to_value(policy).unwrap();
        assert_eq!(json, name);
        let back: CatalogPolicy = serde_json::from_value(json).unwrap();
        assert_eq!(back, policy);
    }
}

#[cfg(feature = "server")]
#[test]
fn validation_policy_reads_from_config_toml() {
    use pricecast::server::config::Config;

    for (name, policy) in [
        ("ignore", CatalogPolicy::Ignore),
        ("warn", CatalogPolicy::Warn),
        ("reject", CatalogPolicy::Reject),
    ] {
        let config: Config = toml::from_str(&format!("[validation]\ncatalog = \"{name}\"\n")).unwrap();
        assert_eq!(config.validation.catalog, policy);
    }
    assert!(toml::from_str::<Config>("[validation]\ncatalog = \"strict\"\n").is_err());
}

#[test]
fn validation_policy_default_is_ignore() {
    assert_eq!(CatalogPolicy::default(), CatalogPolicy::Ignore);
}

#[test]
fn validation_policy_parses_lowercase() {
    let policy: CatalogPolicy = serde_json::from_str("\"reject\"").unwrap();
    assert_eq!(policy, CatalogPolicy::Reject);
    assert!(serde_json::from_str::<CatalogPolicy>("\"Reject\"").is_err());
}

#[test]
fn catalog_covers_every_field_in_order() {
    let keys: Vec<_> = catalog().features.keys().copied().collect();
    assert_eq!(keys, Field::ALL.to_vec());
}

#[test]
fn catalog_accepts_listed_codes() {
    let record = InputRecord::from_value(json!({
        "fulfilment": 1, "sales_channel": 0, "category": 9, "size": 11,
        "ship_state": 12, "b2b": 1, "qty": 15,
    }))
    .unwrap();
    assert!(catalog().violations(&record).is_empty());
}

#[test]
fn catalog_reports_each_unlisted_code() {
    let record = InputRecord::from_value(json!({
        "category": 0,
        "b2b": 2,
        "qty": "7",
    }))
    .unwrap();
    let fields: Vec<_> = catalog()
        .violations(&record)
        .into_iter()
        .map(|v| v.field)
        .collect();
    assert_eq!(fields, vec![Field::Category, Field::B2b, Field::Qty]);
}

#[test]
fn catalog_treats_bool_b2b_as_code() {
    let record = InputRecord::from_value(json!({"b2b": true})).unwrap();
    assert!(catalog().violations(&record).is_empty());
}

#[test]
fn empty_record_has_no_violations() {
    assert!(catalog().violations(&InputRecord::new()).is_empty());
}
