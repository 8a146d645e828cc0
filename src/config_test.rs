use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

const BASE: [(&str, &str); 2] = [("DATABASE_URL", "postgres://localhost/inkroom"), ("JWT_SECRET", "s3cret")];

#[test]
fn defaults_apply_when_optional_vars_are_unset() {
    let cfg = Config::from_lookup(lookup_from(&BASE)).unwrap();
    assert_eq!(cfg.database_url, "postgres://localhost/inkroom");
    assert_eq!(cfg.jwt_secret, "s3cret");
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(cfg.outbound_capacity, DEFAULT_OUTBOUND_CAPACITY);
}

#[test]
fn optional_vars_override_defaults() {
    let mut pairs = BASE.to_vec();
    pairs.extend([("PORT", "8080"), ("DB_MAX_CONNECTIONS", " 12 "), ("WS_OUTBOUND_CAPACITY", "32")]);
    let cfg = Config::from_lookup(lookup_from(&pairs)).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.db_max_connections, 12);
    assert_eq!(cfg.outbound_capacity, 32);
}

#[test]
fn missing_database_url_is_rejected() {
    let err = Config::from_lookup(lookup_from(&[("JWT_SECRET", "x")])).unwrap_err();
    assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
}

#[test]
fn blank_jwt_secret_counts_as_missing() {
    let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x"), ("JWT_SECRET", "  ")])).unwrap_err();
    assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
}

#[test]
fn unparsable_port_is_rejected_not_defaulted() {
    let mut pairs = BASE.to_vec();
    pairs.push(("PORT", "eighty"));
    let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "PORT", value: "eighty".into() });
}

#[test]
fn zero_outbound_capacity_is_rejected() {
    let mut pairs = BASE.to_vec();
    pairs.push(("WS_OUTBOUND_CAPACITY", "0"));
    let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "WS_OUTBOUND_CAPACITY", .. }));
}
