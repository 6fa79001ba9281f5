use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "FOODMAP_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, "http://localhost:8000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "foodmap/0.1 (food-provider-search)");
    assert_eq!(cfg.default_pin_limit, 5);
    assert!(!cfg.lock_approved);
    assert!(cfg.multi_select);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("FOODMAP_API_BASE_URL", "https://foodtrucks.example.org");
    map.insert("FOODMAP_REQUEST_TIMEOUT_SECS", "5");
    map.insert("FOODMAP_LOCK_APPROVED", "yes");
    map.insert("FOODMAP_MULTI_SELECT", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base_url, "https://foodtrucks.example.org");
    assert_eq!(cfg.request_timeout_secs, 5);
    assert!(cfg.lock_approved);
    assert!(!cfg.multi_select);
}

#[test]
fn build_app_config_clamps_pin_limit() {
    let mut map = HashMap::new();
    map.insert("FOODMAP_DEFAULT_PIN_LIMIT", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.default_pin_limit, MAX_PIN_LIMIT);

    map.insert("FOODMAP_DEFAULT_PIN_LIMIT", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.default_pin_limit, MIN_PIN_LIMIT);
}

#[test]
fn build_app_config_rejects_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("FOODMAP_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODMAP_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(FOODMAP_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_flag() {
    let mut map = HashMap::new();
    map.insert("FOODMAP_LOCK_APPROVED", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODMAP_LOCK_APPROVED"),
        "expected InvalidEnvVar(FOODMAP_LOCK_APPROVED), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = HashMap::new();
    map.insert("FOODMAP_API_BASE_URL", "ftp://foodtrucks.example.org");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODMAP_API_BASE_URL"),
        "expected InvalidEnvVar(FOODMAP_API_BASE_URL), got: {result:?}"
    );
}
