use std::collections::HashMap;

use palaver_lambda::config::Config;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn reads_required_settings_and_defaults_ttl_attribute() {
    let config = Config::from_lookup(lookup(&[
        ("CHAT_TABLE", "chat-history"),
        ("BEDROCK_MODEL_ID", "google.gemma-3-12b-it"),
    ]))
    .unwrap();

    assert_eq!(
        config,
        Config {
            table: "chat-history".to_string(),
            default_model_id: "google.gemma-3-12b-it".to_string(),
            ttl_attribute: "expiresAt".to_string(),
        }
    );
}

#[test]
fn ttl_attribute_can_be_overridden() {
    let config = Config::from_lookup(lookup(&[
        ("CHAT_TABLE", "chat-history"),
        ("BEDROCK_MODEL_ID", "m"),
        ("CHAT_TTL_ATTRIBUTE", "ttl"),
    ]))
    .unwrap();

    assert_eq!(config.ttl_attribute, "ttl");
}

#[test]
fn missing_or_blank_required_settings_fail() {
    assert!(Config::from_lookup(lookup(&[("BEDROCK_MODEL_ID", "m")])).is_err());
    assert!(Config::from_lookup(lookup(&[("CHAT_TABLE", "t")])).is_err());
    assert!(
        Config::from_lookup(lookup(&[("CHAT_TABLE", " "), ("BEDROCK_MODEL_ID", "m")])).is_err()
    );
}
