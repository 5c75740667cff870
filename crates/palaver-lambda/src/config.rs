use std::env;

use palaver_storage::client::DEFAULT_TTL_ATTRIBUTE;

pub const TABLE_VAR: &str = "CHAT_TABLE";
pub const DEFAULT_MODEL_VAR: &str = "BEDROCK_MODEL_ID";
pub const TTL_ATTRIBUTE_VAR: &str = "CHAT_TTL_ATTRIBUTE";

/// Settings resolved once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// DynamoDB table holding the turns.
    pub table: String,
    /// Model used when a chat request names none.
    pub default_model_id: String,
    /// Attribute the table's TTL setting watches.
    pub ttl_attribute: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Resolve settings through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &str| {
            get(name).ok_or_else(|| eyre::eyre!("environment variable {name} must be set"))
        };

        Ok(Self {
            table: require(TABLE_VAR)?,
            default_model_id: require(DEFAULT_MODEL_VAR)?,
            ttl_attribute: get(TTL_ATTRIBUTE_VAR)
                .unwrap_or_else(|| DEFAULT_TTL_ATTRIBUTE.to_string()),
        })
    }
}
