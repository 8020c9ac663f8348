//! Fastly API types and the capability interface the resolvers depend on

mod client;
#[cfg(test)]
pub mod mock;
pub mod pagination;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

pub use client::FastlyClient;
pub use pagination::{drain_all, PageResult, PageSource, Paginator};

/// Operations the service/version resolvers need. Mocked in tests.
#[async_trait]
pub trait VersionApi: Send + Sync {
    async fn list_versions(&self, service_id: &str) -> Result<Vec<ServiceVersion>>;

    async fn clone_version(&self, service_id: &str, version: u32) -> Result<ServiceVersion>;

    /// Returns the ID of the service with exactly this name.
    async fn lookup_service_by_name(&self, name: &str) -> Result<String>;
}

// ============ API Types ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceVersion {
    pub number: u32,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub active: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub locked: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ServiceVersion {
    pub fn editable(&self) -> bool {
        !self.active && !self.locked
    }

    pub fn state(&self) -> &'static str {
        match (self.active, self.locked) {
            (true, true) => "active and locked",
            (true, false) => "active",
            (false, true) => "locked",
            (false, false) => "editable",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub service_type: Option<String>,
    /// Active version number, if any.
    #[serde(default)]
    pub version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acl {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclEntry {
    pub id: String,
    pub ip: String,
    #[serde(default)]
    pub subnet: Option<u8>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub negated: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dictionary {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub write_only: bool,
    #[serde(default)]
    pub version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryItem {
    pub item_key: String,
    pub item_value: String,
    #[serde(default)]
    pub dictionary_id: Option<String>,
}

/// The API reports some booleans as `true`, `1` or `"1"` depending on the endpoint.
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Number(n) => Ok(n.as_i64().unwrap_or(0) != 0),
        serde_json::Value::String(s) => match s.as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            other => Err(D::Error::custom(format!("invalid boolean: {}", other))),
        },
        serde_json::Value::Null => Ok(false),
        other => Err(D::Error::custom(format!("invalid boolean: {}", other))),
    }
}
