//! Configuration loading (.env, credentials, endpoint, fastly.toml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::FastlyError;

pub const DEFAULT_ENDPOINT: &str = "https://api.fastly.com";
pub const MANIFEST_FILE: &str = "fastly.toml";
pub const ENV_SERVICE_ID: &str = "FASTLY_SERVICE_ID";
pub const ENV_ENDPOINT: &str = "FASTLY_API_ENDPOINT";

/// Where a resolved setting came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Flag,
    Environment,
    File,
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Source::Flag => "flag",
            Source::Environment => "environment",
            Source::File => "manifest file",
            Source::Default => "default",
        };
        f.write_str(s)
    }
}

/// Project directory (where .env and fastly.toml are)
pub fn project_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FASTLY_PROJECT_DIR") {
        return PathBuf::from(dir);
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Load .env from the project directory when one exists.
pub fn load_env() -> Result<()> {
    let env_path = project_dir().join(".env");
    if !env_path.exists() {
        return Ok(());
    }
    dotenvy::from_path(&env_path)
        .with_context(|| format!("Failed to load .env from {:?}", env_path))?;
    Ok(())
}

/// Reads a variable, treating empty values as absent.
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// API endpoint: --endpoint, then FASTLY_API_ENDPOINT, then the public API.
pub fn resolve_endpoint(flag: Option<&str>, env: Option<String>) -> (String, Source) {
    if let Some(endpoint) = flag.filter(|e| !e.trim().is_empty()) {
        return (endpoint.trim_end_matches('/').to_string(), Source::Flag);
    }
    if let Some(endpoint) = env {
        return (endpoint.trim_end_matches('/').to_string(), Source::Environment);
    }
    (DEFAULT_ENDPOINT.to_string(), Source::Default)
}

pub fn api_token(flag: Option<&str>) -> std::result::Result<String, FastlyError> {
    flag.filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .or_else(|| env_var("FASTLY_API_TOKEN"))
        .ok_or(FastlyError::MissingToken)
}

// ============ Manifest ============

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub manifest_version: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
}

impl Manifest {
    pub fn parse(content: &str) -> std::result::Result<Self, FastlyError> {
        Ok(toml::from_str(content)?)
    }

    /// Non-empty `service_id`, if the file has one.
    pub fn service_id(&self) -> Option<&str> {
        self.service_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Load fastly.toml; a missing file is an empty manifest.
pub fn load_manifest() -> std::result::Result<Manifest, FastlyError> {
    let path = project_dir().join(MANIFEST_FILE);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no manifest file");
        return Ok(Manifest::default());
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|source| FastlyError::ManifestRead { path: path.clone(), source })?;
    let manifest = Manifest::parse(&content)?;
    tracing::debug!(
        name = ?manifest.name,
        manifest_version = ?manifest.manifest_version,
        "loaded manifest"
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_precedence() {
        let (e, s) = resolve_endpoint(Some("http://localhost:1234/"), Some("http://env".into()));
        assert_eq!((e.as_str(), s), ("http://localhost:1234", Source::Flag));

        let (e, s) = resolve_endpoint(None, Some("http://env".into()));
        assert_eq!((e.as_str(), s), ("http://env", Source::Environment));

        let (e, s) = resolve_endpoint(Some(""), None);
        assert_eq!((e.as_str(), s), (DEFAULT_ENDPOINT, Source::Default));
    }

    #[test]
    fn manifest_service_id() {
        let m = Manifest::parse("manifest_version = 2\nname = \"app\"\nservice_id = \"abc123\"\n").unwrap();
        assert_eq!(m.service_id(), Some("abc123"));
        assert_eq!(m.name.as_deref(), Some("app"));

        let m = Manifest::parse("service_id = \"  \"").unwrap();
        assert_eq!(m.service_id(), None);

        let m = Manifest::parse("").unwrap();
        assert_eq!(m.service_id(), None);
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let err = Manifest::parse("service_id = [").unwrap_err();
        assert_eq!(err.code(), "MANIFEST_INVALID");
    }
}
