//! Error taxonomy for service resolution and API calls

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FastlyError {
    #[error("no service ID found: pass --service-id or --service-name, set FASTLY_SERVICE_ID, or add service_id to fastly.toml")]
    NoServiceId,

    #[error("invalid --service-name: value must not be empty")]
    InvalidServiceName,

    #[error("no service named '{name}' was found")]
    ServiceNameNotFound { name: String },

    #[error("invalid --version '{input}': expected 'latest', 'active' or a positive version number")]
    InvalidVersion { input: String },

    #[error("service {service_id} has no versions")]
    NoVersions { service_id: String },

    #[error("version {version} of service {service_id} not found")]
    VersionNotFound { service_id: String, version: u32 },

    #[error("service {service_id} has no active version")]
    NoActiveVersion { service_id: String },

    #[error("version {version} of service {service_id} is {state} and cannot be edited: pass --autoclone to edit a copy, or select an editable --version")]
    VersionNotEditable {
        service_id: String,
        version: u32,
        state: &'static str,
    },

    #[error("no API token: pass --token or set FASTLY_API_TOKEN")]
    MissingToken,

    #[error("invalid fastly.toml: {0}")]
    Manifest(#[from] toml::de::Error),

    #[error("failed to read {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Fastly API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected Fastly API response ({status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    #[error("pagination stopped with {} page(s) remaining: {source}", remaining_label(.pages_remaining))]
    Pagination {
        pages_remaining: Option<usize>,
        #[source]
        source: Box<FastlyError>,
    },
}

fn remaining_label(pages: &Option<usize>) -> String {
    pages.map_or_else(|| "unknown".to_string(), |n| n.to_string())
}

impl FastlyError {
    /// Report category: `in`, `auth`, `ext` or `net`.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Api { status, .. } if *status == 401 || *status == 403 => "auth",
            Self::Api { .. } | Self::Decode { .. } => "ext",
            Self::Http(_) => "net",
            Self::Pagination { source, .. } => source.category(),
            _ => "in",
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoServiceId => "NO_SERVICE_ID",
            Self::InvalidServiceName => "INVALID_SERVICE_NAME",
            Self::ServiceNameNotFound { .. } => "SERVICE_NOT_FOUND",
            Self::InvalidVersion { .. } => "INVALID_VERSION",
            Self::NoVersions { .. } => "NO_VERSIONS",
            Self::VersionNotFound { .. } => "VERSION_NOT_FOUND",
            Self::NoActiveVersion { .. } => "NO_ACTIVE_VERSION",
            Self::VersionNotEditable { .. } => "VERSION_NOT_EDITABLE",
            Self::MissingToken => "MISSING_TOKEN",
            Self::Manifest(_) => "MANIFEST_INVALID",
            Self::ManifestRead { .. } => "MANIFEST_UNREADABLE",
            Self::Api { .. } => "FASTLY_API_ERROR",
            Self::Http(_) => "HTTP_FAILED",
            Self::Decode { .. } => "INVALID_RESPONSE",
            Self::Pagination { source, .. } => source.code(),
        }
    }

    /// Remediation hints shown alongside the error.
    pub fn fix(&self) -> Vec<&'static str> {
        match self {
            Self::NoServiceId => vec!["--service-id", "--service-name", "FASTLY_SERVICE_ID", "fastly.toml"],
            Self::VersionNotEditable { .. } => vec!["--autoclone", "--version"],
            Self::InvalidVersion { .. } | Self::VersionNotFound { .. } => vec!["--version"],
            Self::MissingToken => vec!["--token", "FASTLY_API_TOKEN"],
            Self::Manifest(_) | Self::ManifestRead { .. } => vec!["fastly.toml"],
            Self::Pagination { source, .. } => source.fix(),
            _ => match self.category() {
                "auth" => vec!["--token"],
                "ext" | "net" => vec!["wait", "report"],
                _ => vec!["param"],
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, FastlyError>;
