//! Which version of a service a command targets

use std::str::FromStr;

use crate::api::{ServiceVersion, VersionApi};
use crate::error::{FastlyError, Result};
use crate::optional::OptionalValue;

/// What the user asked for with `--version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceVersionDescriptor {
    Unset,
    Latest,
    Active,
    Number(u32),
}

impl ServiceVersionDescriptor {
    pub fn from_flag(flag: &OptionalValue<String>) -> Result<Self> {
        match flag.get() {
            (_, false) => Ok(Self::Unset),
            (value, true) => value.parse(),
        }
    }
}

impl FromStr for ServiceVersionDescriptor {
    type Err = FastlyError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FastlyError::InvalidVersion { input: s.to_string() };
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "active" => Ok(Self::Active),
            other => match other.parse::<i64>() {
                Ok(n) if n > 0 => u32::try_from(n).map(Self::Number).map_err(|_| invalid()),
                _ => Err(invalid()),
            },
        }
    }
}

/// Fetch the service's versions and pick the one `descriptor` names.
pub async fn resolve_version<A>(
    service_id: &str,
    descriptor: ServiceVersionDescriptor,
    api: &A,
) -> Result<ServiceVersion>
where
    A: VersionApi + ?Sized,
{
    if descriptor == ServiceVersionDescriptor::Number(0) {
        return Err(FastlyError::InvalidVersion { input: "0".to_string() });
    }

    let versions = api.list_versions(service_id).await?;
    tracing::debug!(service_id, count = versions.len(), "fetched service versions");

    match descriptor {
        ServiceVersionDescriptor::Number(n) => versions
            .into_iter()
            .find(|v| v.number == n)
            .ok_or_else(|| FastlyError::VersionNotFound {
                service_id: service_id.to_string(),
                version: n,
            }),
        ServiceVersionDescriptor::Latest | ServiceVersionDescriptor::Unset => versions
            .into_iter()
            .max_by_key(|v| v.number)
            .ok_or_else(|| FastlyError::NoVersions { service_id: service_id.to_string() }),
        ServiceVersionDescriptor::Active => {
            if versions.is_empty() {
                return Err(FastlyError::NoVersions { service_id: service_id.to_string() });
            }
            versions
                .into_iter()
                .filter(|v| v.active)
                .max_by_key(|v| v.number)
                .ok_or_else(|| FastlyError::NoActiveVersion { service_id: service_id.to_string() })
        }
    }
}
