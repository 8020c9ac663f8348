//! Which service a command targets

use serde::Serialize;

use crate::api::VersionApi;
use crate::config::{Manifest, Source, ENV_SERVICE_ID, MANIFEST_FILE};
use crate::error::{FastlyError, Result};
use crate::optional::OptionalValue;

pub const FLAG_SERVICE_ID: &str = "--service-id";
pub const FLAG_SERVICE_NAME: &str = "--service-name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceIdentity {
    pub id: String,
    pub source: Source,
    /// The flag that supplied the ID, when it came from a flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<&'static str>,
}

impl ServiceIdentity {
    fn new(id: impl Into<String>, source: Source, flag: Option<&'static str>) -> Self {
        Self { id: id.into(), source, flag }
    }

    /// Human label for where the ID came from, e.g. `--service-name`.
    pub fn origin(&self) -> &'static str {
        match (self.source, self.flag) {
            (Source::Flag, Some(flag)) => flag,
            (Source::Environment, _) => ENV_SERVICE_ID,
            (Source::File, _) => MANIFEST_FILE,
            _ => "unknown",
        }
    }
}

/// Resolve the service ID.
///
/// Precedence: `--service-id`, then `--service-name` (looked up through the
/// API), then `FASTLY_SERVICE_ID`, then `service_id` in fastly.toml. Only the
/// name lookup touches the network, and the manifest is loaded only when every
/// earlier tier is empty.
pub async fn resolve_service_id<A, M>(
    id_flag: &OptionalValue<String>,
    name_flag: &OptionalValue<String>,
    load_manifest: M,
    env_service_id: Option<String>,
    api: &A,
) -> Result<ServiceIdentity>
where
    A: VersionApi + ?Sized,
    M: FnOnce() -> Result<Manifest>,
{
    let (id, id_set) = id_flag.get();
    if id_set && !id.trim().is_empty() {
        return Ok(ServiceIdentity::new(id.trim(), Source::Flag, Some(FLAG_SERVICE_ID)));
    }

    let (name, name_set) = name_flag.get();
    if name_set {
        let name = name.trim();
        if name.is_empty() {
            return Err(FastlyError::InvalidServiceName);
        }
        let id = api.lookup_service_by_name(name).await?;
        if id.is_empty() {
            return Err(FastlyError::ServiceNameNotFound { name: name.to_string() });
        }
        tracing::debug!(service_name = name, service_id = %id, "resolved service by name");
        return Ok(ServiceIdentity::new(id, Source::Flag, Some(FLAG_SERVICE_NAME)));
    }

    if let Some(id) = env_service_id.filter(|id| !id.trim().is_empty()) {
        return Ok(ServiceIdentity::new(id.trim(), Source::Environment, None));
    }

    let manifest = load_manifest()?;
    if let Some(id) = manifest.service_id() {
        return Ok(ServiceIdentity::new(id, Source::File, None));
    }

    Err(FastlyError::NoServiceId)
}
