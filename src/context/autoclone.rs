//! Guard against editing active or locked versions

use serde::Serialize;

use crate::api::{ServiceVersion, VersionApi};
use crate::error::{FastlyError, Result};
use crate::optional::OptionalValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AutoCloneDecision {
    /// The source version is used as-is.
    pub allowed: bool,
    pub source_version: u32,
    pub effective_version: u32,
}

impl AutoCloneDecision {
    fn in_place(version: u32) -> Self {
        Self { allowed: true, source_version: version, effective_version: version }
    }

    pub fn cloned(&self) -> bool {
        !self.allowed
    }
}

/// Decide which version number a command may mutate.
///
/// Active or locked versions are never edited in place: with `--autoclone`
/// they are cloned and the clone's number is returned, otherwise the command
/// is rejected. `allow_active_locked` skips the guard entirely.
pub async fn ensure_editable<A>(
    service_id: &str,
    version: &ServiceVersion,
    autoclone: &OptionalValue<bool>,
    allow_active_locked: bool,
    api: &A,
) -> Result<AutoCloneDecision>
where
    A: VersionApi + ?Sized,
{
    if allow_active_locked || version.editable() {
        return Ok(AutoCloneDecision::in_place(version.number));
    }

    if !autoclone.enabled() {
        return Err(FastlyError::VersionNotEditable {
            service_id: service_id.to_string(),
            version: version.number,
            state: version.state(),
        });
    }

    let cloned = api.clone_version(service_id, version.number).await?;
    tracing::info!(
        service_id,
        source_version = version.number,
        cloned_version = cloned.number,
        "cloned non-editable version"
    );

    Ok(AutoCloneDecision {
        allowed: false,
        source_version: version.number,
        effective_version: cloned.number,
    })
}
