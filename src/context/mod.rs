//! Service and version resolution shared by every service-scoped command

pub mod autoclone;
pub mod service;
pub mod version;

use crate::api::{ServiceVersion, VersionApi};
use crate::cli::{ServiceArgs, VersionArgs};
use crate::config::{self, ENV_SERVICE_ID};
use crate::error::Result;
use crate::optional::OptionalValue;
use crate::output::Output;

pub use autoclone::{ensure_editable, AutoCloneDecision};
pub use service::{resolve_service_id, ServiceIdentity};
pub use version::{resolve_version, ServiceVersionDescriptor};

/// Whether a command writes to the resolved version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Editing: active/locked versions need `--autoclone`.
    Guarded,
    /// Reading or version lifecycle: any version will do.
    ReadOnly,
}

/// A resolved `(service, version)` pair.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub identity: ServiceIdentity,
    pub resolved: ServiceVersion,
    pub decision: AutoCloneDecision,
}

impl ServiceContext {
    pub fn service_id(&self) -> &str {
        &self.identity.id
    }

    /// The version number to operate on (the clone, if one was made).
    pub fn version(&self) -> u32 {
        self.decision.effective_version
    }

    pub async fn resolve<A>(
        service: &ServiceArgs,
        version: &VersionArgs,
        autoclone: OptionalValue<bool>,
        api: &A,
        mode: Mutation,
        out: &Output,
    ) -> Result<Self>
    where
        A: VersionApi + ?Sized,
    {
        let descriptor = ServiceVersionDescriptor::from_flag(&version.version_flag())?;
        let identity = resolve_service(service, api, out).await?;
        let resolved = resolve_version(&identity.id, descriptor, api).await?;

        let decision = ensure_editable(
            &identity.id,
            &resolved,
            &autoclone,
            mode == Mutation::ReadOnly,
            api,
        )
        .await?;

        if decision.cloned() {
            out.log(
                "info",
                &format!(
                    "Service version {} is not editable, so it was automatically cloned because --autoclone is enabled. Now operating on version {}.",
                    decision.source_version, decision.effective_version
                ),
            );
        }

        Ok(Self { identity, resolved, decision })
    }
}

/// Resolve just the service, for resources that are not versioned.
pub async fn resolve_service<A>(
    service: &ServiceArgs,
    api: &A,
    out: &Output,
) -> Result<ServiceIdentity>
where
    A: VersionApi + ?Sized,
{
    let id_flag: OptionalValue<String> = service.service_id.clone().into();
    let name_flag: OptionalValue<String> = service.service_name.clone().into();

    let identity = resolve_service_id(
        &id_flag,
        &name_flag,
        config::load_manifest,
        config::env_var(ENV_SERVICE_ID),
        api,
    )
    .await?;

    if out.verbose() {
        out.log(
            "info",
            &format!("Service ID (via {}): {}", identity.origin(), identity.id),
        );
    }
    Ok(identity)
}
