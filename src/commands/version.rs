//! Service version commands

use anyhow::Result;
use serde_json::json;

use crate::api::{FastlyClient, ServiceVersion, VersionApi};
use crate::cli::{ServiceArgs, ServiceVersionAction, ServiceVersionCommand, VersionArgs};
use crate::context::{self, Mutation, ServiceContext};
use crate::optional::OptionalValue;
use crate::output::Output;

pub async fn run(cmd: ServiceVersionCommand, client: &FastlyClient, out: &Output) -> Result<()> {
    match cmd.action {
        ServiceVersionAction::List { service } => list(&service, client, out).await,
        ServiceVersionAction::CloneVersion { service, version } => {
            lifecycle(Lifecycle::Clone, &service, &version, client, out).await
        }
        ServiceVersionAction::Activate { service, version } => {
            lifecycle(Lifecycle::Activate, &service, &version, client, out).await
        }
        ServiceVersionAction::Deactivate { service, version } => {
            lifecycle(Lifecycle::Deactivate, &service, &version, client, out).await
        }
        ServiceVersionAction::Lock { service, version } => {
            lifecycle(Lifecycle::Lock, &service, &version, client, out).await
        }
        ServiceVersionAction::Update { service, version, autoclone, comment } => {
            let ctx = ServiceContext::resolve(
                &service,
                &version,
                autoclone.flag(),
                client,
                Mutation::Guarded,
                out,
            )
            .await?;

            let updated = client.update_version(ctx.service_id(), ctx.version(), &comment).await?;
            out.success(
                &format!("Updated service {} version {}", ctx.service_id(), updated.number),
                json!({"service_id": ctx.service_id(), "version": updated, "autoclone": ctx.decision}),
            );
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Lifecycle {
    Clone,
    Activate,
    Deactivate,
    Lock,
}

impl Lifecycle {
    fn past_tense(self) -> &'static str {
        match self {
            Lifecycle::Clone => "Cloned",
            Lifecycle::Activate => "Activated",
            Lifecycle::Deactivate => "Deactivated",
            Lifecycle::Lock => "Locked",
        }
    }
}

async fn list(service: &ServiceArgs, client: &FastlyClient, out: &Output) -> Result<()> {
    let identity = context::resolve_service(service, client, out).await?;

    let mut versions = client.list_versions(&identity.id).await?;
    versions.sort_by_key(|v| v.number);

    let rows = versions
        .iter()
        .map(|v| {
            vec![
                v.number.to_string(),
                v.active.to_string(),
                v.locked.to_string(),
                v.comment.clone().unwrap_or_default(),
            ]
        })
        .collect();
    out.table(
        &["NUMBER", "ACTIVE", "LOCKED", "COMMENT"],
        rows,
        json!({"service_id": identity.id, "versions": versions}),
    );
    Ok(())
}

/// Clone/activate/deactivate/lock operate on any version, so the guard is off.
async fn lifecycle(
    op: Lifecycle,
    service: &ServiceArgs,
    version: &VersionArgs,
    client: &FastlyClient,
    out: &Output,
) -> Result<()> {
    let ctx = ServiceContext::resolve(
        service,
        version,
        OptionalValue::unset(),
        client,
        Mutation::ReadOnly,
        out,
    )
    .await?;

    let (service_id, number) = (ctx.service_id(), ctx.version());
    let result: ServiceVersion = match op {
        Lifecycle::Clone => client.clone_version(service_id, number).await?,
        Lifecycle::Activate => client.activate_version(service_id, number).await?,
        Lifecycle::Deactivate => client.deactivate_version(service_id, number).await?,
        Lifecycle::Lock => client.lock_version(service_id, number).await?,
    };

    let message = match op {
        Lifecycle::Clone => format!(
            "{} service {} version {} to version {}",
            op.past_tense(),
            service_id,
            ctx.resolved.number,
            result.number
        ),
        _ => format!("{} service {} version {}", op.past_tense(), service_id, result.number),
    };
    out.success(&message, json!({"service_id": service_id, "version": result}));
    Ok(())
}
