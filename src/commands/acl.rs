//! ACL commands

use anyhow::Result;
use serde_json::json;

use crate::api::FastlyClient;
use crate::cli::{AclAction, AclCommand};
use crate::context::{Mutation, ServiceContext};
use crate::optional::OptionalValue;
use crate::output::Output;

pub async fn run(cmd: AclCommand, client: &FastlyClient, out: &Output) -> Result<()> {
    match cmd.action {
        AclAction::Create { service, version, autoclone, name } => {
            let ctx = ServiceContext::resolve(
                &service, &version, autoclone.flag(), client, Mutation::Guarded, out,
            )
            .await?;
            let acl = client.create_acl(ctx.service_id(), ctx.version(), &name).await?;
            out.success(
                &format!(
                    "Created ACL '{}' (id: {}, service: {}, version: {})",
                    acl.name, acl.id, ctx.service_id(), ctx.version()
                ),
                json!({"acl": acl, "version": ctx.version(), "autoclone": ctx.decision}),
            );
        }
        AclAction::Delete { service, version, autoclone, name } => {
            let ctx = ServiceContext::resolve(
                &service, &version, autoclone.flag(), client, Mutation::Guarded, out,
            )
            .await?;
            client.delete_acl(ctx.service_id(), ctx.version(), &name).await?;
            out.success(
                &format!(
                    "Deleted ACL '{}' (service: {}, version: {})",
                    name, ctx.service_id(), ctx.version()
                ),
                json!({"deleted": true, "name": name, "version": ctx.version(), "autoclone": ctx.decision}),
            );
        }
        AclAction::Update { service, version, autoclone, name, new_name } => {
            let ctx = ServiceContext::resolve(
                &service, &version, autoclone.flag(), client, Mutation::Guarded, out,
            )
            .await?;
            let acl = client.update_acl(ctx.service_id(), ctx.version(), &name, &new_name).await?;
            out.success(
                &format!("Updated ACL '{}' (previously: '{}', service: {}, version: {})", acl.name, name, ctx.service_id(), ctx.version()),
                json!({"acl": acl, "version": ctx.version(), "autoclone": ctx.decision}),
            );
        }
        AclAction::Describe { service, version, name } => {
            let ctx = ServiceContext::resolve(
                &service, &version, OptionalValue::unset(), client, Mutation::ReadOnly, out,
            )
            .await?;
            let acl = client.get_acl(ctx.service_id(), ctx.version(), &name).await?;
            out.fields(
                &[
                    ("Service ID", ctx.service_id().to_string()),
                    ("Service Version", ctx.version().to_string()),
                    ("ID", acl.id.clone()),
                    ("Name", acl.name.clone()),
                ],
                json!({"acl": acl, "version": ctx.version()}),
            );
        }
        AclAction::List { service, version } => {
            let ctx = ServiceContext::resolve(
                &service, &version, OptionalValue::unset(), client, Mutation::ReadOnly, out,
            )
            .await?;
            let acls = client.list_acls(ctx.service_id(), ctx.version()).await?;
            let rows = acls
                .iter()
                .map(|a| vec![ctx.service_id().to_string(), ctx.version().to_string(), a.name.clone(), a.id.clone()])
                .collect();
            out.table(&["SERVICE ID", "VERSION", "NAME", "ID"], rows, &acls);
        }
    }

    Ok(())
}
