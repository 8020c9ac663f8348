//! ACL entry commands (entries are not versioned)

use anyhow::Result;
use serde_json::json;

use crate::api::{drain_all, FastlyClient};
use crate::cli::{AclEntryAction, AclEntryCommand};
use crate::context;
use crate::output::Output;

pub async fn run(cmd: AclEntryCommand, client: &FastlyClient, out: &Output) -> Result<()> {
    match cmd.action {
        AclEntryAction::Create { service, acl_id, ip, subnet, negated, comment } => {
            let identity = context::resolve_service(&service, client, out).await?;
            let entry = client
                .create_acl_entry(&identity.id, &acl_id, &ip, subnet, negated, comment.as_deref())
                .await?;

            let cidr = match entry.subnet {
                Some(bits) => format!("{}/{}", entry.ip, bits),
                None => entry.ip.clone(),
            };
            out.success(
                &format!("Created ACL entry '{}' (ip: {}, service: {})", entry.id, cidr, identity.id),
                json!({"service_id": identity.id, "acl_id": acl_id, "entry": entry}),
            );
        }
        AclEntryAction::Delete { service, acl_id, id } => {
            let identity = context::resolve_service(&service, client, out).await?;
            client.delete_acl_entry(&identity.id, &acl_id, &id).await?;
            out.success(
                &format!("Deleted ACL entry '{}' (acl: {}, service: {})", id, acl_id, identity.id),
                json!({"deleted": true, "service_id": identity.id, "acl_id": acl_id, "id": id}),
            );
        }
        AclEntryAction::List { service, acl_id, per_page } => {
            let identity = context::resolve_service(&service, client, out).await?;
            let mut pages = client.list_acl_entries(&identity.id, &acl_id, per_page);
            let entries = drain_all(&mut pages).await.into_result()?;

            let rows = entries
                .iter()
                .map(|e| {
                    vec![
                        e.id.clone(),
                        e.ip.clone(),
                        e.subnet.map(|s| s.to_string()).unwrap_or_default(),
                        e.negated.to_string(),
                        e.comment.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            out.table(&["ID", "IP", "SUBNET", "NEGATED", "COMMENT"], rows, &entries);
        }
    }

    Ok(())
}
