//! Edge dictionary commands

use anyhow::Result;
use serde_json::json;

use crate::api::FastlyClient;
use crate::cli::{DictionaryAction, DictionaryCommand};
use crate::context::{Mutation, ServiceContext};
use crate::optional::OptionalValue;
use crate::output::Output;

pub async fn run(cmd: DictionaryCommand, client: &FastlyClient, out: &Output) -> Result<()> {
    match cmd.action {
        DictionaryAction::Create { service, version, autoclone, name, write_only } => {
            let ctx = ServiceContext::resolve(
                &service, &version, autoclone.flag(), client, Mutation::Guarded, out,
            )
            .await?;
            let dictionary = client
                .create_dictionary(ctx.service_id(), ctx.version(), &name, write_only)
                .await?;
            out.success(
                &format!(
                    "Created dictionary '{}' (id: {}, service: {}, version: {})",
                    dictionary.name, dictionary.id, ctx.service_id(), ctx.version()
                ),
                json!({"dictionary": dictionary, "version": ctx.version(), "autoclone": ctx.decision}),
            );
        }
        DictionaryAction::Delete { service, version, autoclone, name } => {
            let ctx = ServiceContext::resolve(
                &service, &version, autoclone.flag(), client, Mutation::Guarded, out,
            )
            .await?;
            client.delete_dictionary(ctx.service_id(), ctx.version(), &name).await?;
            out.success(
                &format!(
                    "Deleted dictionary '{}' (service: {}, version: {})",
                    name, ctx.service_id(), ctx.version()
                ),
                json!({"deleted": true, "name": name, "version": ctx.version(), "autoclone": ctx.decision}),
            );
        }
        DictionaryAction::List { service, version } => {
            let ctx = ServiceContext::resolve(
                &service, &version, OptionalValue::unset(), client, Mutation::ReadOnly, out,
            )
            .await?;
            let dictionaries = client.list_dictionaries(ctx.service_id(), ctx.version()).await?;
            let rows = dictionaries
                .iter()
                .map(|d| vec![d.name.clone(), d.id.clone(), d.write_only.to_string()])
                .collect();
            out.table(&["NAME", "ID", "WRITE ONLY"], rows, &dictionaries);
        }
    }

    Ok(())
}
