//! Edge dictionary item commands (items are not versioned)

use anyhow::Result;
use serde_json::json;

use crate::api::{drain_all, FastlyClient};
use crate::cli::{DictionaryEntryAction, DictionaryEntryCommand};
use crate::context;
use crate::output::Output;

pub async fn run(cmd: DictionaryEntryCommand, client: &FastlyClient, out: &Output) -> Result<()> {
    match cmd.action {
        DictionaryEntryAction::Create { service, dictionary_id, key, value } => {
            let identity = context::resolve_service(&service, client, out).await?;
            let item = client
                .create_dictionary_item(&identity.id, &dictionary_id, &key, &value)
                .await?;
            out.success(
                &format!("Created dictionary item '{}' (dictionary: {}, service: {})", item.item_key, dictionary_id, identity.id),
                json!({"service_id": identity.id, "dictionary_id": dictionary_id, "item": item}),
            );
        }
        DictionaryEntryAction::Delete { service, dictionary_id, key } => {
            let identity = context::resolve_service(&service, client, out).await?;
            client.delete_dictionary_item(&identity.id, &dictionary_id, &key).await?;
            out.success(
                &format!("Deleted dictionary item '{}' (dictionary: {}, service: {})", key, dictionary_id, identity.id),
                json!({"deleted": true, "service_id": identity.id, "dictionary_id": dictionary_id, "key": key}),
            );
        }
        DictionaryEntryAction::List { service, dictionary_id, per_page } => {
            let identity = context::resolve_service(&service, client, out).await?;
            let mut pages = client.list_dictionary_items(&identity.id, &dictionary_id, per_page);
            let items = drain_all(&mut pages).await.into_result()?;

            let rows = items
                .iter()
                .map(|i| vec![i.item_key.clone(), i.item_value.clone()])
                .collect();
            out.table(&["KEY", "VALUE"], rows, &items);
        }
    }

    Ok(())
}
