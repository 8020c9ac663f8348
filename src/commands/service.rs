//! Service commands

use anyhow::Result;
use serde_json::json;

use crate::api::{drain_all, FastlyClient};
use crate::cli::{ServiceAction, ServiceCommand};
use crate::output::Output;

pub async fn run(cmd: ServiceCommand, client: &FastlyClient, out: &Output) -> Result<()> {
    match cmd.action {
        ServiceAction::List { per_page } => list(per_page, client, out).await,
        ServiceAction::Search { name } => search(&name, client, out).await,
    }
}

async fn list(per_page: u32, client: &FastlyClient, out: &Output) -> Result<()> {
    let mut pages = client.list_services(per_page);
    let services = drain_all(&mut pages).await.into_result()?;

    let rows = services
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.id.clone(),
                s.service_type.clone().unwrap_or_default(),
                s.version.map(|v| v.to_string()).unwrap_or_default(),
            ]
        })
        .collect();

    out.table(&["NAME", "ID", "TYPE", "ACTIVE VERSION"], rows, &services);
    Ok(())
}

async fn search(name: &str, client: &FastlyClient, out: &Output) -> Result<()> {
    out.log("info", &format!("Searching for service: {}", name));

    let service = client.search_service(name).await?;

    out.fields(
        &[
            ("ID", service.id.clone()),
            ("Name", service.name.clone()),
            ("Type", service.service_type.clone().unwrap_or_default()),
            ("Active version", service.version.map(|v| v.to_string()).unwrap_or_default()),
        ],
        json!({"service": service}),
    );
    Ok(())
}
