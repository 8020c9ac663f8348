//! HTTP client for the Fastly API

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{
    Acl, AclEntry, Dictionary, DictionaryItem, Paginator, Service, ServiceVersion, VersionApi,
};
use crate::error::{FastlyError, Result};

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Serialize)]
struct NameForm<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct CommentForm<'a> {
    comment: &'a str,
}

#[derive(Serialize)]
struct DictionaryForm<'a> {
    name: &'a str,
    write_only: bool,
}

#[derive(Serialize)]
struct AclEntryForm<'a> {
    ip: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subnet: Option<u8>,
    negated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

#[derive(Serialize)]
struct ItemForm<'a> {
    item_key: &'a str,
    item_value: &'a str,
}

#[derive(Clone)]
pub struct FastlyClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl FastlyClient {
    pub fn new(endpoint: &str, token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("fastly-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.endpoint, path))
            .header("Fastly-Key", &self.token)
            .header("Accept", "application/json")
    }

    /// Sends a request and turns non-2xx responses into `FastlyError::Api`.
    pub(crate) async fn send_raw(&self, req: RequestBuilder) -> Result<Response> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(FastlyError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = self.send_raw(req).await?;
        decode(resp).await
    }

    // ============ Services ============

    pub fn list_services(&self, per_page: u32) -> Paginator<Service> {
        Paginator::new(self.clone(), "/service", per_page)
    }

    pub async fn search_service(&self, name: &str) -> Result<Service> {
        let req = self.request(Method::GET, "/service/search").query(&[("name", name)]);
        match self.send(req).await {
            Err(FastlyError::Api { status: 404, .. }) => {
                Err(FastlyError::ServiceNameNotFound { name: name.to_string() })
            }
            other => other,
        }
    }

    // ============ Versions ============

    pub async fn activate_version(&self, service_id: &str, version: u32) -> Result<ServiceVersion> {
        self.version_action(service_id, version, "activate").await
    }

    pub async fn deactivate_version(&self, service_id: &str, version: u32) -> Result<ServiceVersion> {
        self.version_action(service_id, version, "deactivate").await
    }

    pub async fn lock_version(&self, service_id: &str, version: u32) -> Result<ServiceVersion> {
        self.version_action(service_id, version, "lock").await
    }

    pub async fn update_version(
        &self,
        service_id: &str,
        version: u32,
        comment: &str,
    ) -> Result<ServiceVersion> {
        let path = format!("/service/{}/version/{}", service_id, version);
        let req = self.request(Method::PUT, &path).form(&CommentForm { comment });
        self.send(req).await
    }

    async fn version_action(&self, service_id: &str, version: u32, action: &str) -> Result<ServiceVersion> {
        let path = format!("/service/{}/version/{}/{}", service_id, version, action);
        self.send(self.request(Method::PUT, &path)).await
    }

    // ============ ACLs ============

    pub async fn create_acl(&self, service_id: &str, version: u32, name: &str) -> Result<Acl> {
        let path = format!("/service/{}/version/{}/acl", service_id, version);
        self.send(self.request(Method::POST, &path).form(&NameForm { name })).await
    }

    pub async fn list_acls(&self, service_id: &str, version: u32) -> Result<Vec<Acl>> {
        let path = format!("/service/{}/version/{}/acl", service_id, version);
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn get_acl(&self, service_id: &str, version: u32, name: &str) -> Result<Acl> {
        let path = format!("/service/{}/version/{}/acl/{}", service_id, version, name);
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn update_acl(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
        new_name: &str,
    ) -> Result<Acl> {
        let path = format!("/service/{}/version/{}/acl/{}", service_id, version, name);
        let req = self.request(Method::PUT, &path).form(&NameForm { name: new_name });
        self.send(req).await
    }

    pub async fn delete_acl(&self, service_id: &str, version: u32, name: &str) -> Result<()> {
        let path = format!("/service/{}/version/{}/acl/{}", service_id, version, name);
        self.send::<serde_json::Value>(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    pub fn list_acl_entries(&self, service_id: &str, acl_id: &str, per_page: u32) -> Paginator<AclEntry> {
        let path = format!("/service/{}/acl/{}/entries", service_id, acl_id);
        Paginator::new(self.clone(), &path, per_page)
    }

    pub async fn create_acl_entry(
        &self,
        service_id: &str,
        acl_id: &str,
        ip: &str,
        subnet: Option<u8>,
        negated: bool,
        comment: Option<&str>,
    ) -> Result<AclEntry> {
        let path = format!("/service/{}/acl/{}/entry", service_id, acl_id);
        let form = AclEntryForm { ip, subnet, negated, comment };
        self.send(self.request(Method::POST, &path).form(&form)).await
    }

    pub async fn delete_acl_entry(&self, service_id: &str, acl_id: &str, entry_id: &str) -> Result<()> {
        let path = format!("/service/{}/acl/{}/entry/{}", service_id, acl_id, entry_id);
        self.send::<serde_json::Value>(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    // ============ Dictionaries ============

    pub async fn create_dictionary(
        &self,
        service_id: &str,
        version: u32,
        name: &str,
        write_only: bool,
    ) -> Result<Dictionary> {
        let path = format!("/service/{}/version/{}/dictionary", service_id, version);
        let req = self.request(Method::POST, &path).form(&DictionaryForm { name, write_only });
        self.send(req).await
    }

    pub async fn list_dictionaries(&self, service_id: &str, version: u32) -> Result<Vec<Dictionary>> {
        let path = format!("/service/{}/version/{}/dictionary", service_id, version);
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn delete_dictionary(&self, service_id: &str, version: u32, name: &str) -> Result<()> {
        let path = format!("/service/{}/version/{}/dictionary/{}", service_id, version, name);
        self.send::<serde_json::Value>(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    pub fn list_dictionary_items(
        &self,
        service_id: &str,
        dictionary_id: &str,
        per_page: u32,
    ) -> Paginator<DictionaryItem> {
        let path = format!("/service/{}/dictionary/{}/items", service_id, dictionary_id);
        Paginator::new(self.clone(), &path, per_page)
    }

    pub async fn create_dictionary_item(
        &self,
        service_id: &str,
        dictionary_id: &str,
        key: &str,
        value: &str,
    ) -> Result<DictionaryItem> {
        let path = format!("/service/{}/dictionary/{}/item", service_id, dictionary_id);
        let form = ItemForm { item_key: key, item_value: value };
        self.send(self.request(Method::POST, &path).form(&form)).await
    }

    pub async fn delete_dictionary_item(&self, service_id: &str, dictionary_id: &str, key: &str) -> Result<()> {
        let path = format!("/service/{}/dictionary/{}/item/{}", service_id, dictionary_id, key);
        self.send::<serde_json::Value>(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}

#[async_trait]
impl VersionApi for FastlyClient {
    async fn list_versions(&self, service_id: &str) -> Result<Vec<ServiceVersion>> {
        let path = format!("/service/{}/version", service_id);
        self.send(self.request(Method::GET, &path)).await
    }

    async fn clone_version(&self, service_id: &str, version: u32) -> Result<ServiceVersion> {
        self.version_action(service_id, version, "clone").await
    }

    async fn lookup_service_by_name(&self, name: &str) -> Result<String> {
        Ok(self.search_service(name).await?.id)
    }
}

/// Decodes a successful response body; a malformed payload is an upstream fault.
pub(crate) async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status().as_u16();
    resp.json()
        .await
        .map_err(|source| FastlyError::Decode { status, source })
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { msg: Some(msg), detail: Some(detail) }) if !detail.is_empty() => {
            format!("{}: {}", msg, detail)
        }
        Ok(ApiErrorBody { msg: Some(msg), .. }) => msg,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status.canonical_reason().unwrap_or("request failed").to_string(),
    }
}
