use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ServiceVersion, VersionApi};
use crate::error::{FastlyError, Result};

pub fn version(number: u32, active: bool, locked: bool) -> ServiceVersion {
    ServiceVersion { number, active, locked, comment: None }
}

/// A mock `VersionApi` for tests.
///
/// Clones append a new editable version numbered after the current highest.
#[derive(Default)]
pub struct MockApi {
    versions: Mutex<Vec<ServiceVersion>>,
    services: Vec<(String, String)>,
    clone_failure: Option<u16>,
    list_calls: AtomicUsize,
    clone_calls: AtomicUsize,
    lookup_calls: AtomicUsize,
}

impl MockApi {
    pub fn with_versions(versions: Vec<ServiceVersion>) -> Self {
        Self { versions: Mutex::new(versions), ..Self::default() }
    }

    pub fn with_service(mut self, name: &str, id: &str) -> Self {
        self.services.push((name.to_string(), id.to_string()));
        self
    }

    pub fn failing_clone(mut self, status: u16) -> Self {
        self.clone_failure = Some(status);
        self
    }

    pub fn clones(&self) -> usize {
        self.clone_calls.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VersionApi for MockApi {
    async fn list_versions(&self, _service_id: &str) -> Result<Vec<ServiceVersion>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.versions.lock().unwrap().clone())
    }

    async fn clone_version(&self, _service_id: &str, number: u32) -> Result<ServiceVersion> {
        self.clone_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.clone_failure {
            return Err(FastlyError::Api { status, message: "clone failed".into() });
        }

        let mut versions = self.versions.lock().unwrap();
        if !versions.iter().any(|v| v.number == number) {
            return Err(FastlyError::Api { status: 404, message: "Version not found".into() });
        }
        let next = versions.iter().map(|v| v.number).max().unwrap_or(0) + 1;
        let cloned = version(next, false, false);
        versions.push(cloned.clone());
        Ok(cloned)
    }

    async fn lookup_service_by_name(&self, name: &str) -> Result<String> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.services
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| id.clone())
            .ok_or_else(|| FastlyError::ServiceNameNotFound { name: name.to_string() })
    }
}
