//! In-memory `ResourceClient` for tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use k8s_openapi::api::core::v1::PodSpec;

use super::ResourceClient;
use crate::error::{Error, Result};
use crate::structs::Workload;

#[derive(Default)]
struct Inner {
    namespaces: Vec<String>,
    apps: BTreeMap<String, Vec<Workload>>,
    pod_specs: BTreeMap<(String, String), PodSpec>,
    config_maps: BTreeMap<(String, String), BTreeMap<String, String>>,
    secrets: BTreeMap<(String, String), BTreeMap<String, Vec<u8>>>,
    sealed: BTreeSet<(String, String)>,
    /// Objects whose lookup fails with a transport error instead of NotFound.
    broken: BTreeSet<(String, String)>,
    calls: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeClient {
    inner: Arc<Mutex<Inner>>,
}

fn key(namespace: &str, name: &str) -> (String, String) {
    (namespace.to_string(), name.to_string())
}

fn transport_error(namespace: &str, name: &str) -> Error {
    Error::Transport(kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_string(),
        message: format!("forbidden: {namespace}/{name}"),
        reason: "Forbidden".to_string(),
        code: 403,
    }))
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut guard = self.inner.lock().expect("fake client lock");
        f(&mut guard)
    }

    pub fn namespaces(self, names: &[&str]) -> Self {
        self.with(|i| i.namespaces = names.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn workload(self, workload: Workload, spec: PodSpec) -> Self {
        self.with(|i| {
            i.apps
                .entry(workload.namespace.clone())
                .or_default()
                .push(workload.clone());
            i.pod_specs
                .insert(key(&workload.namespace, &workload.name), spec);
        });
        self
    }

    pub fn config_map(self, namespace: &str, name: &str, data: &[(&str, &str)]) -> Self {
        let data = data
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.with(|i| i.config_maps.insert(key(namespace, name), data));
        self
    }

    pub fn secret(self, namespace: &str, name: &str, data: &[(&str, &[u8])]) -> Self {
        let data = data
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_vec()))
            .collect();
        self.with(|i| i.secrets.insert(key(namespace, name), data));
        self
    }

    pub fn sealed(self, namespace: &str, name: &str) -> Self {
        self.with(|i| i.sealed.insert(key(namespace, name)));
        self
    }

    pub fn broken(self, namespace: &str, name: &str) -> Self {
        self.with(|i| i.broken.insert(key(namespace, name)));
        self
    }

    /// Names of the calls made so far, e.g. `secret:prod/db`.
    pub fn calls(&self) -> Vec<String> {
        self.with(|i| i.calls.clone())
    }

    fn record(&self, call: String) {
        self.with(|i| i.calls.push(call));
    }
}

impl ResourceClient for FakeClient {
    async fn list_namespaces(&self) -> Result<Vec<String>> {
        self.record("namespaces".to_string());
        Ok(self.with(|i| i.namespaces.clone()))
    }

    async fn list_apps(&self, namespace: &str) -> Result<Vec<Workload>> {
        self.record(format!("apps:{namespace}"));
        Ok(self.with(|i| i.apps.get(namespace).cloned().unwrap_or_default()))
    }

    async fn get_pod_spec(&self, workload: &Workload) -> Result<PodSpec> {
        self.record(format!("pod_spec:{}/{}", workload.namespace, workload.name));
        self.with(|i| i.pod_specs.get(&key(&workload.namespace, &workload.name)).cloned())
            .ok_or_else(|| {
                Error::not_found(workload.kind.as_str(), &workload.namespace, &workload.name)
            })
    }

    async fn get_config_map_data(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, String>> {
        self.record(format!("config_map:{namespace}/{name}"));
        if self.with(|i| i.broken.contains(&key(namespace, name))) {
            return Err(transport_error(namespace, name));
        }
        self.with(|i| i.config_maps.get(&key(namespace, name)).cloned())
            .ok_or_else(|| Error::not_found("ConfigMap", namespace, name))
    }

    async fn get_secret_data(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, Vec<u8>>> {
        self.record(format!("secret:{namespace}/{name}"));
        if self.with(|i| i.broken.contains(&key(namespace, name))) {
            return Err(transport_error(namespace, name));
        }
        self.with(|i| i.secrets.get(&key(namespace, name)).cloned())
            .ok_or_else(|| Error::not_found("Secret", namespace, name))
    }

    async fn sealed_secret_exists(&self, namespace: &str, name: &str) -> bool {
        self.record(format!("sealed:{namespace}/{name}"));
        self.with(|i| i.sealed.contains(&key(namespace, name)))
    }
}
