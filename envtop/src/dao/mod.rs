//! Cluster access used by the resolver and the session tasks.
//!
//! `ResourceClient` is the seam between the pure resolution logic and the
//! API server. `KubeClient` talks to a real cluster; tests use the in-memory
//! `fake::FakeClient`.

use std::collections::BTreeMap;
use std::future::Future;

use k8s_openapi::api::core::v1::PodSpec;

use crate::error::Result;
use crate::structs::Workload;

pub mod cluster;

#[cfg(test)]
pub mod fake;

pub use self::cluster::KubeClient;

pub trait ResourceClient: Send + Sync {
    fn list_namespaces(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Deployments followed by StatefulSets of `namespace`.
    fn list_apps(&self, namespace: &str) -> impl Future<Output = Result<Vec<Workload>>> + Send;

    fn get_pod_spec(&self, workload: &Workload) -> impl Future<Output = Result<PodSpec>> + Send;

    /// Fails with `Error::NotFound` when the ConfigMap is absent.
    fn get_config_map_data(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<BTreeMap<String, String>>> + Send;

    /// Fails with `Error::NotFound` when the Secret is absent.
    fn get_secret_data(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<BTreeMap<String, Vec<u8>>>> + Send;

    /// Existence probe only. Any failure counts as "does not exist".
    fn sealed_secret_exists(&self, namespace: &str, name: &str)
        -> impl Future<Output = bool> + Send;
}
