//! Resolution of a workload's effective environment.
//!
//! Containers are visited in declared order, then init containers. Inside a
//! container every `envFrom` source is applied before the discrete `env`
//! entries. The first occurrence of a name wins; the final alphabetical sort
//! only affects presentation.
//!
//! Failure policy is asymmetric: a failing `envFrom` source is
//! logged and skipped, while a failing non-optional `env` reference aborts the
//! whole resolve.

use std::collections::HashSet;

use k8s_openapi::api::core::v1::{Container, EnvFromSource, EnvVar, PodSpec};
use tracing::{debug, warn};

use crate::dao::ResourceClient;
use crate::error::Result;
use crate::structs::{EnvVarRecord, SourceKind, Workload, UNKNOWN_SOURCE};

pub struct Resolver<C> {
    client: C,
}

/// First-occurrence-wins accumulator.
#[derive(Default)]
struct Collected {
    seen: HashSet<String>,
    records: Vec<EnvVarRecord>,
}

impl Collected {
    fn push(&mut self, record: EnvVarRecord) {
        if self.seen.insert(record.name.clone()) {
            self.records.push(record);
        }
    }

    fn into_sorted(mut self) -> Vec<EnvVarRecord> {
        self.records.sort_by(|a, b| a.name.cmp(&b.name));
        self.records
    }
}

fn is_optional(flag: Option<bool>) -> bool {
    flag.unwrap_or(false)
}

impl<C: ResourceClient> Resolver<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Resolves every environment variable the workload's pods would see.
    #[tracing::instrument(skip(self), fields(workload = %workload.name, namespace = %workload.namespace))]
    pub async fn resolve(&self, workload: &Workload) -> Result<Vec<EnvVarRecord>> {
        let spec = self.client.get_pod_spec(workload).await?;
        let records = self.resolve_pod_spec(&workload.namespace, &spec).await?;
        debug!(count = records.len(), "resolved env");
        Ok(records)
    }

    pub async fn resolve_pod_spec(
        &self,
        namespace: &str,
        spec: &PodSpec,
    ) -> Result<Vec<EnvVarRecord>> {
        let containers: Vec<&Container> = spec
            .containers
            .iter()
            .chain(spec.init_containers.iter().flatten())
            .collect();

        let mut collected = Collected::default();
        for container in containers {
            for source in container.env_from.iter().flatten() {
                match self.resolve_env_from(namespace, source).await {
                    Ok(records) => records.into_iter().for_each(|r| collected.push(r)),
                    Err(e) => {
                        warn!(container = %container.name, error = %e, "skipping envFrom source");
                    }
                }
            }

            for var in container.env.iter().flatten() {
                let record = self.resolve_env_var(namespace, var).await?;
                collected.push(record);
            }
        }

        Ok(collected.into_sorted())
    }

    async fn resolve_env_from(
        &self,
        namespace: &str,
        source: &EnvFromSource,
    ) -> Result<Vec<EnvVarRecord>> {
        let prefix = source.prefix.as_deref().unwrap_or_default();
        let mut records = Vec::new();

        if let Some(cm_ref) = &source.config_map_ref {
            match self.client.get_config_map_data(namespace, &cm_ref.name).await {
                Ok(data) => {
                    records.extend(data.into_iter().map(|(key, value)| {
                        EnvVarRecord::plain(
                            format!("{prefix}{key}"),
                            SourceKind::ConfigMap,
                            Some(cm_ref.name.clone()),
                            value,
                        )
                    }));
                }
                Err(e) if e.is_not_found() && is_optional(cm_ref.optional) => return Ok(records),
                Err(e) => return Err(e),
            }
        }

        if let Some(secret_ref) = &source.secret_ref {
            match self.client.get_secret_data(namespace, &secret_ref.name).await {
                Ok(data) => {
                    let sealed = self
                        .client
                        .sealed_secret_exists(namespace, &secret_ref.name)
                        .await;
                    records.extend(data.into_iter().map(|(key, raw)| {
                        EnvVarRecord::secret(
                            format!("{prefix}{key}"),
                            secret_ref.name.clone(),
                            raw,
                            sealed,
                        )
                    }));
                }
                Err(e) if e.is_not_found() && is_optional(secret_ref.optional) => {
                    return Ok(records)
                }
                Err(e) => return Err(e),
            }
        }

        Ok(records)
    }

    async fn resolve_env_var(&self, namespace: &str, var: &EnvVar) -> Result<EnvVarRecord> {
        if let Some(value) = var.value.as_deref().filter(|v| !v.is_empty()) {
            return Ok(EnvVarRecord::plain(&var.name, SourceKind::Inline, None, value));
        }

        let Some(from) = &var.value_from else {
            return Ok(EnvVarRecord::plain(&var.name, SourceKind::Inline, None, ""));
        };

        if let Some(sel) = &from.config_map_key_ref {
            return match self.client.get_config_map_data(namespace, &sel.name).await {
                Ok(data) => {
                    let value = data.get(&sel.key).cloned().unwrap_or_default();
                    Ok(EnvVarRecord::plain(
                        &var.name,
                        SourceKind::ConfigMap,
                        Some(sel.name.clone()),
                        value,
                    ))
                }
                Err(e) if e.is_not_found() && is_optional(sel.optional) => Ok(
                    EnvVarRecord::optional_missing(&var.name, SourceKind::ConfigMap, &sel.name),
                ),
                Err(e) => Err(e),
            };
        }

        if let Some(sel) = &from.secret_key_ref {
            return match self.client.get_secret_data(namespace, &sel.name).await {
                Ok(mut data) => {
                    let raw = data.remove(&sel.key).unwrap_or_default();
                    let sealed = self.client.sealed_secret_exists(namespace, &sel.name).await;
                    Ok(EnvVarRecord::secret(&var.name, &sel.name, raw, sealed))
                }
                Err(e) if e.is_not_found() && is_optional(sel.optional) => Ok(
                    EnvVarRecord::optional_missing(&var.name, SourceKind::Secret, &sel.name),
                ),
                Err(e) => Err(e),
            };
        }

        if let Some(field) = &from.field_ref {
            return Ok(EnvVarRecord::plain(
                &var.name,
                SourceKind::FieldRef,
                None,
                format!("fieldRef: {}", field.field_path),
            ));
        }

        if let Some(resource) = &from.resource_field_ref {
            return Ok(EnvVarRecord::plain(
                &var.name,
                SourceKind::ResourceRef,
                None,
                format!("resourceFieldRef: {}", resource.resource),
            ));
        }

        Ok(EnvVarRecord::plain(
            &var.name,
            SourceKind::Inline,
            None,
            UNKNOWN_SOURCE,
        ))
    }
}
