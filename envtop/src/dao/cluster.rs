use std::collections::BTreeMap;

use k8s_openapi::api::{
    apps::v1::{Deployment, StatefulSet},
    core::v1::{ConfigMap, Namespace, PodSpec, PodTemplateSpec, Secret},
};
use kube::{
    api::{ApiResource, DynamicObject, GroupVersionKind, ListParams},
    config::{KubeConfigOptions, Kubeconfig},
    Api, Client, Config, ResourceExt,
};
use tracing::debug;

use super::ResourceClient;
use crate::error::{Error, Result};
use crate::structs::{Workload, WorkloadKind};

const SEALED_SECRET_GROUP: &str = "bitnami.com";
const SEALED_SECRET_VERSION: &str = "v1alpha1";
const SEALED_SECRET_KIND: &str = "SealedSecret";
const SEALED_SECRET_PLURAL: &str = "sealedsecrets";

/// `ResourceClient` backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeClient {
    client: Client,
    context: String,
}

impl KubeClient {
    /// Connects using the kubeconfig, optionally overriding the context.
    #[tracing::instrument]
    pub async fn connect(context: Option<String>) -> Result<Self> {
        let options = KubeConfigOptions {
            context: context.clone(),
            cluster: None,
            user: None,
        };
        let config = Config::from_kubeconfig(&options).await?;
        let client = Client::try_from(config)?;

        let context = match context {
            Some(ctx) => ctx,
            None => Kubeconfig::read()
                .ok()
                .and_then(|kc| kc.current_context)
                .unwrap_or_else(|| "(unknown)".to_string()),
        };

        Ok(Self { client, context })
    }

    pub fn from_client(client: Client, context: impl Into<String>) -> Self {
        Self {
            client,
            context: context.into(),
        }
    }

    /// Name of the kube context the client was built from.
    pub fn context(&self) -> &str {
        &self.context
    }

    fn sealed_secret_resource() -> ApiResource {
        let gvk = GroupVersionKind::gvk(
            SEALED_SECRET_GROUP,
            SEALED_SECRET_VERSION,
            SEALED_SECRET_KIND,
        );
        ApiResource::from_gvk_with_plural(&gvk, SEALED_SECRET_PLURAL)
    }
}

fn template_spec(template: PodTemplateSpec, workload: &Workload) -> Result<PodSpec> {
    template.spec.ok_or_else(|| {
        Error::not_found(
            "PodTemplate",
            &workload.namespace,
            &format!("{}/{}", workload.kind, workload.name),
        )
    })
}

impl ResourceClient for KubeClient {
    #[tracing::instrument(skip(self))]
    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items.iter().map(|ns| ns.name_any()).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn list_apps(&self, namespace: &str) -> Result<Vec<Workload>> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let statefulsets: Api<StatefulSet> = Api::namespaced(self.client.clone(), namespace);

        let mut apps = Vec::new();
        for d in deployments.list(&ListParams::default()).await?.items {
            apps.push(Workload::new(d.name_any(), namespace, WorkloadKind::Deployment));
        }
        for s in statefulsets.list(&ListParams::default()).await?.items {
            apps.push(Workload::new(s.name_any(), namespace, WorkloadKind::StatefulSet));
        }
        debug!(count = apps.len(), "listed apps");
        Ok(apps)
    }

    #[tracing::instrument(skip(self))]
    async fn get_pod_spec(&self, workload: &Workload) -> Result<PodSpec> {
        let not_found =
            || Error::not_found(workload.kind.as_str(), &workload.namespace, &workload.name);
        let template = match workload.kind {
            WorkloadKind::Deployment => {
                let api: Api<Deployment> =
                    Api::namespaced(self.client.clone(), &workload.namespace);
                let deployment = api.get_opt(&workload.name).await?.ok_or_else(not_found)?;
                deployment.spec.map(|s| s.template)
            }
            WorkloadKind::StatefulSet => {
                let api: Api<StatefulSet> =
                    Api::namespaced(self.client.clone(), &workload.namespace);
                let statefulset = api.get_opt(&workload.name).await?.ok_or_else(not_found)?;
                statefulset.spec.map(|s| s.template)
            }
        };
        template_spec(template.ok_or_else(not_found)?, workload)
    }

    #[tracing::instrument(skip(self))]
    async fn get_config_map_data(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, String>> {
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        let cm = api
            .get_opt(name)
            .await?
            .ok_or_else(|| Error::not_found("ConfigMap", namespace, name))?;
        Ok(cm.data.unwrap_or_default())
    }

    #[tracing::instrument(skip(self))]
    async fn get_secret_data(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, Vec<u8>>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = api
            .get_opt(name)
            .await?
            .ok_or_else(|| Error::not_found("Secret", namespace, name))?;
        Ok(secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, v.0))
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn sealed_secret_exists(&self, namespace: &str, name: &str) -> bool {
        let ar = Self::sealed_secret_resource();
        let api: Api<DynamicObject> = Api::namespaced_with(self.client.clone(), namespace, &ar);
        match api.get_opt(name).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                // CRD not installed or no permission: treat as plain Secret.
                debug!(error = %e, "sealed secret probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sealed_secret_resource() {
        let ar = KubeClient::sealed_secret_resource();
        assert_eq!(ar.group, "bitnami.com");
        assert_eq!(ar.version, "v1alpha1");
        assert_eq!(ar.kind, "SealedSecret");
        assert_eq!(ar.plural, "sealedsecrets");
        assert_eq!(ar.api_version, "bitnami.com/v1alpha1");
    }

    #[test]
    fn test_template_without_spec_is_not_found() {
        let workload = Workload::new("web", "prod", WorkloadKind::Deployment);
        let err = template_spec(PodTemplateSpec::default(), &workload).unwrap_err();
        assert!(err.is_not_found());
    }
}
