// Copyright 2025 the Launchpad Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Submission client.
//!
//! The assembly engine itself never talks to the cluster; this client is
//! the boundary it hands finished objects to. Transient API errors on
//! submission are retried here, never inside the resolution engine.

use crate::infrastructure::constants::APP_ID_LABEL;
use crate::shared::error::{DeployError, Result};
use backon::{ExponentialBuilder, Retryable};
use k8s_openapi::api::core::v1::{Pod, Secret, Service};
use kube::api::{DeleteParams, ListParams, PostParams};
use kube::{Api, Client};
use tracing::{debug, warn};

#[async_trait::async_trait]
pub trait AppDeployerClient: Send + Sync {
    async fn create_pod(&self, pod: &Pod) -> Result<()>;

    async fn create_service(&self, service: &Service) -> Result<()>;

    async fn pods_for_app(&self, app_id: &str) -> Result<Vec<Pod>>;

    async fn services_for_app(&self, app_id: &str) -> Result<Vec<Service>>;

    async fn delete_pods_for_app(&self, app_id: &str) -> Result<()>;

    async fn delete_services_for_app(&self, app_id: &str) -> Result<()>;

    /// Optional secret carrying probe credentials; absence is not an error.
    async fn probe_credentials_secret(&self, name: &str) -> Result<Option<Secret>>;

    fn namespace(&self) -> &str;
}

pub struct KubeAppDeployerClient {
    client: Client,
    namespace: String,
}

impl KubeAppDeployerClient {
    pub async fn new(namespace: String) -> Result<Self> {
        let client = Client::try_default().await.map_err(|e| {
            DeployError::KubeApi(format!("failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client, namespace })
    }

    pub async fn new_with_config(
        namespace: String,
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path)
                .map_err(|e| DeployError::KubeApi(format!("failed to load kubeconfig: {}", e)))?
        } else {
            Kubeconfig::read()
                .map_err(|e| DeployError::KubeApi(format!("failed to load kubeconfig: {}", e)))?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| {
                DeployError::KubeApi(format!("failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(config).map_err(|e| {
            DeployError::KubeApi(format!("failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client, namespace })
    }

    fn app_selector(app_id: &str) -> ListParams {
        ListParams::default().labels(&format!("{}={}", APP_ID_LABEL, app_id))
    }

    fn is_transient(err: &kube::Error) -> bool {
        matches!(err, kube::Error::Api(ae) if ae.code >= 500)
    }
}

#[async_trait::async_trait]
impl AppDeployerClient for KubeAppDeployerClient {
    async fn create_pod(&self, pod: &Pod) -> Result<()> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), &self.namespace);
        let pp = PostParams::default();

        (|| async { api.create(&pp, pod).await })
            .retry(&ExponentialBuilder::default().with_max_times(3))
            .when(Self::is_transient)
            .notify(|err: &kube::Error, _| warn!(%err, "retrying pod submission"))
            .await?;
        Ok(())
    }

    async fn create_service(&self, service: &Service) -> Result<()> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), &self.namespace);
        let pp = PostParams::default();

        (|| async { api.create(&pp, service).await })
            .retry(&ExponentialBuilder::default().with_max_times(3))
            .when(Self::is_transient)
            .notify(|err: &kube::Error, _| warn!(%err, "retrying service submission"))
            .await?;
        Ok(())
    }

    async fn pods_for_app(&self, app_id: &str) -> Result<Vec<Pod>> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), &self.namespace);
        let pods = api.list(&Self::app_selector(app_id)).await?;
        Ok(pods.items)
    }

    async fn services_for_app(&self, app_id: &str) -> Result<Vec<Service>> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), &self.namespace);
        let services = api.list(&Self::app_selector(app_id)).await?;
        Ok(services.items)
    }

    async fn delete_pods_for_app(&self, app_id: &str) -> Result<()> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), &self.namespace);
        api.delete_collection(&DeleteParams::default(), &Self::app_selector(app_id))
            .await?;
        debug!(app_id, "deleted pods");
        Ok(())
    }

    async fn delete_services_for_app(&self, app_id: &str) -> Result<()> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), &self.namespace);
        let services = self.services_for_app(app_id).await?;
        for service in services {
            if let Some(name) = service.metadata.name {
                api.delete(&name, &DeleteParams::default()).await?;
            }
        }
        debug!(app_id, "deleted services");
        Ok(())
    }

    async fn probe_credentials_secret(&self, name: &str) -> Result<Option<Secret>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), &self.namespace);
        Ok(api.get_opt(name).await?)
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}
