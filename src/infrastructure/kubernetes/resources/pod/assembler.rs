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

//! Pod specification assembly.
//!
//! Wraps one resolved container into a `PodSpec` together with every
//! pod-level setting the resolver produces. Optional elements are omitted
//! outright when their resolution is empty, keeping the emitted spec
//! minimal.

use crate::domain::config::DeployerDefaults;
use crate::domain::request::DeploymentRequest;
use crate::infrastructure::constants::{
    APP_ID_LABEL, DEPLOYMENT_ID_LABEL, GROUP_ID_LABEL, MARKER_LABEL, MARKER_LABEL_VALUE,
    RESTART_POLICY_NEVER,
};
use crate::infrastructure::kubernetes::properties::resolver::DeploymentPropertiesResolver;
use crate::infrastructure::kubernetes::resources::pod::container::{
    ContainerConfiguration, ContainerFactory,
};
use crate::shared::error::Result;
use k8s_openapi::api::core::v1::{
    LocalObjectReference, PodSpec, ResourceRequirements, Secret, Volume,
};
use std::collections::BTreeMap;

pub struct PodSpecAssembler<'a> {
    defaults: &'a DeployerDefaults,
}

impl<'a> PodSpecAssembler<'a> {
    pub fn new(defaults: &'a DeployerDefaults) -> Self {
        Self { defaults }
    }

    pub fn assemble(
        &self,
        app_id: &str,
        request: &DeploymentRequest,
        external_port: Option<i32>,
        never_restart: bool,
        probe_credentials_secret: Option<Secret>,
    ) -> Result<PodSpec> {
        let properties = &request.request_properties;
        let resolver = DeploymentPropertiesResolver::new(request.property_prefix(), self.defaults);

        let image_pull_secret = resolver.image_pull_secret(properties);
        let host_network = resolver.host_network(properties);

        let configuration = ContainerConfiguration::new(app_id, request)
            .with_external_port(external_port)
            .with_host_network(host_network)
            .with_probe_credentials_secret(probe_credentials_secret);

        let mut container = ContainerFactory::new(self.defaults).create(&configuration)?;

        let requests = resolver.deduce_resource_requests(properties);
        container.resources = Some(ResourceRequirements {
            limits: Some(resolver.deduce_resource_limits(properties)),
            requests: (!requests.is_empty()).then_some(requests),
            ..Default::default()
        });
        container.image_pull_policy =
            Some(resolver.deduce_image_pull_policy(properties).as_str().to_string());

        let node_selector = resolver.node_selectors(properties)?;
        let tolerations = resolver.tolerations(properties)?;

        // only volumes referenced by a container mount make it into the pod
        let mounts = container.volume_mounts.clone().unwrap_or_default();
        let volumes: Vec<Volume> = resolver
            .volumes(properties)?
            .into_iter()
            .filter(|volume| mounts.iter().any(|mount| mount.name == volume.name))
            .collect();

        let restart_policy = if never_restart {
            Some(RESTART_POLICY_NEVER.to_string())
        } else if request.is_scheduling() {
            Some(resolver.restart_policy(properties).as_str().to_string())
        } else {
            None
        };

        let service_account_name = if request.is_scheduling() {
            Some(resolver.task_service_account_name(properties))
        } else {
            resolver.deployment_service_account_name(properties)
        };

        Ok(PodSpec {
            containers: vec![container],
            image_pull_secrets: image_pull_secret
                .map(|name| vec![LocalObjectReference { name }]),
            host_network: host_network.then_some(true),
            node_selector: (!node_selector.is_empty()).then_some(node_selector),
            tolerations: (!tolerations.is_empty()).then_some(tolerations),
            volumes: (!volumes.is_empty()).then_some(volumes),
            restart_policy,
            service_account_name,
            security_context: resolver.pod_security_context(properties)?,
            affinity: resolver.affinity(properties)?,
            init_containers: resolver.init_container(properties)?.map(|c| vec![c]),
            ..Default::default()
        })
    }

    /// Identity labels selecting this app's pods; the group label is only
    /// present for requests that belong to a deployment group.
    pub fn id_labels(&self, app_id: &str, request: &DeploymentRequest) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        labels.insert(APP_ID_LABEL.to_string(), app_id.to_string());
        if let Some(group) = request.group_name() {
            labels.insert(GROUP_ID_LABEL.to_string(), group.to_string());
        }
        labels.insert(DEPLOYMENT_ID_LABEL.to_string(), app_id.to_string());
        labels.insert(MARKER_LABEL.to_string(), MARKER_LABEL_VALUE.to_string());
        labels
    }
}
