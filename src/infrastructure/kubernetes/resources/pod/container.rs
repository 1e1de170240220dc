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

//! Container construction for a deployment request.

use crate::domain::config::{DeployerDefaults, EntryPointStyle};
use crate::domain::request::DeploymentRequest;
use crate::infrastructure::constants::{
    APPLICATION_GROUP_ENV_VAR, APPLICATION_GUID_ENV_VAR, APPLICATION_JSON_ENV_VAR,
};
use crate::infrastructure::kubernetes::properties::resolver::DeploymentPropertiesResolver;
use crate::infrastructure::kubernetes::resources::pod::probes::{HttpProbeCreator, ProbeKind};
use crate::shared::error::{DeployError, Result};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, EnvVarSource, ObjectFieldSelector, Secret,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Everything the factory needs for one container build. Owned by a single
/// invocation; never shared across requests.
pub struct ContainerConfiguration<'a> {
    pub app_id: &'a str,
    pub request: &'a DeploymentRequest,
    pub external_port: Option<i32>,
    pub host_network: bool,
    pub probe_credentials_secret: Option<Secret>,
}

impl<'a> ContainerConfiguration<'a> {
    pub fn new(app_id: &'a str, request: &'a DeploymentRequest) -> Self {
        Self {
            app_id,
            request,
            external_port: None,
            host_network: false,
            probe_credentials_secret: None,
        }
    }

    pub fn with_external_port(mut self, external_port: Option<i32>) -> Self {
        self.external_port = external_port;
        self
    }

    pub fn with_host_network(mut self, host_network: bool) -> Self {
        self.host_network = host_network;
        self
    }

    pub fn with_probe_credentials_secret(mut self, secret: Option<Secret>) -> Self {
        self.probe_credentials_secret = secret;
        self
    }
}

pub struct ContainerFactory<'a> {
    defaults: &'a DeployerDefaults,
}

impl<'a> ContainerFactory<'a> {
    pub fn new(defaults: &'a DeployerDefaults) -> Self {
        Self { defaults }
    }

    pub fn create(&self, configuration: &ContainerConfiguration<'_>) -> Result<Container> {
        let request = configuration.request;
        let properties = &request.request_properties;
        let resolver = DeploymentPropertiesResolver::new(request.property_prefix(), self.defaults);

        info!(image = %request.image, "using container image");

        let entry_point_style = resolver.entry_point_style(properties);
        info!(?entry_point_style, "using entry point style");

        let mut env_map: BTreeMap<String, String> = BTreeMap::new();
        for declaration in &self.defaults.environment_variables {
            let (key, value) = declaration.split_once('=').ok_or_else(|| {
                DeployError::invalid_format(format!(
                    "invalid environment variable declared: {}",
                    declaration
                ))
            })?;
            env_map.insert(key.to_string(), value.to_string());
        }
        // app-level variables override the global ones
        env_map.extend(resolver.app_environment_variables(properties)?);

        let mut app_args = Vec::new();
        match entry_point_style {
            EntryPointStyle::Exec => {
                app_args = create_command_args(request);
            }
            EntryPointStyle::Boot => {
                if env_map.contains_key(APPLICATION_JSON_ENV_VAR) {
                    return Err(DeployError::ConflictingConfiguration(format!(
                        "cannot use the boot entry point style and also set {} for the app",
                        APPLICATION_JSON_ENV_VAR
                    )));
                }
                env_map.insert(
                    APPLICATION_JSON_ENV_VAR.to_string(),
                    serde_json::to_string(&request.definition.properties)?,
                );
                app_args = request.command_line_args.clone();
            }
            EntryPointStyle::Shell => {
                for (key, value) in &request.definition.properties {
                    let name = key.replace('.', "_").to_ascii_uppercase();
                    env_map.insert(name, value.clone());
                }
            }
        }

        let mut env: Vec<EnvVar> = env_map
            .into_iter()
            .map(|(name, value)| EnvVar {
                name,
                value: Some(value),
                ..Default::default()
            })
            .collect();

        env.extend(resolver.secret_key_refs(properties)?);
        env.extend(resolver.config_map_key_refs(properties)?);
        env.push(guid_env_var());

        if let Some(group) = request.group_name() {
            env.push(EnvVar {
                name: APPLICATION_GROUP_ENV_VAR.to_string(),
                value: Some(group.to_string()),
                ..Default::default()
            });
        }

        let mut ports: BTreeSet<i32> = BTreeSet::new();
        if let Some(port) = configuration.external_port {
            ports.insert(port);
        }
        ports.extend(resolver.container_ports(properties)?);

        let readiness_probe =
            HttpProbeCreator::new(ProbeKind::Readiness, request.property_prefix(), self.defaults)
                .create(
                    properties,
                    configuration.external_port,
                    configuration.probe_credentials_secret.as_ref(),
                )
                .map(|(port, probe)| {
                    ports.insert(port);
                    probe
                });

        let liveness_probe =
            HttpProbeCreator::new(ProbeKind::Liveness, request.property_prefix(), self.defaults)
                .create(
                    properties,
                    configuration.external_port,
                    configuration.probe_credentials_secret.as_ref(),
                )
                .map(|(port, probe)| {
                    ports.insert(port);
                    probe
                });

        let container_ports = if ports.is_empty() {
            None
        } else {
            Some(
                ports
                    .iter()
                    .map(|port| ContainerPort {
                        container_port: *port,
                        // host networking publishes each port on the node
                        host_port: configuration.host_network.then_some(*port),
                        ..Default::default()
                    })
                    .collect(),
            )
        };

        let volume_mounts = resolver.volume_mounts(properties)?;

        // an explicit command replaces the image's built-in entrypoint
        let container_command = resolver.container_command(properties);

        Ok(Container {
            name: configuration.app_id.to_string(),
            image: Some(request.image.clone()),
            env: Some(env),
            args: (!app_args.is_empty()).then_some(app_args),
            ports: container_ports,
            volume_mounts: (!volume_mounts.is_empty()).then_some(volume_mounts),
            readiness_probe,
            liveness_probe,
            command: (!container_command.is_empty()).then_some(container_command),
            ..Default::default()
        })
    }
}

/// `--key=value` per app-definition property, then the user's extra args.
fn create_command_args(request: &DeploymentRequest) -> Vec<String> {
    let mut cmd_args: Vec<String> = request
        .definition
        .properties
        .iter()
        .map(|(key, value)| format!("--{}={}", key, value))
        .collect();
    cmd_args.extend(request.command_line_args.iter().cloned());
    debug!(?cmd_args, "using command args");
    cmd_args
}

/// The orchestration-assigned pod identity, deferred to pod metadata at
/// runtime; used downstream to correlate a pod with its owning deployment.
fn guid_env_var() -> EnvVar {
    EnvVar {
        name: APPLICATION_GUID_ENV_VAR.to_string(),
        value_from: Some(EnvVarSource {
            field_ref: Some(ObjectFieldSelector {
                field_path: "metadata.uid".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
