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

//! Process-wide deployer defaults.
//!
//! Loaded once at startup and read-only afterwards; every per-request
//! resolution falls back to this object when the request's property bag does
//! not carry an override. The same type doubles as the binding target for
//! structured property values, so the field names below are also the labels
//! of the structured micro-format.

use crate::shared::error::{DeployError, Result};
use k8s_openapi::api::core::v1::{
    NodeAffinity, PodAffinity, PodAntiAffinity, Toleration, Volume, VolumeMount,
};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeployerDefaults {
    pub image_pull_policy: ImagePullPolicy,
    pub image_pull_secret: Option<String>,
    pub limits: ResourceSpec,
    pub requests: ResourceSpec,
    pub host_network: bool,
    pub node_selector: Option<String>,
    pub entry_point_style: EntryPointStyle,
    pub environment_variables: Vec<String>,
    pub tolerations: Vec<Toleration>,
    pub volumes: Vec<Volume>,
    pub volume_mounts: Vec<VolumeMount>,
    pub secret_key_refs: Vec<SecretKeyRef>,
    pub config_map_key_refs: Vec<ConfigMapKeyRef>,
    pub pod_security_context: Option<PodSecurityContextSpec>,
    pub node_affinity: Option<NodeAffinity>,
    pub pod_affinity: Option<PodAffinity>,
    pub pod_anti_affinity: Option<PodAntiAffinity>,
    pub init_container: Option<InitContainerSpec>,
    pub pod_annotations: Option<String>,
    pub service_annotations: Option<String>,
    pub job_annotations: Option<String>,
    pub deployment_labels: Option<String>,
    pub deployment_service_account_name: Option<String>,
    pub stateful_set: Option<StatefulSetDefaults>,
    pub stateful_set_init_container_image_name: Option<String>,
    pub liveness_probe_path: Option<String>,
    pub liveness_probe_port: Option<i32>,
    pub liveness_probe_delay: Option<i32>,
    pub liveness_probe_period: Option<i32>,
    pub liveness_probe_timeout: Option<i32>,
    pub readiness_probe_path: Option<String>,
    pub readiness_probe_port: Option<i32>,
    pub readiness_probe_delay: Option<i32>,
    pub readiness_probe_period: Option<i32>,
    pub readiness_probe_timeout: Option<i32>,
    /// Scheduled-task restart policy; only consulted for scheduling requests.
    pub restart_policy: Option<RestartPolicy>,
    /// Service account for scheduled tasks; only consulted for scheduling
    /// requests.
    pub task_service_account_name: Option<String>,
}

impl DeployerDefaults {
    /// Loads the defaults file, dispatching on extension: `.yaml`/`.yml` or
    /// `.toml`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DeployError::config_error(format!(
                "failed to read defaults file {}: {}",
                path.display(),
                e
            ))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Err(DeployError::config_error(format!(
                "unsupported defaults file format: {}",
                path.display()
            ))),
        }
    }
}

/// cpu/memory quantity pair used for both limits and requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResourceSpec {
    pub cpu: Option<String>,
    pub memory: Option<String>,
}

/// Environment variable sourced from a secret data key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecretKeyRef {
    pub env_var_name: String,
    pub secret_name: String,
    pub data_key: String,
}

/// Environment variable sourced from a config map data key.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigMapKeyRef {
    pub env_var_name: String,
    pub config_map_name: String,
    pub data_key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PodSecurityContextSpec {
    pub run_as_user: Option<i64>,
    pub fs_group: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InitContainerSpec {
    pub container_name: String,
    pub image_name: String,
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatefulSetDefaults {
    pub volume_claim_template: Option<VolumeClaimTemplateDefaults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VolumeClaimTemplateDefaults {
    pub storage_class_name: Option<String>,
    pub storage: Option<String>,
}

/// Container image pull policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ImagePullPolicy {
    Always,
    IfNotPresent,
    Never,
}

impl Default for ImagePullPolicy {
    fn default() -> Self {
        ImagePullPolicy::IfNotPresent
    }
}

impl ImagePullPolicy {
    /// Case-insensitive parse; `None` for unrecognised values so the caller
    /// can fall back instead of failing the deployment.
    pub fn relaxed_parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "always" => Some(ImagePullPolicy::Always),
            "ifnotpresent" => Some(ImagePullPolicy::IfNotPresent),
            "never" => Some(ImagePullPolicy::Never),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImagePullPolicy::Always => "Always",
            ImagePullPolicy::IfNotPresent => "IfNotPresent",
            ImagePullPolicy::Never => "Never",
        }
    }
}

/// How application-definition properties are passed into the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPointStyle {
    /// `--key=value` command arguments.
    Exec,
    /// One aggregated JSON environment variable.
    Boot,
    /// One uppercased environment variable per property.
    Shell,
}

impl Default for EntryPointStyle {
    fn default() -> Self {
        EntryPointStyle::Exec
    }
}

impl EntryPointStyle {
    pub fn relaxed_parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "exec" => Some(EntryPointStyle::Exec),
            "boot" => Some(EntryPointStyle::Boot),
            "shell" => Some(EntryPointStyle::Shell),
            _ => None,
        }
    }
}

/// Pod restart policy for scheduled tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RestartPolicy {
    Always,
    OnFailure,
    Never,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        RestartPolicy::Never
    }
}

impl RestartPolicy {
    pub fn relaxed_parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "always" => Some(RestartPolicy::Always),
            "onfailure" => Some(RestartPolicy::OnFailure),
            "never" => Some(RestartPolicy::Never),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RestartPolicy::Always => "Always",
            RestartPolicy::OnFailure => "OnFailure",
            RestartPolicy::Never => "Never",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_empty_and_safe() {
        let defaults = DeployerDefaults::default();
        assert_eq!(defaults.image_pull_policy, ImagePullPolicy::IfNotPresent);
        assert_eq!(defaults.entry_point_style, EntryPointStyle::Exec);
        assert!(!defaults.host_network);
        assert!(defaults.tolerations.is_empty());
        assert!(defaults.limits.cpu.is_none());
    }

    #[test]
    fn yaml_defaults_bind_structured_fields() {
        let yaml = r#"
imagePullPolicy: Always
limits:
  cpu: "2"
  memory: 4Gi
tolerations:
  - key: node-role
    operator: Equal
    value: batch
    effect: NoSchedule
secretKeyRefs:
  - envVarName: DB_PASSWORD
    secretName: db-secret
    dataKey: password
"#;
        let defaults: DeployerDefaults = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(defaults.image_pull_policy, ImagePullPolicy::Always);
        assert_eq!(defaults.limits.cpu.as_deref(), Some("2"));
        assert_eq!(defaults.tolerations.len(), 1);
        assert_eq!(defaults.tolerations[0].key.as_deref(), Some("node-role"));
        assert_eq!(defaults.secret_key_refs[0].env_var_name, "DB_PASSWORD");
    }

    #[test]
    fn relaxed_enum_parsing_is_case_insensitive() {
        assert_eq!(
            ImagePullPolicy::relaxed_parse("ALWAYS"),
            Some(ImagePullPolicy::Always)
        );
        assert_eq!(ImagePullPolicy::relaxed_parse("bogus"), None);
        assert_eq!(
            EntryPointStyle::relaxed_parse("Boot"),
            Some(EntryPointStyle::Boot)
        );
        assert_eq!(
            RestartPolicy::relaxed_parse("onfailure"),
            Some(RestartPolicy::OnFailure)
        );
    }
}
