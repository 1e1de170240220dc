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

//! Per-request property resolution.
//!
//! Every resolvable setting applies the same three-tier fallback: request
//! property bag override, then the process-wide defaults object, then a
//! hard-coded literal. Enum-like settings parse leniently and fall through
//! to the next tier with a warning; composite text grammars (selector pairs,
//! env assignments, label pairs) fail fast.

use crate::domain::config::{
    ConfigMapKeyRef, DeployerDefaults, EntryPointStyle, ImagePullPolicy, InitContainerSpec,
    PodSecurityContextSpec, RestartPolicy, SecretKeyRef,
};
use crate::infrastructure::constants::{
    DEFAULT_CPU_LIMIT, DEFAULT_MEMORY_LIMIT, DEFAULT_TASK_SERVICE_ACCOUNT_NAME,
    DEPLOYMENT_NODE_SELECTOR_KEY, STATEFUL_SET_INIT_IMAGE,
};
use crate::infrastructure::kubernetes::properties::binder::bind_properties;
use crate::infrastructure::kubernetes::properties::merge::merge_by_identity;
use crate::infrastructure::kubernetes::properties::relaxed::{property_value, property_value_or};
use crate::shared::bytesize::parse_to_mebibytes;
use crate::shared::cmdline::CommandLineTokenizer;
use crate::shared::error::{DeployError, Result};
use k8s_openapi::api::core::v1::{
    Affinity, ConfigMapKeySelector, Container, EnvVar, EnvVarSource, PodSecurityContext,
    SecretKeySelector, Toleration, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

pub struct DeploymentPropertiesResolver<'a> {
    property_prefix: &'static str,
    defaults: &'a DeployerDefaults,
}

impl<'a> DeploymentPropertiesResolver<'a> {
    pub fn new(property_prefix: &'static str, defaults: &'a DeployerDefaults) -> Self {
        Self {
            property_prefix,
            defaults,
        }
    }

    pub fn property_prefix(&self) -> &'static str {
        self.property_prefix
    }

    fn key(&self, setting: &str) -> String {
        format!("{}kubernetes.{}", self.property_prefix, setting)
    }

    /// Request-level tolerations win over global ones by toleration key.
    pub fn tolerations(&self, properties: &HashMap<String, String>) -> Result<Vec<Toleration>> {
        let bound = bind_properties(properties, &self.key("tolerations"), "tolerations")?;
        Ok(merge_by_identity(
            &bound.tolerations,
            &self.defaults.tolerations,
            |t| t.key.as_deref(),
        ))
    }

    /// Volumes are specified in the structured micro-format, e.g.
    /// `[{name: data, persistentVolumeClaim: {claimName: claim}}]`.
    /// Request-level volumes win over global ones by name.
    pub fn volumes(&self, properties: &HashMap<String, String>) -> Result<Vec<Volume>> {
        let bound = bind_properties(properties, &self.key("volumes"), "volumes")?;
        Ok(merge_by_identity(
            &bound.volumes,
            &self.defaults.volumes,
            |v| Some(v.name.as_str()),
        ))
    }

    /// Request-level volume mounts win over global ones by name.
    pub fn volume_mounts(&self, properties: &HashMap<String, String>) -> Result<Vec<VolumeMount>> {
        let bound = bind_properties(properties, &self.key("volumeMounts"), "volumeMounts")?;
        Ok(merge_by_identity(
            &bound.volume_mounts,
            &self.defaults.volume_mounts,
            |m| Some(m.name.as_str()),
        ))
    }

    /// Limits always carry both keys; the literal tier guarantees a value.
    pub fn deduce_resource_limits(
        &self,
        properties: &HashMap<String, String>,
    ) -> BTreeMap<String, Quantity> {
        let memory = property_value(properties, &self.key("limits.memory"))
            .filter(|v| !v.is_empty())
            .or_else(|| self.defaults.limits.memory.clone())
            .unwrap_or_else(|| DEFAULT_MEMORY_LIMIT.to_string());

        let cpu = property_value(properties, &self.key("limits.cpu"))
            .filter(|v| !v.is_empty())
            .or_else(|| self.defaults.limits.cpu.clone())
            .unwrap_or_else(|| DEFAULT_CPU_LIMIT.to_string());

        debug!(%cpu, %memory, "using resource limits");

        let mut limits = BTreeMap::new();
        limits.insert("memory".to_string(), Quantity(memory));
        limits.insert("cpu".to_string(), Quantity(cpu));
        limits
    }

    /// Requests omit a key entirely when no tier supplies a value.
    pub fn deduce_resource_requests(
        &self,
        properties: &HashMap<String, String>,
    ) -> BTreeMap<String, Quantity> {
        let memory = property_value(properties, &self.key("requests.memory"))
            .or_else(|| self.defaults.requests.memory.clone());
        let cpu = property_value(properties, &self.key("requests.cpu"))
            .or_else(|| self.defaults.requests.cpu.clone());

        debug!(?cpu, ?memory, "using resource requests");

        let mut requests = BTreeMap::new();
        if let Some(memory) = memory {
            requests.insert("memory".to_string(), Quantity(memory));
        }
        if let Some(cpu) = cpu {
            requests.insert("cpu".to_string(), Quantity(cpu));
        }
        requests
    }

    /// An unparseable override falls back to `IfNotPresent` with a warning;
    /// a misspelled pull policy must never fail the deployment.
    pub fn deduce_image_pull_policy(&self, properties: &HashMap<String, String>) -> ImagePullPolicy {
        let policy = match property_value(properties, &self.key("imagePullPolicy")) {
            None => self.defaults.image_pull_policy,
            Some(override_value) => {
                ImagePullPolicy::relaxed_parse(&override_value).unwrap_or_else(|| {
                    warn!(
                        value = %override_value,
                        "failed to parse image pull policy, using default \"IfNotPresent\""
                    );
                    ImagePullPolicy::IfNotPresent
                })
            }
        };
        debug!(policy = policy.as_str(), "using image pull policy");
        policy
    }

    pub fn image_pull_secret(&self, properties: &HashMap<String, String>) -> Option<String> {
        property_value(properties, &self.key("imagePullSecret"))
            .filter(|v| !v.is_empty())
            .or_else(|| self.defaults.image_pull_secret.clone())
    }

    pub fn host_network(&self, properties: &HashMap<String, String>) -> bool {
        let host_network = match property_value(properties, &self.key("hostNetwork")) {
            Some(override_value) if !override_value.is_empty() => {
                override_value.eq_ignore_ascii_case("true")
            }
            _ => self.defaults.host_network,
        };
        debug!(host_network, "using host network");
        host_network
    }

    /// Node selector: `key:value,key2:value2`. The request-level selector
    /// always wins over the global one when both are present.
    pub fn node_selectors(
        &self,
        properties: &HashMap<String, String>,
    ) -> Result<BTreeMap<String, String>> {
        let request_selector = properties
            .get(DEPLOYMENT_NODE_SELECTOR_KEY)
            .cloned()
            .unwrap_or_default();

        let selector = if !request_selector.trim().is_empty() {
            Some(request_selector)
        } else {
            self.defaults.node_selector.clone()
        };

        let mut node_selectors = BTreeMap::new();
        if let Some(selector) = selector.filter(|s| !s.trim().is_empty()) {
            for pair in selector.split(',') {
                let parts: Vec<&str> = pair.split(':').collect();
                if parts.len() != 2 {
                    return Err(DeployError::invalid_format(format!(
                        "invalid nodeSelector value: '{}'",
                        pair
                    )));
                }
                node_selectors.insert(parts[0].trim().to_string(), parts[1].trim().to_string());
            }
        }
        Ok(node_selectors)
    }

    pub fn deployment_service_account_name(
        &self,
        properties: &HashMap<String, String>,
    ) -> Option<String> {
        property_value(properties, &self.key("deploymentServiceAccountName"))
            .filter(|v| !v.is_empty())
            .or_else(|| self.defaults.deployment_service_account_name.clone())
    }

    /// Pod security context: structured binding first, then the individual
    /// dotted override pair, then global defaults.
    pub fn pod_security_context(
        &self,
        properties: &HashMap<String, String>,
    ) -> Result<Option<PodSecurityContext>> {
        let bound = bind_properties(
            properties,
            &self.key("podSecurityContext"),
            "podSecurityContext",
        )?;
        if let Some(spec) = bound.pod_security_context {
            return Ok(Some(build_pod_security_context(&spec)));
        }

        let run_as_user = property_value(properties, &self.key("podSecurityContext.runAsUser"))
            .filter(|v| !v.is_empty());
        let fs_group = property_value(properties, &self.key("podSecurityContext.fsGroup"))
            .filter(|v| !v.is_empty());
        if let (Some(user), Some(group)) = (run_as_user, fs_group) {
            let run_as_user: i64 = user.parse().map_err(|_| {
                DeployError::invalid_format(format!("invalid runAsUser value: '{}'", user))
            })?;
            let fs_group: i64 = group.parse().map_err(|_| {
                DeployError::invalid_format(format!("invalid fsGroup value: '{}'", group))
            })?;
            return Ok(Some(PodSecurityContext {
                run_as_user: Some(run_as_user),
                fs_group: Some(fs_group),
                ..Default::default()
            }));
        }

        Ok(self
            .defaults
            .pod_security_context
            .as_ref()
            .map(build_pod_security_context))
    }

    /// Node, pod and anti-affinity sub-rules resolve independently; the
    /// composed object is only attached when at least one resolved.
    pub fn affinity(&self, properties: &HashMap<String, String>) -> Result<Option<Affinity>> {
        let node_key = self.key("affinity.nodeAffinity");
        let pod_key = self.key("affinity.podAffinity");
        let anti_key = self.key("affinity.podAntiAffinity");

        let node_affinity = if has_value(properties, &node_key) {
            bind_properties(properties, &node_key, "nodeAffinity")?.node_affinity
        } else {
            self.defaults.node_affinity.clone()
        };

        let pod_affinity = if has_value(properties, &pod_key) {
            bind_properties(properties, &pod_key, "podAffinity")?.pod_affinity
        } else {
            self.defaults.pod_affinity.clone()
        };

        let pod_anti_affinity = if has_value(properties, &anti_key) {
            bind_properties(properties, &anti_key, "podAntiAffinity")?.pod_anti_affinity
        } else {
            self.defaults.pod_anti_affinity.clone()
        };

        if node_affinity.is_none() && pod_affinity.is_none() && pod_anti_affinity.is_none() {
            return Ok(None);
        }

        Ok(Some(Affinity {
            node_affinity,
            pod_affinity,
            pod_anti_affinity,
        }))
    }

    /// Init container: structured binding, then the dotted name/image/
    /// commands triple, then global defaults.
    pub fn init_container(&self, properties: &HashMap<String, String>) -> Result<Option<Container>> {
        let bound = bind_properties(properties, &self.key("initContainer"), "initContainer")?;
        if let Some(spec) = bound.init_container {
            return Ok(Some(build_init_container(&spec)));
        }

        let container_name = property_value(properties, &self.key("initContainer.containerName"))
            .filter(|v| !v.is_empty());
        let image_name = property_value(properties, &self.key("initContainer.imageName"))
            .filter(|v| !v.is_empty());
        if let (Some(name), Some(image)) = (container_name, image_name) {
            let commands = property_value_or(properties, &self.key("initContainer.commands"), "");
            return Ok(Some(Container {
                name,
                image: Some(image),
                command: Some(CommandLineTokenizer::new(&commands).args())
                    .filter(|c| !c.is_empty()),
                ..Default::default()
            }));
        }

        Ok(self.defaults.init_container.as_ref().map(build_init_container))
    }

    pub fn pod_annotations(
        &self,
        properties: &HashMap<String, String>,
    ) -> Result<BTreeMap<String, String>> {
        self.annotations(properties, "podAnnotations", &self.defaults.pod_annotations)
    }

    pub fn service_annotations(
        &self,
        properties: &HashMap<String, String>,
    ) -> Result<BTreeMap<String, String>> {
        self.annotations(
            properties,
            "serviceAnnotations",
            &self.defaults.service_annotations,
        )
    }

    pub fn job_annotations(
        &self,
        properties: &HashMap<String, String>,
    ) -> Result<BTreeMap<String, String>> {
        self.annotations(properties, "jobAnnotations", &self.defaults.job_annotations)
    }

    fn annotations(
        &self,
        properties: &HashMap<String, String>,
        setting: &str,
        default: &Option<String>,
    ) -> Result<BTreeMap<String, String>> {
        let mut raw = property_value_or(properties, &self.key(setting), "");
        if raw.is_empty() {
            raw = default.clone().unwrap_or_default();
        }

        let mut annotations = BTreeMap::new();
        if !raw.trim().is_empty() {
            for pair in raw.split(',') {
                // annotation values may themselves contain colons (URLs),
                // so only the first colon separates key from value
                let (key, value) = pair.split_once(':').ok_or_else(|| {
                    DeployError::invalid_format(format!(
                        "invalid annotation format, expected 'key:value', got: '{}'",
                        pair
                    ))
                })?;
                if key.trim().is_empty() {
                    return Err(DeployError::invalid_format(format!(
                        "invalid annotation format, expected 'key:value', got: '{}'",
                        pair
                    )));
                }
                annotations.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Ok(annotations)
    }

    /// Additional labels for the deployment object: `key:value,...`, each
    /// pair carrying exactly one colon.
    pub fn deployment_labels(
        &self,
        properties: &HashMap<String, String>,
    ) -> Result<BTreeMap<String, String>> {
        let mut raw = property_value_or(properties, &self.key("deploymentLabels"), "");
        if raw.is_empty() {
            raw = self.defaults.deployment_labels.clone().unwrap_or_default();
        }

        let mut labels = BTreeMap::new();
        if !raw.trim().is_empty() {
            for pair in raw.split(',') {
                let parts: Vec<&str> = pair.split(':').collect();
                if parts.len() != 2 || parts[0].trim().is_empty() {
                    return Err(DeployError::invalid_format(format!(
                        "invalid label format, expected 'labelKey:labelValue', got: '{}'",
                        pair
                    )));
                }
                labels.insert(parts[0].trim().to_string(), parts[1].trim().to_string());
            }
        }
        Ok(labels)
    }

    pub fn restart_policy(&self, properties: &HashMap<String, String>) -> RestartPolicy {
        let raw = property_value_or(properties, &self.key("restartPolicy"), "");
        if !raw.is_empty() {
            if let Some(policy) = RestartPolicy::relaxed_parse(&raw) {
                return policy;
            }
            warn!(value = %raw, "failed to parse restart policy, falling back");
        }
        self.defaults.restart_policy.unwrap_or_default()
    }

    pub fn task_service_account_name(&self, properties: &HashMap<String, String>) -> String {
        let raw = property_value_or(properties, &self.key("taskServiceAccountName"), "");
        if !raw.is_empty() {
            return raw;
        }
        self.defaults
            .task_service_account_name
            .clone()
            .unwrap_or_else(|| DEFAULT_TASK_SERVICE_ACCOUNT_NAME.to_string())
    }

    pub fn stateful_set_storage_class_name(
        &self,
        properties: &HashMap<String, String>,
    ) -> Option<String> {
        property_value(
            properties,
            &self.key("statefulSet.volumeClaimTemplate.storageClassName"),
        )
        .or_else(|| {
            self.defaults
                .stateful_set
                .as_ref()
                .and_then(|s| s.volume_claim_template.as_ref())
                .and_then(|t| t.storage_class_name.clone())
        })
    }

    /// Volume claim storage, normalised to whole mebibytes.
    pub fn stateful_set_storage(&self, properties: &HashMap<String, String>) -> Result<String> {
        let storage = property_value(
            properties,
            &self.key("statefulSet.volumeClaimTemplate.storage"),
        )
        .or_else(|| {
            self.defaults
                .stateful_set
                .as_ref()
                .and_then(|s| s.volume_claim_template.as_ref())
                .and_then(|t| t.storage.clone())
        })
        .unwrap_or_else(|| "1Gi".to_string());

        Ok(format!("{}Mi", parse_to_mebibytes(&storage)?))
    }

    pub fn stateful_set_init_container_image_name(
        &self,
        properties: &HashMap<String, String>,
    ) -> String {
        property_value(
            properties,
            &self.key("statefulSetInitContainerImageName"),
        )
        .filter(|v| !v.is_empty())
        .or_else(|| self.defaults.stateful_set_init_container_image_name.clone())
        .unwrap_or_else(|| STATEFUL_SET_INIT_IMAGE.to_string())
    }

    /// The container command override, tokenized into argv.
    pub fn container_command(&self, properties: &HashMap<String, String>) -> Vec<String> {
        let command = property_value_or(properties, &self.key("containerCommand"), "");
        CommandLineTokenizer::new(&command).args()
    }

    pub fn container_ports(&self, properties: &HashMap<String, String>) -> Result<Vec<i32>> {
        let mut ports = Vec::new();
        if let Some(container_ports) = property_value(properties, &self.key("containerPorts")) {
            for port in container_ports.split(',') {
                let port = port.trim();
                let parsed: i32 = port.parse().map_err(|_| {
                    DeployError::invalid_format(format!("invalid container port: '{}'", port))
                })?;
                debug!(port = parsed, "adding container port from request");
                ports.push(parsed);
            }
        }
        Ok(ports)
    }

    /// App-level environment variables in the nested comma grammar:
    /// `KEY1=val1,KEY2='a,b,c',KEY3=val3`.
    pub fn app_environment_variables(
        &self,
        properties: &HashMap<String, String>,
    ) -> Result<BTreeMap<String, String>> {
        let mut env_vars = BTreeMap::new();
        if let Some(raw) = property_value(properties, &self.key("environmentVariables")) {
            for assignment in parse_nested_comma_list(&raw) {
                let (key, value) = assignment.split_once('=').ok_or_else(|| {
                    DeployError::invalid_format(format!(
                        "invalid environment variable declared: {}",
                        assignment
                    ))
                })?;
                env_vars.insert(key.to_string(), value.to_string());
            }
        }
        Ok(env_vars)
    }

    /// An unparseable override falls through to the global default with a
    /// warning, mirroring the pull-policy behaviour.
    pub fn entry_point_style(&self, properties: &HashMap<String, String>) -> EntryPointStyle {
        if let Some(raw) = property_value(properties, &self.key("entryPointStyle")) {
            if let Some(style) = EntryPointStyle::relaxed_parse(&raw) {
                return style;
            }
            warn!(value = %raw, "failed to parse entry point style, falling back");
        }
        self.defaults.entry_point_style
    }

    /// Environment variables backed by secret keys; request-level refs win
    /// over global ones by env var name.
    pub fn secret_key_refs(&self, properties: &HashMap<String, String>) -> Result<Vec<EnvVar>> {
        let bound = bind_properties(properties, &self.key("secretKeyRefs"), "secretKeyRefs")?;
        let refs = merge_by_identity(
            &bound.secret_key_refs,
            &self.defaults.secret_key_refs,
            |r| Some(r.env_var_name.as_str()),
        );
        Ok(refs.iter().map(build_secret_key_ref_env_var).collect())
    }

    /// Environment variables backed by config map keys; request-level refs
    /// win over global ones by env var name.
    pub fn config_map_key_refs(&self, properties: &HashMap<String, String>) -> Result<Vec<EnvVar>> {
        let bound = bind_properties(
            properties,
            &self.key("configMapKeyRefs"),
            "configMapKeyRefs",
        )?;
        let refs = merge_by_identity(
            &bound.config_map_key_refs,
            &self.defaults.config_map_key_refs,
            |r| Some(r.env_var_name.as_str()),
        );
        Ok(refs.iter().map(build_config_map_key_ref_env_var).collect())
    }
}

fn has_value(properties: &HashMap<String, String>, key: &str) -> bool {
    properties
        .get(key)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

fn build_pod_security_context(spec: &PodSecurityContextSpec) -> PodSecurityContext {
    PodSecurityContext {
        run_as_user: spec.run_as_user,
        fs_group: spec.fs_group,
        ..Default::default()
    }
}

fn build_init_container(spec: &InitContainerSpec) -> Container {
    Container {
        name: spec.container_name.clone(),
        image: Some(spec.image_name.clone()),
        command: if spec.commands.is_empty() {
            None
        } else {
            Some(spec.commands.clone())
        },
        ..Default::default()
    }
}

fn build_secret_key_ref_env_var(secret_key_ref: &SecretKeyRef) -> EnvVar {
    EnvVar {
        name: secret_key_ref.env_var_name.clone(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret_key_ref.secret_name.clone(),
                key: secret_key_ref.data_key.clone(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn build_config_map_key_ref_env_var(config_map_key_ref: &ConfigMapKeyRef) -> EnvVar {
    EnvVar {
        name: config_map_key_ref.env_var_name.clone(),
        value_from: Some(EnvVarSource {
            config_map_key_ref: Some(ConfigMapKeySelector {
                name: config_map_key_ref.config_map_name.clone(),
                key: config_map_key_ref.data_key.clone(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Splits a comma-joined assignment list where single-quoted values may
/// contain literal commas. Quoted assignments are extracted by an explicit
/// scan first; the remainder splits on commas.
pub(crate) fn parse_nested_comma_list(value: &str) -> Vec<String> {
    let chars: Vec<char> = value.chars().collect();
    let mut plain = String::new();
    let mut quoted = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if let Some((assignment, next)) = match_quoted_assignment(&chars, i) {
            quoted.push(assignment);
            i = next;
            // swallow the comma separating this assignment from the next
            if i < chars.len() && chars[i] == ',' {
                i += 1;
            }
        } else {
            plain.push(chars[i]);
            i += 1;
        }
    }

    let mut vars: Vec<String> = plain
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    vars.extend(quoted);
    vars
}

/// Matches `KEY='value'` at `start`, returning the unquoted assignment and
/// the index just past the closing quote.
fn match_quoted_assignment(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start;
    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
        i += 1;
    }
    if i == start || i + 1 >= chars.len() || chars[i] != '=' || chars[i + 1] != '\'' {
        return None;
    }
    let key: String = chars[start..i].iter().collect();
    let value_start = i + 2;
    let mut end = value_start;
    while end < chars.len() && chars[end] != '\'' {
        end += 1;
    }
    if end >= chars.len() {
        // unterminated quote, let the plain splitter deal with it
        return None;
    }
    let value: String = chars[value_start..end].iter().collect();
    Some((format!("{}={}", key, value), end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_assignments_split_on_commas() {
        let vars = parse_nested_comma_list("A=1,B=2");
        assert_eq!(vars, vec!["A=1", "B=2"]);
    }

    #[test]
    fn quoted_values_keep_their_commas() {
        let mut vars = parse_nested_comma_list("A=1,B='x,y,z',C=3");
        vars.sort();
        assert_eq!(vars, vec!["A=1", "B=x,y,z", "C=3"]);
    }

    #[test]
    fn quoted_assignment_position_does_not_matter() {
        let mut first = parse_nested_comma_list("B='x,y',A=1");
        first.sort();
        assert_eq!(first, vec!["A=1", "B=x,y"]);

        let mut last = parse_nested_comma_list("A=1,B='x,y'");
        last.sort();
        assert_eq!(last, vec!["A=1", "B=x,y"]);

        let mut only = parse_nested_comma_list("B='x,y'");
        only.sort();
        assert_eq!(only, vec!["B=x,y"]);
    }

    #[test]
    fn unterminated_quote_falls_back_to_plain_split() {
        let vars = parse_nested_comma_list("A='oops");
        assert_eq!(vars, vec!["A='oops"]);
    }
}
