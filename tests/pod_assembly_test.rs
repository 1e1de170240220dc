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

use launchpad_kube::{
    AppDefinition, ContainerConfiguration, ContainerFactory, DeployError, DeployerDefaults,
    DeploymentRequest, PodSpecAssembler,
};
use k8s_openapi::api::core::v1::{Container, EnvVar};
use std::collections::{BTreeMap, HashMap};

mod test_utils {
    use super::*;

    pub fn definition(properties: &[(&str, &str)]) -> AppDefinition {
        let properties: BTreeMap<String, String> = properties
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppDefinition::new("my-app", properties)
    }

    pub fn request_props(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn deployment_request(
        definition: AppDefinition,
        props: HashMap<String, String>,
    ) -> DeploymentRequest {
        DeploymentRequest::deployment(definition, "registry.example.com/my-app:1.2", props, vec![])
    }

    pub fn build_container(defaults: &DeployerDefaults, request: &DeploymentRequest) -> Container {
        ContainerFactory::new(defaults)
            .create(&ContainerConfiguration::new("my-app", request))
            .unwrap()
    }

    pub fn env_var<'a>(container: &'a Container, name: &str) -> Option<&'a EnvVar> {
        container
            .env
            .as_ref()
            .and_then(|env| env.iter().find(|e| e.name == name))
    }
}

use test_utils::{build_container, definition, deployment_request, env_var, request_props};

// ============================================================================
// Entry point styles
// ============================================================================

#[test]
fn exec_style_encodes_properties_as_command_args() {
    let defaults = DeployerDefaults::default();
    let request = DeploymentRequest::deployment(
        definition(&[("a", "1"), ("b", "2")]),
        "my-image:latest",
        request_props(&[]),
        vec!["--extra=arg".to_string()],
    );
    let container = build_container(&defaults, &request);

    let args = container.args.clone().unwrap();
    assert_eq!(args, vec!["--a=1", "--b=2", "--extra=arg"]);
    assert!(env_var(&container, "A").is_none());
}

#[test]
fn boot_style_aggregates_properties_into_one_json_env_var() {
    let defaults = DeployerDefaults::default();
    let props = request_props(&[("launchpad.deployer.kubernetes.entryPointStyle", "boot")]);
    let request = DeploymentRequest::deployment(
        definition(&[("a", "1"), ("b", "2")]),
        "my-image:latest",
        props,
        vec!["run".to_string()],
    );
    let container = build_container(&defaults, &request);

    // exactly one aggregated variable whose value round-trips
    let json = env_var(&container, "LAUNCHPAD_APPLICATION_JSON")
        .and_then(|e| e.value.clone())
        .expect("aggregated env var missing");
    let parsed: BTreeMap<String, String> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["a"], "1");
    assert_eq!(parsed["b"], "2");
    assert_eq!(parsed.len(), 2);

    // user args pass through untouched, properties are not args
    assert_eq!(container.args.clone().unwrap(), vec!["run"]);
}

#[test]
fn boot_style_conflicts_with_explicit_json_env_var() {
    let defaults = DeployerDefaults::default();
    let props = request_props(&[
        ("launchpad.deployer.kubernetes.entryPointStyle", "boot"),
        (
            "launchpad.deployer.kubernetes.environmentVariables",
            "LAUNCHPAD_APPLICATION_JSON={}",
        ),
    ]);
    let request = deployment_request(definition(&[("a", "1")]), props);

    let err = ContainerFactory::new(&defaults)
        .create(&ContainerConfiguration::new("my-app", &request))
        .unwrap_err();
    assert!(matches!(err, DeployError::ConflictingConfiguration(_)));
}

#[test]
fn shell_style_uppercases_properties_into_env_vars() {
    let defaults = DeployerDefaults::default();
    let props = request_props(&[("launchpad.deployer.kubernetes.entryPointStyle", "shell")]);
    let request = deployment_request(definition(&[("server.port", "8080")]), props);
    let container = build_container(&defaults, &request);

    assert_eq!(
        env_var(&container, "SERVER_PORT").and_then(|e| e.value.as_deref()),
        Some("8080")
    );
    assert!(container.args.is_none());
}

// ============================================================================
// Generated environment variables
// ============================================================================

#[test]
fn pod_guid_env_var_is_always_present_and_platform_derived() {
    let defaults = DeployerDefaults::default();
    let request = deployment_request(definition(&[]), request_props(&[]));
    let container = build_container(&defaults, &request);

    let guid = env_var(&container, "LAUNCHPAD_APPLICATION_GUID").unwrap();
    assert!(guid.value.is_none());
    let field_path = guid
        .value_from
        .as_ref()
        .and_then(|s| s.field_ref.as_ref())
        .map(|f| f.field_path.as_str());
    assert_eq!(field_path, Some("metadata.uid"));
}

#[test]
fn group_env_var_present_only_for_grouped_requests() {
    let defaults = DeployerDefaults::default();

    let request = deployment_request(definition(&[]), request_props(&[]));
    let container = build_container(&defaults, &request);
    assert!(env_var(&container, "LAUNCHPAD_APPLICATION_GROUP").is_none());

    let props = request_props(&[("launchpad.group-name", "my-stream")]);
    let request = deployment_request(definition(&[]), props);
    let container = build_container(&defaults, &request);
    assert_eq!(
        env_var(&container, "LAUNCHPAD_APPLICATION_GROUP").and_then(|e| e.value.as_deref()),
        Some("my-stream")
    );
}

#[test]
fn global_env_vars_are_seeded_and_overridable_per_app() {
    let defaults: DeployerDefaults =
        serde_yaml::from_str("environmentVariables: ['JAVA_OPTS=-Xmx128m', 'MODE=global']")
            .unwrap();
    let props = request_props(&[(
        "launchpad.deployer.kubernetes.environmentVariables",
        "MODE=app",
    )]);
    let request = deployment_request(definition(&[]), props);
    let container = build_container(&defaults, &request);

    assert_eq!(
        env_var(&container, "JAVA_OPTS").and_then(|e| e.value.as_deref()),
        Some("-Xmx128m")
    );
    assert_eq!(
        env_var(&container, "MODE").and_then(|e| e.value.as_deref()),
        Some("app")
    );
}

// ============================================================================
// Ports and probes
// ============================================================================

#[test]
fn ports_are_the_union_of_external_configured_and_probe_ports() {
    let defaults = DeployerDefaults::default();
    let props = request_props(&[
        ("launchpad.deployer.kubernetes.containerPorts", "9001, 9002"),
        ("launchpad.deployer.kubernetes.livenessProbePort", "9090"),
    ]);
    let request = deployment_request(definition(&[]), props);
    let container = ContainerFactory::new(&defaults)
        .create(
            &ContainerConfiguration::new("my-app", &request).with_external_port(Some(8080)),
        )
        .unwrap();

    let mut ports: Vec<i32> = container
        .ports
        .clone()
        .unwrap()
        .iter()
        .map(|p| p.container_port)
        .collect();
    ports.sort();
    assert_eq!(ports, vec![8080, 9001, 9002, 9090]);

    assert!(container.liveness_probe.is_some());
    assert!(container.readiness_probe.is_some());
    // none of the ports are published on the host without host networking
    assert!(container
        .ports
        .unwrap()
        .iter()
        .all(|p| p.host_port.is_none()));
}

#[test]
fn host_networking_publishes_each_port_on_the_host() {
    let defaults = DeployerDefaults::default();
    let request = deployment_request(definition(&[]), request_props(&[]));
    let container = ContainerFactory::new(&defaults)
        .create(
            &ContainerConfiguration::new("my-app", &request)
                .with_external_port(Some(8080))
                .with_host_network(true),
        )
        .unwrap();

    let ports = container.ports.unwrap();
    assert!(!ports.is_empty());
    for port in ports {
        assert_eq!(port.host_port, Some(port.container_port));
    }
}

#[test]
fn container_command_override_replaces_entrypoint() {
    let defaults = DeployerDefaults::default();
    let props = request_props(&[(
        "launchpad.deployer.kubernetes.containerCommand",
        "sh -c 'echo hello'",
    )]);
    let request = deployment_request(definition(&[]), props);
    let container = build_container(&defaults, &request);

    assert_eq!(
        container.command.unwrap(),
        vec!["sh", "-c", "echo hello"]
    );
}

// ============================================================================
// Pod spec assembly
// ============================================================================

#[test]
fn unreferenced_volumes_are_dropped_from_the_pod() {
    let defaults = DeployerDefaults::default();
    let props = request_props(&[
        (
            "launchpad.deployer.kubernetes.volumes",
            "[{name: v1, emptyDir: {}}, {name: v2, emptyDir: {}}]",
        ),
        (
            "launchpad.deployer.kubernetes.volumeMounts",
            "[{name: v1, mountPath: /data}]",
        ),
    ]);
    let request = deployment_request(definition(&[]), props);

    let pod_spec = PodSpecAssembler::new(&defaults)
        .assemble("my-app", &request, None, false, None)
        .unwrap();

    let volumes = pod_spec.volumes.unwrap();
    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0].name, "v1");

    let mounts = pod_spec.containers[0].volume_mounts.clone().unwrap();
    assert_eq!(mounts[0].mount_path, "/data");
}

#[test]
fn optional_elements_are_omitted_when_empty() {
    let defaults = DeployerDefaults::default();
    let request = deployment_request(definition(&[]), request_props(&[]));

    let pod_spec = PodSpecAssembler::new(&defaults)
        .assemble("my-app", &request, None, false, None)
        .unwrap();

    assert!(pod_spec.volumes.is_none());
    assert!(pod_spec.tolerations.is_none());
    assert!(pod_spec.node_selector.is_none());
    assert!(pod_spec.affinity.is_none());
    assert!(pod_spec.security_context.is_none());
    assert!(pod_spec.init_containers.is_none());
    assert!(pod_spec.host_network.is_none());
    assert!(pod_spec.restart_policy.is_none());
    assert!(pod_spec.image_pull_secrets.is_none());
}

#[test]
fn resolved_elements_are_attached_to_the_pod_spec() {
    let defaults = DeployerDefaults::default();
    let props = request_props(&[
        ("launchpad.deployer.kubernetes.imagePullSecret", "regcred"),
        (
            "launchpad.deployer.kubernetes.podSecurityContext",
            "{runAsUser: 1000, fsGroup: 2000}",
        ),
        (
            "launchpad.deployer.kubernetes.initContainer",
            "{containerName: init-db, imageName: busybox:1.36, commands: ['sh', '-c', 'true']}",
        ),
        (
            "launchpad.deployer.kubernetes.affinity.podAntiAffinity",
            "{requiredDuringSchedulingIgnoredDuringExecution: \
             [{topologyKey: 'kubernetes.io/hostname'}]}",
        ),
    ]);
    let request = deployment_request(definition(&[]), props);

    let pod_spec = PodSpecAssembler::new(&defaults)
        .assemble("my-app", &request, None, false, None)
        .unwrap();

    assert_eq!(
        pod_spec.image_pull_secrets.unwrap()[0].name,
        "regcred"
    );

    let security_context = pod_spec.security_context.unwrap();
    assert_eq!(security_context.run_as_user, Some(1000));
    assert_eq!(security_context.fs_group, Some(2000));

    let init_containers = pod_spec.init_containers.unwrap();
    assert_eq!(init_containers[0].name, "init-db");
    assert_eq!(init_containers[0].image.as_deref(), Some("busybox:1.36"));

    let affinity = pod_spec.affinity.unwrap();
    assert!(affinity.pod_anti_affinity.is_some());
    assert!(affinity.node_affinity.is_none());

    // resources always carry limits
    let resources = pod_spec.containers[0].resources.clone().unwrap();
    assert!(resources.limits.unwrap().contains_key("cpu"));
    assert_eq!(
        pod_spec.containers[0].image_pull_policy.as_deref(),
        Some("IfNotPresent")
    );
}

#[test]
fn run_to_completion_forces_never_restart() {
    let defaults = DeployerDefaults::default();
    let request = deployment_request(definition(&[]), request_props(&[]));
    let pod_spec = PodSpecAssembler::new(&defaults)
        .assemble("my-app", &request, None, true, None)
        .unwrap();
    assert_eq!(pod_spec.restart_policy.as_deref(), Some("Never"));
}

#[test]
fn scheduling_requests_resolve_restart_policy_and_task_account() {
    let defaults = DeployerDefaults::default();
    let props = request_props(&[(
        "launchpad.scheduler.kubernetes.restartPolicy",
        "OnFailure",
    )]);
    let request = DeploymentRequest::scheduling(
        definition(&[]),
        "my-image:latest",
        props,
        vec![],
    );

    let pod_spec = PodSpecAssembler::new(&defaults)
        .assemble("my-task", &request, None, false, None)
        .unwrap();

    assert_eq!(pod_spec.restart_policy.as_deref(), Some("OnFailure"));
    assert_eq!(pod_spec.service_account_name.as_deref(), Some("default"));
}

#[test]
fn id_labels_identify_app_and_group() {
    let defaults = DeployerDefaults::default();
    let assembler = PodSpecAssembler::new(&defaults);

    let request = deployment_request(definition(&[]), request_props(&[]));
    let labels = assembler.id_labels("my-app", &request);
    assert_eq!(labels["launchpad-app-id"], "my-app");
    assert_eq!(labels["launchpad-deployment-id"], "my-app");
    assert_eq!(labels["role"], "launchpad-app");
    assert!(!labels.contains_key("launchpad-group-id"));

    let props = request_props(&[("launchpad.group-name", "stream-1")]);
    let request = deployment_request(definition(&[]), props);
    let labels = assembler.id_labels("my-app", &request);
    assert_eq!(labels["launchpad-group-id"], "stream-1");
}
