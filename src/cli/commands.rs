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

// CLI command definitions

use crate::cli::display::{PodInfo, TableRenderer};
use crate::domain::config::DeployerDefaults;
use crate::domain::request::{AppDefinition, DeploymentRequest};
use crate::infrastructure::kubernetes::client::{AppDeployerClient, KubeAppDeployerClient};
use crate::infrastructure::kubernetes::properties::relaxed::property_value;
use crate::infrastructure::kubernetes::properties::resolver::DeploymentPropertiesResolver;
use crate::infrastructure::kubernetes::resources::pod::PodSpecAssembler;
use anyhow::{bail, Context};
use clap::Parser;
use colored::Colorize;
use k8s_openapi::api::core::v1::{Pod, Secret, Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

#[derive(Parser, Debug)]
#[command(
    name = "launchpad-kube",
    version,
    about = "Kubernetes deployer for application containers",
    long_about = "Resolves deployment properties over process-wide defaults and \
                  assembles application pods on Kubernetes"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Deploy a long-running app as a pod (and a service when a port is given)
    Deploy(DeployCommand),

    /// Launch a run-to-completion task pod
    Schedule(ScheduleCommand),

    /// Show pod status for an app
    Status(StatusCommand),

    /// Remove an app's pods and services
    Undeploy(UndeployCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct ConnectionArgs {
    /// Kubernetes namespace
    #[arg(long, short = 'n', default_value = "default")]
    pub namespace: String,

    /// Path to kubeconfig file; defaults to standard resolution
    /// (KUBECONFIG env or ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    #[arg(long)]
    pub context: Option<String>,
}

impl ConnectionArgs {
    async fn client(&self) -> anyhow::Result<KubeAppDeployerClient> {
        Ok(KubeAppDeployerClient::new_with_config(
            self.namespace.clone(),
            self.kubeconfig.clone(),
            self.context.clone(),
        )
        .await?)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct DeployCommand {
    /// App id; names the pod and its identity labels
    pub app_id: String,

    /// Container image reference
    #[arg(long, short = 'i')]
    pub image: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Deployer defaults file (.yaml or .toml)
    #[arg(long, value_name = "PATH")]
    pub defaults_file: Option<String>,

    /// External port; also creates a service targeting it
    #[arg(long, short = 'p')]
    pub port: Option<i32>,

    /// App definition properties (-P server.port=8080)
    #[arg(short = 'P', value_name = "KEY=VALUE")]
    pub app_properties: Vec<String>,

    /// Deployment properties (-D launchpad.deployer.kubernetes.imagePullPolicy=Always)
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Extra command line arguments passed to the container
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl DeployCommand {
    pub async fn execute(self) -> anyhow::Result<()> {
        let defaults = load_defaults(self.defaults_file.as_deref())?;
        let request = DeploymentRequest::deployment(
            AppDefinition::new(&self.app_id, parse_pairs(&self.app_properties)?),
            &self.image,
            parse_pairs(&self.properties)?,
            self.args.clone(),
        );

        let client = self.connection.client().await?;
        submit(&client, &defaults, &self.app_id, &request, self.port, false).await?;

        println!(
            "{} app '{}' deployed to namespace '{}'",
            "✓".green(),
            self.app_id,
            self.connection.namespace
        );
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ScheduleCommand {
    /// App id; names the task pod and its identity labels
    pub app_id: String,

    /// Container image reference
    #[arg(long, short = 'i')]
    pub image: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Deployer defaults file (.yaml or .toml)
    #[arg(long, value_name = "PATH")]
    pub defaults_file: Option<String>,

    /// App definition properties (-P batch.size=100)
    #[arg(short = 'P', value_name = "KEY=VALUE")]
    pub app_properties: Vec<String>,

    /// Scheduler properties (-D launchpad.scheduler.kubernetes.restartPolicy=OnFailure)
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Extra command line arguments passed to the container
    #[arg(last = true)]
    pub args: Vec<String>,
}

impl ScheduleCommand {
    pub async fn execute(self) -> anyhow::Result<()> {
        let defaults = load_defaults(self.defaults_file.as_deref())?;
        let request = DeploymentRequest::scheduling(
            AppDefinition::new(&self.app_id, parse_pairs(&self.app_properties)?),
            &self.image,
            parse_pairs(&self.properties)?,
            self.args.clone(),
        );

        let client = self.connection.client().await?;
        submit(&client, &defaults, &self.app_id, &request, None, false).await?;

        println!(
            "{} task '{}' scheduled in namespace '{}'",
            "✓".green(),
            self.app_id,
            self.connection.namespace
        );
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct StatusCommand {
    pub app_id: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl StatusCommand {
    pub async fn execute(self) -> anyhow::Result<()> {
        let client = self.connection.client().await?;
        let (pods, services) = futures::try_join!(
            client.pods_for_app(&self.app_id),
            client.services_for_app(&self.app_id)
        )?;

        let infos: Vec<PodInfo> = pods.iter().map(PodInfo::from_pod).collect();
        print!("{}", TableRenderer::new().render_pod_list(&self.app_id, &infos));

        if !services.is_empty() {
            let names: Vec<&str> = services
                .iter()
                .filter_map(|s| s.metadata.name.as_deref())
                .collect();
            println!("Services: {}", names.join(", "));
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct UndeployCommand {
    pub app_id: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

impl UndeployCommand {
    pub async fn execute(self) -> anyhow::Result<()> {
        let client = self.connection.client().await?;
        client.delete_pods_for_app(&self.app_id).await?;
        client.delete_services_for_app(&self.app_id).await?;
        println!("{} app '{}' removed", "✓".green(), self.app_id);
        Ok(())
    }
}

async fn submit(
    client: &KubeAppDeployerClient,
    defaults: &DeployerDefaults,
    app_id: &str,
    request: &DeploymentRequest,
    port: Option<i32>,
    never_restart: bool,
) -> anyhow::Result<()> {
    let resolver = DeploymentPropertiesResolver::new(request.property_prefix(), defaults);
    let assembler = PodSpecAssembler::new(defaults);

    let probe_secret = probe_credentials_secret(client, request).await?;
    let pod_spec = assembler.assemble(app_id, request, port, never_restart, probe_secret)?;

    let mut labels = assembler.id_labels(app_id, request);
    labels.extend(resolver.deployment_labels(&request.request_properties)?);
    let annotations = resolver.pod_annotations(&request.request_properties)?;

    let pod = Pod {
        metadata: ObjectMeta {
            name: Some(app_id.to_string()),
            namespace: Some(client.namespace().to_string()),
            labels: Some(labels),
            annotations: (!annotations.is_empty()).then_some(annotations),
            ..Default::default()
        },
        spec: Some(pod_spec),
        ..Default::default()
    };
    client.create_pod(&pod).await?;

    if let Some(port) = port {
        let service_annotations = resolver.service_annotations(&request.request_properties)?;
        let service = Service {
            metadata: ObjectMeta {
                name: Some(app_id.to_string()),
                namespace: Some(client.namespace().to_string()),
                labels: Some(assembler.id_labels(app_id, request)),
                annotations: (!service_annotations.is_empty()).then_some(service_annotations),
                ..Default::default()
            },
            spec: Some(ServiceSpec {
                selector: Some(assembler.id_labels(app_id, request)),
                ports: Some(vec![ServicePort {
                    port,
                    target_port: Some(IntOrString::Int(port)),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        };
        client.create_service(&service).await?;
    }

    Ok(())
}

/// Optional probe credentials, looked up when the request names a secret.
async fn probe_credentials_secret(
    client: &KubeAppDeployerClient,
    request: &DeploymentRequest,
) -> anyhow::Result<Option<Secret>> {
    let key = format!("{}kubernetes.probeCredentialsSecret", request.property_prefix());
    match property_value(&request.request_properties, &key) {
        Some(name) if !name.is_empty() => Ok(client.probe_credentials_secret(&name).await?),
        _ => Ok(None),
    }
}

fn load_defaults(path: Option<&str>) -> anyhow::Result<DeployerDefaults> {
    match path {
        Some(path) => {
            DeployerDefaults::from_file(path).context("failed to load deployer defaults")
        }
        None => Ok(DeployerDefaults::default()),
    }
}

fn parse_pairs<C>(pairs: &[String]) -> anyhow::Result<C>
where
    C: FromIterator<(String, String)>,
{
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => Ok((key.to_string(), value.to_string())),
            None => bail!("expected KEY=VALUE, got '{}'", pair),
        })
        .collect()
}
