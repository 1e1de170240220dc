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

/// Property namespaces
pub const DEPLOYER_PROPERTY_PREFIX: &str = "launchpad.deployer.";
pub const SCHEDULER_PROPERTY_PREFIX: &str = "launchpad.scheduler.";

/// Deployment group membership, set by the caller on the request properties
pub const GROUP_PROPERTY_KEY: &str = "launchpad.group-name";

/// Node selector override key, always read from the deployment namespace
pub const DEPLOYMENT_NODE_SELECTOR_KEY: &str =
    "launchpad.deployer.kubernetes.deployment.nodeSelector";

/// Generated environment variables
pub const APPLICATION_GUID_ENV_VAR: &str = "LAUNCHPAD_APPLICATION_GUID";
pub const APPLICATION_GROUP_ENV_VAR: &str = "LAUNCHPAD_APPLICATION_GROUP";
pub const APPLICATION_JSON_ENV_VAR: &str = "LAUNCHPAD_APPLICATION_JSON";

/// Pod identity labels
pub const APP_ID_LABEL: &str = "launchpad-app-id";
pub const DEPLOYMENT_ID_LABEL: &str = "launchpad-deployment-id";
pub const GROUP_ID_LABEL: &str = "launchpad-group-id";
pub const MARKER_LABEL: &str = "role";
pub const MARKER_LABEL_VALUE: &str = "launchpad-app";

/// Hard-coded resolution defaults (the last fallback tier)
pub const DEFAULT_TASK_SERVICE_ACCOUNT_NAME: &str = "default";
pub const STATEFUL_SET_INIT_IMAGE: &str = "busybox";
pub const DEFAULT_CPU_LIMIT: &str = "500m";
pub const DEFAULT_MEMORY_LIMIT: &str = "1Gi";

/// Probe defaults
pub const LIVENESS_PROBE_PATH: &str = "/health";
pub const LIVENESS_PROBE_DELAY: i32 = 30;
pub const LIVENESS_PROBE_PERIOD: i32 = 10;
pub const READINESS_PROBE_PATH: &str = "/ready";
pub const READINESS_PROBE_DELAY: i32 = 10;
pub const READINESS_PROBE_PERIOD: i32 = 10;
pub const PROBE_TIMEOUT: i32 = 2;

/// Key inside a probe-credentials secret holding the Authorization value
pub const PROBE_CREDENTIALS_SECRET_KEY: &str = "credentials";

/// Restart policy literals as emitted on the pod spec
pub const RESTART_POLICY_NEVER: &str = "Never";
