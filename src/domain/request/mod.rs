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

//! Deployment and scheduling request types

use crate::infrastructure::constants::{
    DEPLOYER_PROPERTY_PREFIX, GROUP_PROPERTY_KEY, SCHEDULER_PROPERTY_PREFIX,
};
use std::collections::{BTreeMap, HashMap};

/// The application to launch: a name plus its definition-level properties
/// (the settings passed through to the application itself, as opposed to the
/// request properties steering the deployment).
#[derive(Debug, Clone, Default)]
pub struct AppDefinition {
    pub name: String,
    pub properties: BTreeMap<String, String>,
}

impl AppDefinition {
    pub fn new(name: impl Into<String>, properties: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }
}

/// Whether a request deploys a long-running app or schedules a
/// run-to-completion task. Selects the property namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Deployment,
    Scheduling,
}

#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub definition: AppDefinition,
    /// Container image reference.
    pub image: String,
    pub kind: RequestKind,
    /// Flat per-request property bag; immutable for the resolution call.
    pub request_properties: HashMap<String, String>,
    pub command_line_args: Vec<String>,
}

impl DeploymentRequest {
    pub fn deployment(
        definition: AppDefinition,
        image: impl Into<String>,
        request_properties: HashMap<String, String>,
        command_line_args: Vec<String>,
    ) -> Self {
        Self {
            definition,
            image: image.into(),
            kind: RequestKind::Deployment,
            request_properties,
            command_line_args,
        }
    }

    pub fn scheduling(
        definition: AppDefinition,
        image: impl Into<String>,
        request_properties: HashMap<String, String>,
        command_line_args: Vec<String>,
    ) -> Self {
        Self {
            definition,
            image: image.into(),
            kind: RequestKind::Scheduling,
            request_properties,
            command_line_args,
        }
    }

    pub fn is_scheduling(&self) -> bool {
        self.kind == RequestKind::Scheduling
    }

    pub fn property_prefix(&self) -> &'static str {
        match self.kind {
            RequestKind::Deployment => DEPLOYER_PROPERTY_PREFIX,
            RequestKind::Scheduling => SCHEDULER_PROPERTY_PREFIX,
        }
    }

    /// Deployment group this request belongs to, if any.
    pub fn group_name(&self) -> Option<&str> {
        self.request_properties
            .get(GROUP_PROPERTY_KEY)
            .map(|s| s.as_str())
    }
}
