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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, DeployError>;

#[derive(Error, Debug)]
pub enum DeployError {
    /// Malformed structured-value text supplied for a deployment property.
    /// Carries the offending raw value; surfaced synchronously, never retried.
    #[error("invalid binding property '{value}': {reason}")]
    ConfigurationBinding { value: String, reason: String },

    /// Malformed plain-text composite value (node selector pairs, env var
    /// assignments, label pairs).
    #[error("invalid property format: {0}")]
    InvalidPropertyFormat(String),

    /// Mutually exclusive settings supplied together.
    #[error("conflicting configuration: {0}")]
    ConflictingConfiguration(String),

    #[error("Kubernetes API error: {0}")]
    KubeApi(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("resource not found: {resource_type} '{name}' in namespace '{namespace}'")]
    NotFound {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<kube::Error> for DeployError {
    fn from(err: kube::Error) -> Self {
        DeployError::KubeApi(err.to_string())
    }
}

impl DeployError {
    pub fn binding(value: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ConfigurationBinding {
            value: value.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_format(context: impl Into<String>) -> Self {
        Self::InvalidPropertyFormat(context.into())
    }

    pub fn config_error(context: impl Into<String>) -> Self {
        Self::Config(context.into())
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}
