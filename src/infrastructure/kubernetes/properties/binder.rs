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

//! Structured-value binding.
//!
//! A deployment property whose value is a list or nested object is written
//! in inline YAML flow syntax, e.g.
//! `[{key: 'foo', operator: 'Equal', value: 'bar', effect: 'NoSchedule'}]`.
//! Binding wraps the raw value as `{ <label>: <value> }` and deserializes it
//! onto a fresh [`DeployerDefaults`], so scalar and structured settings share
//! one schema and one parser.

use crate::domain::config::DeployerDefaults;
use crate::shared::error::{DeployError, Result};
use std::collections::HashMap;

/// Binds the structured value stored under `property_key` (exact spelling,
/// no relaxation) into the field selected by `label`. Absent or empty values
/// bind to an all-defaults instance; malformed text is a
/// [`DeployError::ConfigurationBinding`] carrying the raw value.
pub fn bind_properties(
    properties: &HashMap<String, String>,
    property_key: &str,
    label: &str,
) -> Result<DeployerDefaults> {
    let raw = properties
        .get(property_key)
        .map(|s| s.as_str())
        .unwrap_or_default();

    if raw.trim().is_empty() {
        return Ok(DeployerDefaults::default());
    }

    let document = format!("{{ {}: {} }}", label, raw);
    serde_yaml::from_str(&document).map_err(|e| DeployError::binding(raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(key: &str, value: &str) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(key.to_string(), value.to_string());
        map
    }

    #[test]
    fn binds_toleration_list() {
        let props = bag(
            "launchpad.deployer.kubernetes.tolerations",
            "[{key: 'foo', operator: 'Equal', value: 'bar', effect: 'NoSchedule'}]",
        );
        let bound = bind_properties(
            &props,
            "launchpad.deployer.kubernetes.tolerations",
            "tolerations",
        )
        .unwrap();
        assert_eq!(bound.tolerations.len(), 1);
        assert_eq!(bound.tolerations[0].key.as_deref(), Some("foo"));
        assert_eq!(bound.tolerations[0].effect.as_deref(), Some("NoSchedule"));
    }

    #[test]
    fn binds_volume_list_with_nested_source() {
        let props = bag(
            "k",
            "[{name: config, configMap: {name: app-config}}, \
             {name: scratch, emptyDir: {}}]",
        );
        let bound = bind_properties(&props, "k", "volumes").unwrap();
        assert_eq!(bound.volumes.len(), 2);
        assert_eq!(bound.volumes[0].name, "config");
        assert!(bound.volumes[0].config_map.is_some());
        assert!(bound.volumes[1].empty_dir.is_some());
    }

    #[test]
    fn absent_or_empty_value_binds_to_defaults() {
        let props = HashMap::new();
        let bound = bind_properties(&props, "nope", "volumes").unwrap();
        assert!(bound.volumes.is_empty());

        let props = bag("k", "   ");
        let bound = bind_properties(&props, "k", "volumes").unwrap();
        assert!(bound.volumes.is_empty());
    }

    #[test]
    fn malformed_text_reports_offending_value() {
        let props = bag("k", "[{name: ");
        let err = bind_properties(&props, "k", "volumes").unwrap_err();
        match err {
            DeployError::ConfigurationBinding { value, .. } => {
                assert_eq!(value, "[{name: ");
            }
            other => panic!("expected ConfigurationBinding, got {other:?}"),
        }
    }
}
