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

//! Relaxed property-key resolution.
//!
//! Callers spell deployment property keys in several common conventions
//! (camelCase, kebab-case, snake_case, environment-variable form). Lookup
//! tries a deterministic sequence of spellings derived from the canonical
//! camelCase name and returns the first hit. When several spellings are
//! populated at once with different values, the first variant in the order
//! below wins; that ambiguity is deliberate and left to the caller to avoid.

use std::collections::HashMap;

/// All accepted spellings of a canonical dotted camelCase property name, in
/// resolution order: canonical, kebab-case, snake_case, flattened lowercase
/// and uppercase underscore form.
pub fn relaxed_names(canonical: &str) -> Vec<String> {
    let variants = [
        canonical.to_string(),
        map_segments(canonical, |seg| split_camel(seg, "-")),
        map_segments(canonical, |seg| split_camel(seg, "_")),
        canonical.to_ascii_lowercase(),
        map_segments(canonical, |seg| split_camel(seg, "_"))
            .replace('.', "_")
            .to_ascii_uppercase(),
    ];

    let mut names = Vec::with_capacity(variants.len());
    for variant in variants {
        if !names.contains(&variant) {
            names.push(variant);
        }
    }
    names
}

/// First value found for any accepted spelling of `name`.
pub fn property_value(properties: &HashMap<String, String>, name: &str) -> Option<String> {
    relaxed_names(name)
        .iter()
        .find_map(|relaxed| properties.get(relaxed).cloned())
}

/// Like [`property_value`], with a caller-supplied default.
pub fn property_value_or(
    properties: &HashMap<String, String>,
    name: &str,
    default: &str,
) -> String {
    property_value(properties, name).unwrap_or_else(|| default.to_string())
}

fn map_segments(name: &str, f: impl Fn(&str) -> String) -> String {
    name.split('.').map(|seg| f(seg)).collect::<Vec<_>>().join(".")
}

fn split_camel(segment: &str, separator: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for (i, c) in segment.chars().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            out.push_str(separator);
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn canonical_name_is_first_variant() {
        let names = relaxed_names("deployer.kubernetes.imagePullPolicy");
        assert_eq!(names[0], "deployer.kubernetes.imagePullPolicy");
        assert!(names.contains(&"deployer.kubernetes.image-pull-policy".to_string()));
        assert!(names.contains(&"deployer.kubernetes.image_pull_policy".to_string()));
        assert!(names.contains(&"deployer.kubernetes.imagepullpolicy".to_string()));
    }

    #[test]
    fn lookup_finds_each_spelling() {
        for spelling in [
            "deployer.kubernetes.imagePullPolicy",
            "deployer.kubernetes.image-pull-policy",
            "deployer.kubernetes.image_pull_policy",
            "deployer.kubernetes.imagepullpolicy",
        ] {
            let props = bag(&[(spelling, "Never")]);
            assert_eq!(
                property_value(&props, "deployer.kubernetes.imagePullPolicy").as_deref(),
                Some("Never"),
                "spelling {spelling} not resolved"
            );
        }
    }

    #[test]
    fn absent_key_falls_back_to_default() {
        let props = bag(&[]);
        assert_eq!(property_value(&props, "a.b.missingKey"), None);
        assert_eq!(property_value_or(&props, "a.b.missingKey", "dflt"), "dflt");
    }

    #[test]
    fn variant_order_is_deterministic() {
        let props = bag(&[
            ("a.someKey", "camel"),
            ("a.some-key", "kebab"),
        ]);
        // canonical spelling wins over later variants
        assert_eq!(property_value(&props, "a.someKey").as_deref(), Some("camel"));
    }
}
