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

//! HTTP health probe construction.
//!
//! Path, port and timings resolve per probe kind from the request property
//! bag, then the global defaults, then constants. Without a resolvable port
//! no probe is produced.

use crate::domain::config::DeployerDefaults;
use crate::infrastructure::constants::{
    LIVENESS_PROBE_DELAY, LIVENESS_PROBE_PATH, LIVENESS_PROBE_PERIOD, PROBE_CREDENTIALS_SECRET_KEY,
    PROBE_TIMEOUT, READINESS_PROBE_DELAY, READINESS_PROBE_PATH, READINESS_PROBE_PERIOD,
};
use crate::infrastructure::kubernetes::properties::relaxed::property_value;
use k8s_openapi::api::core::v1::{HTTPGetAction, HTTPHeader, Probe, Secret};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Liveness,
    Readiness,
}

impl ProbeKind {
    fn setting_prefix(&self) -> &'static str {
        match self {
            ProbeKind::Liveness => "livenessProbe",
            ProbeKind::Readiness => "readinessProbe",
        }
    }
}

pub struct HttpProbeCreator<'a> {
    kind: ProbeKind,
    property_prefix: &'static str,
    defaults: &'a DeployerDefaults,
}

impl<'a> HttpProbeCreator<'a> {
    pub fn new(
        kind: ProbeKind,
        property_prefix: &'static str,
        defaults: &'a DeployerDefaults,
    ) -> Self {
        Self {
            kind,
            property_prefix,
            defaults,
        }
    }

    /// Builds the probe together with its resolved port, or `None` when no
    /// port is resolvable at any tier.
    pub fn create(
        &self,
        properties: &HashMap<String, String>,
        external_port: Option<i32>,
        credentials_secret: Option<&Secret>,
    ) -> Option<(i32, Probe)> {
        let port = self.port(properties, external_port)?;

        let probe = Probe {
            http_get: Some(HTTPGetAction {
                path: Some(self.path(properties)),
                port: IntOrString::Int(port),
                http_headers: authorization_header(credentials_secret),
                ..Default::default()
            }),
            initial_delay_seconds: Some(self.delay(properties)),
            period_seconds: Some(self.period(properties)),
            timeout_seconds: Some(self.timeout(properties)),
            ..Default::default()
        };

        Some((port, probe))
    }

    fn key(&self, suffix: &str) -> String {
        format!(
            "{}kubernetes.{}{}",
            self.property_prefix,
            self.kind.setting_prefix(),
            suffix
        )
    }

    fn port(&self, properties: &HashMap<String, String>, external_port: Option<i32>) -> Option<i32> {
        if let Some(raw) = property_value(properties, &self.key("Port")) {
            match raw.trim().parse() {
                Ok(port) => return Some(port),
                Err(_) => warn!(value = %raw, "ignoring unparseable probe port override"),
            }
        }
        let default_port = match self.kind {
            ProbeKind::Liveness => self.defaults.liveness_probe_port,
            ProbeKind::Readiness => self.defaults.readiness_probe_port,
        };
        default_port.or(external_port)
    }

    fn path(&self, properties: &HashMap<String, String>) -> String {
        let default_path = match self.kind {
            ProbeKind::Liveness => self
                .defaults
                .liveness_probe_path
                .clone()
                .unwrap_or_else(|| LIVENESS_PROBE_PATH.to_string()),
            ProbeKind::Readiness => self
                .defaults
                .readiness_probe_path
                .clone()
                .unwrap_or_else(|| READINESS_PROBE_PATH.to_string()),
        };
        property_value(properties, &self.key("Path")).unwrap_or(default_path)
    }

    fn delay(&self, properties: &HashMap<String, String>) -> i32 {
        let default_delay = match self.kind {
            ProbeKind::Liveness => self.defaults.liveness_probe_delay.unwrap_or(LIVENESS_PROBE_DELAY),
            ProbeKind::Readiness => self
                .defaults
                .readiness_probe_delay
                .unwrap_or(READINESS_PROBE_DELAY),
        };
        self.numeric(properties, "Delay", default_delay)
    }

    fn period(&self, properties: &HashMap<String, String>) -> i32 {
        let default_period = match self.kind {
            ProbeKind::Liveness => self
                .defaults
                .liveness_probe_period
                .unwrap_or(LIVENESS_PROBE_PERIOD),
            ProbeKind::Readiness => self
                .defaults
                .readiness_probe_period
                .unwrap_or(READINESS_PROBE_PERIOD),
        };
        self.numeric(properties, "Period", default_period)
    }

    fn timeout(&self, properties: &HashMap<String, String>) -> i32 {
        let default_timeout = match self.kind {
            ProbeKind::Liveness => self.defaults.liveness_probe_timeout.unwrap_or(PROBE_TIMEOUT),
            ProbeKind::Readiness => self.defaults.readiness_probe_timeout.unwrap_or(PROBE_TIMEOUT),
        };
        self.numeric(properties, "Timeout", default_timeout)
    }

    fn numeric(&self, properties: &HashMap<String, String>, suffix: &str, default: i32) -> i32 {
        match property_value(properties, &self.key(suffix)) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, setting = suffix, "ignoring unparseable probe setting");
                default
            }),
            None => default,
        }
    }
}

fn authorization_header(credentials_secret: Option<&Secret>) -> Option<Vec<HTTPHeader>> {
    let secret = credentials_secret?;
    let credentials = secret
        .data
        .as_ref()
        .and_then(|data| data.get(PROBE_CREDENTIALS_SECRET_KEY))?;

    match std::str::from_utf8(&credentials.0) {
        Ok(value) => Some(vec![HTTPHeader {
            name: "Authorization".to_string(),
            value: value.to_string(),
        }]),
        Err(_) => {
            warn!("probe credentials secret is not valid UTF-8, skipping Authorization header");
            None
        }
    }
}
