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

use crate::cli::display::colors::ColorTheme;
use chrono::Utc;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use k8s_openapi::api::core::v1::Pod;

/// Status row for one pod of a deployed app.
#[derive(Debug, Clone)]
pub struct PodInfo {
    pub name: String,
    pub phase: String,
    pub ready: u32,
    pub containers: u32,
    pub restarts: u32,
    pub age: String,
    pub node: String,
}

impl PodInfo {
    pub fn from_pod(pod: &Pod) -> Self {
        let name = pod.metadata.name.clone().unwrap_or_default();

        let phase = pod
            .status
            .as_ref()
            .and_then(|s| s.phase.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let statuses = pod
            .status
            .as_ref()
            .and_then(|s| s.container_statuses.as_ref());
        let containers = statuses.map(|s| s.len() as u32).unwrap_or(0);
        let ready = statuses
            .map(|s| s.iter().filter(|c| c.ready).count() as u32)
            .unwrap_or(0);
        let restarts = statuses
            .map(|s| s.iter().map(|c| c.restart_count as u32).sum())
            .unwrap_or(0);

        let age = pod
            .metadata
            .creation_timestamp
            .as_ref()
            .map(|t| format_age(Utc::now().signed_duration_since(t.0)))
            .unwrap_or_else(|| "-".to_string());

        let node = pod
            .spec
            .as_ref()
            .and_then(|s| s.node_name.clone())
            .unwrap_or_else(|| "-".to_string());

        Self {
            name,
            phase,
            ready,
            containers,
            restarts,
            age,
            node,
        }
    }
}

pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    pub fn render_pod_list(&self, app_id: &str, pods: &[PodInfo]) -> String {
        if pods.is_empty() {
            return format!("No pods found for app '{}'", app_id);
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("POD").set_alignment(CellAlignment::Left),
                Cell::new("PHASE").set_alignment(CellAlignment::Center),
                Cell::new("READY").set_alignment(CellAlignment::Center),
                Cell::new("RESTARTS").set_alignment(CellAlignment::Center),
                Cell::new("AGE").set_alignment(CellAlignment::Center),
                Cell::new("NODE").set_alignment(CellAlignment::Left),
            ]);

        for pod in pods {
            table.add_row(vec![
                Cell::new(&pod.name),
                Cell::new(&pod.phase).fg(self.theme.get_phase_color(&pod.phase)),
                Cell::new(format!("{}/{}", pod.ready, pod.containers))
                    .fg(self.theme.get_ready_color(pod.ready, pod.containers)),
                Cell::new(pod.restarts),
                Cell::new(&pod.age),
                Cell::new(&pod.node),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "App {} {}\n",
            app_id.bold(),
            format!("[{} pods]", pods.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }
}

fn format_age(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds().max(0);
    if seconds >= 86_400 {
        format!("{}d", seconds / 86_400)
    } else if seconds >= 3_600 {
        format!("{}h", seconds / 3_600)
    } else if seconds >= 60 {
        format!("{}m", seconds / 60)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::seconds(30)), "30s");
        assert_eq!(format_age(Duration::seconds(150)), "2m");
        assert_eq!(format_age(Duration::hours(5)), "5h");
        assert_eq!(format_age(Duration::days(3)), "3d");
    }

    #[test]
    fn test_render_empty_pod_list() {
        let renderer = TableRenderer::new();
        let output = renderer.render_pod_list("my-app", &[]);
        assert!(output.contains("No pods found"));
    }

    #[test]
    fn test_render_pod_rows() {
        let renderer = TableRenderer::new();
        let pods = vec![PodInfo {
            name: "my-app-0".to_string(),
            phase: "Running".to_string(),
            ready: 1,
            containers: 1,
            restarts: 0,
            age: "5m".to_string(),
            node: "node-1".to_string(),
        }];
        let output = renderer.render_pod_list("my-app", &pods);
        assert!(output.contains("my-app-0"));
        assert!(output.contains("Running"));
        assert!(output.contains("1/1"));
    }
}
