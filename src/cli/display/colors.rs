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

use comfy_table::Color as TableColor;

#[derive(Debug, Clone, Copy)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Color for a pod phase string as reported by the API server.
    pub fn get_phase_color(&self, phase: &str) -> TableColor {
        match phase {
            "Running" | "Succeeded" => self.success,
            "Pending" => self.warning,
            "Failed" => self.error,
            _ => self.muted,
        }
    }

    /// Color based on ready vs expected container counts.
    pub fn get_ready_color(&self, ready: u32, total: u32) -> TableColor {
        if total == 0 {
            self.muted
        } else if ready == total {
            self.success
        } else if ready > 0 {
            self.warning
        } else {
            self.error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_colors() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_phase_color("Running"), TableColor::Green);
        assert_eq!(theme.get_phase_color("Pending"), TableColor::Yellow);
        assert_eq!(theme.get_phase_color("Failed"), TableColor::Red);
        assert_eq!(theme.get_phase_color("Unknown"), TableColor::DarkGrey);
    }

    #[test]
    fn test_ready_colors() {
        let theme = ColorTheme::default();
        assert_eq!(theme.get_ready_color(1, 1), TableColor::Green);
        assert_eq!(theme.get_ready_color(1, 2), TableColor::Yellow);
        assert_eq!(theme.get_ready_color(0, 2), TableColor::Red);
        assert_eq!(theme.get_ready_color(0, 0), TableColor::DarkGrey);
    }
}
