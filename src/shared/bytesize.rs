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

use crate::shared::error::{DeployError, Result};

const KIB_PER_MIB: u64 = 1024;
const MIB_PER_GIB: u64 = 1024;
const MIB_PER_TIB: u64 = 1024 * 1024;

/// Parses a storage quantity such as `512Mi`, `1Gi`, `2g` or a plain number
/// into whole mebibytes. A bare number is already mebibytes.
pub fn parse_to_mebibytes(value: &str) -> Result<u64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DeployError::invalid_format(
            "storage quantity must not be empty",
        ));
    }

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, suffix) = trimmed.split_at(split);

    let amount: u64 = digits.parse().map_err(|_| {
        DeployError::invalid_format(format!("invalid storage quantity '{}'", value))
    })?;

    let mebibytes = match suffix.trim() {
        "" | "m" | "M" | "Mi" => amount,
        "k" | "K" | "Ki" => amount / KIB_PER_MIB,
        "g" | "G" | "Gi" => amount * MIB_PER_GIB,
        "t" | "T" | "Ti" => amount * MIB_PER_TIB,
        other => {
            return Err(DeployError::invalid_format(format!(
                "unsupported storage unit '{}' in '{}'",
                other, value
            )))
        }
    };

    Ok(mebibytes)
}
