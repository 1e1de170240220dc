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

//! Identity-keyed list merging.
//!
//! Request-level structured entries override global defaults by identity key
//! (a name-like field), never by structural equality. Higher-precedence
//! entries keep their original order and come first; lower-precedence
//! entries are appended, in their original order, only when their identity
//! is absent.

use std::collections::HashSet;

/// Merges `high` over `low` keyed by `identity`. Inputs are not mutated.
/// Entries whose identity is `None` never match anything and are carried
/// through as-is.
pub fn merge_by_identity<T, F>(high: &[T], low: &[T], identity: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<&str>,
{
    let mut merged: Vec<T> = high.to_vec();
    let taken: HashSet<&str> = high.iter().filter_map(|e| identity(e)).collect();

    for entry in low {
        match identity(entry) {
            Some(key) if taken.contains(key) => {}
            _ => merged.push(entry.clone()),
        }
    }

    merged
}
