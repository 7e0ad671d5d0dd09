// Copyright 2025 eraflo
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

use crate::id::RecordId;

/// Returns the canonical index key for a record name.
///
/// Names are unique case-insensitively; every name lookup and every name
/// index entry goes through this one normalization.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// A record that can live in a named registry — uniquely identified,
/// uniquely named, and shareable across threads.
///
/// `set_name` exists for the registry's rename operation only: the registry
/// updates the record's own name and its name index under one lock, so the
/// two can never be observed disagreeing. Nothing else should call it.
pub trait NamedRecord: Send + Sync {
    /// The stable identifier, assigned at creation.
    fn id(&self) -> RecordId;

    /// The current human-facing name.
    fn name(&self) -> String;

    /// Replaces the record's name. Reserved for the owning registry.
    fn set_name(&self, name: &str);
}
