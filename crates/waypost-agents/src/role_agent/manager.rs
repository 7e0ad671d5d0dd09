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

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use waypost_core::{NamedRecord, RecordId, RegistryError};
use waypost_data::{store, NamedRegistry};

use super::data::{normalize_color, ChatRole, RoleRow};

const DATA_FILE: &str = "roles.json";

/// The chat-role subsystem agent: registry CRUD plus priority resolution.
pub struct RoleManager {
    registry: NamedRegistry<ChatRole>,
    data_file: PathBuf,
}

impl RoleManager {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            registry: NamedRegistry::new(),
            data_file: data_dir.join(DATA_FILE),
        }
    }

    // --- CRUD ---

    /// Creates a role. Validates the color before touching the registry,
    /// so a bad color leaves no trace.
    pub fn create(
        &self,
        name: &str,
        display_name: &str,
        color: &str,
        priority: i32,
    ) -> Result<Arc<ChatRole>, RegistryError> {
        let color = normalize_color(color)?;
        let role = Arc::new(ChatRole::new(name, display_name, color, priority));
        self.registry.insert(Arc::clone(&role))?;
        Ok(role)
    }

    /// Returns `true` iff a role was removed.
    pub fn delete(&self, name: &str) -> bool {
        self.registry.remove_by_name(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<Arc<ChatRole>> {
        self.registry.get_by_name(name)
    }

    pub fn get_by_id(&self, id: RecordId) -> Option<Arc<ChatRole>> {
        self.registry.get(id)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.registry.contains_name(name)
    }

    pub fn rename(&self, current: &str, new: &str) -> Result<(), RegistryError> {
        self.registry.rename(current, new)
    }

    /// All roles, in unspecified order. Display layers wanting a stable
    /// listing sort by priority (then name) themselves.
    pub fn all(&self) -> Vec<Arc<ChatRole>> {
        self.registry.values()
    }

    // --- resolution ---

    /// Picks the role for a player carrying `candidate_groups`.
    ///
    /// Among the roles whose groups intersect the candidates
    /// (case-insensitively, blank candidates ignored), the numerically
    /// lowest priority wins. Equal priorities fall to whichever role the
    /// unspecified registry iteration meets first — accepted ambiguity, not
    /// a contract. No intersection means `None`, and the caller falls back
    /// to its configured default.
    pub fn resolve(&self, candidate_groups: &[String]) -> Option<Arc<ChatRole>> {
        let candidates: HashSet<String> = candidate_groups
            .iter()
            .filter(|g| !g.trim().is_empty())
            .map(|g| g.to_lowercase())
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let mut best: Option<Arc<ChatRole>> = None;
        for role in self.registry.values() {
            let matches = role
                .groups()
                .iter()
                .any(|g| candidates.contains(&g.to_lowercase()));
            if matches && best.as_ref().map_or(true, |b| role.priority() < b.priority()) {
                best = Some(role);
            }
        }
        best
    }

    // --- persistence ---

    /// Writes every role to the data file. Failures are logged and
    /// swallowed.
    pub fn save(&self) {
        let rows: Vec<RoleRow> = self
            .registry
            .values()
            .iter()
            .map(|r| RoleRow::from(r.as_ref()))
            .collect();
        if let Err(e) = store::save_rows(&self.data_file, &rows) {
            log::warn!("Failed to save roles: {e:#}");
        }
    }

    /// Repopulates the registry from the data file; per-entry failures and
    /// duplicate names are logged and skipped.
    pub fn load(&self) {
        let rows: Vec<RoleRow> = match store::load_rows(&self.data_file) {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("Failed to load roles: {e:#}");
                return;
            }
        };
        for row in rows {
            let role = Arc::new(ChatRole::from(row));
            let name = role.name();
            if let Err(e) = self.registry.insert(role) {
                log::warn!("Skipping persisted role '{name}': {e}");
            }
        }
        log::info!("Loaded {} roles", self.registry.len());
    }
}
