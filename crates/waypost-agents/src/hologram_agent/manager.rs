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

use std::path::{Path, PathBuf};
use std::sync::Arc;

use waypost_core::{NamedRecord, ProjectionSurface, RecordId, RegistryError, Vec3, WorldDirectory};
use waypost_data::{store, NamedRegistry};

use super::data::{Hologram, HologramRow};
use crate::config::HologramConfig;

const DATA_FILE: &str = "holograms.json";

/// The hologram subsystem agent: registry CRUD from any caller thread,
/// projection lifecycle delegated to each hologram's owning world.
///
/// Every lifecycle method resolves the owning world by `world_id` through
/// the injected [`WorldDirectory`] and submits a task to it; an unloaded
/// world makes the operation a no-op rather than an error. Submitted work is
/// fire-and-forget — a `delete` racing an in-flight `spawn` is resolved by
/// the next explicit respawn/despawn pass, not here.
pub struct HologramManager {
    registry: NamedRegistry<Hologram>,
    worlds: Arc<dyn WorldDirectory>,
    data_file: PathBuf,
    default_scale: f32,
    default_line_spacing: f64,
}

impl HologramManager {
    pub fn new(data_dir: &Path, worlds: Arc<dyn WorldDirectory>, config: &HologramConfig) -> Self {
        Self {
            registry: NamedRegistry::new(),
            worlds,
            data_file: data_dir.join(DATA_FILE),
            default_scale: config.default_scale,
            default_line_spacing: config.default_line_spacing,
        }
    }

    // --- CRUD ---

    /// Creates a hologram with no lines yet.
    ///
    /// Fails with [`RegistryError::DuplicateName`] if the name is taken
    /// (case-insensitively), leaving the registry unchanged.
    pub fn create(
        &self,
        name: &str,
        position: Vec3,
        world_id: &str,
        creator: Option<RecordId>,
    ) -> Result<Arc<Hologram>, RegistryError> {
        let hologram = Arc::new(Hologram::new(
            name,
            position,
            world_id,
            creator,
            self.default_line_spacing,
        ));
        self.registry.insert(Arc::clone(&hologram))?;
        Ok(hologram)
    }

    /// Deletes a hologram, despawning its projection first if one is live.
    ///
    /// Returns `true` iff a record was removed.
    pub fn delete(&self, name: &str) -> bool {
        let Some(hologram) = self.registry.remove_by_name(name) else {
            return false;
        };
        if hologram.is_spawned() {
            self.despawn(&hologram);
        }
        true
    }

    pub fn get(&self, name: &str) -> Option<Arc<Hologram>> {
        self.registry.get_by_name(name)
    }

    pub fn get_by_id(&self, id: RecordId) -> Option<Arc<Hologram>> {
        self.registry.get(id)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.registry.contains_name(name)
    }

    pub fn rename(&self, current: &str, new: &str) -> Result<(), RegistryError> {
        self.registry.rename(current, new)
    }

    /// All holograms, in unspecified order.
    pub fn all(&self) -> Vec<Arc<Hologram>> {
        self.registry.values()
    }

    // --- line edits ---
    //
    // Structural edits change only the record; callers follow up with
    // `respawn` when the visible projection should catch up.

    pub fn add_line(&self, hologram: &Hologram, text: &str) {
        hologram.add_line(text);
    }

    pub fn set_line(&self, hologram: &Hologram, index: usize, text: &str) -> Result<(), RegistryError> {
        hologram.set_line(index, text)
    }

    pub fn remove_line(&self, hologram: &Hologram, index: usize) -> Result<(), RegistryError> {
        hologram.remove_line(index).map(|_| ())
    }

    // --- projection lifecycle ---

    /// Spawns the hologram's lines in its owning world. No-op when the
    /// world is not loaded.
    pub fn spawn(&self, hologram: &Arc<Hologram>) {
        let world_id = hologram.world_id();
        let Some(world) = self.find_world(&world_id) else {
            return;
        };
        let hologram = Arc::clone(hologram);
        let scale = self.default_scale;
        world.submit(Box::new(move |surface| {
            spawn_lines(surface, &hologram, scale);
        }));
    }

    /// Destroys the hologram's live lines.
    ///
    /// When the owning world is gone the handles died with it; the record
    /// is reset locally so it no longer claims a projection.
    pub fn despawn(&self, hologram: &Arc<Hologram>) {
        let world_id = hologram.world_id();
        let Some(world) = self.find_world(&world_id) else {
            let dropped = hologram.take_live_refs();
            if !dropped.is_empty() {
                log::debug!(
                    "Dropping {} stale line refs of '{}'; world '{world_id}' is gone",
                    dropped.len(),
                    hologram.name()
                );
            }
            return;
        };
        let hologram = Arc::clone(hologram);
        world.submit(Box::new(move |surface| {
            despawn_lines(surface, &hologram);
        }));
    }

    /// Tears down and rebuilds the projection as one task on the owning
    /// world, so the visible lines match the record after a structural
    /// edit. Not incremental: every line is destroyed and recreated.
    pub fn respawn(&self, hologram: &Arc<Hologram>) {
        let Some(world) = self.find_world(&hologram.world_id()) else {
            return;
        };
        let hologram = Arc::clone(hologram);
        let scale = self.default_scale;
        world.submit(Box::new(move |surface| {
            despawn_lines(surface, &hologram);
            spawn_lines(surface, &hologram, scale);
        }));
    }

    /// Moves the anchor and rebuilds the projection.
    pub fn move_to(&self, hologram: &Arc<Hologram>, position: Vec3) {
        hologram.set_position(position);
        self.respawn(hologram);
    }

    /// Spawns every hologram that is not already live. The startup pass.
    pub fn spawn_all(&self) {
        for hologram in self.registry.values() {
            if !hologram.is_spawned() {
                self.spawn(&hologram);
            }
        }
    }

    /// Despawns every live hologram. The shutdown pass.
    pub fn despawn_all(&self) {
        for hologram in self.registry.values() {
            if hologram.is_spawned() {
                self.despawn(&hologram);
            }
        }
    }

    fn find_world(&self, world_id: &str) -> Option<Arc<dyn waypost_core::WorldHandle>> {
        if world_id.is_empty() {
            return None;
        }
        self.worlds.find(world_id)
    }

    // --- persistence ---

    /// Writes every hologram to the data file. Failures are logged and
    /// swallowed; the in-memory registry stays authoritative either way.
    pub fn save(&self) {
        let rows: Vec<HologramRow> = self
            .registry
            .values()
            .iter()
            .map(|h| HologramRow::from(h.as_ref()))
            .collect();
        if let Err(e) = store::save_rows(&self.data_file, &rows) {
            log::warn!("Failed to save holograms: {e:#}");
        }
    }

    /// Repopulates the registry from the data file, touching no
    /// projections — records load unspawned and come alive only through a
    /// later [`spawn_all`](Self::spawn_all) pass.
    pub fn load(&self) {
        let rows: Vec<HologramRow> = match store::load_rows(&self.data_file) {
            Ok(rows) => rows,
            Err(e) => {
                log::warn!("Failed to load holograms: {e:#}");
                return;
            }
        };
        for row in rows {
            let hologram = Arc::new(Hologram::from(row));
            let name = hologram.name();
            if let Err(e) = self.registry.insert(hologram) {
                log::warn!("Skipping persisted hologram '{name}': {e}");
            }
        }
        log::info!("Loaded {} holograms", self.registry.len());
    }
}

/// Builds every line projection, in order. Runs on the owning world.
///
/// Individual line failures are logged and skipped; the hologram still
/// counts as spawned with whatever subset came up.
fn spawn_lines(surface: &mut dyn ProjectionSurface, hologram: &Hologram, scale: f32) {
    // A stale ref list from an earlier spawn would otherwise leak.
    hologram.take_live_refs();
    let lines = hologram.lines();
    log::info!(
        "Spawning hologram '{}' with {} lines at {}",
        hologram.name(),
        lines.len(),
        hologram.position()
    );
    for (index, text) in lines.iter().enumerate() {
        let position = hologram.line_position(index);
        match surface.create_line(position, text, scale) {
            Some(handle) => hologram.push_live_ref(handle),
            None => log::warn!(
                "Failed to spawn line {index} of '{}': '{text}'",
                hologram.name()
            ),
        }
    }
    hologram.mark_spawned();
}

/// Destroys every live line. Runs on the owning world; dead handles are
/// tolerated by the surface.
fn despawn_lines(surface: &mut dyn ProjectionSurface, hologram: &Hologram) {
    for handle in hologram.take_live_refs() {
        surface.destroy_line(handle);
    }
}
