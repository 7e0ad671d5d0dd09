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

use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use waypost_core::{NamedRecord, ProjectionRef, RecordId, RegistryError, Vec3};
use waypost_data::serde_util::{lenient_id, opt_id_as_empty};

/// Line spacing applied when a persisted record carries none (or a
/// non-positive one).
pub const DEFAULT_LINE_SPACING: f64 = 0.25;

/// Persistent fields of a hologram, guarded by one lock.
#[derive(Debug)]
struct PersistentState {
    name: String,
    position: Vec3,
    world_id: String,
    creator: Option<RecordId>,
    line_spacing: f64,
    lines: Vec<String>,
}

/// Live projection state. Never persisted.
///
/// `refs` holds one handle per successfully created line, in line order;
/// it is empty whenever `spawned` is false. Mutated only from tasks running
/// on the owning world's thread (plus the local fallback when that world is
/// gone), read from anywhere.
#[derive(Debug, Default)]
struct LiveState {
    refs: Vec<ProjectionRef>,
    spawned: bool,
}

/// A named, persistent block of floating text anchored in world space.
///
/// The registry holds the only authoritative copy; all field mutation goes
/// through these interior-locked setters and is safe from any thread. Only
/// the *projection* operations (creating/destroying the visible lines) are
/// confined to the owning world's execution context.
#[derive(Debug)]
pub struct Hologram {
    id: RecordId,
    state: RwLock<PersistentState>,
    live: Mutex<LiveState>,
}

impl Hologram {
    pub fn new(
        name: impl Into<String>,
        position: Vec3,
        world_id: impl Into<String>,
        creator: Option<RecordId>,
        line_spacing: f64,
    ) -> Self {
        let line_spacing = if line_spacing > 0.0 {
            line_spacing
        } else {
            DEFAULT_LINE_SPACING
        };
        Self {
            id: RecordId::new(),
            state: RwLock::new(PersistentState {
                name: name.into(),
                position,
                world_id: world_id.into(),
                creator,
                line_spacing,
                lines: Vec::new(),
            }),
            live: Mutex::new(LiveState::default()),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.state.read().unwrap().position
    }

    pub fn set_position(&self, position: Vec3) {
        self.state.write().unwrap().position = position;
    }

    pub fn world_id(&self) -> String {
        self.state.read().unwrap().world_id.clone()
    }

    pub fn set_world_id(&self, world_id: impl Into<String>) {
        self.state.write().unwrap().world_id = world_id.into();
    }

    pub fn creator(&self) -> Option<RecordId> {
        self.state.read().unwrap().creator
    }

    pub fn set_creator(&self, creator: Option<RecordId>) {
        self.state.write().unwrap().creator = creator;
    }

    pub fn line_spacing(&self) -> f64 {
        self.state.read().unwrap().line_spacing
    }

    /// Sets the vertical gap between lines. Non-positive values are ignored
    /// (the spacing invariant is `> 0`).
    pub fn set_line_spacing(&self, spacing: f64) {
        if spacing > 0.0 {
            self.state.write().unwrap().line_spacing = spacing;
        } else {
            log::debug!("Ignoring non-positive line spacing {spacing} for '{}'", self.name());
        }
    }

    /// A snapshot of the text lines, in display order.
    pub fn lines(&self) -> Vec<String> {
        self.state.read().unwrap().lines.clone()
    }

    pub fn line_count(&self) -> usize {
        self.state.read().unwrap().lines.len()
    }

    pub fn add_line(&self, text: impl Into<String>) {
        self.state.write().unwrap().lines.push(text.into());
    }

    pub fn set_line(&self, index: usize, text: impl Into<String>) -> Result<(), RegistryError> {
        let mut state = self.state.write().unwrap();
        let len = state.lines.len();
        match state.lines.get_mut(index) {
            Some(line) => {
                *line = text.into();
                Ok(())
            }
            None => Err(RegistryError::LineIndexOutOfRange { index, len }),
        }
    }

    pub fn remove_line(&self, index: usize) -> Result<String, RegistryError> {
        let mut state = self.state.write().unwrap();
        if index >= state.lines.len() {
            return Err(RegistryError::LineIndexOutOfRange {
                index,
                len: state.lines.len(),
            });
        }
        Ok(state.lines.remove(index))
    }

    /// The world-space anchor of line `index`, stacking downward.
    pub fn line_position(&self, index: usize) -> Vec3 {
        let state = self.state.read().unwrap();
        state.position.line_anchor(index, state.line_spacing)
    }

    // --- live projection state ---

    pub fn is_spawned(&self) -> bool {
        self.live.lock().unwrap().spawned
    }

    /// The number of live line projections.
    pub fn live_ref_count(&self) -> usize {
        self.live.lock().unwrap().refs.len()
    }

    /// Takes every live handle, leaving the record unspawned.
    pub(crate) fn take_live_refs(&self) -> Vec<ProjectionRef> {
        let mut live = self.live.lock().unwrap();
        live.spawned = false;
        std::mem::take(&mut live.refs)
    }

    pub(crate) fn push_live_ref(&self, handle: ProjectionRef) {
        self.live.lock().unwrap().refs.push(handle);
    }

    pub(crate) fn mark_spawned(&self) {
        self.live.lock().unwrap().spawned = true;
    }
}

impl NamedRecord for Hologram {
    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> String {
        self.state.read().unwrap().name.clone()
    }

    fn set_name(&self, name: &str) {
        self.state.write().unwrap().name = name.to_string();
    }
}

/// The on-disk shape of one hologram. Field names and order are a fixed
/// schema shared with files written by earlier plugin versions.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HologramRow {
    #[serde(rename = "Id", deserialize_with = "lenient_id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PosX")]
    pub pos_x: f64,
    #[serde(rename = "PosY")]
    pub pos_y: f64,
    #[serde(rename = "PosZ")]
    pub pos_z: f64,
    #[serde(rename = "WorldId")]
    pub world_id: String,
    #[serde(rename = "CreatorId", with = "opt_id_as_empty")]
    pub creator_id: Option<RecordId>,
    #[serde(rename = "LineSpacing")]
    pub line_spacing: f64,
    #[serde(rename = "Lines")]
    pub lines: Vec<String>,
}

impl From<&Hologram> for HologramRow {
    fn from(hologram: &Hologram) -> Self {
        let state = hologram.state.read().unwrap();
        Self {
            id: hologram.id,
            name: state.name.clone(),
            pos_x: state.position.x,
            pos_y: state.position.y,
            pos_z: state.position.z,
            world_id: state.world_id.clone(),
            creator_id: state.creator,
            line_spacing: state.line_spacing,
            lines: state.lines.clone(),
        }
    }
}

impl From<HologramRow> for Hologram {
    fn from(row: HologramRow) -> Self {
        let line_spacing = if row.line_spacing > 0.0 {
            row.line_spacing
        } else {
            DEFAULT_LINE_SPACING
        };
        Self {
            id: row.id,
            state: RwLock::new(PersistentState {
                name: row.name,
                position: Vec3::new(row.pos_x, row.pos_y, row.pos_z),
                world_id: row.world_id,
                creator: row.creator_id,
                line_spacing,
                lines: row.lines,
            }),
            live: Mutex::new(LiveState::default()),
        }
    }
}
