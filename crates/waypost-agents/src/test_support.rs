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

//! World doubles shared by the agent tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use waypost_core::{ProjectionRef, ProjectionSurface, Vec3, WorldDirectory, WorldHandle, WorldTask};

/// A projection surface that hands out sequential handles and counts every
/// create/destroy, so tests can assert nothing leaks.
#[derive(Default)]
pub struct CountingSurface {
    next_handle: u64,
    pub alive: HashSet<ProjectionRef>,
    pub created: usize,
    pub destroyed: usize,
    /// `(position, text, scale)` per successful create, in call order.
    pub creations: Vec<(Vec3, String, f32)>,
    /// Create calls (0-based, counted across the surface's lifetime) that
    /// should fail, to exercise the best-effort per-line policy.
    pub fail_on: HashSet<usize>,
    calls: usize,
}

impl ProjectionSurface for CountingSurface {
    fn create_line(&mut self, position: Vec3, text: &str, scale: f32) -> Option<ProjectionRef> {
        let call = self.calls;
        self.calls += 1;
        if self.fail_on.contains(&call) {
            return None;
        }
        self.next_handle += 1;
        let handle = ProjectionRef(self.next_handle);
        self.alive.insert(handle);
        self.created += 1;
        self.creations.push((position, text.to_string(), scale));
        Some(handle)
    }

    fn destroy_line(&mut self, handle: ProjectionRef) {
        // Dead handles are tolerated, not counted.
        if self.alive.remove(&handle) {
            self.destroyed += 1;
        }
    }
}

/// A world that runs submitted tasks immediately on the calling thread —
/// a synchronous stand-in for the single-threaded confinement domain.
pub struct InlineWorld {
    name: String,
    pub surface: Mutex<CountingSurface>,
}

impl InlineWorld {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            surface: Mutex::new(CountingSurface::default()),
        })
    }

    pub fn live_count(&self) -> usize {
        self.surface.lock().unwrap().alive.len()
    }
}

impl WorldHandle for InlineWorld {
    fn name(&self) -> &str {
        &self.name
    }

    fn submit(&self, task: WorldTask) {
        task(&mut *self.surface.lock().unwrap());
    }
}

/// A directory over a fixed set of [`InlineWorld`]s.
#[derive(Default)]
pub struct MapDirectory {
    worlds: HashMap<String, Arc<InlineWorld>>,
}

impl MapDirectory {
    pub fn with(worlds: &[&Arc<InlineWorld>]) -> Arc<Self> {
        let mut map = HashMap::new();
        for world in worlds {
            map.insert(world.name.clone(), Arc::clone(world));
        }
        Arc::new(Self { worlds: map })
    }

    /// A directory with no loaded worlds.
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl WorldDirectory for MapDirectory {
    fn find(&self, world_id: &str) -> Option<Arc<dyn WorldHandle>> {
        self.worlds
            .get(world_id)
            .map(|w| Arc::clone(w) as Arc<dyn WorldHandle>)
    }
}
