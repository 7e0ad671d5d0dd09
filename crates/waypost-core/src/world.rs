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

//! Capability traits for the host engine's worlds and text projections.
//!
//! Each world is a single-threaded execution context that exclusively owns
//! the live projection handles inside it. Creating or destroying a
//! projection is therefore only possible from within a task submitted via
//! [`WorldHandle::submit`]; registry code never touches projection state
//! directly. Submission is fire-and-forget: the task runs later on the
//! world's own thread and cannot be cancelled once handed over.
//!
//! Record *fields* (lines, position, name) carry their own synchronization
//! and may be mutated from any thread; only the projection operations are
//! confined.

use std::sync::Arc;

use crate::math::Vec3;

/// An opaque handle to one live floating-text line inside a world.
///
/// Only meaningful to the world that issued it. Handles can die at any time
/// (the host may remove the entity behind our back), so every consumer of a
/// `ProjectionRef` must tolerate a dead one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectionRef(pub u64);

/// The projection operations a world exposes to submitted tasks.
///
/// Implementations are handed to [`WorldTask`] closures by the world's own
/// thread; there is deliberately no way to reach a `ProjectionSurface` from
/// outside a submitted task.
pub trait ProjectionSurface {
    /// Creates one floating text line.
    ///
    /// Returns `None` when the host refuses the entity; callers treat that
    /// as a per-line best-effort failure, not an abort.
    fn create_line(&mut self, position: Vec3, text: &str, scale: f32) -> Option<ProjectionRef>;

    /// Destroys a line. Must tolerate handles that are already dead.
    fn destroy_line(&mut self, handle: ProjectionRef);
}

/// A unit of work to run on a world's execution context.
pub type WorldTask = Box<dyn FnOnce(&mut dyn ProjectionSurface) + Send>;

/// A loaded world: a named, single-threaded confinement domain.
pub trait WorldHandle: Send + Sync {
    /// The world's name, matched against a record's `world_id`.
    fn name(&self) -> &str;

    /// Enqueues `task` to run later on the world's own thread.
    ///
    /// Fire-and-forget; not cancellable once submitted.
    fn submit(&self, task: WorldTask);
}

/// Lookup over the currently loaded worlds.
///
/// Injected into the managers at construction rather than reached through
/// ambient globals, so tests can substitute a directory of doubles. A miss
/// is not an error — the target world may simply not be loaded yet — and
/// makes the dependent lifecycle operation a no-op.
pub trait WorldDirectory: Send + Sync {
    fn find(&self, world_id: &str) -> Option<Arc<dyn WorldHandle>>;
}

impl<T: WorldDirectory + ?Sized> WorldDirectory for Arc<T> {
    fn find(&self, world_id: &str) -> Option<Arc<dyn WorldHandle>> {
        (**self).find(world_id)
    }
}
