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

//! Transient floating text: shown once, removed on a timer, never
//! persisted.
//!
//! This sits outside the registries' consistency domain entirely — no
//! record, no name, no file. A shown line is tracked only so the shutdown
//! sweep can remove whatever is still on screen; the scheduled removal
//! itself is fire-and-forget and its failures are swallowed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use waypost_core::{ProjectionRef, Vec3, WorldDirectory, WorldHandle};

use crate::config::DisplayConfig;
use crate::scheduler::Scheduler;

type ActiveSet = Arc<Mutex<Vec<(Arc<dyn WorldHandle>, ProjectionRef)>>>;

/// Shows single-line floating text that removes itself after a configured
/// duration.
pub struct TransientDisplay {
    worlds: Arc<dyn WorldDirectory>,
    scheduler: Scheduler,
    scale: f32,
    duration: Duration,
    active: ActiveSet,
}

impl TransientDisplay {
    pub fn new(worlds: Arc<dyn WorldDirectory>, scheduler: Scheduler, config: &DisplayConfig) -> Self {
        Self {
            worlds,
            scheduler,
            scale: config.scale,
            duration: Duration::from_secs_f32(config.duration_seconds.max(0.0)),
            active: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shows `text` at `position` in the named world.
    ///
    /// Returns `false` when the world is not loaded (nothing shown). With a
    /// zero duration the text stays until [`clear_all`](Self::clear_all).
    pub fn show(&self, world_id: &str, position: Vec3, text: &str) -> bool {
        let Some(world) = self.worlds.find(world_id) else {
            log::debug!("Not showing transient text, world '{world_id}' is not loaded");
            return false;
        };

        let text = text.to_string();
        let scale = self.scale;
        let duration = self.duration;
        let scheduler = self.scheduler.clone();
        let active = Arc::clone(&self.active);
        let task_world = Arc::clone(&world);
        world.submit(Box::new(move |surface| {
            let Some(handle) = surface.create_line(position, &text, scale) else {
                log::warn!("Failed to show transient text '{text}'");
                return;
            };
            active
                .lock()
                .unwrap()
                .push((Arc::clone(&task_world), handle));
            if duration > Duration::ZERO {
                scheduler.schedule_in(
                    duration,
                    Box::new(move || remove(&task_world, handle, &active)),
                );
            }
        }));
        true
    }

    /// The number of lines not yet removed.
    pub fn active_count(&self) -> usize {
        self.active.lock().unwrap().len()
    }

    /// Removes everything still on screen. The shutdown sweep.
    pub fn clear_all(&self) {
        let drained: Vec<_> = std::mem::take(&mut *self.active.lock().unwrap());
        for (world, handle) in drained {
            world.submit(Box::new(move |surface| {
                surface.destroy_line(handle);
            }));
        }
    }
}

/// Destroys one tracked line on its owning world and forgets it.
fn remove(world: &Arc<dyn WorldHandle>, handle: ProjectionRef, active: &ActiveSet) {
    active.lock().unwrap().retain(|(_, h)| *h != handle);
    world.submit(Box::new(move |surface| {
        surface.destroy_line(handle);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InlineWorld, MapDirectory};
    use std::time::Instant;

    fn display_with(world: &Arc<InlineWorld>, duration_seconds: f32) -> TransientDisplay {
        let config = DisplayConfig {
            scale: 1.5,
            duration_seconds,
        };
        TransientDisplay::new(MapDirectory::with(&[world]), Scheduler::new(), &config)
    }

    #[test]
    fn show_creates_a_line_and_schedules_removal() {
        let world = InlineWorld::new("orbis");
        let display = display_with(&world, 0.05);

        assert!(display.show("orbis", Vec3::new(0.0, 70.0, 0.0), "hi there"));
        assert_eq!(world.live_count(), 1);
        assert_eq!(display.active_count(), 1);
        {
            let surface = world.surface.lock().unwrap();
            assert_eq!(surface.creations[0].1, "hi there");
            assert_eq!(surface.creations[0].2, 1.5);
        }

        // Scheduled removal fires on the worker thread.
        let deadline = Instant::now() + Duration::from_secs(2);
        while world.live_count() > 0 {
            assert!(Instant::now() < deadline, "removal never ran");
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(display.active_count(), 0);
    }

    #[test]
    fn unloaded_world_shows_nothing() {
        let display = TransientDisplay::new(
            MapDirectory::empty(),
            Scheduler::new(),
            &DisplayConfig::default(),
        );
        assert!(!display.show("nowhere", Vec3::default(), "unseen"));
        assert_eq!(display.active_count(), 0);
    }

    #[test]
    fn zero_duration_stays_until_cleared() {
        let world = InlineWorld::new("orbis");
        let display = display_with(&world, 0.0);

        display.show("orbis", Vec3::default(), "a");
        display.show("orbis", Vec3::default(), "b");
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(world.live_count(), 2, "no timer should have fired");

        display.clear_all();
        assert_eq!(world.live_count(), 0);
        assert_eq!(display.active_count(), 0);
    }

    #[test]
    fn failed_creation_is_not_tracked() {
        let world = InlineWorld::new("orbis");
        world.surface.lock().unwrap().fail_on.insert(0);
        let display = display_with(&world, 0.0);

        assert!(display.show("orbis", Vec3::default(), "doomed"));
        assert_eq!(display.active_count(), 0);
        assert_eq!(world.live_count(), 0);
    }
}
