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

//! The Waypost subsystem agents and their startup/shutdown glue.
//!
//! Each agent owns one concern: [`HologramManager`] the persistent
//! floating-text registry and its projection lifecycle, [`RoleManager`]
//! the chat-role registry and priority resolution, [`TransientDisplay`]
//! timed throwaway text. [`Plugin`] wires them to a data directory, a
//! [`WorldDirectory`] capability, and a [`PluginConfig`], and owns the
//! start/stop sequencing the hosting process calls into.

pub mod config;
pub mod display_agent;
pub mod hologram_agent;
pub mod role_agent;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use waypost_core::WorldDirectory;

pub use config::PluginConfig;
pub use display_agent::TransientDisplay;
pub use hologram_agent::{Hologram, HologramManager};
pub use role_agent::{ChatRole, RoleManager};
pub use scheduler::Scheduler;

const CONFIG_FILE: &str = "config.json";

/// The assembled plugin: both registries, the transient display, and the
/// shared scheduler, wired to one data directory.
pub struct Plugin {
    config: PluginConfig,
    scheduler: Scheduler,
    holograms: Arc<HologramManager>,
    roles: Arc<RoleManager>,
    display: TransientDisplay,
}

impl Plugin {
    /// Builds the plugin from its data directory and the host's world
    /// lookup. Reads (or first writes) `config.json` in the directory.
    pub fn new(data_dir: &Path, worlds: Arc<dyn WorldDirectory>) -> Self {
        let config = PluginConfig::load_or_default(&data_dir.join(CONFIG_FILE));
        Self::with_config(data_dir, worlds, config)
    }

    pub fn with_config(
        data_dir: &Path,
        worlds: Arc<dyn WorldDirectory>,
        config: PluginConfig,
    ) -> Self {
        let scheduler = Scheduler::new();
        let holograms = Arc::new(HologramManager::new(
            data_dir,
            Arc::clone(&worlds),
            &config.holograms,
        ));
        let roles = Arc::new(RoleManager::new(data_dir));
        let display = TransientDisplay::new(worlds, scheduler.clone(), &config.display);
        Self {
            config,
            scheduler,
            holograms,
            roles,
            display,
        }
    }

    /// Loads both registries and schedules the startup spawn pass.
    ///
    /// Loading never touches projections; the spawn pass runs after the
    /// configured delay so the host has a chance to finish loading worlds.
    pub fn start(&self) {
        self.holograms.load();
        self.roles.load();

        let delay = self.config.holograms.startup_spawn_delay_seconds.max(0.0);
        let holograms = Arc::clone(&self.holograms);
        if delay > 0.0 {
            self.scheduler
                .schedule_in(Duration::from_secs_f32(delay), Box::new(move || {
                    holograms.spawn_all();
                }));
        } else {
            holograms.spawn_all();
        }
    }

    /// Despawns everything, sweeps transient text, and saves both
    /// registries.
    pub fn stop(&self) {
        self.holograms.despawn_all();
        self.display.clear_all();
        self.holograms.save();
        self.roles.save();
    }

    /// The chat role text for a player carrying `groups`: the resolved
    /// role's display name, or the configured default when nothing
    /// matches.
    pub fn chat_role_text(&self, groups: &[String]) -> String {
        self.roles
            .resolve(groups)
            .map(|role| role.display_name())
            .unwrap_or_else(|| self.config.chat.default_role.clone())
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn holograms(&self) -> &Arc<HologramManager> {
        &self.holograms
    }

    pub fn roles(&self) -> &Arc<RoleManager> {
        &self.roles
    }

    pub fn display(&self) -> &TransientDisplay {
        &self.display
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The path `new` reads the configuration from.
    pub fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }
}
