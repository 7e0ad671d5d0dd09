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

//! Plugin configuration.
//!
//! A single JSON file with PascalCase keys, every field optional. On first
//! run the defaults are written back out so operators have something to
//! edit; a broken file is logged and replaced by defaults in memory (never
//! on disk — the operator's text is left for them to fix).

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Defaults applied to newly created holograms and the startup pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct HologramConfig {
    /// Visual scale of every spawned line entity.
    pub default_scale: f32,
    /// Vertical gap between lines of a new hologram.
    pub default_line_spacing: f64,
    /// How long after `start()` to run the startup spawn pass, giving the
    /// host time to finish loading worlds.
    pub startup_spawn_delay_seconds: f32,
}

impl Default for HologramConfig {
    fn default() -> Self {
        Self {
            default_scale: 1.0,
            default_line_spacing: 0.25,
            startup_spawn_delay_seconds: 2.0,
        }
    }
}

/// Transient display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DisplayConfig {
    pub scale: f32,
    /// Seconds before a shown line removes itself; zero disables the timer.
    pub duration_seconds: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            duration_seconds: 10.0,
        }
    }
}

/// Chat settings consumed by role resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ChatConfig {
    /// Role text used when no role's groups match the player's.
    pub default_role: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_role: "Player".to_string(),
        }
    }
}

/// The full plugin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PluginConfig {
    pub holograms: HologramConfig,
    pub display: DisplayConfig,
    pub chat: ChatConfig,
}

impl PluginConfig {
    /// Loads the configuration at `path`, writing the defaults there first
    /// if no file exists yet. Read or parse failures are logged and fall
    /// back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.write_to(path) {
                log::warn!("Failed to write default config: {e:#}");
            }
            return config;
        }
        match Self::read_from(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to read config, using defaults: {e:#}");
                Self::default()
            }
        }
    }

    fn read_from(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading '{}'", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing '{}'", path.display()))
    }

    fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating '{}'", parent.display()))?;
        }
        let mut text = serde_json::to_string_pretty(self).context("serializing config")?;
        text.push('\n');
        fs::write(path, text).with_context(|| format!("writing '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn first_run_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = PluginConfig::load_or_default(&path);
        assert!(path.exists());
        assert_eq!(config.holograms.default_scale, 1.0);
        assert_eq!(config.chat.default_role, "Player");

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"DefaultLineSpacing\": 0.25"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"Holograms": {"DefaultScale": 0.5}}"#).unwrap();

        let config = PluginConfig::load_or_default(&path);
        assert_eq!(config.holograms.default_scale, 0.5);
        assert_eq!(config.holograms.default_line_spacing, 0.25);
        assert_eq!(config.display.duration_seconds, 10.0);
    }

    #[test]
    fn broken_file_falls_back_without_overwriting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let config = PluginConfig::load_or_default(&path);
        assert_eq!(config.chat.default_role, "Player");
        // The operator's file is left alone for them to fix.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }
}
