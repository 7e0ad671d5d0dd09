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

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use waypost_core::{NamedRecord, RecordId, RegistryError};
use waypost_data::serde_util::lenient_id;

/// Color given to roles that never had a valid one.
pub const DEFAULT_COLOR: &str = "#ffffff";

/// Priority given to roles that never had a valid one. Lower values win.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Normalizes a chat color to lowercase `#rrggbb`.
///
/// Accepts the six hex digits with or without a leading `#`, in any case;
/// everything else is rejected so an invalid color is never stored.
pub fn normalize_color(input: &str) -> Result<String, RegistryError> {
    let digits = input.strip_prefix('#').unwrap_or(input);
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(format!("#{}", digits.to_ascii_lowercase()))
    } else {
        Err(RegistryError::InvalidColor(input.to_string()))
    }
}

#[derive(Debug)]
struct RoleState {
    name: String,
    display_name: String,
    color: String,
    bold: bool,
    italic: bool,
    priority: i32,
    groups: Vec<String>,
}

/// A named chat-role definition: display text, style, and the permission
/// groups it applies to.
///
/// `color` is always a normalized `#rrggbb` string. `groups` membership is
/// case-insensitive; the stored spelling is whatever was added first.
#[derive(Debug)]
pub struct ChatRole {
    id: RecordId,
    state: RwLock<RoleState>,
}

impl ChatRole {
    /// Creates a role. `color` must already be normalized (the manager
    /// validates caller input before constructing).
    pub(crate) fn new(name: &str, display_name: &str, color: String, priority: i32) -> Self {
        Self {
            id: RecordId::new(),
            state: RwLock::new(RoleState {
                name: name.to_string(),
                display_name: display_name.to_string(),
                color,
                bold: false,
                italic: false,
                priority,
                groups: Vec::new(),
            }),
        }
    }

    pub fn display_name(&self) -> String {
        self.state.read().unwrap().display_name.clone()
    }

    pub fn set_display_name(&self, display_name: &str) {
        self.state.write().unwrap().display_name = display_name.to_string();
    }

    pub fn color(&self) -> String {
        self.state.read().unwrap().color.clone()
    }

    /// Sets the color, rejecting anything that does not normalize to
    /// `#rrggbb`. The stored value is untouched on failure.
    pub fn set_color(&self, color: &str) -> Result<(), RegistryError> {
        let normalized = normalize_color(color)?;
        self.state.write().unwrap().color = normalized;
        Ok(())
    }

    pub fn bold(&self) -> bool {
        self.state.read().unwrap().bold
    }

    pub fn set_bold(&self, bold: bool) {
        self.state.write().unwrap().bold = bold;
    }

    pub fn italic(&self) -> bool {
        self.state.read().unwrap().italic
    }

    pub fn set_italic(&self, italic: bool) {
        self.state.write().unwrap().italic = italic;
    }

    pub fn priority(&self) -> i32 {
        self.state.read().unwrap().priority
    }

    pub fn set_priority(&self, priority: i32) {
        self.state.write().unwrap().priority = priority;
    }

    /// A snapshot of the group names, in insertion order.
    pub fn groups(&self) -> Vec<String> {
        self.state.read().unwrap().groups.clone()
    }

    /// Returns `true` if `group` is a member, ignoring case.
    pub fn has_group(&self, group: &str) -> bool {
        let state = self.state.read().unwrap();
        state.groups.iter().any(|g| g.eq_ignore_ascii_case(group))
    }

    /// Adds a group unless an equivalent (case-insensitive) one exists.
    /// Returns `true` if the set changed.
    pub fn add_group(&self, group: &str) -> bool {
        let mut state = self.state.write().unwrap();
        if state.groups.iter().any(|g| g.eq_ignore_ascii_case(group)) {
            return false;
        }
        state.groups.push(group.to_string());
        true
    }

    /// Removes a group, ignoring case. Returns `true` if one was removed.
    pub fn remove_group(&self, group: &str) -> bool {
        let mut state = self.state.write().unwrap();
        let before = state.groups.len();
        state.groups.retain(|g| !g.eq_ignore_ascii_case(group));
        state.groups.len() != before
    }
}

impl NamedRecord for ChatRole {
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

/// The on-disk shape of one role. Fixed schema, shared with files written
/// by earlier plugin versions.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RoleRow {
    #[serde(rename = "Id", deserialize_with = "lenient_id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "DisplayName")]
    pub display_name: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Bold")]
    pub bold: bool,
    #[serde(rename = "Italic")]
    pub italic: bool,
    #[serde(rename = "Priority")]
    pub priority: i32,
    #[serde(rename = "Groups")]
    pub groups: Vec<String>,
}

impl From<&ChatRole> for RoleRow {
    fn from(role: &ChatRole) -> Self {
        let state = role.state.read().unwrap();
        Self {
            id: role.id,
            name: state.name.clone(),
            display_name: state.display_name.clone(),
            color: state.color.clone(),
            bold: state.bold,
            italic: state.italic,
            priority: state.priority,
            groups: state.groups.clone(),
        }
    }
}

impl From<RoleRow> for ChatRole {
    fn from(row: RoleRow) -> Self {
        let color = match normalize_color(&row.color) {
            Ok(color) => color,
            Err(_) => {
                if !row.color.is_empty() {
                    log::warn!(
                        "Role '{}' has invalid color '{}', using {DEFAULT_COLOR}",
                        row.name,
                        row.color
                    );
                }
                DEFAULT_COLOR.to_string()
            }
        };
        let priority = if row.priority > 0 {
            row.priority
        } else {
            DEFAULT_PRIORITY
        };
        Self {
            id: row.id,
            state: RwLock::new(RoleState {
                name: row.name,
                display_name: row.display_name,
                color,
                bold: row.bold,
                italic: row.italic,
                priority,
                groups: row.groups,
            }),
        }
    }
}
