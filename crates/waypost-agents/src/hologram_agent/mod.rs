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

//! The hologram agent: persistent multi-line floating text.
//!
//! A hologram is a registry record (name, anchor, world, lines) with an
//! independent *projection* lifecycle: the visible lines are host entities
//! owned by the record's world and are created/destroyed only on that
//! world's execution context. The record outlives its projection —
//! unspawned holograms are just data — and the projection never outlives
//! the record, because delete despawns first.

mod data;
mod manager;

pub use data::{Hologram, HologramRow, DEFAULT_LINE_SPACING};
pub use manager::HologramManager;
