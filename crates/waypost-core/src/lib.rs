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

//! Foundational types and interface contracts for the Waypost registries.
//!
//! This crate defines the vocabulary shared by the data layer and the
//! subsystem agents: stable record identifiers, the world-space anchor
//! vector, the error taxonomy, the case-insensitive naming contract, and
//! the narrow capability traits through which the host engine's worlds
//! and floating-text projections are consumed.
//!
//! Nothing in here touches the host engine directly; concrete `WorldHandle`
//! implementations are provided by the hosting process (or by test doubles).

pub mod error;
pub mod id;
pub mod math;
pub mod record;
pub mod world;

pub use error::RegistryError;
pub use id::RecordId;
pub use math::Vec3;
pub use record::{name_key, NamedRecord};
pub use world::{ProjectionRef, ProjectionSurface, WorldDirectory, WorldHandle, WorldTask};
