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

//! The error taxonomy of the registry subsystem.
//!
//! Only *validation* failures surface as errors: they are reported
//! synchronously to the caller and leave no state change behind. Everything
//! else — file I/O, an unloaded world, a projection handle that died under
//! us — is best-effort: logged, swallowed, and never allowed to roll back
//! the in-memory registries, which are the source of truth.

use thiserror::Error;

/// A validation failure reported synchronously by a registry operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A record with this name (compared case-insensitively) already exists.
    #[error("a record named '{0}' already exists")]
    DuplicateName(String),

    /// No record with this name exists.
    #[error("no record named '{0}' exists")]
    UnknownRecord(String),

    /// The value is not a color this subsystem stores (`#rrggbb`).
    #[error("'{0}' is not a valid #rrggbb color")]
    InvalidColor(String),

    /// A line edit addressed an index outside the record's line list.
    #[error("line index {index} is out of range (record has {len} lines)")]
    LineIndexOutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = RegistryError::DuplicateName("spawn".into());
        assert_eq!(err.to_string(), "a record named 'spawn' already exists");

        let err = RegistryError::LineIndexOutOfRange { index: 4, len: 2 };
        assert!(err.to_string().contains("index 4"));
        assert!(err.to_string().contains("2 lines"));
    }
}
