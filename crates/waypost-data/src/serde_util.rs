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

//! Serde helpers for the fixed on-disk row schemas.

use serde::{Deserialize, Deserializer, Serializer};
use waypost_core::RecordId;

/// Deserializes a `RecordId` leniently: an unparseable id yields a freshly
/// generated one instead of failing the whole entry.
///
/// (An *absent* id field is covered by `#[serde(default)]` on the row field,
/// since `RecordId::default()` is also a fresh id.)
pub fn lenient_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    match text.parse() {
        Ok(id) => Ok(id),
        Err(_) => {
            log::warn!("Unparseable record id '{text}', generating a fresh one");
            Ok(RecordId::new())
        }
    }
}

/// The empty-string convention for optional ids: `None` is persisted as
/// `""`, anything unparseable loads back as `None`.
pub mod opt_id_as_empty {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => serializer.serialize_str(&id.to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        if text.is_empty() {
            return Ok(None);
        }
        Ok(text.parse().ok())
    }
}
