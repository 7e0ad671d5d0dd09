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

//! The flat-record file store.
//!
//! Each registry persists to one UTF-8 file holding a top-level JSON array
//! of flat objects (strings, numbers, booleans, string arrays — no nesting).
//! The schema is fixed and must stay readable against files written by
//! earlier hand-rolled serializers, so loading is deliberately lenient:
//!
//! * a missing or empty file is an empty registry, not an error;
//! * each array element is decoded individually, and a malformed entry is
//!   logged and skipped without aborting the rest of the file;
//! * unknown fields are ignored, missing fields take their defaults.
//!
//! Saving is synchronous whole-file I/O under a single-writer assumption;
//! concurrent `save` calls on the same path are a caller bug and are not
//! serialized here.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Serializes `rows` as a pretty-printed JSON array at `path`, creating
/// parent directories as needed.
pub fn save_rows<R: Serialize>(path: &Path, rows: &[R]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating data directory '{}'", parent.display()))?;
    }
    let mut text = serde_json::to_string_pretty(rows).context("serializing records")?;
    text.push('\n');
    fs::write(path, text).with_context(|| format!("writing '{}'", path.display()))?;
    Ok(())
}

/// Reads the JSON array at `path`, decoding each element on its own.
///
/// Entries that fail to decode are logged and dropped. Returns `Err` only
/// when the file itself is unreadable or is not an array at the top level.
pub fn load_rows<R: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<R>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("reading '{}'", path.display()))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing '{}'", path.display()))?;
    let Value::Array(entries) = value else {
        bail!("'{}' does not contain a top-level array", path.display());
    };

    let mut rows = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<R>(entry) {
            Ok(row) => rows.push(row),
            Err(e) => {
                log::warn!(
                    "Skipping malformed record entry {index} in '{}': {e}",
                    path.display()
                );
            }
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default, rename_all = "PascalCase")]
    struct Row {
        name: String,
        priority: i32,
        bold: bool,
        groups: Vec<String>,
    }

    impl Default for Row {
        fn default() -> Self {
            Self {
                name: String::new(),
                priority: 0,
                bold: false,
                groups: Vec::new(),
            }
        }
    }

    #[test]
    fn round_trip_preserves_field_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.json");
        let rows = vec![
            Row {
                name: "quote \" comma, and\nnewline".to_string(),
                priority: 5,
                bold: true,
                groups: vec!["Mod".to_string(), "Admin".to_string()],
            },
            Row {
                name: "plain".to_string(),
                priority: -3,
                bold: false,
                groups: vec![],
            },
        ];

        save_rows(&path, &rows).unwrap();
        let loaded: Vec<Row> = load_rows(&path).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let loaded: Vec<Row> = load_rows(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn empty_file_and_empty_array_are_empty() {
        let dir = tempdir().unwrap();
        for contents in ["", "  \n", "[]", "[\n]\n"] {
            let path = dir.path().join("rows.json");
            fs::write(&path, contents).unwrap();
            let loaded: Vec<Row> = load_rows(&path).unwrap();
            assert!(loaded.is_empty(), "contents {contents:?}");
        }
    }

    #[test]
    fn malformed_entry_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.json");
        fs::write(
            &path,
            r#"[
              {"Name": "good", "Priority": 1, "Bold": false, "Groups": []},
              {"Name": "bad", "Priority": "not a number"},
              {"Name": "also good", "Priority": 2, "Bold": true, "Groups": ["a"]}
            ]"#,
        )
        .unwrap();

        let loaded: Vec<Row> = load_rows(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "good");
        assert_eq!(loaded[1].name, "also good");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.json");
        fs::write(&path, r#"[{"Name": "sparse"}]"#).unwrap();

        let loaded: Vec<Row> = load_rows(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].priority, 0);
        assert!(!loaded[0].bold);
        assert!(loaded[0].groups.is_empty());
    }

    #[test]
    fn top_level_object_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.json");
        fs::write(&path, r#"{"Name": "oops"}"#).unwrap();
        assert!(load_rows::<Row>(&path).is_err());
    }

    #[test]
    fn legacy_hand_written_file_parses() {
        // Shape produced by the previous line-by-line writer: indented
        // objects, one field per line, inline string arrays.
        let dir = tempdir().unwrap();
        let path = dir.path().join("rows.json");
        fs::write(
            &path,
            "[\n  {\n    \"Name\": \"legacy \\\"quoted\\\"\",\n    \"Priority\": 10,\n    \"Bold\": true,\n    \"Groups\": [\"Mod\", \"Admin\"]\n  }\n]\n",
        )
        .unwrap();

        let loaded: Vec<Row> = load_rows(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "legacy \"quoted\"");
        assert_eq!(loaded[0].groups, vec!["Mod", "Admin"]);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/rows.json");
        save_rows(&path, &[] as &[Row]).unwrap();
        assert!(path.exists());
    }
}
