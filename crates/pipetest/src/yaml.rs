//! YAML document access: read, write, and recursive merge.
//!
//! All documents are nested mappings (`serde_yaml::Mapping`). The merge is
//! the single algorithm shared by `update_yml` and the pipeline scaffolder:
//! mapping-vs-mapping key collisions recurse, any other collision replaces
//! the old value wholesale, and new keys are inserted.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::error::YamlError;

/// Read a YAML file into a mapping.
///
/// Fails with `NotFound` if the path does not exist, `Parse` on malformed
/// content, and `NotMapping` when the document root is not a mapping. An
/// empty file reads as an empty mapping.
pub fn read_mapping<P: AsRef<Path>>(path: P) -> Result<Mapping, YamlError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(YamlError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|e| YamlError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_mapping(&content, path)
}

fn parse_mapping(content: &str, path: &Path) -> Result<Mapping, YamlError> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| YamlError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        // An empty document parses as null; treat it as an empty mapping.
        Value::Null => Ok(Mapping::new()),
        _ => Err(YamlError::NotMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Serialize a mapping to a YAML file, creating parent directories as
/// needed. Overwrites unconditionally. Returns the absolute path.
pub fn write_mapping<P: AsRef<Path>>(path: P, content: &Mapping) -> Result<PathBuf, YamlError> {
    let path = path.as_ref();
    let text = serde_yaml::to_string(content).map_err(|e| YamlError::Serialize(e.to_string()))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| YamlError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, text).map_err(|e| YamlError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(path.to_path_buf())
}

/// Deep-merge `content` into the document at `path` and write it back.
///
/// A missing file is treated as an empty document. Returns the absolute
/// path.
pub fn update_mapping<P: AsRef<Path>>(path: P, content: &Mapping) -> Result<PathBuf, YamlError> {
    let path = path.as_ref();
    let mut document = if path.exists() {
        read_mapping(path)?
    } else {
        Mapping::new()
    };
    merge_mappings(&mut document, content.clone());
    write_mapping(path, &document)
}

/// Recursively merge `overlay` into `base`.
///
/// Recursion happens only on mapping-vs-mapping collisions; every other
/// collision replaces the base value.
pub fn merge_mappings(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        if let Value::Mapping(incoming) = value {
            if let Some(Value::Mapping(existing)) = base.get_mut(&key) {
                merge_mappings(existing, incoming);
                continue;
            }
            base.insert(key, Value::Mapping(incoming));
        } else {
            base.insert(key, value);
        }
    }
}
