//! YAML configuration loading and deep merge.
//!
//! The pipe reads a default configuration document and, when an override
//! path is supplied, deep-merges the override on top of it: nested
//! mappings merge key-by-key, anything else is replaced by the override
//! value.

use std::fs;

use serde_yml::Value;

use crate::error::{Error, Result};

/// Load the merged configuration document.
///
/// Reads `default_path` and, if `override_path` is given, merges that
/// document over it. A file that is missing, unparsable, or parses to
/// an empty document is a fatal configuration error.
pub fn load(default_path: &str, override_path: Option<&str>) -> Result<Value> {
    let base = read_document(default_path)?;

    match override_path {
        Some(path) => Ok(merge(base, read_document(path)?)),
        None => Ok(base),
    }
}

fn read_document(path: &str) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("could not read config file '{}': {}", path, e)))?;

    let doc: Value = serde_yml::from_str(&raw)
        .map_err(|e| Error::Yaml(format!("could not parse config file '{}': {}", path, e)))?;

    if doc.is_null() {
        return Err(Error::Config(format!("config file '{}' is empty", path)));
    }

    Ok(doc)
}

/// Deep-merge `overlay` onto `base`, overlay wins.
///
/// Recurses only when both sides are mappings at a given key; otherwise
/// the overlay value fully replaces the base value. Keys present only
/// in the base are preserved.
pub fn merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                if let Some(slot) = base_map.get_mut(&key) {
                    let base_value = std::mem::take(slot);
                    *slot = merge(base_value, overlay_value);
                } else {
                    base_map.insert(key, overlay_value);
                }
            }
            Value::Mapping(base_map)
        }
        (_, overlay) => overlay,
    }
}
