//! Version slot allocation and semantic label resolution
//!
//! Numeric version slots are assigned as the smallest integer >= 1 with
//! no existing entry under the model path. Semantic labels are resolved
//! by scanning version directories for a metadata sidecar whose
//! `model_version` matches the requested label.

use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, warn};

use common::Result;
use crate::metadata;

/// Returns the smallest version number with no existing entry under the
/// model path.
///
/// Allocation is not atomic; callers serialize concurrent allocations
/// for the same model through the repository manager's per-model lock.
pub fn next_free_slot(model_path: &Path) -> u32 {
    let mut candidate = 1u32;

    while model_path.join(candidate.to_string()).exists() {
        candidate += 1;
    }

    debug!("Next free version slot under {:?} is {}", model_path, candidate);

    candidate
}

/// Resolves a semantic label to the name of the version directory whose
/// metadata records it.
///
/// Directory names are scanned in a stable order (numeric names
/// ascending, then the rest lexicographically). Directories with no
/// readable metadata sidecar are skipped. Returns `Ok(None)` when the
/// model path does not exist or no directory matches.
pub fn resolve_label(model_path: &Path, label: &str) -> Result<Option<String>> {
    if !model_path.is_dir() {
        return Ok(None);
    }

    let mut names: Vec<String> = std::fs::read_dir(model_path)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if entry.path().is_dir() {
                entry.file_name().into_string().ok()
            } else {
                None
            }
        })
        .collect();

    names.sort_by(|a, b| match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    });

    for name in names {
        let version_dir = model_path.join(&name);

        let meta = match metadata::read(&version_dir) {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Skipping version directory {:?}: unreadable metadata: {}", version_dir, e);
                continue;
            }
        };

        if meta.get(metadata::MODEL_VERSION_KEY).and_then(|v| v.as_str()) == Some(label) {
            return Ok(Some(name));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    fn stamp_label(version_dir: &Path, label: &str) {
        std::fs::create_dir_all(version_dir).unwrap();
        let mut meta = Map::new();
        meta.insert(
            metadata::MODEL_VERSION_KEY.to_string(),
            Value::String(label.to_string()),
        );
        metadata::write(version_dir, &meta).unwrap();
    }

    #[test]
    fn first_slot_of_empty_model_is_one() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(next_free_slot(tmp.path()), 1);
    }

    #[test]
    fn slot_allocation_fills_the_first_gap() {
        let tmp = tempfile::tempdir().unwrap();
        for v in ["1", "2", "4"] {
            std::fs::create_dir_all(tmp.path().join(v)).unwrap();
        }
        assert_eq!(next_free_slot(tmp.path()), 3);
    }

    #[test]
    fn resolve_label_finds_matching_version() {
        let tmp = tempfile::tempdir().unwrap();
        stamp_label(&tmp.path().join("1"), "v1.0");
        stamp_label(&tmp.path().join("2"), "v2.0");

        assert_eq!(
            resolve_label(tmp.path(), "v2.0").unwrap(),
            Some("2".to_string())
        );
    }

    #[test]
    fn resolve_label_skips_directories_without_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("1")).unwrap();
        stamp_label(&tmp.path().join("2"), "v1.0");

        assert_eq!(
            resolve_label(tmp.path(), "v1.0").unwrap(),
            Some("2".to_string())
        );
    }

    #[test]
    fn resolve_label_without_match_or_model_path_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        stamp_label(&tmp.path().join("1"), "v1.0");

        assert_eq!(resolve_label(tmp.path(), "v9.9").unwrap(), None);
        assert_eq!(
            resolve_label(&tmp.path().join("missing"), "v1.0").unwrap(),
            None
        );
    }

    #[test]
    fn resolve_label_prefers_the_lowest_numeric_slot() {
        let tmp = tempfile::tempdir().unwrap();
        stamp_label(&tmp.path().join("10"), "dup");
        stamp_label(&tmp.path().join("2"), "dup");

        assert_eq!(
            resolve_label(tmp.path(), "dup").unwrap(),
            Some("2".to_string())
        );
    }
}
