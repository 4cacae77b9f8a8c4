//! Per-version metadata sidecars
//!
//! Each version directory may carry a small `meta.json` file recording
//! the semantic label it was uploaded under. The file is a flat JSON
//! object; unknown keys round-trip through read-modify-write cycles.

use std::path::Path;
use serde_json::{Map, Value};
use tracing::debug;

use common::Result;

/// File name of the metadata sidecar inside a version directory
pub const META_FILE: &str = "meta.json";

/// Metadata key holding the semantic version label
pub const MODEL_VERSION_KEY: &str = "model_version";

/// Reads the metadata sidecar of a version directory.
///
/// A missing file yields an empty mapping, never an error; callers
/// merge their changes into the result before writing it back.
pub fn read(version_dir: &Path) -> Result<Map<String, Value>> {
    let path = version_dir.join(META_FILE);

    if !path.exists() {
        return Ok(Map::new());
    }

    let raw = std::fs::read_to_string(&path)?;
    let meta = serde_json::from_str(&raw)?;

    Ok(meta)
}

/// Writes the metadata sidecar of a version directory in full.
pub fn write(version_dir: &Path, meta: &Map<String, Value>) -> Result<()> {
    let path = version_dir.join(META_FILE);
    let raw = serde_json::to_string_pretty(meta)?;

    std::fs::write(&path, raw)?;

    debug!("Wrote metadata sidecar {:?}", path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_sidecar_yields_empty_mapping() {
        let tmp = tempfile::tempdir().unwrap();
        let meta = read(tmp.path()).unwrap();
        assert!(meta.is_empty());
    }

    #[test]
    fn read_modify_write_preserves_unknown_keys() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(META_FILE),
            r#"{"model_version": "v1.0", "trained_on": "imagenet"}"#,
        )
        .unwrap();

        let mut meta = read(tmp.path()).unwrap();
        meta.insert(
            MODEL_VERSION_KEY.to_string(),
            Value::String("v2.0".to_string()),
        );
        write(tmp.path(), &meta).unwrap();

        let reread = read(tmp.path()).unwrap();
        assert_eq!(reread[MODEL_VERSION_KEY], "v2.0");
        assert_eq!(reread["trained_on"], "imagenet");
    }

    #[test]
    fn read_rejects_corrupt_sidecar() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(META_FILE), "{not json").unwrap();
        assert!(read(tmp.path()).is_err());
    }
}
