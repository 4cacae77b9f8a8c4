//! Model configuration file patching
//!
//! The model configuration file (`config.pbtxt`) is treated as opaque
//! text except for a single directive line pinning the active version.
//! Patching rewrites that line in place; every other line passes
//! through unchanged apart from line-ending normalization.

use std::io::ErrorKind;
use std::path::Path;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use common::{Error, Result};

/// File name of the per-model configuration file
pub const CONFIG_FILE: &str = "config.pbtxt";

/// Prefix identifying the version directive line
const DIRECTIVE_PREFIX: &str = "version_policy: { specific: { versions: ";

static PINNED_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"versions: \[(\d+)\]").expect("valid pinned-version pattern"));

/// Rewrites the configuration file so the version directive pins the
/// given value.
///
/// The value is substituted textually and may be a version number or a
/// version directory name. A file with no directive line is rewritten
/// unchanged; the caller gets no indication that nothing was pinned.
pub fn pin_version(config_path: &Path, value: &str) -> Result<()> {
    let content = read_config(config_path)?;

    let mut output = String::with_capacity(content.len());
    for line in content.lines() {
        if line.starts_with(DIRECTIVE_PREFIX) {
            output.push_str(DIRECTIVE_PREFIX);
            output.push('[');
            output.push_str(value);
            output.push_str("]}}");
        } else {
            output.push_str(line);
        }
        output.push('\n');
    }

    std::fs::write(config_path, output)?;

    debug!("Pinned version [{}] in {:?}", value, config_path);

    Ok(())
}

/// Extracts the pinned version number from the configuration file.
pub fn pinned_version(config_path: &Path) -> Result<String> {
    let content = read_config(config_path)?;

    match PINNED_VERSION.captures(&content) {
        Some(caps) => Ok(caps[1].to_string()),
        None => Err(Error::VersionNotFound(config_path.display().to_string())),
    }
}

fn read_config(config_path: &Path) -> Result<String> {
    match std::fs::read_to_string(config_path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(Error::ConfigNotFound(config_path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE: &str = "name: \"resnet\"\n\
                          platform: \"onnxruntime_onnx\"\n\
                          version_policy: { specific: { versions: [2]}}\n\
                          max_batch_size: 8\n";

    fn sample_config(dir: &Path) -> PathBuf {
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn pin_version_rewrites_only_the_directive_line() {
        let tmp = tempfile::tempdir().unwrap();
        let path = sample_config(tmp.path());

        pin_version(&path, "7").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "name: \"resnet\"\n\
             platform: \"onnxruntime_onnx\"\n\
             version_policy: { specific: { versions: [7]}}\n\
             max_batch_size: 8\n"
        );
    }

    #[test]
    fn pin_version_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = sample_config(tmp.path());

        pin_version(&path, "3").unwrap();
        let once = std::fs::read(&path).unwrap();
        pin_version(&path, "3").unwrap();
        let twice = std::fs::read(&path).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn pin_version_preserves_lines_with_trailing_whitespace() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "max_batch_size: 8   \nversion_policy: { specific: { versions: [1]}}\n",
        )
        .unwrap();

        pin_version(&path, "2").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "max_batch_size: 8   \nversion_policy: { specific: { versions: [2]}}\n"
        );
    }

    #[test]
    fn pin_version_without_directive_leaves_file_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "name: \"resnet\"\n").unwrap();

        pin_version(&path, "5").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "name: \"resnet\"\n"
        );
    }

    #[test]
    fn pin_version_on_missing_config_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = pin_version(&tmp.path().join(CONFIG_FILE), "1").unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn pinned_version_extracts_the_directive_value() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "version_policy: { specific: { versions: [7]}}\n",
        )
        .unwrap();

        assert_eq!(pinned_version(&path).unwrap(), "7");
    }

    #[test]
    fn pinned_version_without_directive_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "name: \"resnet\"\n").unwrap();

        let err = pinned_version(&path).unwrap_err();
        assert!(matches!(err, Error::VersionNotFound(_)));
    }
}
