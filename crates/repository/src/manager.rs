//! Model repository manager
//!
//! This module composes archive unpacking, version allocation, config
//! patching, and metadata bookkeeping into the upload, version-switch,
//! and version-query operations exposed over HTTP.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use dashmap::DashMap;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{info, warn};

use common::{Error, Result};
use crate::{archive, config, metadata, versioning};

/// Manager for a versioned model repository rooted at a single directory
///
/// Composite operations hold a per-model lock for their whole sequence,
/// so concurrent requests against the same model cannot race a slot
/// allocation against an extraction or interleave config rewrites.
/// There is still no rollback on partial failure: a bad archive leaves
/// its (possibly empty) version directory behind.
pub struct ModelRepository {
    /// Repository root directory
    root: PathBuf,

    /// Per-model locks (model name -> lock)
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ModelRepository {
    /// Creates a new repository manager rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.exists() {
            std::fs::create_dir_all(&root)?;
        }

        info!("Model repository rooted at {:?}", root);

        Ok(Self {
            root,
            locks: DashMap::new(),
        })
    }

    /// Returns the repository root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn model_lock(&self, model_name: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(model_name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn model_path(&self, model_name: &str) -> PathBuf {
        self.root.join(model_name)
    }

    fn config_path(&self, model_name: &str) -> PathBuf {
        self.model_path(model_name).join(config::CONFIG_FILE)
    }

    /// Uploads an archive into a fixed version slot (default 1).
    ///
    /// Returns the version number the archive was extracted into.
    pub async fn upload(
        &self,
        model_name: &str,
        version: Option<u32>,
        archive_path: &Path,
    ) -> Result<u32> {
        let lock = self.model_lock(model_name);
        let _guard = lock.lock().await;

        let version = version.unwrap_or(1);
        let version_dir = self.model_path(model_name).join(version.to_string());

        info!("Uploading model '{}' into version {}", model_name, version);

        archive::unpack(archive_path, &version_dir)?;

        Ok(version)
    }

    /// Uploads an archive into the next free version slot and stamps the
    /// supplied semantic label onto it.
    ///
    /// Fails with `VersionAlreadyExists` when the label is already
    /// mapped to an existing version. Returns the allocated numeric
    /// directory name.
    pub async fn upload_new_version(
        &self,
        model_name: &str,
        label: &str,
        archive_path: &Path,
    ) -> Result<String> {
        let lock = self.model_lock(model_name);
        let _guard = lock.lock().await;

        let model_path = self.model_path(model_name);

        if let Some(existing) = versioning::resolve_label(&model_path, label)? {
            warn!(
                "Rejecting upload of model '{}': label '{}' already maps to version {}",
                model_name, label, existing
            );
            return Err(Error::VersionAlreadyExists(label.to_string()));
        }

        let slot = versioning::next_free_slot(&model_path);
        let version_dir = model_path.join(slot.to_string());

        info!(
            "Uploading model '{}' label '{}' into version {}",
            model_name, label, slot
        );

        archive::unpack(archive_path, &version_dir)?;

        let mut meta = metadata::read(&version_dir)?;
        meta.insert(
            metadata::MODEL_VERSION_KEY.to_string(),
            Value::String(label.to_string()),
        );
        metadata::write(&version_dir, &meta)?;

        Ok(slot.to_string())
    }

    /// Pins the active version of a model to the given number
    pub async fn set_version(&self, model_name: &str, version: u32) -> Result<()> {
        let lock = self.model_lock(model_name);
        let _guard = lock.lock().await;

        info!("Setting model '{}' active version to {}", model_name, version);

        config::pin_version(&self.config_path(model_name), &version.to_string())
    }

    /// Resolves a semantic label and pins the active version to the
    /// version directory it maps to.
    ///
    /// Returns the resolved numeric directory name.
    pub async fn set_semantic_version(&self, model_name: &str, label: &str) -> Result<String> {
        let lock = self.model_lock(model_name);
        let _guard = lock.lock().await;

        let resolved = versioning::resolve_label(&self.model_path(model_name), label)?
            .ok_or_else(|| Error::SemanticVersionNotFound(label.to_string()))?;

        info!(
            "Setting model '{}' active version to {} (label '{}')",
            model_name, resolved, label
        );

        config::pin_version(&self.config_path(model_name), &resolved)?;

        Ok(resolved)
    }

    /// Returns the version number currently pinned in the model's
    /// configuration file
    pub async fn active_version(&self, model_name: &str) -> Result<String> {
        config::pinned_version(&self.config_path(model_name))
    }

    /// Returns the metadata of the currently pinned version.
    ///
    /// Fails with `MetaNotFound` when the pinned version directory has
    /// no metadata sidecar.
    pub async fn active_metadata(&self, model_name: &str) -> Result<Map<String, Value>> {
        let version = self.active_version(model_name).await?;
        let version_dir = self.model_path(model_name).join(&version);

        if !version_dir.join(metadata::META_FILE).exists() {
            return Err(Error::MetaNotFound(model_name.to_string()));
        }

        metadata::read(&version_dir)
    }
}
