//! Purpose: Materialize bundled resources into scratch files on disk.
//! Exports: `CleanupRegistry`, `materialize_resource`, `SCRATCH_PREFIX`.
//! Role: Bridge from the read-only bundle namespace to loader-visible paths.
//! Invariants: Scratch dirs are registered with their registry at creation time.
//! Invariants: Staged files keep the resource's own base name and extension.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::bundle::{self, Bundle, ResourceSource};
use crate::core::error::{Error, ErrorKind};

/// Prefix for scratch directories created by `materialize_resource`.
pub const SCRATCH_PREFIX: &str = "libstage";

/// Owns scratch directories for staged artifacts.
///
/// Removal is best-effort on drop; call `remove_all` at shutdown to observe
/// failures. Registration happens synchronously as part of creation, so a
/// registry always covers every path it handed out.
#[derive(Debug, Default)]
pub struct CleanupRegistry {
    dirs: Vec<TempDir>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self { dirs: Vec::new() }
    }

    /// Create a uniquely named scratch directory and register it for removal.
    pub fn create_scratch_dir(&mut self, prefix: &str) -> Result<PathBuf, Error> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .map_err(|err| {
                Error::new(ErrorKind::TempDir)
                    .with_message("failed to create scratch directory")
                    .with_source(err)
            })?;
        let path = dir.path().to_path_buf();
        self.dirs.push(dir);
        tracing::debug!(path = %path.display(), "created scratch directory");
        Ok(path)
    }

    /// Paths currently registered for removal.
    pub fn registered_dirs(&self) -> Vec<&Path> {
        self.dirs.iter().map(TempDir::path).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Remove every registered directory now, reporting the first failure.
    pub fn remove_all(mut self) -> Result<(), Error> {
        for dir in self.dirs.drain(..) {
            let path = dir.path().to_path_buf();
            dir.close().map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to remove scratch directory")
                    .with_path(path)
                    .with_source(err)
            })?;
        }
        Ok(())
    }
}

/// Copy `source` out of `bundle` into a fresh scratch file and return its path.
///
/// Resolution runs before any filesystem mutation, so a missing resource
/// creates no temp path at all. The scratch directory is registered with
/// `registry` before the copy begins, and the staged file is created inside
/// it, so every partial extraction stays covered by the registry.
pub fn materialize_resource(
    bundle: &dyn Bundle,
    source: &ResourceSource,
    registry: &mut CleanupRegistry,
) -> Result<PathBuf, Error> {
    let key = source.resolve();
    let Some(bytes) = bundle.load(&key) else {
        let mut err = Error::new(ErrorKind::NotFound)
            .with_message("resource not found in bundle")
            .with_resource(key)
            .with_hint("Check the bundled artifact name for this platform.");
        if let Some(anchor) = source.anchor() {
            err = err.with_anchor(anchor.prefix());
        }
        return Err(err);
    };
    tracing::debug!(resource = %key, len = bytes.len(), "resolved bundled resource");

    let dir = registry.create_scratch_dir(SCRATCH_PREFIX)?;

    let (base, extension) = bundle::split_name(&key);
    let mut builder = tempfile::Builder::new();
    builder.prefix(base);
    let dotted = extension.map(|extension| format!(".{extension}"));
    if let Some(dotted) = dotted.as_deref() {
        builder.suffix(dotted);
    }
    let staged = builder.tempfile_in(&dir).map_err(|err| {
        Error::new(ErrorKind::CopyFailed)
            .with_message("failed to create staged file")
            .with_resource(key.clone())
            .with_path(&dir)
            .with_source(err)
    })?;

    // The scratch dir owns cleanup; keep the file past this call.
    let (mut handle, path) = staged.keep().map_err(|err| {
        Error::new(ErrorKind::CopyFailed)
            .with_message("failed to retain staged file")
            .with_resource(key.clone())
            .with_path(&dir)
            .with_source(err.error)
    })?;

    handle
        .write_all(&bytes)
        .and_then(|_| handle.flush())
        .map_err(|err| {
            Error::new(ErrorKind::CopyFailed)
                .with_message("failed to copy resource to staged file")
                .with_resource(key.clone())
                .with_path(&path)
                .with_source(err)
        })?;

    tracing::debug!(resource = %key, path = %path.display(), "staged bundled resource");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{CleanupRegistry, SCRATCH_PREFIX, materialize_resource};
    use crate::core::bundle::{Anchor, MemoryBundle, ResourceSource};
    use crate::core::error::ErrorKind;

    fn bundle_with(key: &str, bytes: &[u8]) -> MemoryBundle {
        let mut bundle = MemoryBundle::new();
        bundle.insert(key, bytes.to_vec());
        bundle
    }

    #[test]
    fn staged_file_round_trips_resource_bytes() {
        let payload = b"\x7fELF not really, but the bytes must match";
        let bundle = bundle_with("native/libfoo.so", payload);
        let mut registry = CleanupRegistry::new();

        let path = materialize_resource(
            &bundle,
            &ResourceSource::absolute("/native/libfoo.so"),
            &mut registry,
        )
        .expect("materialize");

        assert_eq!(std::fs::read(&path).expect("read staged"), payload);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn staged_file_carries_base_name_and_extension() {
        let bundle = bundle_with("native/libfoo.so", b"bytes");
        let mut registry = CleanupRegistry::new();

        let path = materialize_resource(
            &bundle,
            &ResourceSource::absolute("/native/libfoo.so"),
            &mut registry,
        )
        .expect("materialize");

        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .expect("staged name");
        assert!(name.starts_with("libfoo"));
        assert!(name.ends_with(".so"));
    }

    #[test]
    fn missing_resource_creates_no_scratch_dirs() {
        let bundle = MemoryBundle::new();
        let mut registry = CleanupRegistry::new();

        let err = materialize_resource(
            &bundle,
            &ResourceSource::absolute("/does-not-exist.so"),
            &mut registry,
        )
        .expect_err("missing resource");

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.resource(), Some("does-not-exist.so"));
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_anchored_resource_names_the_anchor() {
        let bundle = MemoryBundle::new();
        let mut registry = CleanupRegistry::new();
        let source = ResourceSource::relative_to(Anchor::new("native/linux"), "libfoo.so");

        let err = materialize_resource(&bundle, &source, &mut registry).expect_err("missing");

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.resource(), Some("native/linux/libfoo.so"));
        assert_eq!(err.anchor(), Some("native/linux"));
    }

    #[test]
    fn dropping_the_registry_removes_scratch_dirs() {
        let bundle = bundle_with("libfoo.so", b"bytes");
        let mut registry = CleanupRegistry::new();

        let path = materialize_resource(
            &bundle,
            &ResourceSource::absolute("/libfoo.so"),
            &mut registry,
        )
        .expect("materialize");
        let dir = registry.registered_dirs()[0].to_path_buf();
        assert!(path.exists());

        drop(registry);
        assert!(!path.exists());
        assert!(!dir.exists());
    }

    #[test]
    fn remove_all_drains_the_registry() {
        let mut registry = CleanupRegistry::new();
        let dir = registry.create_scratch_dir(SCRATCH_PREFIX).expect("scratch");
        assert!(dir.exists());

        registry.remove_all().expect("remove_all");
        assert!(!dir.exists());
    }
}
