//! Purpose: Load staged native libraries into the running process.
//! Exports: `LoadOutcome`, `NativeLoader`.
//! Role: Thin wrapper over the host dynamic loader with captured rejections.
//! Invariants: Link-level rejection never escapes as an error or panic.
//! Invariants: Loaded handles live as long as the loader that created them.

use std::path::Path;

use libloading::Library;

use crate::core::bundle::{Bundle, ResourceSource};
use crate::core::error::Error;
use crate::core::stage::{self, CleanupRegistry};

/// Result of one attempt against the host dynamic loader.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded,
    Rejected { reason: String },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded)
    }
}

/// Stages bundled libraries and keeps successfully loaded handles alive.
///
/// Keep the loader alive for as long as loaded symbols may be called; most
/// applications hold one for the life of the process. Loading the same
/// library twice is not deduplicated here; host `dlopen` semantics apply.
#[derive(Default)]
pub struct NativeLoader {
    registry: CleanupRegistry,
    libraries: Vec<Library>,
}

impl NativeLoader {
    pub fn new() -> Self {
        Self {
            registry: CleanupRegistry::new(),
            libraries: Vec::new(),
        }
    }

    /// Attempt to load an on-disk library.
    ///
    /// A rejection by the host loader (wrong architecture, missing
    /// dependency, corrupt artifact) comes back as an outcome, not an error.
    pub fn load_staged(&mut self, path: &Path) -> LoadOutcome {
        // SAFETY: loading a library runs its initializers; the contract is
        // that callers only stage artifacts bundled with their application.
        match unsafe { Library::new(path) } {
            Ok(library) => {
                self.libraries.push(library);
                tracing::debug!(path = %path.display(), "loaded native library");
                LoadOutcome::Loaded
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "host loader rejected library");
                LoadOutcome::Rejected {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Stage `library_path` out of `bundle` and load it.
    ///
    /// `library_path` is an absolute identifier within the bundle namespace.
    /// Extraction-phase failures (missing resource, scratch dir, copy)
    /// propagate as errors; only link-level rejection comes back as
    /// `Ok(LoadOutcome::Rejected { .. })`.
    pub fn load_from_bundle(
        &mut self,
        bundle: &dyn Bundle,
        library_path: &str,
    ) -> Result<LoadOutcome, Error> {
        let source = ResourceSource::absolute(library_path);
        let staged = stage::materialize_resource(bundle, &source, &mut self.registry)?;
        Ok(self.load_staged(&staged))
    }

    /// Number of libraries this loader has loaded and is keeping alive.
    pub fn loaded_count(&self) -> usize {
        self.libraries.len()
    }

    pub fn registry(&self) -> &CleanupRegistry {
        &self.registry
    }
}
