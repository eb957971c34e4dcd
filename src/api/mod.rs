//! Purpose: Define the stable public Rust API boundary for libstage.
//! Exports: Bundle lookup, staging, dynamic loading, platform probes, errors.
//! Role: Public, additive-only surface; hides internal core modules.
//! Invariants: This module is the only public path to core primitives.
//! Invariants: Internal modules remain private and are not directly exposed.

pub use crate::core::bundle::{Anchor, Bundle, EmbeddedBundle, MemoryBundle, ResourceSource};
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::load::{LoadOutcome, NativeLoader};
pub use crate::core::platform::{OsFamily, library_file_name, running_on_linux, running_on_mac};
pub use crate::core::stage::{CleanupRegistry, SCRATCH_PREFIX, materialize_resource};
