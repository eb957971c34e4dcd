//! Purpose: Stage bundled native libraries to scratch files and load them.
//! Exports: `api` (bundle lookup, staging, dynamic loading, platform probe).
//! Role: Library crate consumed by applications that ship native artifacts.
//! Invariants: Extraction failures are errors; loader rejection is an outcome.
//! Invariants: Every scratch path created here is owned by a `CleanupRegistry`.
#![allow(clippy::result_large_err)]
pub mod api;
mod core;
