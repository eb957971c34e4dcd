//! Purpose: Read-only bundled-resource namespace keyed by slash-separated paths.
//! Exports: `Bundle`, `EmbeddedBundle`, `MemoryBundle`, `Anchor`, `ResourceSource`.
//! Role: Lookup facility for artifacts packaged alongside the application.
//! Invariants: Bundles are read-only; lookups never mutate anything.
//! Invariants: Resolved keys carry no leading slash.

use std::borrow::Cow;
use std::collections::HashMap;
use std::marker::PhantomData;

use rust_embed::RustEmbed;

/// Read-only byte provider keyed by slash-separated resource path.
pub trait Bundle {
    /// Bytes for `key`, or `None` when the bundle holds no such resource.
    fn load(&self, key: &str) -> Option<Cow<'_, [u8]>>;
}

/// Bundle over resources embedded at compile time with `rust-embed`.
pub struct EmbeddedBundle<A: RustEmbed> {
    assets: PhantomData<A>,
}

impl<A: RustEmbed> EmbeddedBundle<A> {
    pub fn new() -> Self {
        Self {
            assets: PhantomData,
        }
    }
}

impl<A: RustEmbed> Default for EmbeddedBundle<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: RustEmbed> Bundle for EmbeddedBundle<A> {
    fn load(&self, key: &str) -> Option<Cow<'_, [u8]>> {
        A::get(key).map(|file| file.data)
    }
}

/// Map-backed bundle for tests and programmatically assembled resources.
#[derive(Debug, Default)]
pub struct MemoryBundle {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryBundle {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries
            .insert(normalize_key(&key.into()).to_string(), bytes.into());
    }
}

impl Bundle for MemoryBundle {
    fn load(&self, key: &str) -> Option<Cow<'_, [u8]>> {
        self.entries
            .get(key)
            .map(|bytes| Cow::Borrowed(bytes.as_slice()))
    }
}

/// Logical directory within the bundle used as a base for relative lookups.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Anchor {
    prefix: String,
}

impl Anchor {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Where a resource lives in the namespace: an absolute key, or a path
/// resolved under an anchor.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResourceSource {
    Absolute(String),
    RelativeTo { anchor: Anchor, path: String },
}

impl ResourceSource {
    pub fn absolute(path: impl Into<String>) -> Self {
        ResourceSource::Absolute(path.into())
    }

    pub fn relative_to(anchor: Anchor, path: impl Into<String>) -> Self {
        ResourceSource::RelativeTo {
            anchor,
            path: path.into(),
        }
    }

    /// The namespace key this source resolves to.
    pub fn resolve(&self) -> String {
        match self {
            ResourceSource::Absolute(path) => normalize_key(path).to_string(),
            ResourceSource::RelativeTo { anchor, path } => {
                let path = normalize_key(path);
                if anchor.prefix.is_empty() {
                    path.to_string()
                } else {
                    format!("{}/{path}", anchor.prefix)
                }
            }
        }
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        match self {
            ResourceSource::Absolute(_) => None,
            ResourceSource::RelativeTo { anchor, .. } => Some(anchor),
        }
    }
}

fn normalize_key(key: &str) -> &str {
    key.trim_start_matches('/')
}

/// Final path segment of a resolved key.
pub(crate) fn file_name(key: &str) -> &str {
    match key.rsplit_once('/') {
        Some((_, name)) => name,
        None => key,
    }
}

/// Base name and optional extension of a resolved key's final segment.
pub(crate) fn split_name(key: &str) -> (&str, Option<&str>) {
    let name = file_name(key);
    match name.rsplit_once('.') {
        Some((base, extension)) if !base.is_empty() && !extension.is_empty() => {
            (base, Some(extension))
        }
        _ => (name, None),
    }
}
