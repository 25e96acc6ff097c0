//! Insertion-ordered, path-addressed content store.
//!
//! A store is populated once through the `add_*` methods and then shared
//! (usually as `Arc<ContentStore>`) with read-only views. Paths are unique;
//! adding an existing path replaces its node but keeps its position.

mod node;

pub use node::{Node, NodeKind};

use crate::asset::BytesAsset;
use archview_api::{ArchivePath, Asset};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    name: String,
    entries: IndexMap<ArchivePath, Node>,
}

impl ContentStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a node, returning the one it replaced.
    pub fn insert(&mut self, path: impl Into<ArchivePath>, node: Node) -> Option<Node> {
        let path = path.into();
        trace!("{}: {} <- {}", self.name, path, node.kind());
        self.entries.insert(path, node)
    }

    pub fn add(&mut self, path: impl Into<ArchivePath>, asset: impl Asset + 'static) -> &mut Self {
        self.insert(path, Node::content(asset));
        self
    }

    pub fn add_bytes(
        &mut self,
        path: impl Into<ArchivePath>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> &mut Self {
        self.add(path, BytesAsset::new(bytes))
    }

    pub fn add_directory(&mut self, path: impl Into<ArchivePath>) -> &mut Self {
        self.insert(path, Node::Directory);
        self
    }

    /// Add a nested store that has no bytes of its own.
    pub fn add_archive(
        &mut self,
        path: impl Into<ArchivePath>,
        store: impl Into<Arc<ContentStore>>,
    ) -> &mut Self {
        self.insert(
            path,
            Node::Archive {
                store: store.into(),
                content: None,
            },
        );
        self
    }

    /// Add a nested store together with the archive bytes it was parsed
    /// from, so the entry can also be read as a plain file.
    pub fn add_archive_with_content(
        &mut self,
        path: impl Into<ArchivePath>,
        store: impl Into<Arc<ContentStore>>,
        content: impl Asset + 'static,
    ) -> &mut Self {
        self.insert(
            path,
            Node::Archive {
                store: store.into(),
                content: Some(Arc::new(content)),
            },
        );
        self
    }

    pub fn get(&self, path: &ArchivePath) -> Option<&Node> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &ArchivePath) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ArchivePath, &Node)> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &ArchivePath> {
        self.entries.keys()
    }
}
