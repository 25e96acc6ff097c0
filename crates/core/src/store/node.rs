use super::ContentStore;
use archview_api::{Asset, EntryStream};
use std::fmt;
use std::sync::Arc;

/// What lives at a path in a [`ContentStore`].
#[derive(Clone)]
pub enum Node {
    /// Content that can be opened as a stream.
    Content(Arc<dyn Asset>),
    /// Logical directory with no content of its own.
    Directory,
    /// A nested store, e.g. a jar inside a war. `content` holds the
    /// archive's own bytes when they came from disk; stores assembled in
    /// memory have none.
    Archive {
        store: Arc<ContentStore>,
        content: Option<Arc<dyn Asset>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Content,
    Directory,
    Archive,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Content => "content",
            NodeKind::Directory => "directory",
            NodeKind::Archive => "archive",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    pub fn content(asset: impl Asset + 'static) -> Self {
        Node::Content(Arc::new(asset))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Content(_) => NodeKind::Content,
            Node::Directory => NodeKind::Directory,
            Node::Archive { .. } => NodeKind::Archive,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory)
    }

    /// The asset behind this node's own bytes, if it has any.
    pub fn asset(&self) -> Option<&Arc<dyn Asset>> {
        match self {
            Node::Content(asset) => Some(asset),
            Node::Archive { content, .. } => content.as_ref(),
            Node::Directory => None,
        }
    }

    /// Open the node's own content. Directories, and nested archives built
    /// without backing bytes, yield `Ok(None)`.
    pub fn open(&self) -> std::io::Result<Option<EntryStream>> {
        self.asset().map(|asset| asset.open_stream()).transpose()
    }

    pub fn as_archive(&self) -> Option<&Arc<ContentStore>> {
        match self {
            Node::Archive { store, .. } => Some(store),
            _ => None,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Content(asset) => f
                .debug_struct("Content")
                .field("len", &asset.content_length())
                .finish(),
            Node::Directory => f.write_str("Directory"),
            Node::Archive { store, content } => f
                .debug_struct("Archive")
                .field("name", &store.name())
                .field("len", &content.as_ref().and_then(|c| c.content_length()))
                .finish(),
        }
    }
}
