//! Populate a [`ContentStore`](crate::ContentStore) from disk.
//!
//! Concrete loaders:
//! - [`load_zip`] - zip-format archives (jar, war, ear, zip)
//! - [`load_dir`] - an exploded directory tree
//!
//! Both can expand archive-typed entries into nested stores.

mod archive;
mod dir;

pub use archive::load_zip;
pub use dir::load_dir;

use archview_api::ArchivePath;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Turn entries with an archive extension into nested stores.
    pub expand_nested: bool,
    /// Extensions (without dot, lower case) treated as nested archives.
    pub nested_extensions: Vec<String>,
    /// Nesting levels to expand; archives below this depth stay plain content.
    pub max_nesting_depth: usize,
    /// Follow symbolic links when walking directories.
    pub follow_links: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            expand_nested: true,
            nested_extensions: ["jar", "war", "ear", "rar", "zip"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_nesting_depth: 8,
            follow_links: false,
        }
    }
}

impl LoadOptions {
    pub fn with_expand_nested(mut self, expand: bool) -> Self {
        self.expand_nested = expand;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Whether an entry at `depth` (0 = top-level archive) should be
    /// expanded into a nested store.
    fn should_expand(&self, path: &ArchivePath, depth: usize) -> bool {
        if !self.expand_nested || depth >= self.max_nesting_depth {
            return false;
        }
        path.file_name()
            .and_then(|name| name.rsplit_once('.'))
            .is_some_and(|(_, ext)| {
                self.nested_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}

/// Store name for an on-disk archive: its file name.
fn store_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
