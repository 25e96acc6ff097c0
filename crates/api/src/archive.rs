use crate::asset::EntryStream;
use crate::error::ApiResult;
use crate::models::Manifest;
use std::sync::Arc;

/// Outcome of a mutation request against an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The mutation was carried out.
    Applied,
    /// The mutation was attempted and did not take effect.
    Failed,
    /// The archive does not support this kind of mutation at all.
    Unsupported,
}

impl MutationOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

/// Read-only archive contract expected by archive consumers.
///
/// Paths are plain strings; implementations normalize them. Only
/// [`get_entry`](Self::get_entry), [`entry_size`](Self::entry_size),
/// [`sub_archive`](Self::sub_archive) and [`manifest`](Self::manifest) can fail.
pub trait ReadableArchive: Send + Sync {
    fn name(&self) -> &str;

    /// Opaque identity of the form `archive://<name>`.
    fn uri(&self) -> String {
        format!("archive://{}", self.name())
    }

    /// Whether the archive itself exists.
    fn is_present(&self) -> bool {
        true
    }

    fn exists(&self, path: &str) -> bool;

    /// Open the content at `path`.
    ///
    /// `Ok(None)` means the entry exists but carries no content of its own
    /// (a directory, or a nested archive reachable via `sub_archive`).
    fn get_entry(&self, path: &str) -> ApiResult<Option<EntryStream>>;

    fn entry_size(&self, path: &str) -> ApiResult<u64>;

    /// Every entry path, in archive order. Each call returns a new snapshot.
    fn entries(&self) -> Vec<String>;

    fn entries_with_prefix(&self, prefix: &str) -> Vec<String>;

    fn directories(&self) -> Vec<String>;

    fn is_directory(&self, path: &str) -> bool;

    /// Whether `path` opens as a nested archive.
    fn is_archive(&self, path: &str) -> bool {
        self.sub_archive(path).is_ok()
    }

    fn sub_archive(&self, path: &str) -> ApiResult<Arc<dyn ReadableArchive>>;

    fn manifest(&self) -> ApiResult<Option<Manifest>>;

    /// Total archive size, when tracked.
    fn archive_size(&self) -> Option<u64> {
        None
    }

    fn delete(&self) -> MutationOutcome {
        MutationOutcome::Unsupported
    }

    fn rename_to(&self, _name: &str) -> MutationOutcome {
        MutationOutcome::Unsupported
    }

    fn close(&self) -> ApiResult<()> {
        Ok(())
    }
}
