//! Content access abstraction.
//!
//! An [`Asset`] is the content stored under some [`ArchivePath`](crate::ArchivePath)
//! within a store. Directory placeholders and nested archives are not assets;
//! they are distinct node kinds in the store, so every asset has content.

use std::io::Read;

/// An owned, freshly opened byte stream. Dropping it releases the
/// underlying resource.
pub type EntryStream = Box<dyn Read + Send>;

/// Content that can be opened repeatedly.
pub trait Asset: Send + Sync {
    /// Open a new stream over the content.
    ///
    /// Every call returns an independent stream; the caller owns it.
    fn open_stream(&self) -> std::io::Result<EntryStream>;

    /// Length in bytes, if known without reading the content.
    fn content_length(&self) -> Option<u64> {
        None
    }
}
