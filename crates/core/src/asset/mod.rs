//! Concrete [`Asset`] implementations.
//!
//! - [`BytesAsset`]: shared in-memory bytes
//! - [`FileAsset`]: a file on disk, reopened on every read
//! - [`LazyAsset`]: a stream factory with no size metadata

use archview_api::{Asset, EntryStream};
use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// In-memory content. Clones share the same buffer.
#[derive(Clone)]
pub struct BytesAsset {
    bytes: Arc<[u8]>,
}

impl BytesAsset {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn from_string(text: impl Into<String>) -> Self {
        Self::new(text.into().into_bytes())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Asset for BytesAsset {
    fn open_stream(&self) -> io::Result<EntryStream> {
        Ok(Box::new(Cursor::new(SharedBytes(self.bytes.clone()))))
    }

    fn content_length(&self) -> Option<u64> {
        Some(self.bytes.len() as u64)
    }
}

impl fmt::Debug for BytesAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BytesAsset")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// `AsRef<[u8]>` wrapper so a `Cursor` can read from an `Arc<[u8]>`
/// without copying it.
pub(crate) struct SharedBytes(pub(crate) Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Content backed by a file on disk.
///
/// The file must exist when the asset is created. Its length is read from
/// the metadata on each `content_length` call, so it tracks later writes.
#[derive(Debug, Clone)]
pub struct FileAsset {
    path: PathBuf,
}

impl FileAsset {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::metadata(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Asset for FileAsset {
    fn open_stream(&self) -> io::Result<EntryStream> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn content_length(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|meta| meta.len())
    }
}

type StreamFactory = dyn Fn() -> io::Result<EntryStream> + Send + Sync;

/// Content produced on demand by a factory closure.
///
/// Nothing about the content is known up front, so sizing it requires
/// reading the whole stream.
pub struct LazyAsset {
    factory: Box<StreamFactory>,
}

impl LazyAsset {
    pub fn new<F, R>(factory: F) -> Self
    where
        F: Fn() -> io::Result<R> + Send + Sync + 'static,
        R: Read + Send + 'static,
    {
        Self {
            factory: Box::new(move || Ok(Box::new(factory()?) as EntryStream)),
        }
    }
}

impl Asset for LazyAsset {
    fn open_stream(&self) -> io::Result<EntryStream> {
        (self.factory)()
    }
}

impl fmt::Debug for LazyAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazyAsset")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn read_all(asset: &dyn Asset) -> Vec<u8> {
        let mut buf = Vec::new();
        asset.open_stream().unwrap().read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_bytes_asset_streams_are_independent() {
        let asset = BytesAsset::from_string("hello");
        let mut first = asset.open_stream().unwrap();
        let mut head = [0u8; 2];
        first.read_exact(&mut head).unwrap();

        assert_eq!(&head, b"he");
        assert_eq!(read_all(&asset), b"hello");
        assert_eq!(asset.content_length(), Some(5));
    }

    #[test]
    fn test_file_asset_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"on disk").unwrap();
        file.flush().unwrap();

        let asset = FileAsset::new(file.path()).unwrap();
        assert_eq!(asset.content_length(), Some(7));
        assert_eq!(read_all(&asset), b"on disk");
    }

    #[test]
    fn test_file_asset_length_follows_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grows.txt");
        std::fs::write(&path, b"abc").unwrap();

        let asset = FileAsset::new(&path).unwrap();
        assert_eq!(asset.content_length(), Some(3));

        std::fs::write(&path, b"abcdefgh").unwrap();
        assert_eq!(asset.content_length(), Some(8));
        assert_eq!(read_all(&asset).len(), 8);
    }

    #[test]
    fn test_file_asset_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileAsset::new(dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_lazy_asset_has_no_length() {
        let asset = LazyAsset::new(|| Ok(Cursor::new(b"streamed".to_vec())));
        assert_eq!(asset.content_length(), None);
        assert_eq!(read_all(&asset), b"streamed");
    }
}
