//! Read-only [`ReadableArchive`] adapter over a [`ContentStore`].

use crate::store::{ContentStore, Node};
use archview_api::{ApiError, ApiResult, ArchivePath, EntryStream, Manifest, ReadableArchive};
use std::io::{self, Read};
use std::sync::Arc;
use tracing::{debug, trace};

/// How `entries_with_prefix` compares a prefix against entry paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrefixMode {
    /// Plain string prefix on the raw query: `/foo` also matches `/foobar`.
    #[default]
    Loose,
    /// Path-segment prefix on the normalized query: `/foo` matches `/foo`
    /// and `/foo/...` only.
    Segment,
}

#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub prefix_mode: PrefixMode,
}

impl ViewOptions {
    pub fn with_prefix_mode(mut self, mode: PrefixMode) -> Self {
        self.prefix_mode = mode;
        self
    }
}

/// Presents a store through the read-only archive contract.
///
/// The view never mutates the store, so clones can be handed to any
/// number of readers.
#[derive(Debug, Clone)]
pub struct ArchiveView {
    store: Arc<ContentStore>,
    options: ViewOptions,
}

impl ArchiveView {
    pub fn new(store: impl Into<Arc<ContentStore>>) -> Self {
        Self::with_options(store, ViewOptions::default())
    }

    pub fn with_options(store: impl Into<Arc<ContentStore>>, options: ViewOptions) -> Self {
        Self {
            store: store.into(),
            options,
        }
    }

    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    fn lookup(&self, path: &str) -> ApiResult<(ArchivePath, &Node)> {
        let path = ArchivePath::new(path);
        match self.store.get(&path) {
            Some(node) => Ok((path, node)),
            None => Err(ApiError::NotFound(path.to_string())),
        }
    }

    fn matches_prefix(&self, path: &ArchivePath, prefix: &str) -> bool {
        match self.options.prefix_mode {
            PrefixMode::Loose => path.as_str().starts_with(prefix),
            PrefixMode::Segment => path.is_within(&ArchivePath::new(prefix)),
        }
    }
}

/// Count the bytes of a stream by reading it to the end.
fn drain_len(mut stream: EntryStream) -> io::Result<u64> {
    io::copy(&mut stream, &mut io::sink())
}

impl ReadableArchive for ArchiveView {
    fn name(&self) -> &str {
        self.store.name()
    }

    fn exists(&self, path: &str) -> bool {
        self.store.contains(&ArchivePath::new(path))
    }

    fn get_entry(&self, path: &str) -> ApiResult<Option<EntryStream>> {
        let (path, node) = self.lookup(path)?;
        node.open().map_err(|e| ApiError::io(path.as_str(), e))
    }

    /// Sizes come from the asset when it knows them. Otherwise the content
    /// is read once in full to count it, so the cost is O(content size) on
    /// every call.
    fn entry_size(&self, path: &str) -> ApiResult<u64> {
        let (path, node) = self.lookup(path)?;
        let Some(asset) = node.asset() else {
            return Err(ApiError::NoContent(path.to_string()));
        };

        if let Some(len) = asset.content_length() {
            return Ok(len);
        }

        debug!("Sizing {} by reading its content", path);
        let stream = asset
            .open_stream()
            .map_err(|e| ApiError::io(path.as_str(), e))?;
        drain_len(stream).map_err(|e| ApiError::io(path.as_str(), e))
    }

    fn entries(&self) -> Vec<String> {
        self.store.paths().map(|p| p.to_string()).collect()
    }

    fn entries_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.store
            .paths()
            .filter(|p| self.matches_prefix(p, prefix))
            .map(|p| p.to_string())
            .collect()
    }

    fn directories(&self) -> Vec<String> {
        self.store
            .iter()
            .filter(|(_, node)| node.is_directory())
            .map(|(p, _)| p.to_string())
            .collect()
    }

    fn is_directory(&self, path: &str) -> bool {
        self.store
            .get(&ArchivePath::new(path))
            .is_some_and(Node::is_directory)
    }

    fn is_archive(&self, path: &str) -> bool {
        self.store
            .get(&ArchivePath::new(path))
            .is_some_and(|node| node.as_archive().is_some())
    }

    fn sub_archive(&self, path: &str) -> ApiResult<Arc<dyn ReadableArchive>> {
        let (path, node) = self.lookup(path)?;
        match node.as_archive() {
            Some(inner) => {
                trace!("Descending into {} of {}", path, self.name());
                Ok(Arc::new(ArchiveView::with_options(
                    inner.clone(),
                    self.options.clone(),
                )))
            }
            None => Err(ApiError::WrongHandleKind {
                path: path.to_string(),
                kind: node.kind().as_str(),
            }),
        }
    }

    fn manifest(&self) -> ApiResult<Option<Manifest>> {
        let path = ArchivePath::new(Manifest::PATH);
        let Some(node) = self.store.get(&path) else {
            return Ok(None);
        };
        let Some(mut stream) = node.open().map_err(|e| ApiError::io(path.as_str(), e))? else {
            return Ok(None);
        };

        let mut bytes = Vec::new();
        stream
            .read_to_end(&mut bytes)
            .map_err(|e| ApiError::io(path.as_str(), e))?;
        Manifest::from_bytes(&bytes).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::LazyAsset;
    use archview_api::{Asset, MutationOutcome};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// The store from the documented example: a file, a directory and a
    /// file inside it.
    fn sample_view() -> ArchiveView {
        let mut store = ContentStore::new("sample.jar");
        store
            .add_bytes("/a.txt", b"hello".as_slice())
            .add_directory("/dir")
            .add_bytes("/dir/b.txt", b"hi".as_slice());
        ArchiveView::new(store)
    }

    fn read_entry(view: &dyn ReadableArchive, path: &str) -> String {
        let mut text = String::new();
        view.get_entry(path)
            .unwrap()
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    #[test]
    fn test_sample_scenario() {
        let view = sample_view();

        assert_eq!(view.entries_with_prefix("/dir"), vec!["/dir", "/dir/b.txt"]);
        assert!(view.is_directory("/dir"));
        assert_eq!(view.entry_size("/a.txt").unwrap(), 5);
        assert!(matches!(
            view.get_entry("/missing"),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_exists_and_resolve() {
        let view = sample_view();
        assert!(view.is_present());
        assert!(view.exists("/a.txt"));
        assert!(view.exists("a.txt"));
        assert!(!view.exists("/nope"));
        assert_eq!(read_entry(&view, "dir/b.txt"), "hi");
    }

    #[test]
    fn test_directory_resolves_to_no_stream() {
        let view = sample_view();
        assert!(view.get_entry("/dir").unwrap().is_none());
        assert!(matches!(
            view.entry_size("/dir"),
            Err(ApiError::NoContent(_))
        ));
    }

    #[test]
    fn test_entries_snapshot_is_restartable() {
        let view = sample_view();
        let first = view.entries();
        let second = view.entries();
        assert_eq!(first, vec!["/a.txt", "/dir", "/dir/b.txt"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_loose_prefix_matches_partial_segments() {
        let mut store = ContentStore::new("prefix.jar");
        store
            .add_bytes("/foo", b"".as_slice())
            .add_bytes("/foobar", b"".as_slice())
            .add_bytes("/foo/x", b"".as_slice())
            .add_bytes("/bar", b"".as_slice());
        let view = ArchiveView::new(store);

        assert_eq!(
            view.entries_with_prefix("/foo"),
            vec!["/foo", "/foobar", "/foo/x"]
        );
        assert!(view.entries_with_prefix("foo").is_empty());
    }

    #[test]
    fn test_segment_prefix_respects_boundaries() {
        let mut store = ContentStore::new("prefix.jar");
        store
            .add_bytes("/foo", b"".as_slice())
            .add_bytes("/foobar", b"".as_slice())
            .add_bytes("/foo/x", b"".as_slice());
        let view = ArchiveView::with_options(
            store,
            ViewOptions::default().with_prefix_mode(PrefixMode::Segment),
        );

        assert_eq!(view.entries_with_prefix("/foo"), vec!["/foo", "/foo/x"]);
        assert_eq!(view.entries_with_prefix("foo/"), vec!["/foo", "/foo/x"]);
        assert_eq!(view.entries_with_prefix("/").len(), 3);
    }

    #[test]
    fn test_empty_content_is_not_a_directory() {
        let mut store = ContentStore::new("empty.jar");
        store.add_bytes("/empty.txt", Vec::new());
        let view = ArchiveView::new(store);

        assert!(!view.is_directory("/empty.txt"));
        assert!(view.directories().is_empty());
        assert_eq!(view.entry_size("/empty.txt").unwrap(), 0);
    }

    #[test]
    fn test_size_of_unsized_asset_drains_stream_each_call() {
        let opened = Arc::new(AtomicUsize::new(0));
        let counter = opened.clone();
        let mut store = ContentStore::new("lazy.jar");
        store.add(
            "/stream.bin",
            LazyAsset::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Cursor::new(vec![7u8; 4096]))
            }),
        );
        let view = ArchiveView::new(store);

        assert_eq!(view.entry_size("/stream.bin").unwrap(), 4096);
        assert_eq!(view.entry_size("/stream.bin").unwrap(), 4096);
        assert_eq!(opened.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_size_of_sized_asset_does_not_open_stream() {
        struct Counted {
            opened: Arc<AtomicUsize>,
        }
        impl Asset for Counted {
            fn open_stream(&self) -> io::Result<EntryStream> {
                self.opened.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(Cursor::new(vec![0u8; 3])))
            }
            fn content_length(&self) -> Option<u64> {
                Some(3)
            }
        }

        let opened = Arc::new(AtomicUsize::new(0));
        let mut store = ContentStore::new("sized.jar");
        store.add(
            "/sized.bin",
            Counted {
                opened: opened.clone(),
            },
        );
        let view = ArchiveView::new(store);

        assert_eq!(view.entry_size("/sized.bin").unwrap(), 3);
        assert_eq!(view.entry_size("/sized.bin").unwrap(), 3);
        assert_eq!(opened.load(Ordering::SeqCst), 0);

        read_entry(&view, "/sized.bin");
        assert_eq!(opened.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_size_read_failure_is_wrapped() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk on fire"))
            }
        }

        let mut store = ContentStore::new("broken.jar");
        store.add("/broken", LazyAsset::new(|| Ok(Broken)));
        let view = ArchiveView::new(store);

        match view.entry_size("/broken") {
            Err(ApiError::Io { path, .. }) => assert_eq!(path, "/broken"),
            other => panic!("expected Io error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_sub_archive() {
        let mut inner = ContentStore::new("inner.jar");
        inner.add_bytes("/com/example/A.class", b"\xCA\xFE\xBA\xBE".as_slice());

        let mut outer = ContentStore::new("app.war");
        outer
            .add_directory("/WEB-INF")
            .add_archive("/WEB-INF/lib/inner.jar", inner);
        let view = ArchiveView::new(outer);

        let sub = view.sub_archive("/WEB-INF/lib/inner.jar").unwrap();
        assert_eq!(sub.name(), "inner.jar");
        assert_eq!(sub.entries(), vec!["/com/example/A.class"]);
        assert_eq!(sub.uri(), "archive://inner.jar");

        assert!(view.is_archive("/WEB-INF/lib/inner.jar"));
        assert!(!view.is_archive("/WEB-INF"));
        assert!(!view.is_archive("/nope.jar"));
        // Built in memory, so there are no archive bytes to serve.
        assert!(view.get_entry("/WEB-INF/lib/inner.jar").unwrap().is_none());
        assert!(matches!(
            view.entry_size("/WEB-INF/lib/inner.jar"),
            Err(ApiError::NoContent(_))
        ));
        assert!(matches!(
            view.sub_archive("/WEB-INF"),
            Err(ApiError::WrongHandleKind { kind: "directory", .. })
        ));
        assert!(matches!(
            view.sub_archive("/nope.jar"),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_manifest_absent_and_present() {
        assert!(sample_view().manifest().unwrap().is_none());

        let mut store = ContentStore::new("app.jar");
        store.add_bytes(
            "META-INF/MANIFEST.MF",
            b"Manifest-Version: 1.0\nMain-Class: com.example.Main\n".as_slice(),
        );
        let manifest = ArchiveView::new(store).manifest().unwrap().unwrap();
        assert_eq!(manifest.get("Main-Class"), Some("com.example.Main"));
    }

    #[test]
    fn test_invalid_manifest_is_reported() {
        let mut store = ContentStore::new("bad.jar");
        store.add_bytes(Manifest::PATH, b"garbage\n".as_slice());
        assert!(matches!(
            ArchiveView::new(store).manifest(),
            Err(ApiError::InvalidManifest(_))
        ));
    }

    #[test]
    fn test_mutations_are_unsupported_and_harmless() {
        let view = sample_view();
        let before = view.entries();

        assert_eq!(view.delete(), MutationOutcome::Unsupported);
        assert!(!view.rename_to("other.jar").succeeded());
        assert!(view.close().is_ok());

        assert_eq!(view.entries(), before);
        assert_eq!(view.name(), "sample.jar");
        assert_eq!(view.archive_size(), None);
    }
}
