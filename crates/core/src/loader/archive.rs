use super::{LoadOptions, store_name};
use crate::asset::{BytesAsset, SharedBytes};
use crate::error::Result;
use crate::store::ContentStore;
use archview_api::{ArchivePath, Asset, EntryStream};
use std::fs::File;
use std::fmt;
use std::io::{self, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Upper bound for buffer pre-allocation; header sizes are not trusted
/// beyond this.
const MAX_PREALLOC: u64 = 1 << 20;

trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

type SharedZip = ZipArchive<Box<dyn ReadSeek>>;

/// Where the bytes of a zip archive live.
#[derive(Debug)]
enum ZipOrigin {
    File(PathBuf),
    Memory(Arc<[u8]>),
}

impl ZipOrigin {
    fn open(&self) -> io::Result<SharedZip> {
        let reader: Box<dyn ReadSeek> = match self {
            ZipOrigin::File(path) => Box::new(File::open(path)?),
            ZipOrigin::Memory(bytes) => Box::new(Cursor::new(SharedBytes(bytes.clone()))),
        };
        ZipArchive::new(reader).map_err(io::Error::other)
    }
}

/// A zip archive shared by all of its entry assets. The central directory
/// is parsed once and kept; reads are serialized through the lock.
struct ZipSource {
    origin: ZipOrigin,
    archive: Mutex<Option<SharedZip>>,
}

impl ZipSource {
    fn new(origin: ZipOrigin) -> Self {
        Self {
            origin,
            archive: Mutex::new(None),
        }
    }

    /// Keep an archive that was already parsed while loading.
    fn seed(&self, archive: SharedZip) {
        if let Ok(mut cached) = self.archive.lock() {
            *cached = Some(archive);
        }
    }

    fn read_entry(&self, name: &str) -> io::Result<Vec<u8>> {
        let mut cached = self
            .archive
            .lock()
            .map_err(|_| io::Error::other("zip source lock poisoned"))?;
        let archive = match cached.take() {
            Some(archive) => archive,
            None => self.origin.open()?,
        };
        let archive = cached.insert(archive);

        let mut entry = archive.by_name(name).map_err(io::Error::other)?;
        let mut bytes = Vec::with_capacity(prealloc(entry.size()));
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl fmt::Debug for ZipSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipSource")
            .field("origin", &self.origin)
            .finish()
    }
}

fn prealloc(size: u64) -> usize {
    size.min(MAX_PREALLOC) as usize
}

/// A single zip entry, read from the shared archive on every open.
///
/// The whole entry is inflated into memory per open. The reader stops at
/// the size recorded in the central directory and checks the CRC, so a
/// stream either yields exactly `content_length` bytes or fails.
#[derive(Debug)]
struct ZipEntryAsset {
    source: Arc<ZipSource>,
    name: String,
    size: u64,
}

impl Asset for ZipEntryAsset {
    fn open_stream(&self) -> io::Result<EntryStream> {
        let bytes = self.source.read_entry(&self.name)?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn content_length(&self) -> Option<u64> {
        Some(self.size)
    }
}

/// Load a zip-format archive (jar, war, ...) from disk.
///
/// Entry content stays on disk and is read when opened; only nested
/// archives are read up front.
pub fn load_zip(path: &Path, options: &LoadOptions) -> Result<ContentStore> {
    info!("Loading archive {}", path.display());
    let reader: Box<dyn ReadSeek> = Box::new(File::open(path)?);
    let archive = ZipArchive::new(reader)?;
    let source = Arc::new(ZipSource::new(ZipOrigin::File(path.to_path_buf())));
    let store = build_store(store_name(path), archive, source, options, 0)?;
    info!("Loaded {} entries from {}", store.len(), path.display());
    Ok(store)
}

/// Parse in-memory archive bytes as a nested store.
pub(super) fn load_nested(
    path: &ArchivePath,
    bytes: Arc<[u8]>,
    options: &LoadOptions,
    depth: usize,
) -> Result<ContentStore> {
    let reader: Box<dyn ReadSeek> = Box::new(Cursor::new(SharedBytes(bytes.clone())));
    let archive = ZipArchive::new(reader)?;
    let source = Arc::new(ZipSource::new(ZipOrigin::Memory(bytes)));
    let name = path.file_name().unwrap_or_default().to_string();
    build_store(name, archive, source, options, depth)
}

fn build_store(
    name: String,
    mut archive: SharedZip,
    source: Arc<ZipSource>,
    options: &LoadOptions,
    depth: usize,
) -> Result<ContentStore> {
    let mut store = ContentStore::new(name);

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let raw_name = entry.name().to_string();
        let path = ArchivePath::new(&raw_name);

        if path.is_root() {
            debug!("Skipping unnamed entry #{} in {}", i, store.name());
            continue;
        }

        if entry.is_dir() {
            store.add_directory(path);
            continue;
        }

        if options.should_expand(&path, depth) {
            let mut bytes = Vec::with_capacity(prealloc(entry.size()));
            entry.read_to_end(&mut bytes)?;
            let bytes: Arc<[u8]> = bytes.into();

            match load_nested(&path, bytes.clone(), options, depth + 1) {
                Ok(inner) => {
                    debug!("Expanded nested archive {} ({} entries)", path, inner.len());
                    store.add_archive_with_content(path, inner, BytesAsset::new(bytes));
                }
                Err(e) => {
                    warn!("Keeping {} as plain content: {}", path, e);
                    store.add(path, BytesAsset::new(bytes));
                }
            }
            continue;
        }

        let size = entry.size();
        store.add(
            path,
            ZipEntryAsset {
                source: source.clone(),
                name: raw_name,
                size,
            },
        );
    }

    source.seed(archive);
    Ok(store)
}
