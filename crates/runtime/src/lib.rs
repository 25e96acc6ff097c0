use archview_api::ReadableArchive;
use archview_core::logging::{LoggingConfig, init_logging as init_core_logging};
use archview_core::{
    ArchiveView, ContentStore, CoreError, LoadOptions, ViewOptions, load_dir, load_zip,
};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// On-disk layouts that can back a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// An exploded archive.
    Directory,
    /// Any zip-based archive (jar, war, ear, zip).
    Zip,
}

/// Detect the format of `path` from its file type and magic bytes.
pub fn detect_format(path: &Path) -> archview_core::Result<ArchiveFormat> {
    if path.is_dir() {
        return Ok(ArchiveFormat::Directory);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 4];
    let read = file.read(&mut magic)?;

    match &magic[..read] {
        // PK\x03\x04 (local header), PK\x05\x06 (empty), PK\x07\x08 (spanned)
        [0x50, 0x4B, ..] => Ok(ArchiveFormat::Zip),
        _ => Err(CoreError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load whatever archive lives at `path` into a store.
pub fn open_store(path: &Path, options: &LoadOptions) -> archview_core::Result<ContentStore> {
    let format = detect_format(path)?;
    debug!("{} detected as {:?}", path.display(), format);
    match format {
        ArchiveFormat::Directory => load_dir(path, options),
        ArchiveFormat::Zip => load_zip(path, options),
    }
}

/// Open `path` and present it through the read-only archive contract.
pub fn open_archive(
    path: &Path,
    load: &LoadOptions,
    view: ViewOptions,
) -> archview_core::Result<Arc<dyn ReadableArchive>> {
    let store = open_store(path, load)?;
    Ok(Arc::new(ArchiveView::with_options(store, view)))
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(init_core_logging(
        &LoggingConfig::new(component).with_stderr(to_stderr),
    ))
}
