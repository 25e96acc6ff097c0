use super::archive::load_nested;
use super::{LoadOptions, store_name};
use crate::asset::FileAsset;
use crate::error::{CoreError, Result};
use crate::store::ContentStore;
use archview_api::ArchivePath;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Load an exploded archive (a plain directory tree).
///
/// Entries are ordered by a sorted walk, so repeated loads of the same
/// tree enumerate identically.
pub fn load_dir(root: &Path, options: &LoadOptions) -> Result<ContentStore> {
    if !root.is_dir() {
        return Err(CoreError::UnsupportedFormat(root.to_path_buf()));
    }

    info!("Loading directory {}", root.display());
    let mut store = ContentStore::new(store_name(root));

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(options.follow_links)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let path = relative
            .components()
            .fold(ArchivePath::root(), |path, c| {
                path.join(c.as_os_str().to_string_lossy())
            });

        let file_type = entry.file_type();
        if file_type.is_dir() {
            store.add_directory(path);
        } else if file_type.is_file() {
            if options.should_expand(&path, 0) {
                let bytes = std::fs::read(entry.path())?;
                match load_nested(&path, bytes.into(), options, 1) {
                    Ok(inner) => {
                        let content = FileAsset::new(entry.path())?;
                        store.add_archive_with_content(path, inner, content);
                        continue;
                    }
                    Err(e) => warn!("Keeping {} as plain content: {}", path, e),
                }
            }
            store.add(path, FileAsset::new(entry.path())?);
        } else {
            debug!("Skipping {} (not a regular file)", entry.path().display());
        }
    }

    info!("Loaded {} entries from {}", store.len(), root.display());
    Ok(store)
}
