use archview_api::{ApiError, ReadableArchive};
use serde::Serialize;
use tabled::Tabled;

/// One archive entry as printed by `ls` and `stat`.
#[derive(Debug, Serialize)]
pub struct EntryRecord {
    pub path: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl EntryRecord {
    pub fn describe(
        archive: &dyn ReadableArchive,
        path: &str,
        with_size: bool,
    ) -> Result<Self, ApiError> {
        let kind = entry_kind(archive, path);
        let size = match kind {
            "content" if with_size => Some(archive.entry_size(path)?),
            // Nested archives built in memory carry no bytes of their own.
            "archive" if with_size => match archive.entry_size(path) {
                Ok(size) => Some(size),
                Err(ApiError::NoContent(_)) => None,
                Err(e) => return Err(e),
            },
            _ => None,
        };
        Ok(Self {
            path: path.to_string(),
            kind,
            size,
        })
    }
}

/// Table form of [`EntryRecord`].
#[derive(Tabled)]
pub struct EntryRow {
    #[tabled(rename = "Path")]
    pub path: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Size")]
    pub size: String,
}

impl From<&EntryRecord> for EntryRow {
    fn from(record: &EntryRecord) -> Self {
        Self {
            path: record.path.clone(),
            kind: record.kind.to_string(),
            size: record.size.map(format_size).unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub fn entry_kind(archive: &dyn ReadableArchive, path: &str) -> &'static str {
    if archive.is_directory(path) {
        "directory"
    } else if archive.is_archive(path) {
        "archive"
    } else {
        "content"
    }
}

pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    }
}
