use crate::view::{format_size, EntryRecord};
use archview_api::{ApiError, ReadableArchive};

pub fn run(archive: &dyn ReadableArchive, entry: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !archive.exists(entry) {
        return Err(ApiError::NotFound(entry.to_string()).into());
    }
    let record = EntryRecord::describe(archive, entry, true)?;

    println!("Archive: {}", archive.uri());
    println!("Path:    {}", record.path);
    println!("Kind:    {}", record.kind);
    if let Some(size) = record.size {
        println!("Size:    {} ({} bytes)", format_size(size), size);
    }
    if record.kind == "archive" {
        let nested = archive.sub_archive(entry)?;
        println!("Entries: {}", nested.entries().len());
    }
    Ok(())
}
