use archview_api::{ApiError, ReadableArchive};
use std::io::{self, Write};

pub fn run(archive: &dyn ReadableArchive, entry: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(mut stream) = archive.get_entry(entry)? else {
        return Err(ApiError::NoContent(entry.to_string()).into());
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    io::copy(&mut stream, &mut out)?;
    out.flush()?;
    Ok(())
}
