use crate::view::{EntryRecord, EntryRow};
use archview_api::ReadableArchive;
use tabled::{settings::Style, Table};

pub fn run(
    archive: &dyn ReadableArchive,
    prefix: Option<&str>,
    sizes: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let paths = match prefix {
        Some(prefix) => archive.entries_with_prefix(prefix),
        None => archive.entries(),
    };

    let records = paths
        .iter()
        .map(|path| EntryRecord::describe(archive, path, sizes))
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("No entries found.");
    } else {
        let rows: Vec<EntryRow> = records.iter().map(EntryRow::from).collect();
        println!("{}", Table::new(rows).with(Style::psql()));
    }
    Ok(())
}

pub fn run_dirs(archive: &dyn ReadableArchive) -> Result<(), Box<dyn std::error::Error>> {
    for dir in archive.directories() {
        println!("{}", dir);
    }
    Ok(())
}
