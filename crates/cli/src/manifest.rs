use archview_api::{Manifest, ReadableArchive};

pub fn run(archive: &dyn ReadableArchive, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let Some(manifest) = archive.manifest()? else {
        println!("No {} in {}.", Manifest::PATH, archive.name());
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
        return Ok(());
    }

    for (name, value) in manifest.main_attributes().iter() {
        println!("{}: {}", name, value);
    }
    for (section, attributes) in manifest.sections() {
        println!("\nName: {}", section);
        for (name, value) in attributes.iter() {
            println!("{}: {}", name, value);
        }
    }
    Ok(())
}
