mod cat;
mod ls;
mod manifest;
mod stat;
mod view;

use archview_api::ReadableArchive;
use archview_core::{LoadOptions, PrefixMode, ViewOptions};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "archview",
    version,
    about = "Inspect jar, war and ear archives without unpacking them",
    long_about = "Archview loads a zip-based archive or an exploded directory into an ordered, \
                  path-addressed store and lets you list, read and size its entries. Nested \
                  archives (for example WEB-INF/lib/*.jar) can be entered with --in."
)]
pub struct Cli {
    /// Nested archive to descend into before running the command (repeatable)
    #[arg(long = "in", value_name = "NESTED", global = true)]
    pub nested: Vec<String>,

    /// Treat nested archives as plain content instead of expanding them
    #[arg(long, global = true)]
    pub no_expand: bool,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List entries in insertion order
    Ls {
        /// Archive file or exploded directory
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
        /// Only show entries whose path starts with this prefix
        #[arg(value_name = "PREFIX")]
        prefix: Option<String>,
        /// Match the prefix on whole path segments only
        #[arg(long)]
        segment: bool,
        /// Compute the size of every content entry
        #[arg(long)]
        sizes: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List directory entries
    Dirs {
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
    },
    /// Write an entry's bytes to stdout
    Cat {
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
        #[arg(value_name = "ENTRY")]
        entry: String,
    },
    /// Show the kind and size of a single entry
    Stat {
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
        #[arg(value_name = "ENTRY")]
        entry: String,
    },
    /// Print the archive's META-INF/MANIFEST.MF
    Manifest {
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = archview_runtime::init_logging("cli", cli.verbose);

    let load = LoadOptions::default().with_expand_nested(!cli.no_expand);
    let mut view = ViewOptions::default();
    if let Commands::Ls { segment: true, .. } = &cli.command {
        view = view.with_prefix_mode(PrefixMode::Segment);
    }

    match &cli.command {
        Commands::Ls {
            archive,
            prefix,
            sizes,
            json,
            ..
        } => {
            let archive = open(archive, &cli.nested, &load, view)?;
            ls::run(archive.as_ref(), prefix.as_deref(), *sizes, *json)
        }
        Commands::Dirs { archive } => {
            let archive = open(archive, &cli.nested, &load, view)?;
            ls::run_dirs(archive.as_ref())
        }
        Commands::Cat { archive, entry } => {
            let archive = open(archive, &cli.nested, &load, view)?;
            cat::run(archive.as_ref(), entry)
        }
        Commands::Stat { archive, entry } => {
            let archive = open(archive, &cli.nested, &load, view)?;
            stat::run(archive.as_ref(), entry)
        }
        Commands::Manifest { archive, json } => {
            let archive = open(archive, &cli.nested, &load, view)?;
            manifest::run(archive.as_ref(), *json)
        }
    }
}

/// Open `path` and walk down the `--in` chain.
fn open(
    path: &Path,
    nested: &[String],
    load: &LoadOptions,
    view: ViewOptions,
) -> Result<Arc<dyn ReadableArchive>, Box<dyn std::error::Error>> {
    let mut archive = archview_runtime::open_archive(path, load, view)?;
    for name in nested {
        debug!("Descending into {} of {}", name, archive.name());
        archive = archive.sub_archive(name)?;
    }
    Ok(archive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "archview",
            "ls",
            "app.war",
            "/WEB-INF",
            "--segment",
            "--in",
            "WEB-INF/lib/a.jar",
            "--in",
            "lib/b.jar",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.nested, vec!["WEB-INF/lib/a.jar", "lib/b.jar"]);
        assert!(cli.verbose);
        assert!(!cli.no_expand);
        match cli.command {
            Commands::Ls {
                archive,
                prefix,
                segment,
                sizes,
                json,
            } => {
                assert_eq!(archive, PathBuf::from("app.war"));
                assert_eq!(prefix.as_deref(), Some("/WEB-INF"));
                assert!(segment);
                assert!(!sizes);
                assert!(!json);
            }
            _ => panic!("expected ls"),
        }
    }

    #[test]
    fn test_cat_requires_entry() {
        assert!(Cli::try_parse_from(["archview", "cat", "app.war"]).is_err());
    }

    #[test]
    fn test_open_descends_nested_chain() {
        use std::fs;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("exploded");
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/readme.txt"), b"hi").unwrap();

        let load = LoadOptions::default();
        let archive = open(&root, &[], &load, ViewOptions::default()).unwrap();
        assert!(archive.exists("/docs/readme.txt"));

        // A directory is not an archive.
        let err = open(&root, &["docs".to_string()], &load, ViewOptions::default());
        assert!(err.is_err());
    }
}
