use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "mtar: minimal archive packer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Pack files into a new archive
    #[command(visible_alias = "c")]
    Create {
        /// archive to write (replaced if it exists)
        archive: PathBuf,
        /// regular files to pack, in order; stored under their base names
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract every entry of an archive
    #[command(visible_alias = "x")]
    Extract {
        archive: PathBuf,
        /// destination directory
        #[arg(short = 'C', long, default_value = ".")]
        dest: PathBuf,
        /// abort on the first checksum mismatch
        #[arg(long)]
        strict: bool,
        /// do not overwrite existing files
        #[arg(long)]
        keep_existing: bool,
        #[arg(long)]
        json: bool,
    },

    /// List archive contents from the header
    #[command(visible_alias = "t")]
    List {
        archive: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Recompute entry checksums without extracting
    Verify {
        archive: PathBuf,
        #[arg(long)]
        json: bool,
    },
}
