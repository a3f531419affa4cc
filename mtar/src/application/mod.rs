pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use mtar_core::error::Result;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Create {
            archive,
            inputs,
            json,
        } => handlers::handle_create(archive, inputs, json),
        Commands::Extract {
            archive,
            dest,
            strict,
            keep_existing,
            json,
        } => handlers::handle_extract(archive, dest, strict, keep_existing, json),
        Commands::List { archive, json } => handlers::handle_list(archive, json),
        Commands::Verify { archive, json } => handlers::handle_verify(archive, json),
    }
}
