//! # Reference Data Subcommands
//!
//! `lookup <CIF>` and `services`.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use clientdb_store::{CifDirectory, ServiceCatalog};

use crate::print_json;

/// Arguments for `clientdb lookup`.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// CIF to look up.
    pub cif: String,

    /// CIF enrichment table.
    #[arg(long, env = "CIF_DIRECTORY_PATH")]
    pub cif_directory: PathBuf,
}

/// Arguments for `clientdb services`.
#[derive(Args, Debug)]
pub struct ServicesArgs {
    /// Service catalog file.
    #[arg(long, env = "SERVICE_CATALOG_PATH")]
    pub services: PathBuf,
}

/// Print the enrichment record for a CIF. Exit code 2 when there is none.
pub fn run_lookup(args: &LookupArgs, out: &mut dyn Write) -> Result<u8> {
    if args.cif.trim().is_empty() {
        bail!("cif must not be blank");
    }
    let directory =
        CifDirectory::load(&args.cif_directory).context("failed to load CIF directory")?;
    match directory.lookup(&args.cif) {
        Some(record) => {
            print_json(out, record)?;
            Ok(0)
        }
        None => {
            tracing::warn!(cif = %args.cif.trim(), "no enrichment data");
            Ok(2)
        }
    }
}

pub fn run_services(args: &ServicesArgs, out: &mut dyn Write) -> Result<u8> {
    let catalog = ServiceCatalog::load(&args.services).context("failed to load service catalog")?;
    print_json(out, &catalog.list())?;
    Ok(0)
}
