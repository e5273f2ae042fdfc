//! # clientdb-cli: Operator CLI for the Client Record Store
//!
//! Provides the `clientdb` command-line interface. Every command operates
//! directly on the JSON client document, with the same store semantics as
//! the HTTP service.
//!
//! ## Subcommands
//!
//! - `clientdb list [--status draft|active]`: print the collection, one
//!   compact JSON record per line.
//! - `clientdb create --file F` / `clientdb draft --file F`: Create or
//!   Draft-Upsert from a JSON payload file (`-` reads stdin).
//! - `clientdb update <ID> --file F`: merge a payload into a record.
//! - `clientdb delete <ID>`: remove a record.
//! - `clientdb lookup <CIF>`: CIF enrichment lookup.
//! - `clientdb services`: print the service catalog.
//!
//! ```bash
//! clientdb --db data/clients.json draft --file acme.json
//! clientdb list --status draft
//! ```

pub mod clients;
pub mod reference;

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::Value;

use clientdb_core::IdentityStrategy;

/// `--id-strategy` values.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IdStrategyArg {
    /// Random v4 UUIDs.
    #[default]
    Uuid,
    /// `c_<millis>_<random>` in base 36.
    Timestamp,
}

impl From<IdStrategyArg> for IdentityStrategy {
    fn from(arg: IdStrategyArg) -> Self {
        match arg {
            IdStrategyArg::Uuid => IdentityStrategy::Uuid,
            IdStrategyArg::Timestamp => IdentityStrategy::Timestamp,
        }
    }
}

/// Write `value` to `out` as pretty JSON followed by a newline.
pub fn print_json(out: &mut dyn Write, value: &impl serde::Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to encode output")?;
    writeln!(out).context("failed to write output")?;
    Ok(())
}

/// Write each item of `values` to `out` as compact JSON, one per line.
pub fn print_json_lines<T: serde::Serialize>(out: &mut dyn Write, values: &[T]) -> Result<()> {
    for value in values {
        serde_json::to_writer(&mut *out, value).context("failed to encode output")?;
        writeln!(out).context("failed to write output")?;
    }
    Ok(())
}

/// Read a JSON document from `path`, or from stdin when `path` is `-`.
pub fn read_json_input(path: &std::path::Path) -> Result<Value> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)
            .context("failed to read payload from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload file {}", path.display()))?
    };
    serde_json::from_str(&text)
        .with_context(|| format!("payload {} is not valid JSON", path.display()))
}
