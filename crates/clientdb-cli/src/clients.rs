//! # Client Subcommands
//!
//! `list`, `create`, `draft`, `update` and `delete` against a
//! [`ClientStore`]. Store errors are reported with their context and map
//! to exit code 1 in the binary.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::json;

use clientdb_core::{ClientId, ClientPayload, ClientStatus};
use clientdb_store::ClientStore;

use crate::{print_json, print_json_lines, read_json_input};

/// Status filter for `clientdb list`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    Draft,
    Active,
}

impl From<StatusFilter> for ClientStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Draft => ClientStatus::Draft,
            StatusFilter::Active => ClientStatus::Active,
        }
    }
}

/// Arguments for `clientdb list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show records with this status.
    #[arg(long, value_enum)]
    pub status: Option<StatusFilter>,
}

/// A JSON payload file (`-` for stdin).
#[derive(Args, Debug)]
pub struct PayloadArgs {
    /// Path to the JSON payload.
    #[arg(long, short)]
    pub file: PathBuf,
}

/// Arguments for `clientdb update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Id of the record to update.
    pub id: String,
    #[command(flatten)]
    pub payload: PayloadArgs,
}

/// Arguments for `clientdb delete`.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Id of the record to delete.
    pub id: String,
}

fn load_payload(args: &PayloadArgs) -> Result<ClientPayload> {
    let value = read_json_input(&args.file)?;
    ClientPayload::from_value(value)
        .with_context(|| format!("invalid client payload in {}", args.file.display()))
}

fn parse_id(raw: &str) -> Result<ClientId> {
    ClientId::parse(raw).context("client id must not be blank")
}

pub fn run_list(store: &ClientStore, args: &ListArgs, out: &mut dyn Write) -> Result<u8> {
    let mut clients = store.list_clients().context("failed to list clients")?;
    if let Some(filter) = args.status {
        let status = ClientStatus::from(filter);
        clients.retain(|c| c.status == status);
    }
    print_json_lines(out, &clients)?;
    Ok(0)
}

pub fn run_create(store: &ClientStore, args: &PayloadArgs, out: &mut dyn Write) -> Result<u8> {
    let payload = load_payload(args)?;
    let outcome = store.create_client(payload).context("create failed")?;
    print_json(out, &outcome)?;
    Ok(0)
}

pub fn run_draft(store: &ClientStore, args: &PayloadArgs, out: &mut dyn Write) -> Result<u8> {
    let payload = load_payload(args)?;
    let outcome = store.upsert_draft(payload).context("draft save failed")?;
    print_json(out, &outcome)?;
    Ok(0)
}

pub fn run_update(store: &ClientStore, args: &UpdateArgs, out: &mut dyn Write) -> Result<u8> {
    let id = parse_id(&args.id)?;
    let payload = load_payload(&args.payload)?;
    store
        .update_client(&id, payload)
        .with_context(|| format!("update of client {id} failed"))?;
    print_json(out, &json!({}))?;
    Ok(0)
}

pub fn run_delete(store: &ClientStore, args: &DeleteArgs, out: &mut dyn Write) -> Result<u8> {
    let id = parse_id(&args.id)?;
    let outcome = store
        .delete_client(&id)
        .with_context(|| format!("delete of client {id} failed"))?;
    print_json(out, &outcome)?;
    Ok(0)
}
