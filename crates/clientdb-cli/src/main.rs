//! # clientdb CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use clientdb_cli::clients::{
    run_create, run_delete, run_draft, run_list, run_update, DeleteArgs, ListArgs, PayloadArgs,
    UpdateArgs,
};
use clientdb_cli::reference::{run_lookup, run_services, LookupArgs, ServicesArgs};
use clientdb_cli::IdStrategyArg;
use clientdb_core::IdentityStrategy;
use clientdb_store::{ClientStore, JsonFileStorage};

/// clientdb: operator tool for the client record store.
#[derive(Parser, Debug)]
#[command(name = "clientdb", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path of the client document.
    #[arg(long, global = true, env = "CLIENTS_DB_PATH", default_value = "data/clients.json")]
    db: PathBuf,

    /// Generator for ids assigned to new records.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "CLIENT_ID_STRATEGY",
        ignore_case = true,
        default_value_t = IdStrategyArg::Uuid
    )]
    id_strategy: IdStrategyArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every client record.
    List(ListArgs),

    /// Create an active client, promoting a matching draft.
    Create(PayloadArgs),

    /// Insert or refresh a draft client.
    Draft(PayloadArgs),

    /// Merge a partial payload into an existing client.
    Update(UpdateArgs),

    /// Delete a client.
    Delete(DeleteArgs),

    /// Look up enrichment data for a CIF.
    Lookup(LookupArgs),

    /// Print the service catalog.
    Services(ServicesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let id_strategy = IdentityStrategy::from(cli.id_strategy);
    tracing::debug!(db = %cli.db.display(), %id_strategy, "clientdb CLI starting");

    let store =
        ClientStore::new(JsonFileStorage::new(&cli.db)).with_identity_generator(id_strategy);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match &cli.command {
        Commands::List(args) => run_list(&store, args, &mut out),
        Commands::Create(args) => run_create(&store, args, &mut out),
        Commands::Draft(args) => run_draft(&store, args, &mut out),
        Commands::Update(args) => run_update(&store, args, &mut out),
        Commands::Delete(args) => run_delete(&store, args, &mut out),
        Commands::Lookup(args) => run_lookup(args, &mut out),
        Commands::Services(args) => run_services(args, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_list_with_status() {
        let cli = Cli::try_parse_from(["clientdb", "list", "--status", "draft"]).unwrap();
        match cli.command {
            Commands::List(args) => assert!(args.status.is_some()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_update_with_global_db() {
        let cli = Cli::try_parse_from([
            "clientdb", "update", "abc", "--file", "p.json", "--db", "/tmp/c.json", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.db, PathBuf::from("/tmp/c.json"));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Update(args) => {
                assert_eq!(args.id, "abc");
                assert_eq!(args.payload.file, PathBuf::from("p.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parse_id_strategy() {
        let cli = Cli::try_parse_from(["clientdb", "list"]).unwrap();
        assert_eq!(cli.id_strategy, IdStrategyArg::Uuid);

        let cli = Cli::try_parse_from([
            "clientdb", "draft", "-f", "d.json", "--id-strategy", "timestamp",
        ])
        .unwrap();
        assert_eq!(IdentityStrategy::from(cli.id_strategy), IdentityStrategy::Timestamp);

        assert!(Cli::try_parse_from(["clientdb", "list", "--id-strategy", "serial"]).is_err());
    }

    #[test]
    fn cli_rejects_unknown_status() {
        assert!(Cli::try_parse_from(["clientdb", "list", "--status", "archived"]).is_err());
    }

    #[test]
    fn cli_create_requires_file() {
        assert!(Cli::try_parse_from(["clientdb", "create"]).is_err());
    }
}
