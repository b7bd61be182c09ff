//! Command-line browser for the telemetry reference database.

mod error;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::debug;
use ska_tdb_core::{Lookup, MsidTable, MsidView, Tdb, TdbConfig, TdbVersion, TmsrmentColumn};
use snafu::ResultExt;
use tracing_subscriber::EnvFilter;

use crate::error::{
    CliResult, ConfigSnafu, FindSnafu, ListTablesSnafu, MsidSnafu, RenderSnafu, TableSnafu,
};
use crate::render::{render_column, render_table};

#[derive(Debug, Subcommand)]
enum Command {
    /// List the tables available for the selected version
    Tables,

    /// Show a table, one of its columns, or its rows for an MSID
    Show {
        /// Table name, e.g. tmsrment or tsc
        table: String,

        /// Column name or MSID to select
        #[arg(long)]
        key: Option<String>,

        #[arg(long, default_value_t = 20)]
        max_rows: usize,
    },

    /// Describe one MSID and list its rows in every MSID table
    Msid {
        msid: String,

        #[arg(long, default_value_t = 20)]
        max_rows: usize,
    },

    /// Find MSIDs whose code, description or technical name matches a regex
    Find { pattern: String },
}

#[derive(Debug, Parser)]
#[command(name = "tdb", about = "Browse the telemetry reference database")]
struct Cli {
    /// Root directory holding the pNNN version directories [default: $SKA_TDB_DATA or ./data]
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    /// TDB version to use, one of 4, 6, 7, 8, 9, 10 [default: $SKA_TDB_VERSION or 10]
    #[arg(long = "tdb-version", global = true)]
    tdb_version: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

/// Environment configuration with the command-line flags applied on top.
fn open_tdb(data_root: Option<PathBuf>, version: Option<String>) -> CliResult<Tdb> {
    let mut config = TdbConfig::from_env().context(ConfigSnafu)?;
    if let Some(data_root) = data_root {
        config.data_root = data_root;
    }
    if let Some(raw) = version {
        config = config.with_version(raw.parse::<TdbVersion>().context(ConfigSnafu)?);
    }
    debug!(
        "opening TDB at {} (version {})",
        config.data_root.display(),
        config.version
    );
    Ok(Tdb::open(config))
}

fn cmd_tables(tdb: &Tdb) -> CliResult<()> {
    let names = tdb.table_names().context(ListTablesSnafu {
        dir: tdb.data_dir().display().to_string(),
    })?;
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn cmd_show(tdb: &Tdb, table: &str, key: Option<&str>, max_rows: usize) -> CliResult<()> {
    let view = tdb.table(table).context(TableSnafu)?;

    let rendered = match key {
        None => render_table(&view, max_rows),
        Some(key) => match view.get(key).context(TableSnafu)? {
            Lookup::Column(value) => render_column(&value),
            Lookup::Rows(rows) => render_table(&rows, max_rows),
        },
    }
    .context(RenderSnafu)?;

    println!("{rendered}");
    Ok(())
}

fn cmd_msid(tdb: &Tdb, msid: &str, max_rows: usize) -> CliResult<()> {
    let view = tdb.msid(msid).context(MsidSnafu)?;
    println!("{view}");

    let tmsrment = view
        .tmsrment()
        .context(MsidSnafu)?
        .map(|t| t.column_names().to_vec())
        .unwrap_or_default();
    for column in TmsrmentColumn::ALL {
        // Older versions do not carry every description column.
        if !tmsrment.iter().any(|c| c == column.column_name()) {
            continue;
        }
        let value = view.column(*column).context(MsidSnafu)?;
        let rendered = render_column(&value).context(RenderSnafu)?;
        println!("  {:<28} {rendered}", column.attr_name());
    }

    for table in MsidTable::ALL.iter().filter(|t| **t != MsidTable::Tmsrment) {
        match view.table(*table) {
            Ok(Some(rows)) => {
                println!("\n{} ({} rows)", table.attr_name(), rows.len());
                println!("{}", render_table(&rows, max_rows).context(RenderSnafu)?);
            }
            Ok(None) => {}
            Err(e @ ska_tdb_core::TdbError::UnknownTable { .. }) => debug!("skipping: {e}"),
            Err(e) => return Err(e).context(MsidSnafu),
        }
    }
    Ok(())
}

fn cmd_find(tdb: &Tdb, pattern: &str) -> CliResult<()> {
    let found: Vec<MsidView> = tdb.find(pattern).context(FindSnafu)?;
    for view in &found {
        println!("{view}");
    }
    Ok(())
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let tdb = open_tdb(cli.data_root, cli.tdb_version)?;

    match cli.cmd {
        Command::Tables => cmd_tables(&tdb),
        Command::Show {
            table,
            key,
            max_rows,
        } => cmd_show(&tdb, &table, key.as_deref(), max_rows),
        Command::Msid { msid, max_rows } => cmd_msid(&tdb, &msid, max_rows),
        Command::Find { pattern } => cmd_find(&tdb, &pattern),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
