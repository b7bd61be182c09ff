use arrow::error::ArrowError;
use ska_tdb_core::TdbError;
use snafu::Snafu;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CliError {
    #[snafu(display("Invalid TDB configuration: {source}"))]
    Config { source: TdbError },

    #[snafu(display(
        "Cannot list tables in {dir}. \
         Check --data-root (or SKA_TDB_DATA) and --tdb-version."
    ))]
    ListTables { dir: String, source: TdbError },

    #[snafu(display("{source}"))]
    Table { source: TdbError },

    #[snafu(display("{source}"))]
    Msid { source: TdbError },

    #[snafu(display("Search failed: {source}"))]
    Find { source: TdbError },

    #[snafu(display("Failed to render output: {source}"))]
    Render { source: ArrowError },
}
