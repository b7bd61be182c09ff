//! Decoding of TDB table files (Parquet) into Arrow record batches.
//!
//! A table file is read in full and concatenated into a single
//! [`RecordBatch`]; TDB tables are small (thousands of rows at most) so the
//! flat in-memory form is all the indexing there is. Column names are
//! upper-cased on load so lookups only need to upper-case the query.

use std::path::Path;
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::datatypes::{Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use snafu::prelude::*;

use crate::error::{ArrowSnafu, ParquetReadSnafu, TdbResult};

/// File extension of table files inside a version directory.
pub const TABLE_FILE_EXTENSION: &str = "parquet";

/// Copy of `schema` with every field name upper-cased.
fn upper_case_schema(schema: &Schema) -> SchemaRef {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| f.as_ref().clone().with_name(f.name().to_ascii_uppercase()))
        .collect();
    Arc::new(Schema::new_with_metadata(fields, schema.metadata().clone()))
}

/// Decode the Parquet bytes of table `table` into one record batch.
///
/// `path` is only used for error context. Nullable string columns keep their
/// nulls; callers decide how "missing" is presented.
pub fn read_table_bytes(table: &str, path: &Path, data: Bytes) -> TdbResult<RecordBatch> {
    let path_str = path.display().to_string();

    let builder = ParquetRecordBatchReaderBuilder::try_new(data).context(ParquetReadSnafu {
        table,
        path: path_str.as_str(),
    })?;
    let file_schema = builder.schema().clone();
    let reader = builder.build().context(ParquetReadSnafu {
        table,
        path: path_str.as_str(),
    })?;

    let batches = reader
        .collect::<Result<Vec<_>, _>>()
        .context(ArrowSnafu { table })?;
    let batch = concat_batches(&file_schema, &batches).context(ArrowSnafu { table })?;

    let schema = upper_case_schema(&file_schema);
    if batch.num_columns() == 0 {
        return Ok(RecordBatch::new_empty(schema));
    }
    RecordBatch::try_new(schema, batch.columns().to_vec()).context(ArrowSnafu { table })
}
