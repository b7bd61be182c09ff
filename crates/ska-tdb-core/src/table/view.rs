//! Read-only views over a loaded table or a filtered subset of it.

use std::fmt;
use std::sync::Arc;

use arrow::array::{StringArray, new_empty_array};
use arrow::compute::kernels::cmp::eq;
use arrow::compute::{cast, filter_record_batch};
use arrow::datatypes::{DataType, SchemaRef};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use snafu::prelude::*;

use crate::error::{ArrowSnafu, RowOutOfRangeSnafu, TdbResult, UnknownColumnSnafu};
use crate::table::value::{ColumnValue, Scalar};

/// Name of the column that keys MSID-bearing tables.
pub const MSID_COLUMN: &str = "MSID";

/// The rows held by a [`TableView`].
///
/// Whole tables are always [`Rows::Many`], whatever their length. Filtering
/// by MSID picks the variant from the match count so a lone matching row
/// answers column lookups with a bare scalar.
#[derive(Clone, Debug)]
pub enum Rows {
    /// No rows; only the schema is kept.
    Empty(SchemaRef),
    /// Exactly one row.
    Single(RecordBatch),
    /// A collection of rows (a whole table, a slice, or a multi-row match).
    Many(RecordBatch),
}

impl Rows {
    fn from_match(batch: RecordBatch) -> Rows {
        match batch.num_rows() {
            0 => Rows::Empty(batch.schema()),
            1 => Rows::Single(batch),
            _ => Rows::Many(batch),
        }
    }

    /// Number of rows held.
    pub fn len(&self) -> usize {
        match self {
            Rows::Empty(_) => 0,
            Rows::Single(_) => 1,
            Rows::Many(b) => b.num_rows(),
        }
    }

    /// True when no rows are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Schema shared by every shape.
    pub fn schema(&self) -> SchemaRef {
        match self {
            Rows::Empty(schema) => schema.clone(),
            Rows::Single(b) | Rows::Many(b) => b.schema(),
        }
    }

    /// The rows as a record batch (an empty batch for [`Rows::Empty`]).
    pub fn to_batch(&self) -> RecordBatch {
        match self {
            Rows::Empty(schema) => RecordBatch::new_empty(schema.clone()),
            Rows::Single(b) | Rows::Many(b) => b.clone(),
        }
    }
}

/// Outcome of [`TableView::get`].
#[derive(Clone, Debug)]
pub enum Lookup {
    /// The key named a column.
    Column(ColumnValue),
    /// The key was taken as an MSID and selected these rows.
    Rows(TableView),
}

/// Read-only view of one TDB table, narrowed to zero, one or many rows.
///
/// Views are cheap to clone; the record batch and column list are shared.
#[derive(Clone, Debug)]
pub struct TableView {
    name: Arc<str>,
    column_names: Arc<[String]>,
    msid_index: Option<usize>,
    rows: Rows,
}

impl TableView {
    /// Wrap a whole table. Column names are expected upper-case already.
    pub fn new(name: &str, batch: RecordBatch) -> TableView {
        let column_names: Arc<[String]> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        let msid_index = column_names.iter().position(|c| c == MSID_COLUMN);

        TableView {
            name: Arc::from(name),
            column_names,
            msid_index,
            rows: Rows::Many(batch),
        }
    }

    fn with_rows(&self, rows: Rows) -> TableView {
        TableView {
            name: self.name.clone(),
            column_names: self.column_names.clone(),
            msid_index: self.msid_index,
            rows,
        }
    }

    /// Table name this view came from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered, upper-case column names.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// True when the table carries an `MSID` column.
    pub fn has_msid_column(&self) -> bool {
        self.msid_index.is_some()
    }

    /// The rows held, with their shape.
    pub fn rows(&self) -> &Rows {
        &self.rows
    }

    /// Number of rows held; a single-row view reports 1.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the view holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rows as an Arrow record batch.
    pub fn to_batch(&self) -> RecordBatch {
        self.rows.to_batch()
    }

    /// Position of `key` among the columns, compared case-insensitively.
    pub fn column_index(&self, key: &str) -> Option<usize> {
        let upper = key.to_ascii_uppercase();
        self.column_names.iter().position(|c| *c == upper)
    }

    /// Keyed lookup: a column when `key` names one, otherwise the rows for
    /// MSID `key` when the table has an `MSID` column.
    ///
    /// # Errors
    ///
    /// [`crate::TdbError::UnknownColumn`] when `key` is neither a column nor
    /// usable as an MSID (the table has no `MSID` column).
    pub fn get(&self, key: &str) -> TdbResult<Lookup> {
        if self.column_index(key).is_some() {
            return self.column(key).map(Lookup::Column);
        }
        if self.has_msid_column() {
            return self.filter_msid(key).map(Lookup::Rows);
        }
        UnknownColumnSnafu {
            table: self.name(),
            column: key,
        }
        .fail()
    }

    /// Column `key` across the rows held.
    ///
    /// A [`Rows::Single`] view returns [`ColumnValue::Scalar`]; other shapes
    /// return the column array (empty for [`Rows::Empty`]).
    pub fn column(&self, key: &str) -> TdbResult<ColumnValue> {
        let idx = self.column_index(key).context(UnknownColumnSnafu {
            table: self.name(),
            column: key,
        })?;

        match &self.rows {
            Rows::Empty(schema) => Ok(ColumnValue::Array(new_empty_array(
                schema.field(idx).data_type(),
            ))),
            Rows::Single(batch) => {
                let name = &self.column_names[idx];
                Scalar::from_array(name, batch.column(idx).as_ref(), 0).map(ColumnValue::Scalar)
            }
            Rows::Many(batch) => Ok(ColumnValue::Array(batch.column(idx).clone())),
        }
    }

    /// Rows whose `MSID` equals `msid` (case-insensitive).
    ///
    /// The result is [`Rows::Empty`], [`Rows::Single`] or [`Rows::Many`]
    /// depending on how many rows match.
    pub fn filter_msid(&self, msid: &str) -> TdbResult<TableView> {
        let idx = self.msid_index.context(UnknownColumnSnafu {
            table: self.name(),
            column: MSID_COLUMN,
        })?;
        let key = msid.to_ascii_uppercase();
        let batch = self.rows.to_batch();
        let table = self.name();

        let codes = cast(batch.column(idx), &DataType::Utf8).context(ArrowSnafu { table })?;
        let mask = eq(&codes, &StringArray::new_scalar(key)).context(ArrowSnafu { table })?;
        let matched = filter_record_batch(&batch, &mask).context(ArrowSnafu { table })?;

        Ok(self.with_rows(Rows::from_match(matched)))
    }

    /// Row `index` as a single-row view.
    pub fn row(&self, index: usize) -> TdbResult<TableView> {
        let len = self.len();
        ensure!(
            index < len,
            RowOutOfRangeSnafu {
                table: self.name(),
                index,
                len,
            }
        );
        Ok(self.with_rows(Rows::Single(self.rows.to_batch().slice(index, 1))))
    }

    /// Up to `length` rows starting at `offset`, clamped to the rows held.
    ///
    /// Slices keep the collection shape ([`Rows::Many`]) even when they
    /// happen to hold a single row.
    pub fn slice(&self, offset: usize, length: usize) -> TableView {
        let batch = self.rows.to_batch();
        let offset = offset.min(batch.num_rows());
        let length = length.min(batch.num_rows() - offset);
        self.with_rows(Rows::Many(batch.slice(offset, length)))
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = pretty_format_batches(&[self.to_batch()]).map_err(|_| fmt::Error)?;
        write!(f, "{rendered}")
    }
}
