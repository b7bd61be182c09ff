//! Text rendering of table views and column values for the terminal.

use arrow::array::Array;
use arrow::error::ArrowError;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use arrow::util::pretty::pretty_format_batches_with_options;
use ska_tdb_core::{ColumnValue, TableView};

fn format_options() -> FormatOptions<'static> {
    FormatOptions::default().with_null("")
}

/// Render at most `max_rows` rows of `view`, noting how many were left out.
pub fn render_table(view: &TableView, max_rows: usize) -> Result<String, ArrowError> {
    let batch = view.to_batch();
    let total = batch.num_rows();
    let shown = batch.slice(0, total.min(max_rows));

    let mut out = pretty_format_batches_with_options(&[shown], &format_options())?.to_string();
    if total > max_rows {
        out.push_str(&format!("\n... {} more rows ({total} total)", total - max_rows));
    }
    Ok(out)
}

/// Render a column value: a bare scalar, or one cell per line.
pub fn render_column(value: &ColumnValue) -> Result<String, ArrowError> {
    match value {
        ColumnValue::Scalar(s) => Ok(s.to_string()),
        ColumnValue::Array(array) => {
            let options = format_options();
            let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
            let lines: Vec<String> = (0..array.len())
                .map(|i| formatter.value(i).to_string())
                .collect();
            Ok(lines.join("\n"))
        }
    }
}
