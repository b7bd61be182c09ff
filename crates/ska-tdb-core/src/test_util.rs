use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;

use crate::table::TableStore;

pub(crate) type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub(crate) fn parquet_bytes(batch: &RecordBatch) -> TestResult<Bytes> {
    let mut buf = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), None)?;
        writer.write(batch)?;
        writer.close()?;
    }
    Ok(Bytes::from(buf))
}

pub(crate) fn write_table(dir: &Path, name: &str, batch: &RecordBatch) -> TestResult {
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(format!("{name}.parquet")), parquet_bytes(batch)?)?;
    Ok(())
}

fn batch(columns: Vec<(&str, ArrayRef)>) -> TestResult<RecordBatch> {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
        .collect();
    let arrays = columns.into_iter().map(|(_, a)| a).collect();
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

fn strings(values: &[Option<&str>]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
}

/// Three MSIDs: AAA (state codes, two point pairs), BBB (no state codes, no
/// point pairs), CCC (no description, one point pair). Plus `tformat`, a
/// table without an MSID column.
pub(crate) fn write_sample_version(dir: &Path) -> TestResult {
    let tmsrment = batch(vec![
        ("MSID", strings(&[Some("AAA"), Some("BBB"), Some("CCC")])),
        (
            "TECHNICAL_NAME",
            strings(&[Some("Alpha temp"), Some("Beta mode"), Some("Gamma counter")]),
        ),
        ("DATA_TYPE", strings(&[Some("UINT"), Some("UINT"), Some("INT")])),
        ("CALIBRATION_TYPE", strings(&[Some("PP"), None, Some("PP")])),
        ("ENG_UNIT", strings(&[Some("DEGC"), None, Some("CNT")])),
        ("TOTAL_LENGTH", Arc::new(Int64Array::from(vec![8, 2, 16]))),
        (
            "DESCRIPTION",
            strings(&[Some("alpha sensor"), Some("beta sensor"), None]),
        ),
    ])?;
    write_table(dir, "tmsrment", &tmsrment)?;

    // Lower-case names on disk exercise the upper-casing on load.
    let tsc = batch(vec![
        ("msid", strings(&[Some("AAA"), Some("AAA")])),
        ("state_code", strings(&[Some("OFF"), Some("ON ")])),
        ("low_raw_count", Arc::new(Int64Array::from(vec![0, 1]))),
    ])?;
    write_table(dir, "tsc", &tsc)?;

    let tpp = batch(vec![
        ("MSID", strings(&[Some("AAA"), Some("AAA"), Some("CCC")])),
        ("SEQUENCE_NUM", Arc::new(Int64Array::from(vec![1, 2, 1]))),
        ("RAW_COUNT", Arc::new(Int64Array::from(vec![0, 255, 10]))),
        (
            "ENG_UNIT_VALUE",
            Arc::new(Float64Array::from(vec![-10.0, 50.0, 1.5])),
        ),
    ])?;
    write_table(dir, "tpp", &tpp)?;

    let tformat = batch(vec![
        ("FORMAT_ID", Arc::new(Int64Array::from(vec![1, 2]))),
        ("NAME", strings(&[Some("normal"), Some("dump")])),
    ])?;
    write_table(dir, "tformat", &tformat)?;

    Ok(())
}

pub(crate) fn sample_store(root: &Path) -> TestResult<TableStore> {
    let dir: PathBuf = root.join("p010");
    write_sample_version(&dir)?;
    Ok(TableStore::new(dir))
}
