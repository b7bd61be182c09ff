#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn write_table(dir: &Path, name: &str, columns: Vec<(&str, ArrayRef)>) -> TestResult {
    std::fs::create_dir_all(dir)?;

    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, a)| a).collect(),
    )?;

    let file = std::fs::File::create(dir.join(format!("{name}.parquet")))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

pub fn strings(values: &[Option<&str>]) -> ArrayRef {
    Arc::new(StringArray::from(values.to_vec()))
}

pub fn ints(values: &[i64]) -> ArrayRef {
    Arc::new(Int64Array::from(values.to_vec()))
}

pub fn floats(values: &[f64]) -> ArrayRef {
    Arc::new(Float64Array::from(values.to_vec()))
}

/// The three-MSID dataset:
///
/// - `AAA` "alpha sensor": two state codes, two point pairs, one limit row;
/// - `BBB` "beta sensor": no state codes, no point pairs;
/// - `CCC` no description: one point pair.
///
/// `tformat` has no MSID column.
pub fn write_sensor_version(dir: &Path) -> TestResult {
    write_table(
        dir,
        "tmsrment",
        vec![
            ("MSID", strings(&[Some("AAA"), Some("BBB"), Some("CCC")])),
            (
                "TECHNICAL_NAME",
                strings(&[Some("ALPHA TEMP"), Some("BETA MODE"), None]),
            ),
            ("DATA_TYPE", strings(&[Some("UINT"), Some("UINT"), Some("INT")])),
            ("CALIBRATION_TYPE", strings(&[Some("PP"), Some("SC"), Some("PP")])),
            ("ENG_UNIT", strings(&[Some("DEGC"), None, Some("CNT")])),
            ("LOW_RAW_COUNT", ints(&[0, 0, -32768])),
            ("HIGH_RAW_COUNT", ints(&[255, 3, 32767])),
            (
                "DESCRIPTION",
                strings(&[Some("alpha sensor"), Some("beta sensor"), None]),
            ),
        ],
    )?;
    write_table(
        dir,
        "tsc",
        vec![
            ("MSID", strings(&[Some("AAA"), Some("AAA")])),
            ("STATE_CODE", strings(&[Some("OFF"), Some("ON")])),
        ],
    )?;
    write_table(
        dir,
        "tpp",
        vec![
            ("MSID", strings(&[Some("AAA"), Some("AAA"), Some("CCC")])),
            ("SEQUENCE_NUM", ints(&[1, 2, 1])),
            ("RAW_COUNT", ints(&[0, 255, 10])),
            ("ENG_UNIT_VALUE", floats(&[-10.0, 50.0, 1.5])),
        ],
    )?;
    write_table(
        dir,
        "tlmt",
        vec![
            ("MSID", strings(&[Some("AAA")])),
            ("LIMIT_SET_NUM", ints(&[1])),
            ("WARNING_LOW", floats(&[-5.0])),
            ("WARNING_HIGH", floats(&[40.0])),
        ],
    )?;
    write_table(
        dir,
        "tformat",
        vec![
            ("FORMAT_ID", ints(&[1, 2])),
            ("NAME", strings(&[Some("normal"), Some("dump")])),
        ],
    )?;
    Ok(())
}

/// An older version that only knows MSID `DDD`.
pub fn write_legacy_version(dir: &Path) -> TestResult {
    write_table(
        dir,
        "tmsrment",
        vec![
            ("MSID", strings(&[Some("DDD")])),
            ("TECHNICAL_NAME", strings(&[Some("DELTA VOLTS")])),
            ("DESCRIPTION", strings(&[Some("legacy monitor")])),
        ],
    )
}
