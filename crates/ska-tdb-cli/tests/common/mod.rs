use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn write_table(dir: &Path, name: &str, columns: Vec<(&str, ArrayRef)>) -> TestResult {
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

/// A `p010` directory with TEPHIN (point pairs) and AOPCADMD (state codes).
pub fn write_tdb(root: &Path) -> TestResult {
    let dir = root.join("p010");
    write_table(
        &dir,
        "tmsrment",
        vec![
            (
                "MSID",
                Arc::new(StringArray::from(vec!["TEPHIN", "AOPCADMD"])),
            ),
            (
                "TECHNICAL_NAME",
                Arc::new(StringArray::from(vec!["EPHIN SENSOR HOUSING TEMP", "PCAD MODE"])),
            ),
            (
                "ENG_UNIT",
                Arc::new(StringArray::from(vec![Some("DEGF"), None])),
            ),
            (
                "DESCRIPTION",
                Arc::new(StringArray::from(vec![
                    Some("EPHIN housing temperature"),
                    None,
                ])),
            ),
        ],
    )?;
    write_table(
        &dir,
        "tsc",
        vec![
            (
                "MSID",
                Arc::new(StringArray::from(vec!["AOPCADMD", "AOPCADMD"])),
            ),
            ("STATE_CODE", Arc::new(StringArray::from(vec!["NPNT", "NMAN"]))),
        ],
    )?;
    write_table(
        &dir,
        "tpp",
        vec![
            ("MSID", Arc::new(StringArray::from(vec!["TEPHIN"]))),
            ("RAW_COUNT", Arc::new(Int64Array::from(vec![128]))),
            ("ENG_UNIT_VALUE", Arc::new(Float64Array::from(vec![72.5]))),
        ],
    )?;
    Ok(())
}
