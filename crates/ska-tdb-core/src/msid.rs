//! MSID-centric navigation across the TDB tables.
//!
//! An [`MsidView`] is either the registry root (no MSID bound) or bound to one
//! upper-case MSID. It exposes:
//!
//! - one accessor per MSID-bearing table ([`MsidTable`]), e.g. `tsc()` for
//!   state codes or `tpp()` for calibration point pairs;
//! - one accessor per column of the `tmsrment` description table
//!   ([`TmsrmentColumn`]), e.g. `technical_name()` or `description()`;
//! - [`MsidView::attr`], a name-keyed dispatcher over the same accessors
//!   (`"Tsc"`, `"technical_name"`, ...) backed by a map built once per
//!   process.
//!
//! ```no_run
//! # fn demo(tdb: &ska_tdb_core::Tdb) -> ska_tdb_core::TdbResult<()> {
//! let tephin = tdb.msids().lookup("tephin")?;
//! let unit = tephin.eng_unit()?;
//! let point_pairs = tephin.tpp()?; // None when there is no calibration
//! let state_codes = tdb.msids().lookup("aopcadmd")?.tsc()?;
//! # let _ = (unit, point_pairs, state_codes);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use arrow::array::{AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use log::warn;
use regex::RegexBuilder;
use snafu::prelude::*;

use crate::error::{
    ArrowSnafu, InvalidPatternSnafu, TdbResult, UnknownAttributeSnafu, UnknownColumnSnafu,
    UnknownMsidSnafu,
};
use crate::table::{ColumnValue, Rows, TableStore, TableView};

/// Name of the canonical MSID description table.
pub const DESCRIPTION_TABLE: &str = "tmsrment";

macro_rules! msid_tables {
    ($($variant:ident => $table:literal, $method:ident;)+) => {
        /// Tables keyed by MSID.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum MsidTable {
            $(
                #[doc = concat!("The `", $table, "` table.")]
                $variant,
            )+
        }

        impl MsidTable {
            /// Every MSID-bearing table.
            pub const ALL: &'static [MsidTable] = &[$(MsidTable::$variant,)+];

            /// On-disk table name, e.g. `tsc`.
            pub const fn table_name(self) -> &'static str {
                match self {
                    $(MsidTable::$variant => $table,)+
                }
            }

            /// Accessor name used by [`MsidView::attr`], e.g. `Tsc`.
            pub const fn attr_name(self) -> &'static str {
                match self {
                    $(MsidTable::$variant => stringify!($variant),)+
                }
            }
        }

        impl MsidView {
            $(
                #[doc = concat!(
                    "Rows of `", $table, "` for this MSID, or `None` when it has none. ",
                    "Unbound views return the whole table."
                )]
                pub fn $method(&self) -> TdbResult<Option<TableView>> {
                    self.table(MsidTable::$variant)
                }
            )+
        }
    };
}

macro_rules! tmsrment_columns {
    ($($variant:ident => $column:literal, $method:ident;)+) => {
        /// Columns of the `tmsrment` description table.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum TmsrmentColumn {
            $(
                #[doc = concat!("`", $column, "`")]
                $variant,
            )+
        }

        impl TmsrmentColumn {
            /// Every description column, in table order.
            pub const ALL: &'static [TmsrmentColumn] = &[$(TmsrmentColumn::$variant,)+];

            /// Stored (upper-case) column name.
            pub const fn column_name(self) -> &'static str {
                match self {
                    $(TmsrmentColumn::$variant => $column,)+
                }
            }

            /// Accessor name used by [`MsidView::attr`], e.g. `technical_name`.
            pub const fn attr_name(self) -> &'static str {
                match self {
                    $(TmsrmentColumn::$variant => stringify!($method),)+
                }
            }
        }

        impl MsidView {
            $(
                #[doc = concat!(
                    "`", $column, "` for this MSID; the whole column when unbound."
                )]
                pub fn $method(&self) -> TdbResult<ColumnValue> {
                    self.column(TmsrmentColumn::$variant)
                }
            )+
        }
    };
}

msid_tables! {
    Tmsrment => "tmsrment", tmsrment;
    Tpc => "tpc", tpc;
    Tsc => "tsc", tsc;
    Tpp => "tpp", tpp;
    Tlmt => "tlmt", tlmt;
    Tcntr => "tcntr", tcntr;
    Tsmpl => "tsmpl", tsmpl;
    Tloc => "tloc", tloc;
}

tmsrment_columns! {
    Msid => "MSID", msid;
    TechnicalName => "TECHNICAL_NAME", technical_name;
    DataType => "DATA_TYPE", data_type;
    CalibrationType => "CALIBRATION_TYPE", calibration_type;
    EngUnit => "ENG_UNIT", eng_unit;
    LowRawCount => "LOW_RAW_COUNT", low_raw_count;
    HighRawCount => "HIGH_RAW_COUNT", high_raw_count;
    TotalLength => "TOTAL_LENGTH", total_length;
    Prop => "PROP", prop;
    CounterMsid => "COUNTER_MSID", counter_msid;
    RangeMsid => "RANGE_MSID", range_msid;
    CalibrationSwitchMsid => "CALIBRATION_SWITCH_MSID", calibration_switch_msid;
    CalibrationDefaultSetNum => "CALIBRATION_DEFAULT_SET_NUM", calibration_default_set_num;
    LimitSwitchMsid => "LIMIT_SWITCH_MSID", limit_switch_msid;
    LimitDefaultSetNum => "LIMIT_DEFAULT_SET_NUM", limit_default_set_num;
    EsSwitchMsid => "ES_SWITCH_MSID", es_switch_msid;
    EsDefaultSetNum => "ES_DEFAULT_SET_NUM", es_default_set_num;
    OwnerId => "OWNER_ID", owner_id;
    Description => "DESCRIPTION", description;
    EhsHeaderFlag => "EHS_HEADER_FLAG", ehs_header_flag;
}

#[derive(Clone, Copy, Debug)]
enum Accessor {
    Table(MsidTable),
    Column(TmsrmentColumn),
}

static ACCESSORS: LazyLock<BTreeMap<&'static str, Accessor>> = LazyLock::new(|| {
    let tables = MsidTable::ALL
        .iter()
        .map(|t| (t.attr_name(), Accessor::Table(*t)));
    let columns = TmsrmentColumn::ALL
        .iter()
        .map(|c| (c.attr_name(), Accessor::Column(*c)));
    tables.chain(columns).collect()
});

/// Value produced by [`MsidView::attr`].
#[derive(Clone, Debug)]
pub enum Attribute {
    /// A per-table accessor result (`None` when the MSID has no rows).
    Table(Option<TableView>),
    /// A description column value.
    Column(ColumnValue),
}

/// Handle onto the TDB seen from one MSID (or from the root).
///
/// A view keeps the [`TableStore`] it was created from. After
/// [`crate::Tdb::set_version`] an old view still answers from the previous
/// version's tables; fetch a fresh root from the registry to follow the
/// switch.
#[derive(Clone, Debug)]
pub struct MsidView {
    tables: Arc<TableStore>,
    msid: Option<String>,
}

impl MsidView {
    /// Unbound view over `tables`.
    pub fn root(tables: Arc<TableStore>) -> Self {
        MsidView { tables, msid: None }
    }

    fn bound(&self, msid: String) -> Self {
        MsidView {
            tables: self.tables.clone(),
            msid: Some(msid),
        }
    }

    /// The bound MSID (upper-case), or `None` for the root.
    pub fn msid_code(&self) -> Option<&str> {
        self.msid.as_deref()
    }

    /// True for the unbound root view.
    pub fn is_root(&self) -> bool {
        self.msid.is_none()
    }

    /// Names accepted by [`MsidView::attr`], sorted.
    pub fn attribute_names() -> impl Iterator<Item = &'static str> {
        ACCESSORS.keys().copied()
    }

    /// Look up an accessor by name: capitalized table names (`"Tpp"`) or
    /// lower-case description columns (`"eng_unit"`).
    pub fn attr(&self, name: &str) -> TdbResult<Attribute> {
        let accessor = *ACCESSORS
            .get(name)
            .context(UnknownAttributeSnafu { name })?;
        match accessor {
            Accessor::Table(t) => self.table(t).map(Attribute::Table),
            Accessor::Column(c) => self.column(c).map(Attribute::Column),
        }
    }

    /// Rows of `table` for this MSID.
    ///
    /// Unbound: `Some(whole table)`. Bound: the filtered view, or `None` when
    /// the MSID has no rows there (absence is not an error).
    pub fn table(&self, table: MsidTable) -> TdbResult<Option<TableView>> {
        let view = self.tables.get(table.table_name())?;
        match &self.msid {
            None => Ok(Some(view)),
            Some(msid) => {
                let rows = view.filter_msid(msid)?;
                Ok((!rows.is_empty()).then_some(rows))
            }
        }
    }

    /// Description column `column` for this MSID.
    ///
    /// Unbound: the whole column. Bound: the MSID's single value.
    pub fn column(&self, column: TmsrmentColumn) -> TdbResult<ColumnValue> {
        let tmsrment = self.tables.get(DESCRIPTION_TABLE)?;
        let Some(msid) = &self.msid else {
            return tmsrment.column(column.column_name());
        };

        let rows = tmsrment.filter_msid(msid)?;
        match rows.rows() {
            Rows::Empty(_) => UnknownMsidSnafu { msid: msid.as_str() }.fail(),
            Rows::Single(_) => rows.column(column.column_name()),
            Rows::Many(_) => {
                warn!(
                    "MSID {msid} has {} rows in {DESCRIPTION_TABLE}; returning all of them",
                    rows.len()
                );
                rows.column(column.column_name())
            }
        }
    }

    /// A description-table column as strings, for searching.
    fn description_text(&self, column: TmsrmentColumn) -> TdbResult<StringArray> {
        let tmsrment = self.tables.get(DESCRIPTION_TABLE)?;
        let idx = tmsrment
            .column_index(column.column_name())
            .context(UnknownColumnSnafu {
                table: DESCRIPTION_TABLE,
                column: column.column_name(),
            })?;
        let batch = tmsrment.to_batch();
        let text = cast(batch.column(idx), &DataType::Utf8).context(ArrowSnafu {
            table: DESCRIPTION_TABLE,
        })?;
        Ok(text.as_string::<i32>().clone())
    }

    /// Bound view for MSID `key` (case-insensitive).
    ///
    /// # Errors
    ///
    /// [`crate::TdbError::UnknownMsid`] when `key` is not in `tmsrment`.
    pub fn lookup(&self, key: &str) -> TdbResult<MsidView> {
        let msid = key.to_ascii_uppercase();
        let codes = self.description_text(TmsrmentColumn::Msid)?;
        ensure!(
            codes.iter().flatten().any(|code| code == msid),
            UnknownMsidSnafu { msid }
        );
        Ok(self.bound(msid))
    }

    /// MSIDs whose code, description or technical name matches `pattern`.
    ///
    /// `pattern` is a case-insensitive regular expression searched anywhere
    /// in each field; missing descriptions and technical names are searched
    /// as empty strings. Results follow `tmsrment` row order, bound to the
    /// upper-cased code just as [`MsidView::lookup`] binds them.
    pub fn find(&self, pattern: &str) -> TdbResult<Vec<MsidView>> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .context(InvalidPatternSnafu { pattern })?;

        let codes = self.description_text(TmsrmentColumn::Msid)?;
        let descriptions = self.description_text(TmsrmentColumn::Description)?;
        let names = self.description_text(TmsrmentColumn::TechnicalName)?;

        let found = codes
            .iter()
            .zip(descriptions.iter())
            .zip(names.iter())
            .filter_map(|((code, description), name)| {
                let code = code?;
                let hit = re.is_match(code)
                    || re.is_match(description.unwrap_or(""))
                    || re.is_match(name.unwrap_or(""));
                hit.then(|| self.bound(code.to_ascii_uppercase()))
            })
            .collect();
        Ok(found)
    }
}

impl fmt::Display for MsidView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.msid {
            None => write!(f, "<MsidView>"),
            Some(msid) => {
                let technical_name = self
                    .technical_name()
                    .ok()
                    .and_then(|v| v.as_scalar().map(ToString::to_string))
                    .unwrap_or_default();
                write!(
                    f,
                    "<MsidView msid=\"{msid}\" technical_name=\"{technical_name}\">"
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TdbError;
    use crate::table::Scalar;
    use crate::test_util::{TestResult, sample_store, write_table};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use tempfile::TempDir;

    fn root(tmp: &TempDir) -> TestResult<MsidView> {
        Ok(MsidView::root(Arc::new(sample_store(tmp.path())?)))
    }

    #[test]
    fn accessor_map_covers_every_table_and_column() {
        let names: Vec<_> = MsidView::attribute_names().collect();
        assert_eq!(
            names.len(),
            MsidTable::ALL.len() + TmsrmentColumn::ALL.len()
        );
        assert!(names.contains(&"Tsc"));
        assert!(names.contains(&"Tmsrment"));
        assert!(names.contains(&"technical_name"));
        assert!(names.contains(&"ehs_header_flag"));
        assert_eq!(TmsrmentColumn::ALL.len(), 20);
        assert_eq!(MsidTable::Tcntr.table_name(), "tcntr");
    }

    #[test]
    fn lookup_normalizes_case() -> TestResult {
        let tmp = TempDir::new()?;
        let root = root(&tmp)?;

        for key in ["bbb", "BBB", "bBb"] {
            assert_eq!(root.lookup(key)?.msid_code(), Some("BBB"));
        }
        assert!(matches!(
            root.lookup("zzz"),
            Err(TdbError::UnknownMsid { ref msid }) if msid == "ZZZ"
        ));
        Ok(())
    }

    #[test]
    fn bound_column_accessors_return_scalars() -> TestResult {
        let tmp = TempDir::new()?;
        let bbb = root(&tmp)?.lookup("bbb")?;

        assert_eq!(
            bbb.description()?.as_scalar(),
            Some(&Scalar::from("beta sensor"))
        );
        assert_eq!(bbb.total_length()?.as_scalar(), Some(&Scalar::Int(2)));
        assert_eq!(bbb.eng_unit()?.as_scalar(), Some(&Scalar::Null));
        Ok(())
    }

    #[test]
    fn unbound_accessors_return_whole_tables() -> TestResult {
        let tmp = TempDir::new()?;
        let root = root(&tmp)?;

        assert_eq!(root.technical_name()?.len(), 3);
        assert_eq!(root.tpp()?.map(|t| t.len()), Some(3));
        Ok(())
    }

    #[test]
    fn bound_table_accessors_return_none_when_absent() -> TestResult {
        let tmp = TempDir::new()?;
        let root = root(&tmp)?;

        assert!(root.lookup("BBB")?.tsc()?.is_none());
        assert!(root.lookup("BBB")?.tpp()?.is_none());
        assert_eq!(root.lookup("AAA")?.tsc()?.map(|t| t.len()), Some(2));

        let ccc_tpp = root.lookup("CCC")?.tpp()?.expect("CCC has one point pair");
        assert!(matches!(ccc_tpp.rows(), Rows::Single(_)));
        assert_eq!(
            ccc_tpp.column("eng_unit_value")?.as_scalar(),
            Some(&Scalar::Float(1.5))
        );
        Ok(())
    }

    #[test]
    fn missing_table_file_surfaces_unknown_table() -> TestResult {
        let tmp = TempDir::new()?;
        let aaa = root(&tmp)?.lookup("AAA")?;
        assert!(matches!(aaa.tlmt(), Err(TdbError::UnknownTable { .. })));
        Ok(())
    }

    #[test]
    fn attr_dispatches_by_name() -> TestResult {
        let tmp = TempDir::new()?;
        let aaa = root(&tmp)?.lookup("aaa")?;

        match aaa.attr("Tsc")? {
            Attribute::Table(Some(t)) => assert_eq!(t.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
        match aaa.attr("technical_name")? {
            Attribute::Column(v) => assert_eq!(v.as_scalar(), Some(&Scalar::from("Alpha temp"))),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            aaa.attr("tsc"),
            Err(TdbError::UnknownAttribute { .. })
        ));
        Ok(())
    }

    #[test]
    fn find_matches_code_description_or_name() -> TestResult {
        let tmp = TempDir::new()?;
        let root = root(&tmp)?;

        let codes = |views: Vec<MsidView>| -> Vec<String> {
            views
                .iter()
                .filter_map(|v| v.msid_code().map(str::to_string))
                .collect()
        };

        assert_eq!(codes(root.find("sensor")?), vec!["AAA", "BBB"]);
        assert_eq!(codes(root.find("GAMMA")?), vec!["CCC"]);
        assert_eq!(codes(root.find("^c+$")?), vec!["CCC"]);
        assert_eq!(codes(root.find("a|b")?), vec!["AAA", "BBB", "CCC"]);
        assert!(root.find("nothing-like-this")?.is_empty());
        assert!(matches!(
            root.find("(unclosed"),
            Err(TdbError::InvalidPattern { .. })
        ));
        Ok(())
    }

    #[test]
    fn find_binds_upper_cased_codes() -> TestResult {
        let tmp = TempDir::new()?;
        let dir = tmp.path().join("p009");
        let schema = Schema::new(vec![
            Field::new("MSID", DataType::Utf8, true),
            Field::new("TECHNICAL_NAME", DataType::Utf8, true),
            Field::new("DESCRIPTION", DataType::Utf8, true),
        ]);
        let tmsrment = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec!["Ddd", "EEE"])),
                Arc::new(StringArray::from(vec!["Delta temp", "Epsilon mode"])),
                Arc::new(StringArray::from(vec!["delta", "epsilon"])),
            ],
        )?;
        write_table(&dir, "tmsrment", &tmsrment)?;
        let root = MsidView::root(Arc::new(TableStore::new(dir)));

        let found = root.find("delta")?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].msid_code(), Some("DDD"));
        assert!(found[0].to_string().starts_with(r#"<MsidView msid="DDD""#));
        assert_eq!(
            root.find("^e")?.iter().filter_map(MsidView::msid_code).collect::<Vec<_>>(),
            vec!["EEE"]
        );
        Ok(())
    }

    #[test]
    fn display_shows_code_and_technical_name() -> TestResult {
        let tmp = TempDir::new()?;
        let root = root(&tmp)?;

        assert_eq!(root.to_string(), "<MsidView>");
        assert_eq!(
            root.lookup("aaa")?.to_string(),
            r#"<MsidView msid="AAA" technical_name="Alpha temp">"#
        );
        Ok(())
    }
}
