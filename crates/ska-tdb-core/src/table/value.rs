//! Cell values returned by column lookups.

use std::fmt;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type, UInt8Type,
    UInt16Type, UInt32Type, UInt64Type,
};

use crate::error::{TdbResult, UnsupportedColumnTypeSnafu};

/// One typed cell of a TDB table.
///
/// Masked cells (Arrow nulls) are [`Scalar::Null`]; string helpers such as
/// [`Scalar::text_or_empty`] present them as the empty string.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Missing value.
    Null,
    /// Boolean cell.
    Bool(bool),
    /// Signed integer cell (all signed widths, and unsigned up to 32 bits).
    Int(i64),
    /// Unsigned 64-bit cell.
    UInt(u64),
    /// Floating point cell.
    Float(f64),
    /// String cell.
    Str(String),
}

impl Scalar {
    /// Read cell `idx` of `array`. `column` is used for error context only.
    pub(crate) fn from_array(column: &str, array: &dyn Array, idx: usize) -> TdbResult<Scalar> {
        if array.is_null(idx) {
            return Ok(Scalar::Null);
        }

        let value = match array.data_type() {
            DataType::Null => Scalar::Null,
            DataType::Boolean => Scalar::Bool(array.as_boolean().value(idx)),
            DataType::Int8 => Scalar::Int(i64::from(array.as_primitive::<Int8Type>().value(idx))),
            DataType::Int16 => {
                Scalar::Int(i64::from(array.as_primitive::<Int16Type>().value(idx)))
            }
            DataType::Int32 => {
                Scalar::Int(i64::from(array.as_primitive::<Int32Type>().value(idx)))
            }
            DataType::Int64 => Scalar::Int(array.as_primitive::<Int64Type>().value(idx)),
            DataType::UInt8 => {
                Scalar::Int(i64::from(array.as_primitive::<UInt8Type>().value(idx)))
            }
            DataType::UInt16 => {
                Scalar::Int(i64::from(array.as_primitive::<UInt16Type>().value(idx)))
            }
            DataType::UInt32 => {
                Scalar::Int(i64::from(array.as_primitive::<UInt32Type>().value(idx)))
            }
            DataType::UInt64 => Scalar::UInt(array.as_primitive::<UInt64Type>().value(idx)),
            DataType::Float32 => {
                Scalar::Float(f64::from(array.as_primitive::<Float32Type>().value(idx)))
            }
            DataType::Float64 => Scalar::Float(array.as_primitive::<Float64Type>().value(idx)),
            DataType::Utf8 => Scalar::Str(array.as_string::<i32>().value(idx).to_string()),
            DataType::LargeUtf8 => Scalar::Str(array.as_string::<i64>().value(idx).to_string()),
            DataType::Utf8View => Scalar::Str(array.as_string_view().value(idx).to_string()),
            other => {
                return UnsupportedColumnTypeSnafu {
                    column,
                    data_type: other.clone(),
                }
                .fail();
            }
        };
        Ok(value)
    }

    /// True for a missing value.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// The string content, if this is a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// String content, with a missing value read as `""`.
    pub fn text_or_empty(&self) -> &str {
        self.as_str().unwrap_or("")
    }

    /// Integer view of integer cells.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            Scalar::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Floating point view of numeric cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            Scalar::Int(v) => Some(*v as f64),
            Scalar::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::UInt(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Str(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl PartialEq<&str> for Scalar {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// Result of a column lookup on a [`crate::TableView`].
///
/// A single-row view yields a bare [`ColumnValue::Scalar`]; an empty or
/// multi-row view yields the whole [`ColumnValue::Array`].
#[derive(Clone, Debug)]
pub enum ColumnValue {
    /// The one cell of a single-row view.
    Scalar(Scalar),
    /// The column across every row held.
    Array(ArrayRef),
}

impl ColumnValue {
    /// The scalar, when this came from a single-row view.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ColumnValue::Scalar(s) => Some(s),
            ColumnValue::Array(_) => None,
        }
    }

    /// The array, when this came from an empty or multi-row view.
    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            ColumnValue::Scalar(_) => None,
            ColumnValue::Array(a) => Some(a),
        }
    }

    /// Number of cells; a scalar counts as one.
    pub fn len(&self) -> usize {
        match self {
            ColumnValue::Scalar(_) => 1,
            ColumnValue::Array(a) => a.len(),
        }
    }

    /// True for an empty array.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cells as scalars, in row order.
    pub fn to_scalars(&self, column: &str) -> TdbResult<Vec<Scalar>> {
        match self {
            ColumnValue::Scalar(s) => Ok(vec![s.clone()]),
            ColumnValue::Array(a) => (0..a.len())
                .map(|i| Scalar::from_array(column, a.as_ref(), i))
                .collect(),
        }
    }
}
