//! Backend-neutral result rows and typed projection.

use crate::error::MappingError;

/// A single value read from a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL.
    Null,
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Real(f64),
    /// Text value.
    Text(String),
    /// Binary value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Storage class name used in mapping errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Integer(_) => "integer",
            SqlValue::Real(_) => "real",
            SqlValue::Text(_) => "text",
            SqlValue::Blob(_) => "blob",
        }
    }
}

/// One row of a result set, in projection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlRow {
    values: Vec<SqlValue>,
}

impl SqlRow {
    /// Wraps the values of one row.
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value at `index`.
    pub fn value(&self, index: usize) -> Result<&SqlValue, MappingError> {
        self.values.get(index).ok_or(MappingError::MissingColumn {
            index,
            width: self.values.len(),
        })
    }

    /// Typed value at `index`. `column` names the projection alias in errors.
    pub fn get<T: FromSqlValue>(&self, index: usize, column: &'static str) -> Result<T, MappingError> {
        T::from_sql_value(self.value(index)?, column)
    }

    /// Consumes the row.
    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

/// Conversion from a stored value into a Rust field.
///
/// Non-`Option` targets reject NULL with [`MappingError::UnexpectedNull`].
pub trait FromSqlValue: Sized {
    /// Converts `value`, read from `column`.
    fn from_sql_value(value: &SqlValue, column: &'static str) -> Result<Self, MappingError>;
}

fn mismatch(value: &SqlValue, column: &'static str, expected: &'static str) -> MappingError {
    match value {
        SqlValue::Null => MappingError::UnexpectedNull { column },
        other => MappingError::TypeMismatch {
            column,
            expected,
            found: other.type_name(),
        },
    }
}

impl FromSqlValue for i64 {
    fn from_sql_value(value: &SqlValue, column: &'static str) -> Result<Self, MappingError> {
        match value {
            SqlValue::Integer(i) => Ok(*i),
            other => Err(mismatch(other, column, "integer")),
        }
    }
}

impl FromSqlValue for i32 {
    fn from_sql_value(value: &SqlValue, column: &'static str) -> Result<Self, MappingError> {
        let wide = i64::from_sql_value(value, column)?;
        i32::try_from(wide).map_err(|_| MappingError::OutOfRange {
            column,
            value: wide,
        })
    }
}

impl FromSqlValue for u64 {
    fn from_sql_value(value: &SqlValue, column: &'static str) -> Result<Self, MappingError> {
        let wide = i64::from_sql_value(value, column)?;
        u64::try_from(wide).map_err(|_| MappingError::OutOfRange {
            column,
            value: wide,
        })
    }
}

impl FromSqlValue for f64 {
    fn from_sql_value(value: &SqlValue, column: &'static str) -> Result<Self, MappingError> {
        match value {
            SqlValue::Real(f) => Ok(*f),
            SqlValue::Integer(i) => Ok(*i as f64),
            other => Err(mismatch(other, column, "real")),
        }
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: &SqlValue, column: &'static str) -> Result<Self, MappingError> {
        match value {
            SqlValue::Text(s) => Ok(s.clone()),
            other => Err(mismatch(other, column, "text")),
        }
    }
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: &SqlValue, column: &'static str) -> Result<Self, MappingError> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_sql_value(other, column).map(Some),
        }
    }
}

/// Positional projection of a whole row into a record.
pub trait FromSqlRow: Sized {
    /// Builds the record from `row`.
    fn from_row(row: &SqlRow) -> Result<Self, MappingError>;
}

/// Maps every row, stopping at the first failure.
pub fn map_rows<T: FromSqlRow>(rows: &[SqlRow]) -> Result<Vec<T>, MappingError> {
    rows.iter().map(T::from_row).collect()
}
