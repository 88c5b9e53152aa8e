use crate::core::{Result, SqlcmdError};
use std::fmt;

/// One table row as an ordered, fixed-length tuple of string values.
///
/// A slot is either unset or holds a string. Rows read from the database use
/// unset slots for SQL NULL. The length is fixed when the data set is created.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataSet {
    values: Vec<Option<String>>,
}

impl DataSet {
    /// Creates a data set with `size` unset slots.
    pub fn new(size: usize) -> Self {
        DataSet {
            values: vec![None; size],
        }
    }

    /// Sets the value at a zero-based `index`.
    ///
    /// # Errors
    ///
    /// Returns `SqlcmdError::IndexOutOfBounds` if `index >= len()`; the data
    /// set is left unchanged.
    pub fn add(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        let size = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(SqlcmdError::IndexOutOfBounds { index, size })?;
        *slot = Some(value.into());
        Ok(())
    }

    /// The value at `index`, or `None` when the slot is unset or out of range
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates the slots in order
    pub fn values(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.values.iter().map(|v| v.as_deref())
    }

    /// Renders the values as the body of a SQL tuple literal.
    ///
    /// Each value is single-quoted and the values are comma-separated, e.g.
    /// `'1','name1','25'`. Embedded quotes are doubled and unset slots render
    /// as `NULL`.
    pub fn row(&self) -> String {
        self.values
            .iter()
            .map(|v| match v {
                Some(value) => format!("'{}'", value.replace('\'', "''")),
                None => "NULL".to_string(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.row())
    }
}

impl From<Vec<Option<String>>> for DataSet {
    fn from(values: Vec<Option<String>>) -> Self {
        DataSet { values }
    }
}

impl From<Vec<String>> for DataSet {
    fn from(values: Vec<String>) -> Self {
        DataSet {
            values: values.into_iter().map(Some).collect(),
        }
    }
}

impl From<Vec<&str>> for DataSet {
    fn from(values: Vec<&str>) -> Self {
        DataSet {
            values: values.into_iter().map(|v| Some(v.to_string())).collect(),
        }
    }
}
