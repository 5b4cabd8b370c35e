//! Purpose: Column layout describing how preview widgets are split across columns.
//! Exports: `ColumnLayout`, `MAX_COLUMNS`.
//! Invariants: `1 <= number_of_columns <= MAX_COLUMNS`; at most that many columns are added.
//! Invariants: Columns declared but not yet added read back as empty.
use serde_json::{Value, json};

use crate::core::error::{Error, ErrorKind, Result};

pub const MAX_COLUMNS: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnLayout {
    number_of_columns: usize,
    columns: Vec<Vec<String>>,
}

impl ColumnLayout {
    pub fn new(number_of_columns: i32) -> Result<Self> {
        match usize::try_from(number_of_columns) {
            Ok(count) if (1..=MAX_COLUMNS).contains(&count) => Ok(Self {
                number_of_columns: count,
                columns: Vec::with_capacity(count),
            }),
            _ => Err(Error::new(ErrorKind::OutOfRange).with_message(format!(
                "invalid number of columns {number_of_columns}, expected 1..={MAX_COLUMNS}"
            ))),
        }
    }

    pub fn add_column(&mut self, widget_ids: Vec<String>) -> Result<()> {
        if self.columns.len() >= self.number_of_columns {
            return Err(Error::logic(format!(
                "cannot add more than {} columns",
                self.number_of_columns
            )));
        }
        self.columns.push(widget_ids);
        Ok(())
    }

    pub fn number_of_columns(&self) -> usize {
        self.number_of_columns
    }

    /// Number of columns added so far.
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: i32) -> Result<&[String]> {
        let idx = usize::try_from(index)
            .ok()
            .filter(|idx| *idx < self.number_of_columns)
            .ok_or_else(|| {
                Error::new(ErrorKind::OutOfRange).with_message(format!(
                    "column index {index} out of range for {} columns",
                    self.number_of_columns
                ))
            })?;
        Ok(self.columns.get(idx).map(Vec::as_slice).unwrap_or(&[]))
    }

    pub fn serialize(&self) -> Value {
        json!({
            "number_of_columns": self.number_of_columns,
            "columns": self.columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_columns_with_one_filled() {
        let mut layout = ColumnLayout::new(2).unwrap();
        layout
            .add_column(vec!["w1".to_string(), "w2".to_string()])
            .unwrap();
        assert_eq!(layout.number_of_columns(), 2);
        assert_eq!(layout.size(), 1);
        assert_eq!(layout.column(0).unwrap(), ["w1", "w2"]);
        assert!(layout.column(1).unwrap().is_empty());
    }

    #[test]
    fn column_count_bounds() {
        assert!(ColumnLayout::new(0).is_err());
        assert!(ColumnLayout::new(-1).is_err());
        assert!(ColumnLayout::new(MAX_COLUMNS as i32 + 1).is_err());
        assert!(ColumnLayout::new(MAX_COLUMNS as i32).is_ok());
    }

    #[test]
    fn extra_column_is_a_logic_error() {
        let mut layout = ColumnLayout::new(1).unwrap();
        layout.add_column(Vec::new()).unwrap();
        let err = layout.add_column(Vec::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Logic);
        assert_eq!(layout.size(), 1);
    }

    #[test]
    fn index_past_declared_columns_is_out_of_range() {
        let layout = ColumnLayout::new(2).unwrap();
        assert_eq!(layout.column(2).unwrap_err().kind(), ErrorKind::OutOfRange);
        assert_eq!(layout.column(-1).unwrap_err().kind(), ErrorKind::OutOfRange);
    }
}
