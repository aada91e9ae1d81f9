//! Raw spreadsheet rows

use serde_json::{Map, Value};

/// One raw row: column header → cell value
///
/// Empty cells are left out of the map, so a missing column and an empty
/// cell look the same to the normalizer.
pub type RawRow = Map<String, Value>;

/// A raw row together with its position in the source sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// 1-based sheet row number (the header occupies row 1)
    pub row: usize,
    pub data: RawRow,
}

impl SourceRow {
    pub fn new(row: usize, data: RawRow) -> Self {
        Self { row, data }
    }
}
