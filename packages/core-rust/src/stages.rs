//! Stage rows: the ordered, editable list of stops along a route.
//!
//! Row order is display order. Rows are addressed by position, so indices are
//! always the contiguous range `0..len()`. The collection never becomes empty:
//! removing the sole remaining row leaves one blank row in its place.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One stop along a route. All fields are free text; distances are not parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage_no: String,
    /// Stop name in English.
    pub stop_name_en: String,
    /// Stop name in the local language.
    pub stop_name_local: String,
    pub km_from_source: String,
    pub km_from_destination: String,
}

impl StageRecord {
    /// Returns `true` if every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self == &Self::default()
    }

    #[must_use]
    pub fn get(&self, field: StageField) -> &str {
        match field {
            StageField::StageNo => &self.stage_no,
            StageField::StopNameEn => &self.stop_name_en,
            StageField::StopNameLocal => &self.stop_name_local,
            StageField::KmFromSource => &self.km_from_source,
            StageField::KmFromDestination => &self.km_from_destination,
        }
    }

    fn slot(&mut self, field: StageField) -> &mut String {
        match field {
            StageField::StageNo => &mut self.stage_no,
            StageField::StopNameEn => &mut self.stop_name_en,
            StageField::StopNameLocal => &mut self.stop_name_local,
            StageField::KmFromSource => &mut self.km_from_source,
            StageField::KmFromDestination => &mut self.km_from_destination,
        }
    }
}

/// Column of the stage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageField {
    StageNo,
    StopNameEn,
    StopNameLocal,
    KmFromSource,
    KmFromDestination,
}

impl StageField {
    /// All columns in table order.
    pub const ALL: [StageField; 5] = [
        StageField::StageNo,
        StageField::StopNameEn,
        StageField::StopNameLocal,
        StageField::KmFromSource,
        StageField::KmFromDestination,
    ];

    /// Column heading shown above the stage table.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StageField::StageNo => "Stage No",
            StageField::StopNameEn => "Stop Name",
            StageField::StopNameLocal => "Stop Name Marathi",
            StageField::KmFromSource => "Kms From Source",
            StageField::KmFromDestination => "Kms From Destination",
        }
    }
}

/// Error returned when a column name does not match any [`StageField`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stage field: {0}")]
pub struct UnknownStageField(pub String);

impl FromStr for StageField {
    type Err = UnknownStageField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.label() == s)
            .ok_or_else(|| UnknownStageField(s.to_string()))
    }
}

/// Ordered stage rows backing the dynamic table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRowCollection {
    rows: Vec<StageRecord>,
}

impl StageRowCollection {
    /// Creates a collection holding a single blank row.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: vec![StageRecord::default()],
        }
    }

    /// Adds one blank row at the end.
    pub fn append(&mut self) {
        self.rows.push(StageRecord::default());
    }

    /// Removes the row at `index`. Returns `false` if `index` is out of range.
    ///
    /// Removing the sole remaining row leaves a single blank row.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        if self.rows.is_empty() {
            self.rows.push(StageRecord::default());
        }
        true
    }

    /// Replaces one field of one row. Returns `false` if `index` is out of range.
    pub fn update_field(
        &mut self,
        index: usize,
        field: StageField,
        value: impl Into<String>,
    ) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                *row.slot(field) = value.into();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StageRecord> {
        self.rows.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[StageRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StageRecord> {
        self.rows.iter()
    }
}

impl Default for StageRowCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a StageRowCollection {
    type Item = &'a StageRecord;
    type IntoIter = std::slice::Iter<'a, StageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
