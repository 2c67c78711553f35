//! Flattened shot table shared by aggregation, normalization and export.

use serde_json::{Map, Value};

use crate::league::League;

/// Provider-supplied shot attributes, in the order the provider sent them.
pub type ShotFields = Map<String, Value>;

/// Name of the column appended to every row
pub const LEAGUE_COLUMN: &str = "league";

/// Coordinate frame the X/Y columns are currently expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateFrame {
    /// Provider fractions in [0, 1], values still raw
    Fractional,
    /// Rescaled onto the 120x80 reference pitch
    Reference,
}

/// One shot event: pass-through provider fields plus the league tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotRecord {
    fields: ShotFields,
}

impl ShotRecord {
    pub fn new(mut fields: ShotFields, league: League) -> Self {
        // Keep `league` as the trailing field even if the provider ever sends one.
        fields.shift_remove(LEAGUE_COLUMN);
        fields.insert(LEAGUE_COLUMN.to_string(), Value::String(league.tag().to_string()));
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn set(&mut self, column: &str, value: Value) {
        if let Some(slot) = self.fields.get_mut(column) {
            *slot = value;
        } else {
            self.fields.insert(column.to_string(), value);
        }
    }

    pub fn fields(&self) -> &ShotFields {
        &self.fields
    }

    pub fn league(&self) -> Option<&str> {
        self.fields.get(LEAGUE_COLUMN).and_then(Value::as_str)
    }

    /// Numeric view of a column, if it already holds a JSON number
    pub fn number(&self, column: &str) -> Option<f64> {
        self.fields.get(column).and_then(Value::as_f64)
    }
}

/// Ordered, column-uniform collection of shot records.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotDataset {
    columns: Vec<String>,
    rows: Vec<ShotRecord>,
    frame: CoordinateFrame,
}

impl Default for ShotDataset {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            frame: CoordinateFrame::Fractional,
        }
    }
}

impl ShotDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch of rows, extending the column union in first-seen order.
    /// `league` is always kept as the last column.
    pub fn extend(mut self, batch: Vec<ShotRecord>) -> Self {
        for row in &batch {
            for key in row.fields.keys() {
                if key != LEAGUE_COLUMN && !self.columns.iter().any(|c| c == key) {
                    self.columns.push(key.clone());
                }
            }
        }
        self.rows.extend(batch);
        self
    }

    /// Column union; `league` is reported last whenever there is at least one row.
    pub fn columns(&self) -> Vec<&str> {
        let mut cols: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        if !self.rows.is_empty() {
            cols.push(LEAGUE_COLUMN);
        }
        cols
    }

    pub fn rows(&self) -> &[ShotRecord] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [ShotRecord] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn frame(&self) -> CoordinateFrame {
        self.frame
    }

    pub(crate) fn set_frame(&mut self, frame: CoordinateFrame) {
        self.frame = frame;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> ShotFields {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_league_appended_last() {
        let rec = ShotRecord::new(fields(json!({"league": "x", "X": "0.5"})), League::Epl);
        let keys: Vec<&String> = rec.fields().keys().collect();
        assert_eq!(keys, vec!["X", "league"]);
        assert_eq!(rec.league(), Some("EPL"));
    }

    #[test]
    fn test_column_union_first_seen() {
        let a = ShotRecord::new(fields(json!({"id": "1", "X": "0.1"})), League::Epl);
        let b = ShotRecord::new(fields(json!({"id": "2", "player": "P", "X": "0.2"})), League::Epl);
        let ds = ShotDataset::new().extend(vec![a]).extend(vec![b]);
        assert_eq!(ds.columns(), vec!["id", "X", "player", "league"]);
        assert_eq!(ds.len(), 2);
        assert!(ds.rows()[0].get("player").is_none());
    }

    #[test]
    fn test_empty_dataset_has_no_columns() {
        let ds = ShotDataset::new();
        assert!(ds.columns().is_empty());
        assert_eq!(ds.frame(), CoordinateFrame::Fractional);
    }
}
