use serde_json::{Number, Value};
use tracing::debug;

use crate::dataset::{CoordinateFrame, ShotDataset};
use crate::errors::{Result, ShotError};

/// Reference pitch length (X axis)
pub const PITCH_LENGTH: f64 = 120.0;
/// Reference pitch width (Y axis)
pub const PITCH_WIDTH: f64 = 80.0;

/// Columns coerced to floats, with the factor each is multiplied by.
pub const NUMERIC_COLUMNS: [(&str, f64); 3] = [("X", PITCH_LENGTH), ("Y", PITCH_WIDTH), ("xG", 1.0)];

/// Coerce a provider value to `f64`. Quote characters wrapping the number are dropped.
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    let text = match value {
        Value::Number(n) => return n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.replace(['\'', '"'], ""),
        _ => return None,
    };
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce X, Y and xG to floats and rescale X/Y onto the 120x80 reference pitch.
///
/// The dataset must still be in the fractional frame; a second pass is refused.
pub fn normalize(mut dataset: ShotDataset) -> Result<ShotDataset> {
    if dataset.frame() == CoordinateFrame::Reference {
        return Err(ShotError::config(
            "dataset is already on the reference pitch; normalizing again would rescale twice",
        ));
    }

    for (row, record) in dataset.rows_mut().iter_mut().enumerate() {
        for (column, factor) in NUMERIC_COLUMNS {
            let raw = record.get(column).cloned().unwrap_or(Value::Null);
            let parsed = coerce_numeric(&raw).ok_or_else(|| ShotError::DataFormat {
                row,
                column: column.to_string(),
                value: match &raw {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            })?;

            let scaled = Number::from_f64(parsed * factor).map(Value::Number).ok_or_else(|| {
                ShotError::DataFormat {
                    row,
                    column: column.to_string(),
                    value: raw.to_string(),
                }
            })?;
            record.set(column, scaled);
        }
    }

    dataset.set_frame(CoordinateFrame::Reference);
    debug!(rows = dataset.len(), "normalized shot coordinates");
    Ok(dataset)
}
