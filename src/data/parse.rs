use serde_json::Value;

use super::dataset::{Dataset, Datum};
use super::error::DatasetError;

const NAME_KEY: &str = "name";
const CHANGE_KEYS: [&str; 2] = ["change", "magnitude"];

/// Parses a JSON array of `{"name": ..., "change": ...}` records.
///
/// `magnitude` is accepted in place of `change`. Unknown keys are ignored.
pub fn parse_dataset(raw: &str) -> Result<Dataset, DatasetError> {
    let parsed: Value = serde_json::from_str(raw)?;
    let entries = parsed.as_array().ok_or(DatasetError::NotAnArray)?;

    let records = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_record(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Dataset::new(records)
}

fn parse_record(index: usize, entry: &Value) -> Result<Datum, DatasetError> {
    let object = entry
        .as_object()
        .ok_or(DatasetError::NotAnObject { index })?;

    let name = object
        .get(NAME_KEY)
        .and_then(Value::as_str)
        .ok_or(DatasetError::MissingName { index })?;

    let change_value = CHANGE_KEYS
        .iter()
        .find_map(|key| object.get(*key))
        .filter(|value| !value.is_null())
        .ok_or_else(|| DatasetError::MissingMagnitude {
            index,
            name: name.to_owned(),
        })?;

    let change = match change_value {
        Value::Number(number) => number.as_f64(),
        // Numeric strings are common in exported spreadsheets.
        Value::String(text) => text.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| DatasetError::NonNumericMagnitude {
        index,
        name: name.to_owned(),
        found: change_value.to_string(),
    })?;

    Ok(Datum::new(name, change))
}
