//! Snapshot <-> JSON text.
//!
//! The stored value is a JSON array of flat record objects, newest first.

use expense_domain::Record;

use crate::LedgerResult;

pub fn encode(records: &[Record]) -> LedgerResult<String> {
    Ok(serde_json::to_string(records)?)
}

pub fn decode(text: &str) -> LedgerResult<Vec<Record>> {
    Ok(serde_json::from_str(text)?)
}

/// Decodes the array element by element. Elements that are not valid records
/// are skipped and described in the returned warnings; only a value that is
/// not a JSON array at all is an error.
pub fn decode_each(text: &str) -> LedgerResult<(Vec<Record>, Vec<String>)> {
    let items: Vec<serde_json::Value> = serde_json::from_str(text)?;
    let mut records = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Record>(item) {
            Ok(record) => records.push(record),
            Err(err) => skipped.push(format!("Skipped stored expense #{}: {err}", index + 1)),
        }
    }
    Ok((records, skipped))
}
