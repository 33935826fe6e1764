use serde_json::Value;

use crate::models::resume::ResumeDocument;
use crate::normalize::clean_value;

/// Pretty-printed UTF-8 JSON of the document as held.
pub fn export_json(doc: &ResumeDocument) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(doc)
}

/// Parses an imported file. Anything that is not a JSON object is ignored
/// (`None`); objects of any shape are coerced and cleaned.
pub fn import_json(bytes: &[u8]) -> Option<ResumeDocument> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ Value::Object(_)) => Some(clean_value(&value)),
        _ => None,
    }
}
