/// A response body that parsed as JSON but is not a catalog payload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    /// No known envelope matched the body.
    #[error("no known envelope in response: got {found}")]
    UnknownEnvelope { found: &'static str },

    /// The envelope carried `success: false`.
    #[error("content service reported failure: {message}")]
    Unsuccessful { message: String },

    /// The matched array holds something other than objects.
    #[error("element {index} of the record array is {found}, not an object")]
    NotRecordLike { index: usize, found: &'static str },
}

/// JSON type name for error messages.
pub(crate) fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
