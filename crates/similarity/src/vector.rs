use store::RawEmbedding;
use thiserror::Error;

/// Error decoding a persisted embedding payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The textual payload did not parse as a JSON array of numbers.
    #[error("embedding payload is not a JSON array of numbers: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Normalize a persisted embedding payload into a numeric vector.
///
/// Native sequences pass through unchanged; textual payloads are parsed as a
/// JSON array (a pgvector-style literal `[0.1, 0.2]` is valid JSON and takes
/// the same path). An absent payload is the caller's condition to check:
/// "no embedding" and "unparsable embedding" are distinct failure modes.
pub fn decode_embedding(raw: &RawEmbedding) -> Result<Vec<f32>, DecodeError> {
    match raw {
        RawEmbedding::Numeric(vector) => Ok(vector.clone()),
        RawEmbedding::Text(payload) => Ok(serde_json::from_str(payload)?),
    }
}
