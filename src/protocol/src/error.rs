use thiserror::Error;

/// Reasons an emotion record coming from outside is refused.
#[derive(Debug, Error)]
pub enum RecordError {
	#[error("emotion label is empty")]
	EmptyLabel,

	#[error("missing field `{0}`")]
	Missing(&'static str),

	#[error("{field} must be a finite number in [1, 10], got {value}")]
	OutOfRange { field: &'static str, value: f64 },

	#[error("bad hex color `{0}`")]
	BadColor(String),

	#[error("malformed record: {0}")]
	Json(#[from] serde_json::Error),
}
