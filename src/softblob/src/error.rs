//! Error types for the simulator.
//!
//! Only input handling is fallible. The per-substep solve never returns an
//! error; degenerate geometry is skipped in place.

use protocol::RecordError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
	/// The emotion record was refused before any blob state was built.
	#[error("rejected emotion record: {0}")]
	Record(#[from] RecordError),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("invalid blob: {0}")]
	InvalidBlob(String),

	#[error("a blob ring needs at least 3 particles, got {0}")]
	TooFewParticles(usize),

	#[error("particle budget exceeded: {requested} requested, {available} of {limit} left")]
	ParticleBudget {
		requested: usize,
		available: usize,
		limit: usize,
	},

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
