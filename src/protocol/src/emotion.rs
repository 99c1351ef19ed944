//! Emotion records produced by the journal service.
//!
//! A record is the only input that creates blobs, so everything here is
//! validated before it reaches the simulator.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

pub const SCALE_MIN: f32 = 1.0;
pub const SCALE_MAX: f32 = 10.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEmotion")]
pub struct EmotionRecord {
	pub emotion: String,
	pub valence: f32,
	pub arousal: f32,
}

// null and absent fields both land here as None
#[derive(Deserialize)]
struct RawEmotion {
	emotion: Option<String>,
	valence: Option<f64>,
	arousal: Option<f64>,
}

impl TryFrom<RawEmotion> for EmotionRecord {
	type Error = RecordError;

	fn try_from(raw: RawEmotion) -> Result<Self, Self::Error> {
		let emotion = raw.emotion.ok_or(RecordError::Missing("emotion"))?;
		let valence = raw.valence.ok_or(RecordError::Missing("valence"))?;
		let arousal = raw.arousal.ok_or(RecordError::Missing("arousal"))?;
		Self::new(emotion, valence as f32, arousal as f32)
	}
}

fn check_scale(field: &'static str, value: f32) -> Result<(), RecordError> {
	if value.is_finite() && (SCALE_MIN..=SCALE_MAX).contains(&value) {
		Ok(())
	} else {
		Err(RecordError::OutOfRange {
			field,
			value: value as f64,
		})
	}
}

impl EmotionRecord {
	pub fn new(
		emotion: impl Into<String>,
		valence: f32,
		arousal: f32,
	) -> Result<Self, RecordError> {
		let record = Self {
			emotion: emotion.into(),
			valence,
			arousal,
		};
		record.validate()?;
		Ok(record)
	}

	/// Records can also be built field by field, so the simulator checks
	/// again before spawning.
	pub fn validate(&self) -> Result<(), RecordError> {
		if self.emotion.trim().is_empty() {
			return Err(RecordError::EmptyLabel);
		}
		check_scale("valence", self.valence)?;
		check_scale("arousal", self.arousal)
	}

	pub fn from_json(text: &str) -> Result<Self, RecordError> {
		Ok(serde_json::from_str(text)?)
	}
}

/// Body of the service's `GET /emotions` response.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EmotionList {
	pub emotions: Vec<EmotionRecord>,
}

impl EmotionList {
	pub fn from_json(text: &str) -> Result<Self, RecordError> {
		Ok(serde_json::from_str(text)?)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_parse_integer_scores() {
		let r = EmotionRecord::from_json(
			r#"{"emotion":"CALMED","valence":7,"arousal":2}"#,
		)
		.unwrap();
		assert_eq!(r.emotion, "CALMED");
		assert_eq!(r.valence, 7.0);
		assert_eq!(r.arousal, 2.0);
	}

	#[test]
	fn test_reject_null_score() {
		// parseInt on garbage serialises as null
		let e = EmotionRecord::from_json(
			r#"{"emotion":"TIRED","valence":null,"arousal":3}"#,
		)
		.unwrap_err();
		assert!(matches!(e, RecordError::Json(_)), "{:?}", e);
	}

	#[test]
	fn test_reject_string_score() {
		assert!(EmotionRecord::from_json(
			r#"{"emotion":"TIRED","valence":"4","arousal":3}"#,
		)
		.is_err());
	}

	#[test]
	fn test_reject_out_of_range() {
		let e = EmotionRecord::new("ANGRY", 11.0, 5.0).unwrap_err();
		assert!(matches!(e, RecordError::OutOfRange { field: "valence", .. }));
		let e = EmotionRecord::new("ANGRY", 5.0, f32::NAN).unwrap_err();
		assert!(matches!(e, RecordError::OutOfRange { field: "arousal", .. }));
	}

	#[test]
	fn test_reject_blank_label() {
		let e = EmotionRecord::new("  ", 5.0, 5.0).unwrap_err();
		assert!(matches!(e, RecordError::EmptyLabel));
	}

	#[test]
	fn test_parse_list() {
		let list = EmotionList::from_json(
			r#"{"emotions":[
				{"emotion":"HOPEFUL","valence":8,"arousal":6},
				{"emotion":"DRAINED","valence":2.5,"arousal":1}
			]}"#,
		)
		.unwrap();
		assert_eq!(list.emotions.len(), 2);
		assert_eq!(list.emotions[1].valence, 2.5);
	}

	#[test]
	fn test_list_rejects_bad_entry() {
		assert!(EmotionList::from_json(
			r#"{"emotions":[{"emotion":"HOPEFUL","arousal":6}]}"#,
		)
		.is_err());
	}
}
