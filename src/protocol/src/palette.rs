use serde::{Deserialize, Serialize};

use crate::error::RecordError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
	/// Parses `#RRGGBB` (the leading `#` is optional).
	pub fn from_hex(hex: &str) -> Result<Self, RecordError> {
		let digits = hex.strip_prefix('#').unwrap_or(hex);
		if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(RecordError::BadColor(hex.to_string()));
		}
		let value = u32::from_str_radix(digits, 16)
			.map_err(|_| RecordError::BadColor(hex.to_string()))?;
		Ok(Self([
			((value >> 16) & 0xff) as u8,
			((value >> 8) & 0xff) as u8,
			(value & 0xff) as u8,
		]))
	}

	pub fn to_hex(self) -> String {
		let [r, g, b] = self.0;
		format!("#{:02X}{:02X}{:02X}", r, g, b)
	}

	/// Per-channel interpolation, rounded to the nearest integer.
	pub fn lerp(self, other: Self, t: f32) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mut out = [0u8; 3];
		for (i, c) in out.iter_mut().enumerate() {
			let a = self.0[i] as f32;
			let b = other.0[i] as f32;
			*c = (a + (b - a) * t).round() as u8;
		}
		Self(out)
	}
}
