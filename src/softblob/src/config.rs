use serde::Deserialize;

use crate::error::{SimError, SimResult};
use protocol::Rgb;

/// Simulator tunables. Every field has a default, so a JSON file only
/// needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
	pub substeps: usize,
	pub frame_dt: f32,
	pub gravity: f32,
	// particle spacing as a fraction of min(width, height)
	pub vertex_distance: f32,
	pub margin: [f32; 2],
	pub neighbor_stiffness: f32,
	pub skip_stiffness: f32,
	pub area_scale_range: [f32; 2],
	// per-substep velocity factor; at 1 a resting blob keeps rocking at
	// several units per frame and never settles
	pub damping: f32,
	pub friction: f32,
	pub max_vertex_count: usize,
	pub radius_range: [f32; 2],
	pub mass_range: [f32; 2],
	pub layout_columns: usize,
	pub layout_spacing: f32,
	pub low_valence_color: String,
	pub high_valence_color: String,
}

impl Default for SimConfig {
	fn default() -> Self {
		Self {
			substeps: 10,
			frame_dt: 1.0 / 60.0,
			gravity: 1000.0,
			vertex_distance: 0.015,
			margin: [20.0, 20.0],
			neighbor_stiffness: 0.75,
			skip_stiffness: 0.25,
			area_scale_range: [0.6, 0.9],
			damping: 0.999,
			friction: 0.1,
			max_vertex_count: 2000,
			radius_range: [40.0, 120.0],
			mass_range: [1.0, 20.0],
			layout_columns: 5,
			layout_spacing: 100.0,
			low_valence_color: "#2D6C84".to_string(),
			high_valence_color: "#D1A256".to_string(),
		}
	}
}

fn check(ok: bool, msg: &str) -> SimResult<()> {
	if ok {
		Ok(())
	} else {
		Err(SimError::InvalidConfig(msg.to_string()))
	}
}

fn unit(v: f32) -> bool {
	(0.0..=1.0).contains(&v)
}

impl SimConfig {
	pub fn from_json(text: &str) -> SimResult<Self> {
		let config: Self = serde_json::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> SimResult<()> {
		check(self.substeps > 0, "substeps must be positive")?;
		check(
			self.frame_dt.is_finite() && self.frame_dt > 0.0,
			"frame_dt must be positive",
		)?;
		check(self.gravity.is_finite(), "gravity must be finite")?;
		check(
			self.vertex_distance.is_finite() && self.vertex_distance > 0.0,
			"vertex_distance must be positive",
		)?;
		check(
			self.margin.iter().all(|m| m.is_finite() && *m >= 0.0),
			"margins must be non-negative",
		)?;
		check(
			unit(self.neighbor_stiffness) && unit(self.skip_stiffness),
			"stiffness must be in [0, 1]",
		)?;
		let [lo, hi] = self.area_scale_range;
		check(
			lo > 0.0 && lo <= hi && hi <= 1.0,
			"area_scale_range must satisfy 0 < lo <= hi <= 1",
		)?;
		check(unit(self.damping), "damping must be in [0, 1]")?;
		check(
			self.friction.is_finite() && self.friction >= 0.0,
			"friction must be non-negative",
		)?;
		check(
			self.radius_range[0] > 0.0 && self.radius_range[0] <= self.radius_range[1],
			"radius_range must be positive and ordered",
		)?;
		check(
			self.mass_range[0] > 0.0 && self.mass_range[0] <= self.mass_range[1],
			"mass_range must be positive and ordered",
		)?;
		check(self.layout_columns > 0, "layout_columns must be positive")?;
		self.palette()?;
		Ok(())
	}

	pub fn palette(&self) -> SimResult<(Rgb, Rgb)> {
		Ok((
			Rgb::from_hex(&self.low_valence_color)?,
			Rgb::from_hex(&self.high_valence_color)?,
		))
	}

	pub fn substep_dt(&self) -> f32 {
		self.frame_dt / self.substeps as f32
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_default_is_valid() {
		let c = SimConfig::default();
		c.validate().unwrap();
		assert!((c.substep_dt() - 1.0 / 600.0).abs() < 1e-9);
	}

	#[test]
	fn test_default_damping_bleeds_energy() {
		let c = SimConfig::default();
		assert!(c.damping < 1.0 && c.damping > 0.99);
	}

	#[test]
	fn test_partial_json() {
		let c = SimConfig::from_json(r#"{"substeps": 4, "gravity": 0}"#).unwrap();
		assert_eq!(c.substeps, 4);
		assert_eq!(c.gravity, 0.0);
		assert_eq!(c.neighbor_stiffness, 0.75);
	}

	#[test]
	fn test_rejects_bad_values() {
		for text in [
			r#"{"substeps": 0}"#,
			r#"{"skip_stiffness": 1.5}"#,
			r#"{"area_scale_range": [0.9, 0.6]}"#,
			r#"{"low_valence_color": "blue"}"#,
		] {
			assert!(SimConfig::from_json(text).is_err(), "{}", text);
		}
	}
}
