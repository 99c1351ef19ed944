//! Emotion record -> blob template.
//!
//! Valence picks the color, arousal picks both size and mass. Blobs are laid
//! out on a grid of `layout_columns` around the canvas centre in the order
//! they arrive.

use rand::Rng;

use crate::blob::BlobTemplate;
use crate::config::SimConfig;
use crate::error::SimResult;
use crate::V2;
use protocol::emotion::{SCALE_MAX, SCALE_MIN};
use protocol::EmotionRecord;

pub fn map_range(value: f32, low1: f32, high1: f32, low2: f32, high2: f32) -> f32 {
	low2 + (value - low1) * (high2 - low2) / (high1 - low1)
}

pub fn layout_center(index: usize, size: V2, config: &SimConfig) -> V2 {
	let cols = config.layout_columns.max(1);
	let col = (index % cols) as f32;
	let row = (index / cols) as f32;
	let mid = 2.0;
	V2::new(
		size.x * 0.5 + (col - mid) * config.layout_spacing,
		size.y * 0.5 + (row - mid) * config.layout_spacing,
	)
}

/// Particles that fit around the circumference at the given spacing.
pub fn particle_count(radius: f32, spacing: f32) -> usize {
	let n = (radius * std::f32::consts::TAU / spacing).floor();
	if n.is_finite() && n > 3.0 {
		n as usize
	} else {
		3
	}
}

pub fn template_for<R: Rng>(
	record: &EmotionRecord,
	index: usize,
	size: V2,
	spacing: f32,
	config: &SimConfig,
	rng: &mut R,
) -> SimResult<BlobTemplate> {
	record.validate()?;
	let (low, high) = config.palette()?;
	let factor = map_range(record.valence, SCALE_MIN, SCALE_MAX, 0.0, 1.0);
	let [rmin, rmax] = config.radius_range;
	let [mmin, mmax] = config.mass_range;
	let radius = map_range(record.arousal, SCALE_MIN, SCALE_MAX, rmin, rmax);
	let mass = map_range(record.arousal, SCALE_MIN, SCALE_MAX, mmin, mmax);
	let [alo, ahi] = config.area_scale_range;
	let area_scale = if alo < ahi {
		rng.gen_range(alo..ahi)
	} else {
		alo
	};
	Ok(BlobTemplate {
		center: layout_center(index, size, config),
		radius,
		count: particle_count(radius, spacing),
		mass,
		particle_radius: spacing,
		area_scale,
		neighbor_stiffness: config.neighbor_stiffness,
		skip_stiffness: config.skip_stiffness,
		damping: config.damping,
		friction: config.friction,
		color: low.lerp(high, factor),
		label: record.emotion.clone(),
	})
}

#[cfg(test)]
mod test {
	use super::*;
	use protocol::Rgb;
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	#[test]
	fn test_map_range() {
		assert_eq!(map_range(1., 1., 10., 40., 120.), 40.);
		assert_eq!(map_range(10., 1., 10., 40., 120.), 120.);
		assert_eq!(map_range(5.5, 1., 10., 0., 1.), 0.5);
	}

	#[test]
	fn test_layout() {
		let c = SimConfig::default();
		let size = V2::new(800., 600.);
		assert_eq!(layout_center(0, size, &c), V2::new(200., 100.));
		assert_eq!(layout_center(2, size, &c), V2::new(400., 100.));
		assert_eq!(layout_center(7, size, &c), V2::new(400., 200.));
	}

	#[test]
	fn test_particle_count() {
		assert_eq!(particle_count(40., 9.), 27);
		assert_eq!(particle_count(1., 9.), 3);
		assert_eq!(particle_count(10., 0.), 3);
	}

	#[test]
	fn test_template_mapping() {
		let c = SimConfig::default();
		let mut rng = StdRng::seed_from_u64(1);
		let low = EmotionRecord::new("GLOOMY", 1., 1.).unwrap();
		let t = template_for(&low, 0, V2::new(800., 600.), 9., &c, &mut rng).unwrap();
		assert_eq!(t.color, Rgb::from_hex("#2D6C84").unwrap());
		assert_eq!(t.radius, 40.);
		assert_eq!(t.mass, 1.);
		assert_eq!(t.count, 27);
		assert_eq!(t.particle_radius, 9.);
		assert!(t.area_scale >= 0.6 && t.area_scale < 0.9);
		assert_eq!(t.label, "GLOOMY");

		let high = EmotionRecord::new("ELATED", 10., 10.).unwrap();
		let t = template_for(&high, 1, V2::new(800., 600.), 9., &c, &mut rng).unwrap();
		assert_eq!(t.color, Rgb::from_hex("#D1A256").unwrap());
		assert_eq!(t.radius, 120.);
		assert_eq!(t.mass, 20.);
	}

	#[test]
	fn test_template_rejects_invalid() {
		let c = SimConfig::default();
		let mut rng = StdRng::seed_from_u64(1);
		let bad = EmotionRecord {
			emotion: "ODD".into(),
			valence: 0.,
			arousal: 5.,
		};
		assert!(template_for(&bad, 0, V2::new(800., 600.), 9., &c, &mut rng).is_err());
	}
}
