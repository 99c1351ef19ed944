// pr_model: blob snapshot for rendering

use serde::Serialize;

use crate::palette::Rgb;

#[derive(Clone, Debug, Serialize)]
pub struct PrBlob {
	pub id: usize,
	// ring order, starting at the root particle
	pub points: Vec<[f32; 2]>,
	pub color: Rgb,
	pub label: String,
	pub label_anchor: [f32; 2],
	pub radius: f32,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct PrModel {
	pub blobs: Vec<PrBlob>,
}

impl PrModel {
	pub fn particle_len(&self) -> usize {
		self.blobs.iter().map(|b| b.points.len()).sum()
	}
}
