//! Closed rings of particles with a target area.
//!
//! A blob owns its particles in ring order: particle `i` is linked to
//! `i - 1` and `i + 1` modulo the ring length, and index 0 is the root.
//! Joints refer to particles by the same indices, so the topology needs no
//! back references and cannot come apart while the blob is alive.

use crate::constraint::DistanceJoint;
use crate::error::{SimError, SimResult};
use crate::geometry::{bounding_box, line_normal, point_in_polygon, polygon_area};
use crate::hash_grid::HashGrid;
use crate::particle::{Particle, ParticleRef, ParticleTemplate};
use crate::V2;
use protocol::pr_model::PrBlob;
use protocol::Rgb;

/// Everything needed to build a blob. Spawning from emotion records fills
/// this in; tests and tools can build one directly.
#[derive(Clone, Debug)]
pub struct BlobTemplate {
	pub center: V2,
	pub radius: f32,
	pub count: usize,
	pub mass: f32,
	pub particle_radius: f32,
	// target area as a fraction of the initial polygon
	pub area_scale: f32,
	pub neighbor_stiffness: f32,
	pub skip_stiffness: f32,
	pub damping: f32,
	pub friction: f32,
	pub color: Rgb,
	pub label: String,
}

impl BlobTemplate {
	/// Template with the default solver constants.
	pub fn new(center: V2, radius: f32, count: usize) -> Self {
		Self {
			center,
			radius,
			count,
			mass: 1.0,
			particle_radius: 1.0,
			area_scale: 1.0,
			neighbor_stiffness: 0.75,
			skip_stiffness: 0.25,
			damping: 0.999,
			friction: 0.1,
			color: Rgb::default(),
			label: String::new(),
		}
	}

	pub fn with_mass(mut self, mass: f32) -> Self {
		self.mass = mass;
		self
	}

	pub fn with_particle_radius(mut self, r: f32) -> Self {
		self.particle_radius = r;
		self
	}

	pub fn with_area_scale(mut self, k: f32) -> Self {
		self.area_scale = k;
		self
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	pub fn with_color(mut self, color: Rgb) -> Self {
		self.color = color;
		self
	}

	fn validate(&self) -> SimResult<()> {
		if self.count < 3 {
			return Err(SimError::TooFewParticles(self.count));
		}
		let positive = |v: f32| v.is_finite() && v > 0.0;
		if !(self.center.x.is_finite() && self.center.y.is_finite()) {
			return Err(SimError::InvalidBlob("center is not finite".into()));
		}
		if !positive(self.radius) || !positive(self.particle_radius) {
			return Err(SimError::InvalidBlob("radii must be positive".into()));
		}
		if !positive(self.mass) {
			return Err(SimError::InvalidBlob("mass must be positive".into()));
		}
		if !positive(self.area_scale) || self.area_scale > 1.0 {
			return Err(SimError::InvalidBlob("area scale must be in (0, 1]".into()));
		}
		Ok(())
	}
}

#[derive(Clone, Debug)]
pub struct Blob {
	id: usize,
	pub particles: Vec<Particle>,
	pub joints: Vec<DistanceJoint>,
	area: f32,
	current_area: f32,
	area_diff: f32,
	radius: f32,
	color: Rgb,
	label: String,
}

impl Blob {
	/// Builds the ring counter-clockwise (positive area) around the centre.
	/// Each particle gets a neighbour joint and a skip-one joint. Their rest
	/// lengths are the initial chords shrunk by sqrt(area_scale), so the
	/// rest shape encloses the target area.
	pub fn new(id: usize, template: &BlobTemplate) -> SimResult<Self> {
		template.validate()?;
		let n = template.count;
		let particles: Vec<Particle> = (0..n)
			.map(|index| {
				let angle = index as f32 / n as f32 * std::f32::consts::TAU;
				let pos = template.center
					+ V2::new(angle.cos(), angle.sin()) * template.radius;
				Particle::new(
					ParticleRef { blob: id, index },
					&ParticleTemplate {
						pos,
						radius: template.particle_radius,
						mass: template.mass,
						damping: template.damping,
						friction: template.friction,
					},
				)
			})
			.collect();
		let initial = polygon_area(particles.iter().map(|p| p.pos));
		let shrink = template.area_scale.sqrt();
		let mut joints = Vec::with_capacity(n * 2);
		for i in 0..n {
			let next = (i + 1) % n;
			let skip = (i + 2) % n;
			let l1 = (particles[next].pos - particles[i].pos).magnitude();
			let l2 = (particles[skip].pos - particles[i].pos).magnitude();
			joints.push(
				DistanceJoint::new(i, next, l1 * shrink)
					.with_stiffness(template.neighbor_stiffness),
			);
			joints.push(
				DistanceJoint::new(i, skip, l2 * shrink)
					.with_stiffness(template.skip_stiffness),
			);
		}
		let area = initial * template.area_scale;
		Ok(Self {
			id,
			particles,
			joints,
			area,
			current_area: initial,
			area_diff: (area - initial) / area,
			radius: template.radius,
			color: template.color,
			label: template.label.clone(),
		})
	}

	pub fn id(&self) -> usize {
		self.id
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn target_area(&self) -> f32 {
		self.area
	}

	pub fn current_area(&self) -> f32 {
		self.current_area
	}

	pub fn area_diff(&self) -> f32 {
		self.area_diff
	}

	pub fn radius(&self) -> f32 {
		self.radius
	}

	pub fn color(&self) -> Rgb {
		self.color
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn prev_index(&self, index: usize) -> usize {
		(index + self.len() - 1) % self.len()
	}

	pub fn next_index(&self, index: usize) -> usize {
		(index + 1) % self.len()
	}

	pub fn prev(&self, index: usize) -> &Particle {
		&self.particles[self.prev_index(index)]
	}

	pub fn next(&self, index: usize) -> &Particle {
		&self.particles[self.next_index(index)]
	}

	pub fn root(&self) -> &Particle {
		&self.particles[0]
	}

	pub fn is_ring_neighbor(&self, index: usize, other: ParticleRef) -> bool {
		other.blob == self.id
			&& (other.index == self.prev_index(index) || other.index == self.next_index(index))
	}

	/// Ring indices in `next` order starting at the root.
	pub fn ring_walk(&self) -> impl Iterator<Item = usize> + '_ {
		let mut cur = 0;
		(0..self.len()).map(move |_| {
			let here = cur;
			cur = self.next_index(cur);
			here
		})
	}

	pub fn positions(&self) -> Vec<V2> {
		self.ring_walk().map(|i| self.particles[i].pos).collect()
	}

	pub fn measure_area(&self) -> f32 {
		polygon_area(self.particles.iter().map(|p| p.pos))
	}

	/// Refreshes the current area and the relative deficit. Runs once per
	/// substep, before the deficit is consumed.
	pub fn update_area(&mut self) {
		self.current_area = self.measure_area();
		self.area_diff = (self.area - self.current_area) / self.area;
	}

	/// Nudges every particle along the normal of its two ring neighbours by
	/// the relative area deficit: outward when too small, inward when too
	/// large.
	pub fn apply_area_correction(&mut self) {
		let dir = self.area_diff;
		if !dir.is_finite() {
			tracing::warn!(blob = self.id, "non-finite area deficit, skipping");
			return;
		}
		for i in 0..self.len() {
			let p0 = self.prev(i).pos;
			let p1 = self.next(i).pos;
			if let Some(n) = line_normal(p0, p1) {
				self.particles[i].move_by(n * dir);
			}
		}
	}

	pub fn relax_joints(&mut self, strength: f32) {
		for joint in self.joints.iter() {
			joint.update(&mut self.particles, strength);
		}
	}

	pub fn bounding_center(&self) -> V2 {
		match bounding_box(self.particles.iter().map(|p| p.pos)) {
			Some((lo, hi)) => (lo + hi) * 0.5,
			None => V2::zeros(),
		}
	}

	pub fn contains(&self, point: V2) -> bool {
		point_in_polygon(point, &self.positions())
	}

	/// Moves every particle without touching the committed positions, so the
	/// shift turns into velocity at the next commit.
	pub fn translate(&mut self, delta: V2) {
		for p in self.particles.iter_mut() {
			p.move_by(delta);
		}
	}

	pub fn register(&mut self, grid: &mut HashGrid<ParticleRef>) {
		for p in self.particles.iter_mut() {
			p.register(grid);
		}
	}

	pub fn render(&self) -> PrBlob {
		let c = self.bounding_center();
		PrBlob {
			id: self.id,
			points: self.positions().into_iter().map(|p| [p.x, p.y]).collect(),
			color: self.color,
			label: self.label.clone(),
			label_anchor: [c.x, c.y - self.radius - 10.0],
			radius: self.radius,
		}
	}
}
