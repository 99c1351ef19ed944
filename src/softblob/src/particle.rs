use crate::geometry::limit;
use crate::hash_grid::{ClientHandle, HashGrid};
use crate::posbox::Posbox;
use crate::V2;

/// Owning blob and ring position of a particle. Ring neighbours are found
/// through the blob, never stored on the particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParticleRef {
	pub blob: usize,
	pub index: usize,
}

#[derive(Clone, Debug)]
pub struct ParticleTemplate {
	pub pos: V2,
	pub radius: f32,
	pub mass: f32,
	pub damping: f32,
	pub friction: f32,
}

/// A ring vertex. The world is planar, so position, velocity, forces and
/// nudges are all 2D; there is no z component.
#[derive(Clone, Debug)]
pub struct Particle {
	pub id: ParticleRef,
	pub root: bool,
	pub pos: V2,
	// position at the last commit
	pub ppos: V2,
	pub vel: V2,
	pub force: V2,
	pub radius: f32,
	pub mass: f32,
	pub imass: f32,
	pub damping: f32,
	pub friction: f32,
	client: Option<ClientHandle>,
}

impl Particle {
	pub fn new(id: ParticleRef, template: &ParticleTemplate) -> Self {
		let imass = if template.mass > 0.0 && template.mass.is_finite() {
			1.0 / template.mass
		} else {
			0.0
		};
		Self {
			id,
			root: id.index == 0,
			pos: template.pos,
			ppos: template.pos,
			vel: V2::zeros(),
			force: V2::zeros(),
			radius: template.radius,
			mass: template.mass,
			imass,
			damping: template.damping,
			friction: template.friction,
			client: None,
		}
	}

	pub fn client(&self) -> Option<ClientHandle> {
		self.client
	}

	pub fn register(&mut self, grid: &mut HashGrid<ParticleRef>) {
		self.deregister(grid);
		self.client = Some(grid.create_client(self.pos, self.id));
	}

	pub fn deregister(&mut self, grid: &mut HashGrid<ParticleRef>) {
		if let Some(h) = self.client.take() {
			grid.remove_client(h);
		}
	}

	pub fn sync_client(&self, grid: &mut HashGrid<ParticleRef>) {
		if let Some(h) = self.client {
			grid.update_client(h, self.pos);
		}
	}

	/// Accumulates a force for the coming `update`. It is divided by mass
	/// there, so heavier particles are displaced less.
	pub fn add_force(&mut self, f: V2) {
		self.force += f;
	}

	pub fn update(&mut self, dt: f32, max_speed: f32) {
		if self.imass == 0.0 {
			self.force = V2::zeros();
			return;
		}
		self.vel += self.force * self.imass;
		self.vel = limit(self.vel, max_speed);
		self.vel *= self.damping * (1.0 - self.friction * dt).max(0.0);
		self.pos += self.vel * dt;
		self.force = V2::zeros();
	}

	/// Direct positional nudge. Velocity picks it up at the next commit.
	pub fn move_by(&mut self, dp: V2) {
		self.pos += dp;
	}

	pub fn constrain(&mut self, bbox: &Posbox) -> bool {
		bbox.apply(&mut self.pos)
	}

	/// Commits the substep: velocity from the displacement since the last
	/// commit, then the grid registration.
	pub fn end_update(&mut self, dt: f32, grid: &mut HashGrid<ParticleRef>) {
		if !(self.pos.x.is_finite() && self.pos.y.is_finite()) {
			tracing::warn!(particle = ?self.id, "non-finite position, reverting");
			self.pos = self.ppos;
			self.vel = V2::zeros();
		} else if dt > 0.0 {
			self.vel = (self.pos - self.ppos) / dt;
		}
		self.ppos = self.pos;
		self.sync_client(grid);
	}

	/// Circle overlap test against another particle. Returns the push for
	/// this particle, as long as the penetration depth and pointing away
	/// from the other centre.
	pub fn test_collision(&self, opos: V2, oradius: f32) -> Option<V2> {
		let dp = self.pos - opos;
		let l = dp.magnitude();
		let rs = self.radius + oradius;
		if l >= rs || !l.is_normal() {
			return None;
		}
		Some(dp * ((rs - l) / l))
	}
}
