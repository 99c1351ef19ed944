use crate::particle::Particle;

/// Pulls two particles of the same ring toward a fixed separation.
/// Both ends are indices into the owning blob's particle list.
#[derive(Clone, Debug)]
pub struct DistanceJoint {
	a: usize,
	b: usize,
	l0: f32,
	stiffness: f32,
}

impl DistanceJoint {
	pub fn new(a: usize, b: usize, l0: f32) -> Self {
		Self {
			a,
			b,
			l0,
			stiffness: 1.0,
		}
	}

	/// Clamped to [0, 1] so one pass never overshoots.
	pub fn with_stiffness(mut self, stiffness: f32) -> Self {
		self.stiffness = stiffness.clamp(0.0, 1.0);
		self
	}

	pub fn ends(&self) -> (usize, usize) {
		(self.a, self.b)
	}

	pub fn rest_length(&self) -> f32 {
		self.l0
	}

	pub fn stiffness(&self) -> f32 {
		self.stiffness
	}

	/// One relaxation pass. Each end moves half of the weighted error along
	/// the connecting axis, in opposite directions.
	pub fn update(&self, ps: &mut [Particle], strength: f32) {
		let dp = ps[self.b].pos - ps[self.a].pos;
		let l = dp.magnitude();
		if !l.is_normal() {
			return;
		}
		let k = (l - self.l0) / l * self.stiffness * strength * 0.5;
		ps[self.a].move_by(dp * k);
		ps[self.b].move_by(-dp * k);
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::particle::{ParticleRef, ParticleTemplate};
	use crate::V2;

	fn pair(a: V2, b: V2) -> Vec<Particle> {
		[a, b]
			.iter()
			.enumerate()
			.map(|(index, pos)| {
				Particle::new(
					ParticleRef { blob: 0, index },
					&ParticleTemplate {
						pos: *pos,
						radius: 1.,
						mass: 1.,
						damping: 1.,
						friction: 0.,
					},
				)
			})
			.collect()
	}

	#[test]
	fn test_full_stiffness_snaps() {
		let mut ps = pair(V2::new(0., 0.), V2::new(20., 0.));
		DistanceJoint::new(0, 1, 5.).update(&mut ps, 1.);
		let l = (ps[1].pos - ps[0].pos).magnitude();
		assert!((l - 5.).abs() < 1e-5);
		// symmetric: the midpoint stays put
		assert!(((ps[0].pos + ps[1].pos) * 0.5 - V2::new(10., 0.)).magnitude() < 1e-5);
	}

	#[test]
	fn test_soft_joint_converges_without_overshoot() {
		let mut ps = pair(V2::new(0., 0.), V2::new(3., 4.));
		let joint = DistanceJoint::new(0, 1, 20.).with_stiffness(0.25);
		let mut last = 5f32;
		for _ in 0..200 {
			joint.update(&mut ps, 1.);
			let l = (ps[1].pos - ps[0].pos).magnitude();
			assert!(l >= last - 1e-4 && l <= 20. + 1e-4);
			last = l;
		}
		assert!((last - 20.).abs() < 1e-3);
	}

	#[test]
	fn test_coincident_is_skipped() {
		let mut ps = pair(V2::new(1., 1.), V2::new(1., 1.));
		DistanceJoint::new(0, 1, 5.).update(&mut ps, 1.);
		assert_eq!(ps[0].pos, V2::new(1., 1.));
		assert!(ps[1].pos.x.is_finite());
	}

	#[test]
	fn test_stiffness_clamped() {
		assert_eq!(DistanceJoint::new(0, 1, 1.).with_stiffness(3.).stiffness(), 1.);
		assert_eq!(DistanceJoint::new(0, 1, 1.).with_stiffness(-1.).stiffness(), 0.);
	}
}
