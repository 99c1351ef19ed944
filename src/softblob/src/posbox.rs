use crate::V2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Posbox {
	pub xmin: f32,
	pub xmax: f32,
	pub ymin: f32,
	pub ymax: f32,
}

impl Posbox {
	/// Walls `margin` inside a `size` canvas. A canvas narrower than both
	/// margins collapses that axis onto its centre line.
	pub fn from_margin(size: V2, margin: V2) -> Self {
		let axis = |len: f32, m: f32| {
			if len - m > m {
				(m, len - m)
			} else {
				(len * 0.5, len * 0.5)
			}
		};
		let (xmin, xmax) = axis(size.x, margin.x);
		let (ymin, ymax) = axis(size.y, margin.y);
		Self {
			xmin,
			xmax,
			ymin,
			ymax,
		}
	}

	pub fn contains(&self, pos: V2) -> bool {
		(self.xmin..=self.xmax).contains(&pos.x)
			&& (self.ymin..=self.ymax).contains(&pos.y)
	}

	pub fn apply(&self, pos: &mut V2) -> bool {
		let xmin = self.xmin;
		let xmax = self.xmax;
		let ymin = self.ymin;
		let ymax = self.ymax;
		let mut flag = false;
		if pos[0] < xmin {
			pos[0] = xmin;
			flag = true;
		} else if pos[0] > xmax {
			pos[0] = xmax;
			flag = true;
		};
		if pos[1] < ymin {
			pos[1] = ymin;
			flag = true;
		} else if pos[1] > ymax {
			pos[1] = ymax;
			flag = true;
		};
		flag
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_apply_far_outside() {
		let bbox = Posbox::from_margin(V2::new(800., 600.), V2::new(20., 20.));
		for p in [
			V2::new(-1e6, 300.),
			V2::new(1e6, -1e6),
			V2::new(400., 1e9),
			V2::new(19.9, 580.1),
		] {
			let mut q = p;
			assert!(bbox.apply(&mut q));
			assert!(bbox.contains(q), "{:?} -> {:?}", p, q);
		}
		let mut inside = V2::new(100., 100.);
		assert!(!bbox.apply(&mut inside));
		assert_eq!(inside, V2::new(100., 100.));
	}

	#[test]
	fn test_tiny_canvas() {
		let bbox = Posbox::from_margin(V2::new(30., 600.), V2::new(20., 20.));
		assert_eq!(bbox.xmin, 15.);
		assert_eq!(bbox.xmax, 15.);
		let mut p = V2::new(0., 50.);
		bbox.apply(&mut p);
		assert_eq!(p, V2::new(15., 50.));
	}
}
