use crate::V2;

/// Signed shoelace area of a closed ring. Positive when the points wind
/// counter-clockwise with y pointing up (clockwise on a y-down screen).
/// Self-intersecting rings give the net signed area and never panic.
pub fn polygon_area<I>(points: I) -> f32
where
	I: IntoIterator<Item = V2>,
{
	let mut iter = points.into_iter();
	let first = match iter.next() {
		Some(p) => p,
		None => return 0.0,
	};
	let mut prev = first;
	let mut sum = 0f32;
	for p in iter {
		sum += prev.x * p.y - p.x * prev.y;
		prev = p;
	}
	sum += prev.x * first.y - first.x * prev.y;
	sum * 0.5
}

/// Unit normal of the segment p0 -> p1, pointing outward for a ring with
/// positive `polygon_area`. None when the points coincide.
pub fn line_normal(p0: V2, p1: V2) -> Option<V2> {
	let d = p1 - p0;
	let l = d.magnitude();
	if !l.is_normal() {
		return None;
	}
	Some(V2::new(d.y / l, -d.x / l))
}

pub fn limit(v: V2, max: f32) -> V2 {
	let l = v.magnitude();
	if l > max && l.is_normal() {
		v * (max / l)
	} else {
		v
	}
}

/// Even-odd ray cast.
pub fn point_in_polygon(point: V2, polygon: &[V2]) -> bool {
	let mut inside = false;
	let len = polygon.len();
	if len < 3 {
		return false;
	}
	let mut j = len - 1;
	for i in 0..len {
		let pi = polygon[i];
		let pj = polygon[j];
		if (pi.y > point.y) != (pj.y > point.y)
			&& point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
		{
			inside = !inside;
		}
		j = i;
	}
	inside
}

/// (min, max) corners, or None for an empty set.
pub fn bounding_box<I>(points: I) -> Option<(V2, V2)>
where
	I: IntoIterator<Item = V2>,
{
	let mut iter = points.into_iter();
	let first = iter.next()?;
	let (mut lo, mut hi) = (first, first);
	for p in iter {
		lo.x = lo.x.min(p.x);
		lo.y = lo.y.min(p.y);
		hi.x = hi.x.max(p.x);
		hi.y = hi.y.max(p.y);
	}
	Some((lo, hi))
}

#[cfg(test)]
mod test {
	use super::*;

	fn square() -> Vec<V2> {
		vec![
			V2::new(0., 0.),
			V2::new(2., 0.),
			V2::new(2., 2.),
			V2::new(0., 2.),
		]
	}

	#[test]
	fn test_area_winding() {
		let ccw = square();
		let cw: Vec<V2> = ccw.iter().rev().cloned().collect();
		assert!((polygon_area(ccw) - 4.).abs() < 1e-6);
		assert!((polygon_area(cw) + 4.).abs() < 1e-6);
	}

	#[test]
	fn test_area_degenerate() {
		assert_eq!(polygon_area(Vec::new()), 0.0);
		assert_eq!(polygon_area(vec![V2::new(1., 1.)]), 0.0);
		// bow tie: the two lobes cancel
		let bow = vec![
			V2::new(0., 0.),
			V2::new(2., 2.),
			V2::new(2., 0.),
			V2::new(0., 2.),
		];
		assert!(polygon_area(bow).abs() < 1e-6);
	}

	#[test]
	fn test_normal_points_outward() {
		let ring = square();
		let center = V2::new(1., 1.);
		for i in 0..4 {
			let prev = ring[(i + 3) % 4];
			let next = ring[(i + 1) % 4];
			let n = line_normal(prev, next).unwrap();
			assert!((n.magnitude() - 1.).abs() < 1e-6);
			assert!(n.dot(&(ring[i] - center)) > 0.);
		}
	}

	#[test]
	fn test_normal_coincident() {
		assert!(line_normal(V2::new(3., 3.), V2::new(3., 3.)).is_none());
	}

	#[test]
	fn test_limit() {
		let v = limit(V2::new(30., 40.), 5.);
		assert!((v - V2::new(3., 4.)).magnitude() < 1e-5);
		let w = V2::new(1., 1.);
		assert_eq!(limit(w, 5.), w);
		assert_eq!(limit(V2::zeros(), 5.), V2::zeros());
	}

	#[test]
	fn test_point_in_polygon() {
		let sq = square();
		assert!(point_in_polygon(V2::new(1., 1.), &sq));
		assert!(!point_in_polygon(V2::new(3., 1.), &sq));
		assert!(!point_in_polygon(V2::new(1., -0.5), &sq));
		assert!(!point_in_polygon(V2::new(0., 0.), &sq[..2]));
	}

	#[test]
	fn test_bounding_box() {
		let (lo, hi) = bounding_box(square()).unwrap();
		assert_eq!(lo, V2::new(0., 0.));
		assert_eq!(hi, V2::new(2., 2.));
		assert!(bounding_box(Vec::new()).is_none());
	}
}
