use softblob::blob::{Blob, BlobTemplate};
use softblob::config::SimConfig;
use softblob::geometry::point_in_polygon;
use softblob::pworld::PWorld;
use softblob::spawn::particle_count;
use softblob::V2;

fn overlaps(a: &Blob, b: &Blob) -> bool {
	let pa = a.positions();
	let pb = b.positions();
	pa.iter().any(|p| point_in_polygon(*p, &pb)) || pb.iter().any(|p| point_in_polygon(*p, &pa))
}

fn pair(offset: V2) -> PWorld {
	let mut w = PWorld::new(SimConfig::default(), 800., 600.).unwrap();
	let spacing = w.spacing();
	let count = particle_count(40., spacing);
	assert_eq!(count, 27);
	for centre in [V2::new(400., 300.), V2::new(400., 300.) + offset] {
		let template = BlobTemplate::new(centre, 40., count)
			.with_mass(5.)
			.with_area_scale(0.75)
			.with_particle_radius(spacing);
		w.add_blob(&template).unwrap();
	}
	w
}

#[test]
fn overlapping_blobs_separate() {
	for offset in [V2::new(50., 0.), V2::new(0., 50.), V2::new(35.36, 35.36)] {
		let mut w = pair(offset);
		assert!(overlaps(&w.blobs()[0], &w.blobs()[1]));
		for _ in 0..60 {
			w.run();
		}
		assert!(
			!overlaps(&w.blobs()[0], &w.blobs()[1]),
			"blobs offset by {:?} still overlap",
			offset,
		);
	}
}

#[test]
fn particles_keep_their_distance() {
	let mut w = pair(V2::new(60., 0.));
	for _ in 0..120 {
		w.run();
	}
	let spacing = w.spacing();
	let (a, b) = (&w.blobs()[0], &w.blobs()[1]);
	let closest = a
		.particles
		.iter()
		.flat_map(|p| b.particles.iter().map(move |q| (p.pos - q.pos).magnitude()))
		.fold(f32::MAX, f32::min);
	// two collision radii, with some slack for the joints pulling back
	assert!(closest > spacing, "closest pair at {}", closest);
}

#[test]
fn grid_tracks_particles() {
	let mut w = pair(V2::new(50., 0.));
	for _ in 0..30 {
		w.run();
	}
	assert_eq!(w.grid().len(), w.particle_len());
	for p in w.particles() {
		let found = w.grid().query(p.pos, 0.);
		assert!(found.contains(&p.id));
	}
}
