use std::time::Instant;

use softblob::config::SimConfig;
use softblob::pworld::PWorld;
use softblob::SimResult;

fn main() -> SimResult<()> {
	let config = SimConfig::default();
	let frame_dt = config.frame_dt;
	let mut pworld = PWorld::new(config, 800., 600.)?.with_seed(0);
	pworld.init_test()?;
	let start = Instant::now();
	let rframes = 100;
	for _ in 0..rframes {
		pworld.run();
	}
	let time = rframes as f32 * frame_dt;
	let duration = start.elapsed().as_secs_f32();
	eprintln!(
		"{} particles, {:.3}%",
		pworld.particle_len(),
		duration / time * 100.0
	);
	Ok(())
}
