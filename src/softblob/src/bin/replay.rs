//! Headless run of an emotion list.
//!
//! replay <emotions.json> [frames] [config.json] [--model]
//!
//! Prints one summary line per blob, or the final render model as JSON with
//! `--model`.

use std::fs;

use protocol::EmotionList;
use softblob::config::SimConfig;
use softblob::pworld::PWorld;
use softblob::{SimError, SimResult};

fn usage() -> SimError {
	SimError::InvalidConfig(
		"usage: replay <emotions.json> [frames] [config.json] [--model]".to_string(),
	)
}

fn main() -> SimResult<()> {
	let mut args: Vec<String> = std::env::args().skip(1).collect();
	let dump_model = match args.iter().position(|a| a == "--model") {
		Some(idx) => {
			args.remove(idx);
			true
		}
		None => false,
	};
	let mut args = args.into_iter();
	let list_path = args.next().ok_or_else(usage)?;
	let frames: u64 = match args.next() {
		Some(n) => n.parse().map_err(|_| usage())?,
		None => 600,
	};
	let config = match args.next() {
		Some(path) => SimConfig::from_json(&fs::read_to_string(path)?)?,
		None => SimConfig::default(),
	};

	let list = EmotionList::from_json(&fs::read_to_string(list_path)?)?;
	let mut pworld = PWorld::new(config, 800., 600.)?.with_seed(0);
	for record in list.emotions.iter() {
		if let Err(e) = pworld.add_emotion(record) {
			eprintln!("skip {}: {}", record.emotion, e);
		}
	}
	for _ in 0..frames {
		pworld.run();
	}

	if dump_model {
		println!("{}", serde_json::to_string(&pworld.pr_model())?);
		return Ok(());
	}
	for blob in pworld.blobs() {
		let c = blob.bounding_center();
		println!(
			"{:>3} {:<12} {} center=({:.1}, {:.1}) area={:.0}/{:.0}",
			blob.id(),
			blob.label(),
			blob.color().to_hex(),
			c.x,
			c.y,
			blob.measure_area(),
			blob.target_area(),
		);
	}
	Ok(())
}
