use std::time::{Duration, Instant};

pub enum TimeModel {
	// as fast as possible, for headless runs
	VideoRender,
	RtFrameLock,
}

/// Frame pacing for the real-time loop.
pub struct TimeManager {
	pft: Duration,
	model: TimeModel,
	start_time: Instant,
}

impl TimeManager {
	pub fn new(frame_dt: f32, time_scale: f32, model: TimeModel) -> Self {
		let secs = frame_dt * time_scale;
		let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
		Self {
			pft: Duration::from_secs_f32(secs),
			model,
			start_time: Instant::now(),
		}
	}

	pub fn frame_time(&self) -> Duration {
		self.pft
	}

	pub fn begin(&mut self) {
		self.start_time = Instant::now();
	}

	/// Busy time of the frame as a fraction of its budget. In
	/// `RtFrameLock` this also sleeps out the rest of the budget.
	pub fn finish(&mut self) -> f32 {
		let busy = self.start_time.elapsed();
		let load = if self.pft.is_zero() {
			0.0
		} else {
			busy.as_secs_f32() / self.pft.as_secs_f32()
		};
		if let TimeModel::RtFrameLock = self.model {
			if busy < self.pft {
				std::thread::sleep(self.pft - busy);
			}
		}
		load
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_frame_lock_sleeps() {
		let mut tm = TimeManager::new(0.01, 1.0, TimeModel::RtFrameLock);
		tm.begin();
		let load = tm.finish();
		assert!(load >= 0.0 && load < 1.0);
		assert!(tm.start_time.elapsed() >= Duration::from_millis(10));
	}

	#[test]
	fn test_time_scale() {
		let tm = TimeManager::new(0.02, 2.0, TimeModel::VideoRender);
		assert_eq!(tm.frame_time(), Duration::from_secs_f32(0.04));
	}
}
