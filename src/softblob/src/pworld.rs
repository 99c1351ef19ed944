use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::blob::{Blob, BlobTemplate};
use crate::config::SimConfig;
use crate::controller_message::ControllerMessage;
use crate::error::{SimError, SimResult};
use crate::hash_grid::HashGrid;
use crate::particle::{Particle, ParticleRef};
use crate::posbox::Posbox;
use crate::spawn;
use crate::time_manager::{TimeManager, TimeModel};
use crate::V2;
use protocol::pr_model::PrModel;
use protocol::user_event::{UpdateInfo, UserEvent};
use protocol::EmotionRecord;

#[derive(Clone, Copy, Debug)]
struct Selection {
	blob: usize,
	// bounding-box centre minus pointer at press time
	offset: V2,
}

/// The whole simulation: blobs, the broad-phase grid and the world walls.
/// Mutation from outside goes through `add_blob`/`add_emotion`, `clear`,
/// `resize` and the pointer calls, all of which run between frames.
pub struct PWorld {
	config: SimConfig,
	pub time_scale: f32,

	// -1: always play
	// 0: pause
	// n: play n frames
	forward_frames: i32,

	size: V2,
	spacing: f32,
	// largest particle radius alive, widens broad-phase queries
	max_radius: f32,
	bbox: Posbox,
	grid: HashGrid<ParticleRef>,
	blobs: Vec<Blob>,
	selected: Option<Selection>,
	rng: StdRng,
	frame: u64,
	candidates: Vec<ParticleRef>,
}

impl Default for PWorld {
	fn default() -> Self {
		Self::build(
			SimConfig::default(),
			V2::new(800., 600.),
			StdRng::from_entropy(),
		)
	}
}

fn check_size(width: f32, height: f32) -> SimResult<V2> {
	if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
		Ok(V2::new(width, height))
	} else {
		Err(SimError::InvalidConfig(format!(
			"world size must be positive, got {}x{}",
			width, height
		)))
	}
}

impl PWorld {
	pub fn new(config: SimConfig, width: f32, height: f32) -> SimResult<Self> {
		config.validate()?;
		let size = check_size(width, height)?;
		Ok(Self::build(config, size, StdRng::from_entropy()))
	}

	fn build(config: SimConfig, size: V2, rng: StdRng) -> Self {
		let spacing = config.vertex_distance * size.x.min(size.y);
		let bbox = Posbox::from_margin(size, V2::from(config.margin));
		let grid = HashGrid::new(size.x, size.y, spacing * 2.0);
		Self {
			config,
			time_scale: 1.0,
			forward_frames: -1,
			size,
			spacing,
			max_radius: 0.0,
			bbox,
			grid,
			blobs: Vec::new(),
			selected: None,
			rng,
			frame: 0,
			candidates: Vec::new(),
		}
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.rng = StdRng::seed_from_u64(seed);
		self
	}

	pub fn with_time_scale(mut self, time_scale: f32) -> Self {
		self.time_scale = time_scale;
		self
	}

	pub fn with_paused(mut self) -> Self {
		self.forward_frames = 0;
		self
	}

	pub fn with_substeps(mut self, substeps: usize) -> Self {
		self.config.substeps = substeps.max(1);
		self
	}

	pub fn init_test(&mut self) -> SimResult<()> {
		self.clear();
		let samples = [
			("CONTENT", 8., 3.),
			("ANXIOUS", 3., 8.),
			("EXCITED", 9., 9.),
			("LONELY", 2., 2.),
			("CALM", 7., 1.),
			("FRUSTRATED", 2., 7.),
			("HOPEFUL", 8., 5.),
			("TIRED", 4., 1.),
		];
		for (label, valence, arousal) in samples {
			self.add_emotion(&EmotionRecord::new(label, valence, arousal)?)?;
		}
		Ok(())
	}

	pub fn config(&self) -> &SimConfig {
		&self.config
	}

	pub fn size(&self) -> V2 {
		self.size
	}

	/// Effective particle spacing, `vertex_distance * min(width, height)`.
	pub fn spacing(&self) -> f32 {
		self.spacing
	}

	pub fn bbox(&self) -> &Posbox {
		&self.bbox
	}

	pub fn grid(&self) -> &HashGrid<ParticleRef> {
		&self.grid
	}

	pub fn blobs(&self) -> &[Blob] {
		&self.blobs
	}

	pub fn blob(&self, id: usize) -> Option<&Blob> {
		self.blobs.get(id)
	}

	pub fn particle(&self, id: ParticleRef) -> Option<&Particle> {
		self.blobs.get(id.blob)?.particles.get(id.index)
	}

	pub fn particles(&self) -> impl Iterator<Item = &Particle> + '_ {
		self.blobs.iter().flat_map(|b| b.particles.iter())
	}

	pub fn particle_len(&self) -> usize {
		self.blobs.iter().map(|b| b.len()).sum()
	}

	pub fn joint_len(&self) -> usize {
		self.blobs.iter().map(|b| b.joints.len()).sum()
	}

	pub fn frame(&self) -> u64 {
		self.frame
	}

	pub fn is_paused(&self) -> bool {
		self.forward_frames == 0
	}

	pub fn selected(&self) -> Option<usize> {
		self.selected.map(|s| s.blob)
	}

	pub fn add_blob(&mut self, template: &BlobTemplate) -> SimResult<usize> {
		let limit = self.config.max_vertex_count;
		let available = limit.saturating_sub(self.particle_len());
		if template.count > available {
			return Err(SimError::ParticleBudget {
				requested: template.count,
				available,
				limit,
			});
		}
		let id = self.blobs.len();
		let mut blob = Blob::new(id, template)?;
		blob.register(&mut self.grid);
		self.max_radius = self.max_radius.max(template.particle_radius);
		tracing::info!(
			id,
			label = blob.label(),
			particles = blob.len(),
			target_area = blob.target_area(),
			"add blob"
		);
		self.blobs.push(blob);
		Ok(id)
	}

	pub fn add_emotion(&mut self, record: &EmotionRecord) -> SimResult<usize> {
		let template = spawn::template_for(
			record,
			self.blobs.len(),
			self.size,
			self.spacing,
			&self.config,
			&mut self.rng,
		)
		.map_err(|e| {
			tracing::debug!(error = %e, "emotion record rejected");
			e
		})?;
		self.add_blob(&template)
	}

	pub fn clear(&mut self) {
		let count = self.blobs.len();
		self.grid.clear();
		self.blobs.clear();
		self.selected = None;
		self.max_radius = 0.0;
		tracing::info!(count, "clear blobs");
	}

	/// New canvas size. Spacing and walls follow it, existing blobs keep
	/// their shape.
	pub fn resize(&mut self, width: f32, height: f32) -> SimResult<()> {
		self.size = check_size(width, height)?;
		self.spacing = self.config.vertex_distance * width.min(height);
		self.bbox = Posbox::from_margin(self.size, V2::from(self.config.margin));
		self.grid.resize(width, height, self.spacing * 2.0);
		tracing::info!(width, height, spacing = self.spacing, "resize");
		Ok(())
	}

	pub fn blob_at(&self, point: V2) -> Option<usize> {
		self.blobs.iter().position(|b| b.contains(point))
	}

	pub fn press(&mut self, point: V2) -> Option<usize> {
		let id = self.blob_at(point)?;
		let offset = self.blobs[id].bounding_center() - point;
		self.selected = Some(Selection { blob: id, offset });
		Some(id)
	}

	pub fn drag(&mut self, point: V2) {
		if let Some(sel) = self.selected {
			let blob = &mut self.blobs[sel.blob];
			let delta = point + sel.offset - blob.bounding_center();
			blob.translate(delta);
		}
	}

	pub fn release(&mut self) {
		self.selected = None;
	}

	pub fn handle_message(&mut self, msg: ControllerMessage) -> SimResult<()> {
		match msg {
			ControllerMessage::TogglePause => {
				if self.forward_frames == 0 {
					self.forward_frames = -1;
				} else {
					self.forward_frames = 0;
				}
			}
			ControllerMessage::FrameForward => {
				if self.forward_frames == 0 {
					self.forward_frames += 1;
				}
			}
			ControllerMessage::AddEmotion(record) => {
				self.add_emotion(&record)?;
			}
			ControllerMessage::Clear => self.clear(),
			ControllerMessage::Resize(w, h) => self.resize(w, h)?,
			ControllerMessage::PointerPress(p) => {
				self.press(p);
			}
			ControllerMessage::PointerDrag(p) => self.drag(p),
			ControllerMessage::PointerRelease => self.release(),
		}
		Ok(())
	}

	fn resolve_collisions(&mut self) {
		// registrations must match this substep's positions
		for blob in self.blobs.iter() {
			for p in blob.particles.iter() {
				p.sync_client(&mut self.grid);
			}
		}
		let reach = self.max_radius;
		let mut candidates = std::mem::take(&mut self.candidates);
		for bid in 0..self.blobs.len() {
			for idx in 0..self.blobs[bid].len() {
				let me = ParticleRef { blob: bid, index: idx };
				let (pos, radius) = {
					let p = &self.blobs[bid].particles[idx];
					(p.pos, p.radius)
				};
				candidates.clear();
				self.grid.query_into(pos, radius + reach, &mut candidates);
				for &other in candidates.iter() {
					// ring neighbours are held by their joint
					if other == me || self.blobs[bid].is_ring_neighbor(idx, other) {
						continue;
					}
					let o = &self.blobs[other.blob].particles[other.index];
					let (opos, oradius) = (o.pos, o.radius);
					let push =
						match self.blobs[bid].particles[idx].test_collision(opos, oradius) {
							Some(push) => push,
							None => continue,
						};
					self.blobs[bid].particles[idx].move_by(push * 0.5);
					self.blobs[other.blob].particles[other.index].move_by(-push * 0.5);
				}
			}
		}
		self.candidates = candidates;
	}

	fn update_frame(&mut self, dt: f32) {
		if dt == 0f32 {
			return;
		}
		let max_speed = 2.0 * self.spacing / dt;
		let gravity = V2::new(0., self.config.gravity * dt);
		let held = self.selected();

		for blob in self.blobs.iter_mut() {
			blob.update_area();
		}
		for blob in self.blobs.iter_mut() {
			let pulled = held != Some(blob.id());
			for p in blob.particles.iter_mut() {
				if pulled {
					p.add_force(gravity);
				}
				p.update(dt, max_speed);
			}
		}
		for blob in self.blobs.iter_mut() {
			blob.apply_area_correction();
		}
		for blob in self.blobs.iter_mut() {
			blob.relax_joints(1.0);
		}
		self.resolve_collisions();
		for blob in self.blobs.iter_mut() {
			for p in blob.particles.iter_mut() {
				p.constrain(&self.bbox);
				p.end_update(dt, &mut self.grid);
			}
		}
	}

	/// One frame: `substeps` passes of `frame_dt / substeps`.
	pub fn run(&mut self) {
		let dt = self.config.substep_dt();
		for _ in 0..self.config.substeps {
			self.update_frame(dt);
		}
		self.frame += 1;
		tracing::debug!(
			frame = self.frame,
			blobs = self.blobs.len(),
			particles = self.particle_len(),
			"frame"
		);
	}

	/// Steps one frame unless paused. Returns whether a frame ran.
	pub fn tick(&mut self) -> bool {
		if self.forward_frames == 0 {
			return false;
		}
		if self.forward_frames > 0 {
			self.forward_frames -= 1;
		}
		self.run();
		true
	}

	pub fn pr_model(&self) -> PrModel {
		PrModel {
			blobs: self.blobs.iter().map(|b| b.render()).collect(),
		}
	}

	pub fn update_info(&self, load: f32) -> UpdateInfo {
		UpdateInfo {
			load,
			particle_len: self.particle_len(),
			joint_len: self.joint_len(),
			blob_len: self.blobs.len(),
		}
	}

	/// Real-time loop. Controller messages are applied between frames; one
	/// update is sent per stepped frame. Returns when either side hangs up.
	pub fn run_thread(&mut self, tx: Sender<UserEvent>, rx: Receiver<ControllerMessage>) {
		let mut tm = TimeManager::new(
			self.config.frame_dt,
			self.time_scale,
			TimeModel::RtFrameLock,
		);
		let mut first_frame = true;
		loop {
			tm.begin();
			loop {
				match rx.try_recv() {
					Ok(msg) => {
						if let Err(e) = self.handle_message(msg) {
							tracing::warn!(error = %e, "controller message rejected");
						}
					}
					Err(TryRecvError::Empty) => break,
					Err(TryRecvError::Disconnected) => {
						tracing::info!("controller disconnected");
						return;
					}
				}
			}
			// the first model goes out before anything is stepped
			let stepped = if first_frame {
				first_frame = false;
				true
			} else {
				self.tick()
			};
			let load = tm.finish();
			if stepped {
				let event = UserEvent::Update(self.pr_model(), self.update_info(load));
				if tx.send(event).is_err() {
					tracing::info!("renderer disconnected");
					return;
				}
			}
		}
	}
}
