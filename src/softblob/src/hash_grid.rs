//! Uniform grid broad phase.
//!
//! Clients are point entities carrying a small `Copy` payload. The grid hands
//! out generation-checked handles from a slot arena, so a handle kept past
//! `remove_client` or `clear` is simply ignored instead of aliasing a newer
//! client.
//!
//! Cells outside the world bounds are clamped onto the border cells. Queries
//! are over-inclusive: every client within the radius is returned, plus
//! whatever else shares the visited cells.

use fnv::FnvHashMap;

use crate::{C2, V2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClientHandle {
	slot: u32,
	generation: u32,
}

#[derive(Clone)]
struct Client<T> {
	item: T,
	pos: V2,
	cell: C2,
}

#[derive(Clone)]
struct Slot<T> {
	generation: u32,
	client: Option<Client<T>>,
}

#[derive(Clone)]
pub struct HashGrid<T> {
	csize: f32,
	dims: C2,
	cells: FnvHashMap<C2, Vec<ClientHandle>>,
	slots: Vec<Slot<T>>,
	free: Vec<u32>,
	len: usize,
}

impl<T: Copy> HashGrid<T> {
	pub fn new(width: f32, height: f32, csize: f32) -> Self {
		let csize = if csize.is_finite() { csize.max(1.0) } else { 1.0 };
		let cols = (width.max(csize) / csize).ceil() as i32;
		let rows = (height.max(csize) / csize).ceil() as i32;
		Self {
			csize,
			dims: C2::new(cols.max(1), rows.max(1)),
			cells: FnvHashMap::default(),
			slots: Vec::new(),
			free: Vec::new(),
			len: 0,
		}
	}

	pub fn cell_size(&self) -> f32 {
		self.csize
	}

	pub fn dims(&self) -> C2 {
		self.dims
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	fn get_cpos(&self, p: V2) -> C2 {
		let clamp = |v: f32, hi: i32| -> i32 {
			// NaN lands in cell 0 instead of poisoning the cast
			let c = (v / self.csize).floor();
			if c.is_nan() {
				0
			} else {
				(c.max(0.0) as i32).min(hi - 1)
			}
		};
		C2::new(clamp(p.x, self.dims.x), clamp(p.y, self.dims.y))
	}

	fn client(&self, handle: ClientHandle) -> Option<&Client<T>> {
		let slot = self.slots.get(handle.slot as usize)?;
		if slot.generation != handle.generation {
			return None;
		}
		slot.client.as_ref()
	}

	pub fn get(&self, handle: ClientHandle) -> Option<T> {
		self.client(handle).map(|c| c.item)
	}

	pub fn create_client(&mut self, pos: V2, item: T) -> ClientHandle {
		let cell = self.get_cpos(pos);
		let client = Client { item, pos, cell };
		let handle = match self.free.pop() {
			Some(idx) => {
				let slot = &mut self.slots[idx as usize];
				slot.client = Some(client);
				ClientHandle {
					slot: idx,
					generation: slot.generation,
				}
			}
			None => {
				self.slots.push(Slot {
					generation: 0,
					client: Some(client),
				});
				ClientHandle {
					slot: (self.slots.len() - 1) as u32,
					generation: 0,
				}
			}
		};
		self.cells.entry(cell).or_insert_with(Vec::new).push(handle);
		self.len += 1;
		handle
	}

	/// Moves the client to the bucket of `pos`. Returns false for a stale
	/// handle.
	pub fn update_client(&mut self, handle: ClientHandle, pos: V2) -> bool {
		let cell = self.get_cpos(pos);
		let old = match self.slots.get_mut(handle.slot as usize) {
			Some(slot) if slot.generation == handle.generation => {
				match slot.client.as_mut() {
					Some(client) => {
						client.pos = pos;
						let old = client.cell;
						client.cell = cell;
						old
					}
					None => return false,
				}
			}
			_ => return false,
		};
		if old != cell {
			self.unlink(old, handle);
			self.cells.entry(cell).or_insert_with(Vec::new).push(handle);
		}
		true
	}

	pub fn remove_client(&mut self, handle: ClientHandle) -> Option<T> {
		let slot = self.slots.get_mut(handle.slot as usize)?;
		if slot.generation != handle.generation {
			return None;
		}
		let client = slot.client.take()?;
		slot.generation = slot.generation.wrapping_add(1);
		self.free.push(handle.slot);
		self.unlink(client.cell, handle);
		self.len -= 1;
		Some(client.item)
	}

	fn unlink(&mut self, cell: C2, handle: ClientHandle) {
		if let Some(bucket) = self.cells.get_mut(&cell) {
			if let Some(i) = bucket.iter().position(|h| *h == handle) {
				bucket.swap_remove(i);
			}
			if bucket.is_empty() {
				self.cells.remove(&cell);
			}
		}
	}

	/// Drops every client. Outstanding handles become stale.
	pub fn clear(&mut self) {
		self.cells.clear();
		for (idx, slot) in self.slots.iter_mut().enumerate() {
			if slot.client.take().is_some() {
				slot.generation = slot.generation.wrapping_add(1);
				self.free.push(idx as u32);
			}
		}
		self.len = 0;
	}

	/// Changes bounds and cell size, keeping every client and its handle.
	pub fn resize(&mut self, width: f32, height: f32, csize: f32) {
		let fresh = Self::new(width, height, csize);
		self.csize = fresh.csize;
		self.dims = fresh.dims;
		self.cells.clear();
		for idx in 0..self.slots.len() {
			let generation = self.slots[idx].generation;
			let pos = match self.slots[idx].client.as_ref() {
				Some(c) => c.pos,
				None => continue,
			};
			let cell = self.get_cpos(pos);
			if let Some(c) = self.slots[idx].client.as_mut() {
				c.cell = cell;
			}
			self.cells.entry(cell).or_insert_with(Vec::new).push(ClientHandle {
				slot: idx as u32,
				generation,
			});
		}
	}

	/// Appends every client whose cell overlaps the square of half-size
	/// `radius` around `pos`.
	pub fn query_into(&self, pos: V2, radius: f32, out: &mut Vec<T>) {
		let r = V2::new(radius.abs(), radius.abs());
		let lo = self.get_cpos(pos - r);
		let hi = self.get_cpos(pos + r);
		for cx in lo.x..=hi.x {
			for cy in lo.y..=hi.y {
				if let Some(bucket) = self.cells.get(&C2::new(cx, cy)) {
					out.extend(
						bucket.iter().filter_map(|h| self.client(*h)).map(|c| c.item),
					);
				}
			}
		}
	}

	pub fn query(&self, pos: V2, radius: f32) -> Vec<T> {
		let mut out = Vec::new();
		self.query_into(pos, radius, &mut out);
		out
	}
}
