pub mod blob;
pub mod config;
pub mod constraint;
pub mod controller_message;
pub mod error;
pub mod geometry;
pub mod hash_grid;
pub mod particle;
pub mod posbox;
pub mod pworld;
pub mod spawn;
pub mod time_manager;

pub use error::{SimError, SimResult};

pub type V2 = nalgebra::Vector2<f32>;
pub type C2 = nalgebra::Vector2<i32>;
