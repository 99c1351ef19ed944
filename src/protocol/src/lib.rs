pub mod emotion;
pub mod error;
pub mod palette;
pub mod pr_model;
pub mod user_event;

pub use emotion::{EmotionList, EmotionRecord};
pub use error::RecordError;
pub use palette::Rgb;
