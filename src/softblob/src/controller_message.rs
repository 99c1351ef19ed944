use crate::V2;
use protocol::EmotionRecord;

/// Everything that may mutate the world from outside the frame loop. The
/// loop applies these between frames, never during one.
#[derive(Clone, Debug)]
pub enum ControllerMessage {
	TogglePause,
	FrameForward,
	AddEmotion(EmotionRecord),
	Clear,
	Resize(f32, f32),
	PointerPress(V2),
	PointerDrag(V2),
	PointerRelease,
}
