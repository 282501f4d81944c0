pub mod backend;
pub mod encode;
pub mod mic;

pub use backend::{condition_frame, AudioFrame, CaptureBackend, CaptureConfig};
pub use encode::encode_wav;
pub use mic::MicBackend;
