pub mod assistant;
pub mod audio;
pub mod capture;
pub mod config;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod playback;
pub mod timeline;

pub use assistant::{Assistant, KeywordResponder, ResponseGenerator};
pub use audio::{AudioFrame, CaptureBackend, CaptureConfig, MicBackend};
pub use capture::{CaptureController, CaptureState};
pub use config::Config;
pub use error::VoiceError;
pub use gateway::{RestGateway, StreamHandle, StreamTransport, SynthesisGateway, TranscriptionGateway, WsTransport};
pub use notify::{Notification, NotificationKind, Notifier};
pub use playback::{AudioOutput, PlaybackController, PlaybackState, RodioOutput};
pub use timeline::{Message, MessageSender, Timeline};
