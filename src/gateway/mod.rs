pub mod messages;
pub mod rest;
pub mod stream;

pub use messages::{FinalizeResponse, PartialTranscript, SynthesisRequest, SynthesisResponse};
pub use rest::{RestGateway, SynthesisGateway, TranscriptionGateway};
pub use stream::{StreamHandle, StreamTransport, WsTransport};
