use serde::{Deserialize, Serialize};

/// Request body for POST /api/tts
#[derive(Debug, Serialize)]
pub struct SynthesisRequest {
    pub text: String,
}

/// Response body from POST /api/tts
#[derive(Debug, Deserialize)]
pub struct SynthesisResponse {
    pub audio_url: String,
}

/// Response body from POST /api/stt/{session_id}
#[derive(Debug, Deserialize)]
pub struct FinalizeResponse {
    pub transcript: String,
}

/// Partial, non-authoritative transcript pushed over the streaming transport.
///
/// Delivered zero or more times per session; used for live preview only and
/// never committed to the timeline.
#[derive(Debug, Serialize, Deserialize)]
pub struct PartialTranscript {
    pub transcript: String,
}
