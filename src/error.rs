use thiserror::Error;

/// Errors raised inside the voice interaction engine.
///
/// Every variant is recovered at the component boundary where it occurs and
/// surfaced to the user as a notification; none of them abort the process.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// Microphone access was refused or no input device exists.
    #[error("microphone unavailable: {0}")]
    PermissionDenied(String),

    /// A TTS or STT gateway request failed (transport error or non-2xx).
    #[error("gateway request failed: {0}")]
    Network(String),

    /// The playback resource failed to initialize or decode.
    #[error("audio playback failed: {0}")]
    Decode(String),

    /// A submit was attempted with blank input.
    #[error("empty input")]
    EmptyInput,

    /// A submit was attempted while another send is in flight.
    #[error("a send is already in flight")]
    Busy,
}
