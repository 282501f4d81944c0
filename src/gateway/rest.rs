use tracing::{debug, info};

use super::messages::{FinalizeResponse, SynthesisRequest, SynthesisResponse};
use crate::error::VoiceError;

/// Authoritative finalize-and-transcribe endpoint.
///
/// One request per finished recording; the response is the only source of
/// the committed transcript. No retries are issued on failure.
#[async_trait::async_trait]
pub trait TranscriptionGateway: Send + Sync {
    async fn finalize(&self, session_id: &str, wav: Vec<u8>) -> Result<String, VoiceError>;
}

/// Text-to-speech endpoint. Returns a playable audio reference.
#[async_trait::async_trait]
pub trait SynthesisGateway: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<String, VoiceError>;
}

/// REST client for both gateway endpoints.
#[derive(Clone)]
pub struct RestGateway {
    http: reqwest::Client,
    base_url: String,
}

impl RestGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl TranscriptionGateway for RestGateway {
    async fn finalize(&self, session_id: &str, wav: Vec<u8>) -> Result<String, VoiceError> {
        let url = format!("{}/api/stt/{}", self.base_url, session_id);
        debug!("finalize request: {} ({} bytes)", url, wav.len());

        let part = reqwest::multipart::Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| VoiceError::Network(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| VoiceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VoiceError::Network(format!(
                "finalize returned {}",
                response.status()
            )));
        }

        let body: FinalizeResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Network(e.to_string()))?;

        info!("finalize complete: {} chars", body.transcript.len());

        Ok(body.transcript)
    }
}

#[async_trait::async_trait]
impl SynthesisGateway for RestGateway {
    async fn synthesize(&self, text: &str) -> Result<String, VoiceError> {
        let url = format!("{}/api/tts", self.base_url);
        debug!("synthesis request: {} ({} chars)", url, text.len());

        let response = self
            .http
            .post(&url)
            .json(&SynthesisRequest {
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(|e| VoiceError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VoiceError::Network(format!(
                "tts returned {}",
                response.status()
            )));
        }

        let body: SynthesisResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Network(e.to_string()))?;

        Ok(body.audio_url)
    }
}
