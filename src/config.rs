use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub gateway: GatewayConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL for the REST endpoints (POST /api/tts, POST /api/stt/{id})
    pub http_base: String,
    /// Base URL for the streaming transport (/ws/stt/{id})
    pub ws_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Capture chunk cadence in milliseconds
    pub chunk_ms: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "recruit-voice".to_string(),
            },
            gateway: GatewayConfig {
                http_base: "http://localhost:2900".to_string(),
                ws_base: "ws://localhost:2900".to_string(),
            },
            audio: AudioConfig {
                sample_rate: 16000,
                channels: 1,
                chunk_ms: 100,
            },
        }
    }
}
