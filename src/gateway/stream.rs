use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, trace, warn};

use super::messages::PartialTranscript;
use crate::error::VoiceError;

/// Streaming-partial transport, scoped 1:1 to one recording session.
///
/// Chunk delivery is advisory: no acknowledgement, no retry, no effect on
/// the authoritative transcript.
#[async_trait::async_trait]
pub trait StreamTransport: Send + Sync {
    async fn open(&self, session_id: &str) -> Result<StreamHandle, VoiceError>;
}

/// Live handle to an open streaming session.
///
/// Dropping the handle (or the last chunk sender) closes the socket.
pub struct StreamHandle {
    chunk_tx: mpsc::Sender<Vec<u8>>,
    partial_rx: Option<mpsc::Receiver<String>>,
}

impl StreamHandle {
    pub fn new(chunk_tx: mpsc::Sender<Vec<u8>>, partial_rx: mpsc::Receiver<String>) -> Self {
        Self {
            chunk_tx,
            partial_rx: Some(partial_rx),
        }
    }

    /// Forward one audio chunk, best-effort. A full or closed transport
    /// drops the chunk silently; local accumulation is the authoritative
    /// copy.
    pub fn send_chunk(&self, pcm: Vec<u8>) {
        if self.chunk_tx.try_send(pcm).is_err() {
            trace!("streaming transport not ready; chunk skipped");
        }
    }

    /// Take the partial-transcript receiver. Yields `None` after the first
    /// call.
    pub fn take_partials(&mut self) -> Option<mpsc::Receiver<String>> {
        self.partial_rx.take()
    }
}

/// WebSocket implementation of the streaming transport.
pub struct WsTransport {
    ws_base: String,
}

impl WsTransport {
    pub fn new(ws_base: impl Into<String>) -> Self {
        Self {
            ws_base: ws_base.into(),
        }
    }
}

#[async_trait::async_trait]
impl StreamTransport for WsTransport {
    async fn open(&self, session_id: &str) -> Result<StreamHandle, VoiceError> {
        let url = format!("{}/ws/stt/{}", self.ws_base, session_id);
        info!("opening streaming transport: {}", url);

        let (ws, _) = connect_async(url)
            .await
            .map_err(|e| VoiceError::Network(e.to_string()))?;

        let (mut ws_tx, mut ws_rx) = ws.split();
        let (chunk_tx, mut chunk_rx) = mpsc::channel::<Vec<u8>>(100);
        let (partial_tx, partial_rx) = mpsc::channel::<String>(100);

        // Writer: forwards chunks until the sender side closes, then shuts
        // the socket down.
        tokio::spawn(async move {
            while let Some(chunk) = chunk_rx.recv().await {
                if let Err(e) = ws_tx.send(Message::Binary(chunk)).await {
                    debug!("streaming send failed (advisory, ignored): {}", e);
                    break;
                }
            }

            let _ = ws_tx.close().await;
            debug!("streaming transport closed");
        });

        // Reader: decodes partial transcripts until the socket closes.
        tokio::spawn(async move {
            while let Some(message) = ws_rx.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<PartialTranscript>(&text) {
                            Ok(partial) => {
                                if partial_tx.send(partial.transcript).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!("unparseable partial transcript: {}", e);
                            }
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        debug!("streaming transport receive error: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(StreamHandle::new(chunk_tx, partial_rx))
    }
}
