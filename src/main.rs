use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use recruit_voice::{
    Assistant, CaptureConfig, CaptureController, CaptureState, Config, KeywordResponder,
    MessageSender, MicBackend, Notifier, PlaybackController, RestGateway, RodioOutput,
    WsTransport,
};

#[derive(Parser)]
#[command(name = "recruit-voice", about = "Voice assistant console")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/recruit-voice")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config).unwrap_or_else(|e| {
        info!("no config loaded ({}), using defaults", e);
        Config::default()
    });

    info!("{} starting", cfg.service.name);
    info!("gateway: {}", cfg.gateway.http_base);

    let (notifier, mut notifications) = Notifier::channel();

    // Drain notifications to the terminal the way the UI renders toasts.
    tokio::spawn(async move {
        while let Some(n) = notifications.recv().await {
            eprintln!("[{}] {}", n.title, n.detail);
        }
    });

    let gateway = Arc::new(RestGateway::new(cfg.gateway.http_base.clone()));
    let transport = Arc::new(WsTransport::new(cfg.gateway.ws_base.clone()));

    let capture_config = CaptureConfig {
        target_sample_rate: cfg.audio.sample_rate,
        target_channels: cfg.audio.channels,
        chunk_ms: cfg.audio.chunk_ms,
    };

    let mut capture = CaptureController::new(
        capture_config.clone(),
        Box::new(MicBackend::new(capture_config)),
        transport,
        gateway.clone(),
        notifier.clone(),
    );

    let assistant = Assistant::new(
        Box::new(KeywordResponder),
        gateway.clone(),
        notifier.clone(),
    );

    let mut playback = PlaybackController::new(Box::new(RodioOutput::new()), notifier);

    println!("Commands: /record (toggle), /play (last reply), /quit; anything else is sent as text.");
    print_timeline(&assistant).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match line.trim() {
            "/quit" => break,
            "/record" => {
                if capture.state() == CaptureState::Recording {
                    if let Some(transcript) = capture.stop().await {
                        let _ = assistant.submit_voice(transcript).await;
                        print_timeline(&assistant).await;
                    }
                } else {
                    capture.start().await;
                    if capture.state() == CaptureState::Recording {
                        println!("Recording... type /record again to stop.");
                    }
                }
            }
            "/play" => {
                let snapshot = assistant.timeline_snapshot().await;
                let last_audio = snapshot
                    .iter()
                    .rev()
                    .filter(|m| m.sender == MessageSender::Assistant)
                    .find_map(|m| m.audio_ref.clone());

                match last_audio {
                    Some(reference) => playback.play(&reference).await,
                    None => println!("No audio reply to play yet."),
                }
            }
            text => {
                if assistant.submit_text(text).await.is_ok() {
                    print_timeline(&assistant).await;
                }
            }
        }
    }

    playback.stop().await;
    Ok(())
}

async fn print_timeline(assistant: &Assistant) {
    for message in assistant.timeline_snapshot().await.iter().rev().take(2).rev() {
        let who = match message.sender {
            MessageSender::User => "you",
            MessageSender::Assistant => "assistant",
        };
        let audio = if message.audio_ref.is_some() { " [audio]" } else { "" };
        println!("{}: {}{}", who, message.content, audio);
    }
}
