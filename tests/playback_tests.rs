// Playback controller tests
//
// Verifies the exclusive-output invariant with a fake audio output that
// records start/stop ordering.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use recruit_voice::error::VoiceError;
use recruit_voice::notify::{NotificationKind, Notifier};
use recruit_voice::playback::{AudioOutput, PlaybackController, PlaybackState};

/// Output fake that logs every transition and can simulate decode failures.
struct LoggingOutput {
    log: Arc<Mutex<Vec<String>>>,
    active: Arc<AtomicBool>,
    fail_on: Option<String>,
}

impl LoggingOutput {
    fn new(log: Arc<Mutex<Vec<String>>>, active: Arc<AtomicBool>) -> Self {
        Self {
            log,
            active,
            fail_on: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioOutput for LoggingOutput {
    async fn start(&mut self, reference: &str) -> Result<(), VoiceError> {
        if self.fail_on.as_deref() == Some(reference) {
            self.log.lock().unwrap().push(format!("fail:{}", reference));
            return Err(VoiceError::Decode("bad stream".to_string()));
        }

        self.log.lock().unwrap().push(format!("start:{}", reference));
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&mut self) {
        self.log.lock().unwrap().push("stop".to_string());
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

fn setup() -> (
    PlaybackController,
    Arc<Mutex<Vec<String>>>,
    Arc<AtomicBool>,
    tokio::sync::mpsc::UnboundedReceiver<recruit_voice::notify::Notification>,
) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let active = Arc::new(AtomicBool::new(false));
    let (notifier, notifications) = Notifier::channel();
    let output = LoggingOutput::new(log.clone(), active.clone());
    let controller = PlaybackController::new(Box::new(output), notifier);
    (controller, log, active, notifications)
}

#[tokio::test]
async fn test_play_then_stop() {
    let (mut playback, log, _active, _n) = setup();

    playback.play("http://localhost/a.wav").await;
    assert_eq!(playback.state(), PlaybackState::Playing);

    playback.stop().await;
    assert_eq!(playback.state(), PlaybackState::Idle);

    assert_eq!(
        *log.lock().unwrap(),
        vec!["start:http://localhost/a.wav", "stop"]
    );
}

#[tokio::test]
async fn test_new_play_tears_down_previous_first() {
    // ref1's resource must be released before ref2's is created.
    let (mut playback, log, _active, _n) = setup();

    playback.play("ref1").await;
    playback.play("ref2").await;

    assert_eq!(playback.state(), PlaybackState::Playing);
    assert_eq!(*log.lock().unwrap(), vec!["start:ref1", "stop", "start:ref2"]);
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let (mut playback, log, _active, _n) = setup();

    playback.play("ref1").await;
    playback.stop().await;
    playback.stop().await;
    playback.stop().await;

    assert_eq!(*log.lock().unwrap(), vec!["start:ref1", "stop"]);
}

#[tokio::test]
async fn test_decode_failure_notifies_and_stays_idle() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let active = Arc::new(AtomicBool::new(false));
    let (notifier, mut notifications) = Notifier::channel();
    let mut output = LoggingOutput::new(log.clone(), active);
    output.fail_on = Some("broken".to_string());
    let mut playback = PlaybackController::new(Box::new(output), notifier);

    playback.play("broken").await;

    assert_eq!(playback.state(), PlaybackState::Idle);

    let raised = notifications.try_recv().unwrap();
    assert_eq!(raised.kind, NotificationKind::Playback);
    assert!(notifications.try_recv().is_err(), "exactly one notification");
}

#[tokio::test]
async fn test_finished_playback_reads_as_idle() {
    let (mut playback, _log, active, _n) = setup();

    playback.play("ref1").await;
    assert_eq!(playback.state(), PlaybackState::Playing);

    // Audio ran out on its own.
    active.store(false, Ordering::SeqCst);
    assert_eq!(playback.state(), PlaybackState::Idle);
}
