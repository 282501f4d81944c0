// Unit tests for the conversation timeline
//
// The timeline is append-only: messages are immutable once appended and
// insertion order is conversation order.

use std::collections::HashSet;

use recruit_voice::timeline::{Message, MessageSender, Timeline};

#[test]
fn test_append_preserves_order() {
    let mut timeline = Timeline::new();

    timeline.append(Message::user("first"));
    timeline.append(Message::assistant("second", None));
    timeline.append(Message::user("third"));

    let contents: Vec<&str> = timeline
        .messages()
        .iter()
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
}

#[test]
fn test_message_fields() {
    let message = Message::user("hello");
    assert_eq!(message.sender, MessageSender::User);
    assert_eq!(message.content, "hello");
    assert!(message.audio_ref.is_none());

    let message = Message::assistant("hi", Some("http://localhost/a.wav".to_string()));
    assert_eq!(message.sender, MessageSender::Assistant);
    assert_eq!(message.audio_ref.as_deref(), Some("http://localhost/a.wav"));
}

#[test]
fn test_ids_unique_under_rapid_creation() {
    // Wall-clock based ids collide under consecutive sends; ours must not.
    let ids: HashSet<String> = (0..500).map(|_| Message::user("x").id).collect();
    assert_eq!(ids.len(), 500);
}

#[test]
fn test_existing_messages_unchanged_by_later_appends() {
    let mut timeline = Timeline::new();
    timeline.append(Message::user("original"));

    let before: Vec<(String, String)> = timeline
        .messages()
        .iter()
        .map(|m| (m.id.clone(), m.content.clone()))
        .collect();

    for i in 0..10 {
        timeline.append(Message::assistant(format!("reply {}", i), None));
    }

    let after: Vec<(String, String)> = timeline
        .messages()
        .iter()
        .take(1)
        .map(|m| (m.id.clone(), m.content.clone()))
        .collect();

    assert_eq!(before, after);
    assert_eq!(timeline.len(), 11);
}

#[test]
fn test_empty_timeline() {
    let timeline = Timeline::new();
    assert!(timeline.is_empty());
    assert!(timeline.last().is_none());
}
