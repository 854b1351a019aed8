use mailcards::card::Card;
use mailcards::draft::DraftField;
use mailcards::transport::{ChannelTransport, StreamEvent, StreamParser};
use mailcards::types::{ToolKind, ToolResult, ToolStatus};
use serde_json::json;

#[test]
fn test_fragmented_events() {
    let mut parser = StreamParser::new();

    let chunk1 = b"event: tool_call\ndata: {\"id\":\"call_1\",\"kind\":\"write_";
    let events1 = parser.process(chunk1).expect("first chunk parse");
    assert_eq!(events1.len(), 0);

    let chunk2 = b"email_response\",\"status\":\"interrupted\",\"args\":{\"content\":\"Hi\"}}\n\n";
    let events2 = parser.process(chunk2).expect("second chunk parse");
    assert_eq!(events2.len(), 1);

    match &events2[0] {
        StreamEvent::ToolCall(call) => {
            assert_eq!(call.kind, ToolKind::WriteEmailResponse);
            assert_eq!(call.status, ToolStatus::Interrupted);
            assert_eq!(call.arg_str("content"), Some("Hi"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_parse_error_handling() {
    let mut parser = StreamParser::new();

    let chunk = b"event: tool_call\ndata: {invalid json}\n\n";
    let events = parser
        .process(chunk)
        .expect("error handling should not fail parser");
    assert_eq!(events.len(), 0);
}

#[test]
fn test_unknown_tool_kind_is_skipped() {
    let mut parser = StreamParser::new();

    let chunk = b"event: tool_call\ndata: {\"id\":\"x\",\"kind\":\"archive_email\"}\n\nevent: tool_call\ndata: {\"id\":\"y\",\"kind\":\"email_marked_as_read\",\"status\":\"completed\"}\n\n";
    let events = parser.process(chunk).expect("parse");
    assert_eq!(events.len(), 1);
    match &events[0] {
        StreamEvent::ToolCall(call) => assert_eq!(call.id, "y"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_email_context_and_list_results() {
    let mut parser = StreamParser::new();

    let chunk = b"event: email\r\ndata: {\"id\":\"19982d57fe3c5fa0\",\"subject\":\"Lunch\"}\r\n\r\nevent: tool_call\r\ndata: {\"id\":\"c2\",\"kind\":\"get_events_for_days\",\"status\":\"completed\",\"args\":{\"date_str\":\"07-01-2024\"},\"result\":[{\"summary\":\"Standup\"}]}\r\n\r\n";
    let events = parser.process(chunk).expect("crlf events parse");
    assert_eq!(events.len(), 2);

    match &events[0] {
        StreamEvent::Email(email) => {
            assert_eq!(email.id, "19982d57fe3c5fa0");
            assert_eq!(email.subject.as_deref(), Some("Lunch"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    match &events[1] {
        StreamEvent::ToolCall(call) => {
            assert!(matches!(call.result, Some(ToolResult::Items(ref items)) if items.len() == 1));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_keepalive_comments_and_unknown_events_are_ignored() {
    let mut parser = StreamParser::new();

    let chunk = b": ping\n\nevent: metadata\ndata: {\"run_id\":\"r1\"}\n\n";
    let events = parser.process(chunk).expect("parse");
    assert!(events.is_empty());
    assert!(parser.flush().is_empty());
}

#[test]
fn test_split_character_survives_into_edit_payload() {
    let frame = "event: tool_call\ndata: {\"id\":\"call_1\",\"kind\":\"write_email_response\",\"status\":\"interrupted\",\"args\":{\"content\":\"Merci, Zoë\"}}\n\n";
    let bytes = frame.as_bytes();
    let split = frame.find('ë').expect("ë") + 1;
    assert_eq!(&bytes[split - 1..=split], &[0xC3, 0xAB]);

    let mut parser = StreamParser::new();
    assert!(parser.process(&bytes[..split]).expect("head").is_empty());
    let call = match parser.process(&bytes[split..]).expect("tail").pop() {
        Some(StreamEvent::ToolCall(call)) => call,
        other => panic!("unexpected event: {other:?}"),
    };
    assert_eq!(call.arg_str("content"), Some("Merci, Zoë"));

    let (transport, mut rx) = ChannelTransport::new();
    let mut card = Card::new(call);
    card.edit_field(DraftField::Recipients, "a@x.com")
        .expect("edit recipients");
    card.submit_decision(&transport).expect("submit");

    let payload = rx.try_recv().expect("payload");
    assert_eq!(
        serde_json::to_value(&payload.command.resume[0]).expect("entry"),
        json!({
            "type": "edit",
            "args": {
                "action": "write_email_response",
                "args": {"new_recipients": ["a@x.com"], "content": "Merci, Zoë"}
            }
        })
    );
}
