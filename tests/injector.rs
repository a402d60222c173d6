//! Carried-in initial message: fires once, first, and only when ready.

mod support;

use std::sync::Arc;

use agent_chat::{
    AttachmentKind, AttachmentRef, ChatConfig, ChatSession, ConnectionState, DispatchError,
    NavigationPayload, TransportEvent, TransportStatus,
};
use chat_transport_mock::MockTransport;
use pretty_assertions::assert_eq;
use support::MockUploader;

fn session_with_payload(
    transport: &Arc<MockTransport>,
    uploader: &Arc<MockUploader>,
    config: ChatConfig,
    payload: NavigationPayload,
) -> ChatSession {
    ChatSession::new(
        Arc::clone(transport) as Arc<dyn agent_chat::ChatTransport>,
        Arc::clone(uploader) as Arc<dyn agent_chat::FileUploader>,
        config,
    )
    .with_navigation_payload(payload)
}

fn ready() -> TransportStatus {
    TransportStatus::new(ConnectionState::Connected, false)
}

#[tokio::test]
async fn initial_message_with_attachments_dispatches_on_first_readiness() {
    let transport = Arc::new(MockTransport::new());
    let uploader = Arc::new(MockUploader::new());
    let payload = NavigationPayload::new("Build a React app")
        .with_framework("react")
        .with_attachments(vec![
            AttachmentRef::file("file.txt", "text/plain", b"starter".to_vec()),
            AttachmentRef::image("image.png", "image/png", vec![1, 2, 3]),
        ]);
    let session = session_with_payload(&transport, &uploader, ChatConfig::new(), payload);

    transport.set_connection(ConnectionState::Connected);
    let activity = session
        .on_transport_event(TransportEvent::StatusChanged(ready()))
        .await
        .expect("event handled");

    assert!(activity.injected);
    assert!(session.injector_fired());

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let args = &sent[0].args;
    assert!(args.content.starts_with("Build a React app"));
    assert!(args
        .content
        .contains("Attached files:\n- file.txt: https://uploads.example/file.txt"));
    assert_eq!(args.image_urls, vec!["data:image/png;base64,AQID"]);
    assert_eq!(args.file_urls, vec!["https://uploads.example/file.txt"]);
}

#[tokio::test]
async fn repeated_readiness_never_resends_the_initial_message() {
    let transport = Arc::new(MockTransport::new());
    let uploader = Arc::new(MockUploader::new());
    let session = session_with_payload(
        &transport,
        &uploader,
        ChatConfig::new(),
        NavigationPayload::new("only once"),
    );

    transport.set_connection(ConnectionState::Connected);
    session
        .on_transport_event(TransportEvent::StatusChanged(ready()))
        .await
        .expect("first readiness");

    // Disconnect and reconnect; the injector must stay fired.
    transport.set_connection(ConnectionState::Disconnected);
    session
        .on_transport_event(TransportEvent::StatusChanged(TransportStatus::default()))
        .await
        .expect("disconnect handled");
    transport.set_connection(ConnectionState::Connected);
    let activity = session
        .on_transport_event(TransportEvent::StatusChanged(ready()))
        .await
        .expect("second readiness");

    assert!(!activity.injected);
    assert_eq!(transport.sent_len(), 1);
}

#[tokio::test]
async fn injection_waits_out_the_history_replay() {
    let transport = Arc::new(MockTransport::new());
    let uploader = Arc::new(MockUploader::new());
    let session = session_with_payload(
        &transport,
        &uploader,
        ChatConfig::new(),
        NavigationPayload::new("after replay"),
    );

    transport.set_connection(ConnectionState::Connected);
    transport.set_loading_messages(true);
    let during_replay = session
        .on_transport_event(TransportEvent::StatusChanged(TransportStatus::new(
            ConnectionState::Connected,
            true,
        )))
        .await
        .expect("replay status handled");
    assert!(!during_replay.injected);
    assert_eq!(transport.sent_len(), 0);

    transport.set_loading_messages(false);
    let after_replay = session
        .on_transport_event(TransportEvent::StatusChanged(ready()))
        .await
        .expect("ready status handled");
    assert!(after_replay.injected);
    assert_eq!(transport.sent_len(), 1);
}

#[tokio::test]
async fn initial_message_goes_out_ahead_of_queued_submissions() {
    let transport = Arc::new(MockTransport::new());
    let uploader = Arc::new(MockUploader::new());
    let session = session_with_payload(
        &transport,
        &uploader,
        ChatConfig::new(),
        NavigationPayload::new("carried in"),
    );

    session.submit("typed while offline", Vec::new()).await.expect("queued");

    transport.set_connection(ConnectionState::Connected);
    let activity = session
        .on_transport_event(TransportEvent::StatusChanged(ready()))
        .await
        .expect("event handled");

    assert!(activity.injected);
    assert_eq!(activity.sent_from_queue, 1);
    let contents: Vec<String> = transport
        .sent()
        .into_iter()
        .map(|envelope| envelope.args.content)
        .collect();
    assert_eq!(contents, vec!["carried in", "typed while offline"]);
}

#[tokio::test]
async fn invalid_injected_attachments_consume_the_payload_and_error() {
    let transport = Arc::new(MockTransport::new());
    let uploader = Arc::new(MockUploader::new());
    let payload = NavigationPayload::new("restricted").with_attachments(vec![AttachmentRef::file(
        "blocked.bin",
        "application/octet-stream",
        vec![0u8; 8],
    )]);
    let session = session_with_payload(
        &transport,
        &uploader,
        ChatConfig::new().with_allowed_kinds(vec![AttachmentKind::Image]),
        payload,
    );

    transport.set_connection(ConnectionState::Connected);
    let error = session
        .on_transport_event(TransportEvent::StatusChanged(ready()))
        .await
        .expect_err("disallowed attachment kind");
    assert!(matches!(error, DispatchError::Validation { .. }));

    // Consumed on firing: the next readiness does not retry it.
    assert!(session.injector_fired());
    let retry = session
        .on_transport_event(TransportEvent::StatusChanged(ready()))
        .await
        .expect("subsequent event");
    assert!(!retry.injected);
    assert_eq!(transport.sent_len(), 0);
    assert_eq!(uploader.calls(), 0);
}

#[tokio::test]
async fn session_without_a_payload_never_injects() {
    let transport = Arc::new(MockTransport::new());
    let uploader = Arc::new(MockUploader::new());
    let session = ChatSession::new(
        Arc::clone(&transport) as Arc<dyn agent_chat::ChatTransport>,
        Arc::clone(&uploader) as Arc<dyn agent_chat::FileUploader>,
        ChatConfig::new(),
    );

    transport.set_connection(ConnectionState::Connected);
    let activity = session
        .on_transport_event(TransportEvent::StatusChanged(ready()))
        .await
        .expect("event handled");
    assert!(!activity.injected);
    assert!(!session.injector_fired());
    assert_eq!(transport.sent_len(), 0);
}
