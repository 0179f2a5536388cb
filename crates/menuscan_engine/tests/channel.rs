use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use menuscan_engine::{
    decode_frame, run_status_channel, ChannelError, ChannelFrame, EngineEvent, EventSink,
};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self::default()
    }

    fn take(&self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events.lock().unwrap())
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Accepts one websocket connection, sends the given text frames, then
/// waits for the peer to go away.
async fn serve_frames(listener: TcpListener, frames: Vec<&'static str>) {
    let (stream, _) = listener.accept().await.expect("accept");
    let mut ws = tokio_tungstenite::accept_async(stream)
        .await
        .expect("handshake");
    for frame in frames {
        ws.send(Message::text(frame)).await.expect("send frame");
    }
    while let Some(Ok(_)) = ws.next().await {}
}

async fn local_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    (listener, format!("ws://{addr}"))
}

#[tokio::test]
async fn updates_arrive_in_order_and_complete_ends_the_channel() {
    let (listener, url) = local_listener().await;
    let server = tokio::spawn(serve_frames(
        listener,
        vec![
            r#"{"type":"update","data":{"id":"1","status":"Searching"}}"#,
            r#"{"type":"update","data":{"id":"1","status":"Completed","rating":"4.1"}}"#,
            r#"{"type":"complete"}"#,
        ],
    ));

    let sink = TestSink::new();
    run_status_channel(&url, &sink).await.expect("channel ok");
    server.await.expect("server task");

    let events = sink.take();
    assert_eq!(events.len(), 3);
    match (&events[0], &events[1]) {
        (EngineEvent::ItemUpdate(first), EngineEvent::ItemUpdate(second)) => {
            assert_eq!(first.id, "1");
            assert_eq!(first.status.as_deref(), Some("Searching"));
            assert_eq!(second.status.as_deref(), Some("Completed"));
            assert_eq!(second.rating.as_deref(), Some("4.1"));
        }
        other => panic!("unexpected events: {other:?}"),
    }
    assert_eq!(events[2], EngineEvent::JobComplete);
}

#[tokio::test]
async fn undecodable_frames_are_skipped_not_fatal() {
    let (listener, url) = local_listener().await;
    let server = tokio::spawn(serve_frames(
        listener,
        vec![
            "this is not json",
            r#"{"type":"heartbeat"}"#,
            r#"{"type":"update","data":{"id":"7","status":"Extracting"}}"#,
            r#"{"type":"complete"}"#,
        ],
    ));

    let sink = TestSink::new();
    run_status_channel(&url, &sink).await.expect("channel ok");
    server.await.expect("server task");

    let events = sink.take();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], EngineEvent::ItemUpdate(update) if update.id == "7"));
    assert_eq!(events[1], EngineEvent::JobComplete);
}

#[tokio::test]
async fn disconnect_without_complete_emits_channel_closed() {
    let (listener, url) = local_listener().await;
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake");
        ws.send(Message::text(
            r#"{"type":"update","data":{"id":"2","status":"Searching"}}"#,
        ))
        .await
        .expect("send frame");
        ws.close(None).await.expect("close");
    });

    let sink = TestSink::new();
    run_status_channel(&url, &sink).await.expect("channel ok");
    server.await.expect("server task");

    let events = sink.take();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], EngineEvent::ItemUpdate(update) if update.id == "2"));
    assert_eq!(events[1], EngineEvent::ChannelClosed);
}

#[tokio::test]
async fn refused_connection_is_a_connect_error() {
    // Bind then drop, so the port is very likely unoccupied.
    let (listener, url) = local_listener().await;
    drop(listener);

    let sink = TestSink::new();
    let err = run_status_channel(&url, &sink).await.unwrap_err();

    assert!(matches!(err, ChannelError::Connect(_)));
    assert_eq!(sink.take(), vec![EngineEvent::ChannelClosed]);
}

#[test]
fn update_frame_decodes_with_partial_fields() {
    let frame = decode_frame(r#"{"type":"update","data":{"id":"3","error":"timeout"}}"#)
        .expect("decodes");
    match frame {
        ChannelFrame::Update { data } => {
            assert_eq!(data.id, "3");
            assert_eq!(data.error.as_deref(), Some("timeout"));
            assert!(data.status.is_none());
            assert!(data.rating.is_none());
        }
        ChannelFrame::Complete => panic!("wrong frame kind"),
    }
}

#[test]
fn unknown_frame_type_is_a_decode_error() {
    let err = decode_frame(r#"{"type":"progress","data":{}}"#).unwrap_err();
    assert!(matches!(err, ChannelError::Decode(_)));
}
