//! End-to-end routing over a live WebSocket connection.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use socket_event_router::api;
use socket_event_router::app_state::AppState;
use socket_event_router::domain::{BusPayload, DispatchMode, EventBus};
use socket_event_router::ws::EventRouter;
use socket_event_router::ws::handler::ws_handler;
use socket_event_router::ws::messages::OutboundMessage;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server(bus: EventBus, mode: DispatchMode) -> SocketAddr {
    let state = AppState::new(EventRouter::new(bus, mode));
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .with_state(state);

    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let Ok((client, _)) = connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws connect failed");
    };
    client
}

async fn send(client: &mut Client, frame: &str) {
    if client.send(Message::text(frame)).await.is_err() {
        panic!("ws send failed");
    }
}

async fn next_json(client: &mut Client) -> Value {
    let Ok(Some(Ok(Message::Text(text)))) =
        tokio::time::timeout(Duration::from_secs(2), client.next()).await
    else {
        panic!("expected a text frame");
    };
    let Ok(value) = serde_json::from_str(text.as_str()) else {
        panic!("frame was not json");
    };
    value
}

/// Waits for a listener to show up on `name`; the connection loop handles
/// frames asynchronously from the test's point of view.
async fn wait_for_listener(bus: &EventBus, name: &str) {
    for _ in 0..200 {
        if bus.has_listeners(name) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("no listener registered on {name}");
}

#[tokio::test]
async fn data_request_is_answered_once() {
    let bus = EventBus::new();
    let addr = spawn_server(bus.clone(), DispatchMode::Both).await;
    let mut client = connect(addr).await;

    send(&mut client, r#"{ "event": "data:get:test" }"#).await;
    wait_for_listener(&bus, "data:set:test").await;

    bus.emit("data:set:test", Some(BusPayload::Data(json!({ "name": "daniel" }))));
    bus.emit("data:set:test", Some(BusPayload::Data(json!("ignored"))));

    let frame = next_json(&mut client).await;
    assert_eq!(
        frame,
        json!({ "event": "data:set:test", "data": "{\"name\":\"daniel\"}" })
    );

    let silent = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    assert!(silent.is_err(), "one-shot listener fired twice");
}

#[tokio::test]
async fn passthrough_subscriber_can_reply_on_socket() {
    let bus = EventBus::new();
    let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
    bus.on("chat:message", move |payload| {
        if let Some(BusPayload::Passthrough(p)) = payload {
            let _ = seen_tx.send(p.message.clone());
            let _ = p.socket.send(OutboundMessage {
                event: "chat:ack".to_string(),
                data: "true".to_string(),
            });
        }
    });
    let addr = spawn_server(bus.clone(), DispatchMode::PassthroughOnly).await;
    let mut client = connect(addr).await;

    send(
        &mut client,
        r#"{ "event": "chat:message", "payload": { "text": "hi" } }"#,
    )
    .await;

    let Ok(Some(message)) = tokio::time::timeout(Duration::from_secs(2), seen_rx.recv()).await
    else {
        panic!("passthrough not delivered");
    };
    assert_eq!(message.payload, Some(json!({ "text": "hi" })));

    let frame = next_json(&mut client).await;
    assert_eq!(frame, json!({ "event": "chat:ack", "data": "true" }));
}

#[tokio::test]
async fn malformed_frame_keeps_connection_open() {
    let bus = EventBus::new();
    let addr = spawn_server(bus.clone(), DispatchMode::DataOnly).await;
    let mut client = connect(addr).await;

    send(&mut client, "{ not json").await;
    send(&mut client, r#"{ "event": "data:get:after" }"#).await;
    wait_for_listener(&bus, "data:set:after").await;

    bus.emit("data:set:after", Some(BusPayload::Data(json!(1))));
    let frame = next_json(&mut client).await;
    assert_eq!(frame, json!({ "event": "data:set:after", "data": "1" }));
}

#[tokio::test]
async fn two_sockets_do_not_cross_talk() {
    let bus = EventBus::new();
    let addr = spawn_server(bus.clone(), DispatchMode::Both).await;
    let mut first = connect(addr).await;
    let mut second = connect(addr).await;

    send(&mut first, r#"{ "event": "a:get:x" }"#).await;
    wait_for_listener(&bus, "a:set:x").await;
    send(&mut second, r#"{ "event": "b:get:x" }"#).await;
    wait_for_listener(&bus, "b:set:x").await;

    bus.emit("b:set:x", Some(BusPayload::Data(json!("for-second"))));
    bus.emit("a:set:x", Some(BusPayload::Data(json!("for-first"))));

    assert_eq!(next_json(&mut first).await["data"], json!("\"for-first\""));
    assert_eq!(next_json(&mut second).await["data"], json!("\"for-second\""));
}
