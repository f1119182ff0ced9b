/*
[INPUT]:  WebSocket test scenarios over a fake connector
[OUTPUT]: Test results for stream wrapper and wallet stream
[POS]:    Integration tests - WebSocket
[UPDATE]: When WebSocket client changes
*/

mod common;

use std::sync::{Arc, Mutex};

use common::{FakeConnector, RecordingTransport, TEST_API_KEY, fake_client};
use dritan_sdk::ws::{SocketCommand, SocketEvent, SocketFrame};
use dritan_sdk::{
    ClientConfig, CredentialPlacement, KnownDexStream, StreamOptions, StreamPayload, StreamState,
    WalletStreamEnvelope, WalletStreamOptions,
};
use serde_json::json;
use tokio::sync::mpsc;

fn client(placement: CredentialPlacement, connector: Arc<FakeConnector>) -> dritan_sdk::DritanClient {
    fake_client(
        ClientConfig::new(TEST_API_KEY)
            .with_ws_base_url("wss://stream.test")
            .with_credential_placement(placement),
        RecordingTransport::new(200, "{}"),
        connector,
    )
}

#[tokio::test]
async fn test_dex_stream_delivers_normalized_payloads() {
    let connector = FakeConnector::new();
    let client = client(CredentialPlacement::Header, connector.clone());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let stream = client
        .stream_dex(
            KnownDexStream::PumpAmm,
            StreamOptions::new().on_message(move |payload| {
                let _ = tx.send(payload);
            }),
        )
        .unwrap();
    assert_eq!(stream.name(), "pumpamm");

    let socket = connector.take_socket();
    assert_eq!(socket.request.url.as_str(), "wss://stream.test/pumpamm");
    assert_eq!(
        socket.request.headers,
        vec![("x-api-key".to_string(), TEST_API_KEY.to_string())]
    );

    socket.events.send(SocketEvent::Open).unwrap();
    socket
        .events
        .send(SocketEvent::Frame(SocketFrame::Text(r#"{"type":"ping"}"#.to_string())))
        .unwrap();
    socket
        .events
        .send(SocketEvent::Frame(SocketFrame::Text("hello".to_string())))
        .unwrap();

    assert_eq!(
        rx.recv().await,
        Some(StreamPayload::Json(json!({"type": "ping"})))
    );
    assert_eq!(rx.recv().await, Some(StreamPayload::Text("hello".to_string())));
}

#[tokio::test]
async fn test_query_placement_adds_api_key() {
    let connector = FakeConnector::new();
    let client = client(CredentialPlacement::Query, connector.clone());

    let _stream = client
        .stream_dex("custom-feed", StreamOptions::new().with_query("pool", "P1"))
        .unwrap();

    let socket = connector.take_socket();
    assert_eq!(
        socket.request.url.as_str(),
        format!("wss://stream.test/custom-feed?pool=P1&apiKey={TEST_API_KEY}")
    );
    assert!(socket.request.headers.is_empty());
}

#[tokio::test]
async fn test_wallet_stream_subscribes_on_open() {
    let connector = FakeConnector::new();
    let client = client(CredentialPlacement::Header, connector.clone());

    let opened = Arc::new(Mutex::new(false));
    let opened_flag = opened.clone();
    let options = WalletStreamOptions::new(["  W1  ", "", "W2"]).with_stream(
        StreamOptions::new().on_open(move || *opened_flag.lock().unwrap() = true),
    );
    let _wallets = client.stream_wallets(options).unwrap();

    let mut socket = connector.take_socket();
    assert_eq!(socket.request.url.path(), "/wallet-stream");

    socket.events.send(SocketEvent::Open).unwrap();
    let command = socket.commands.recv().await.unwrap();
    let SocketCommand::Text(text) = command else {
        panic!("expected text command, got {command:?}");
    };
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&text).unwrap(),
        json!({"method": "subscribeWallets", "wallets": ["W1", "W2"]})
    );
    assert!(*opened.lock().unwrap());
}

#[tokio::test]
async fn test_wallet_stream_without_wallets_sends_nothing_on_open() {
    let connector = FakeConnector::new();
    let client = client(CredentialPlacement::Header, connector.clone());

    let wallets = client
        .stream_wallets(WalletStreamOptions::new(["", "  "]))
        .unwrap();
    let mut socket = connector.take_socket();

    socket.events.send(SocketEvent::Open).unwrap();
    while wallets.state() != StreamState::Open {
        tokio::task::yield_now().await;
    }
    wallets.list_subscriptions();

    assert_eq!(
        socket.commands.recv().await,
        Some(SocketCommand::Text(r#"{"method":"listSubscriptions"}"#.to_string()))
    );
}

#[tokio::test]
async fn test_wallet_commands_before_open_are_dropped() {
    let connector = FakeConnector::new();
    let client = client(CredentialPlacement::Header, connector.clone());

    let wallets = client.stream_wallets(WalletStreamOptions::default()).unwrap();
    let mut socket = connector.take_socket();

    // swallowed, not an error
    wallets.subscribe_wallets(["W9"]);
    wallets.unsubscribe_wallets(vec!["W9".to_string()]);
    assert!(socket.commands.try_recv().is_err());
}

#[tokio::test]
async fn test_wallet_envelope_decode() {
    let connector = FakeConnector::new();
    let client = client(CredentialPlacement::Header, connector.clone());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let options = WalletStreamOptions::new(["W1"]).with_stream(StreamOptions::new().on_message(
        move |payload: StreamPayload| {
            let _ = tx.send(payload.decode::<WalletStreamEnvelope>());
        },
    ));
    let _wallets = client.stream_wallets(options).unwrap();
    let socket = connector.take_socket();

    socket.events.send(SocketEvent::Open).unwrap();
    socket
        .events
        .send(SocketEvent::Frame(SocketFrame::Binary(
            br#"{"type":"subscribed","wallets":["W1"],"subscriptionCount":1}"#.to_vec(),
        )))
        .unwrap();

    let envelope = rx.recv().await.unwrap().unwrap();
    assert_eq!(envelope.message_type, "subscribed");
    assert_eq!(envelope.subscription_count, Some(1));
}

#[tokio::test]
async fn test_close_twice_and_close_event() {
    let connector = FakeConnector::new();
    let client = client(CredentialPlacement::Header, connector.clone());

    let (close_tx, mut close_rx) = mpsc::unbounded_channel();
    let stream = client
        .stream_dex(
            "dbc",
            StreamOptions::new().on_close(move |info| {
                let _ = close_tx.send(info);
            }),
        )
        .unwrap();
    let mut socket = connector.take_socket();
    socket.events.send(SocketEvent::Open).unwrap();

    stream.close();
    stream.close();
    assert_eq!(socket.commands.recv().await, Some(SocketCommand::Close));

    socket.events.send(SocketEvent::Close(None)).unwrap();
    assert_eq!(close_rx.recv().await, Some(None));
    stream.close();
    stream.join().await;
}

#[tokio::test]
async fn test_errors_go_to_handler() {
    let connector = FakeConnector::new();
    let client = client(CredentialPlacement::Header, connector.clone());

    let (error_tx, mut error_rx) = mpsc::unbounded_channel();
    let stream = client
        .stream_dex(
            "orca",
            StreamOptions::new().on_error(move |err| {
                let _ = error_tx.send(err.to_string());
            }),
        )
        .unwrap();
    let socket = connector.take_socket();

    socket
        .events
        .send(SocketEvent::Error("connection reset".to_string()))
        .unwrap();
    socket.events.send(SocketEvent::Close(None)).unwrap();

    assert_eq!(
        error_rx.recv().await,
        Some("WebSocket error: connection reset".to_string())
    );
    stream.join().await;
}
