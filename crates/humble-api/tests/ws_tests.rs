//! Integration tests for the `WebSocket` push channel.
//!
//! These bind a real listener on an ephemeral port, serve the router on
//! a background task, and connect with a `tokio-tungstenite` client.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt as _, StreamExt as _};
use humble_api::router::build_router;
use humble_api::server::serve_listener;
use humble_api::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

type Client = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn spawn_server(state: Arc<AppState>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_router(state);
    tokio::spawn(serve_listener(listener, router, std::future::pending()));
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/superheroes/ws"))
        .await
        .unwrap();
    client
}

async fn next_json(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

fn hero(name: &str, superpower: &str, score: u8) -> Value {
    json!({ "name": name, "superpower": superpower, "humilityScore": score })
}

#[tokio::test]
async fn test_late_joiner_receives_sorted_init_only() {
    let state = Arc::new(AppState::default());
    state.roster.create(&hero("Batman", "Detective Skills", 2)).await.unwrap();
    state.roster.create(&hero("Captain Humble", "Invisibility", 9)).await.unwrap();
    let addr = spawn_server(Arc::clone(&state)).await;

    let mut client = connect(addr).await;

    let init = next_json(&mut client).await;
    assert_eq!(init["type"], "init");
    assert_eq!(
        init["superheroes"],
        json!([
            hero("Captain Humble", "Invisibility", 9),
            hero("Batman", "Detective Skills", 2),
        ])
    );

    // The next message must be the new change, not a replay of the two above.
    state.roster.create(&hero("Flash", "Speed", 5)).await.unwrap();
    let created = next_json(&mut client).await;
    assert_eq!(created, json!({ "type": "created", "superhero": hero("Flash", "Speed", 5) }));
}

#[tokio::test]
async fn test_events_arrive_in_mutation_order() {
    let state = Arc::new(AppState::default());
    let addr = spawn_server(Arc::clone(&state)).await;

    let mut first = connect(addr).await;
    let mut second = connect(addr).await;
    assert_eq!(next_json(&mut first).await["type"], "init");
    assert_eq!(next_json(&mut second).await["type"], "init");

    state.roster.create(&hero("A", "p", 3)).await.unwrap();
    state.roster.patch("A", &json!({ "humilityScore": 7 })).await.unwrap();
    state.roster.remove("A").await.unwrap();

    for client in [&mut first, &mut second] {
        let kinds = [
            next_json(client).await["type"].clone(),
            next_json(client).await["type"].clone(),
            next_json(client).await["type"].clone(),
        ];
        assert_eq!(kinds, [json!("created"), json!("updated"), json!("removed")]);
    }
}

#[tokio::test]
async fn test_disconnect_leaves_session_set() {
    let state = Arc::new(AppState::default());
    let addr = spawn_server(Arc::clone(&state)).await;

    let mut client = connect(addr).await;
    assert_eq!(next_json(&mut client).await["type"], "init");
    assert_eq!(state.roster.stats().await.sessions, 1);

    client.close(None).await.unwrap();

    let mut sessions = 1;
    for _ in 0..50 {
        sessions = state.roster.stats().await.sessions;
        if sessions == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(sessions, 0);

    // Publishing with nobody connected is fine.
    assert!(state.roster.create(&hero("A", "p", 3)).await.is_ok());
}

#[tokio::test]
async fn test_client_messages_are_ignored() {
    let state = Arc::new(AppState::default());
    let addr = spawn_server(Arc::clone(&state)).await;

    let mut client = connect(addr).await;
    assert_eq!(next_json(&mut client).await["type"], "init");

    client
        .send(Message::Text(String::from("{\"type\":\"create\"}")))
        .await
        .unwrap();

    state.roster.create(&hero("A", "p", 3)).await.unwrap();
    assert_eq!(next_json(&mut client).await["type"], "created");
    assert_eq!(state.roster.list().await.len(), 1);
}
