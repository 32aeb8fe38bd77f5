///! Tests for the realtime hub: presence tracking and room broadcast.
///!
///! These exercise `ChatServer` directly over its async API; no WebSocket
///! handshake or database is involved.
///!
///! Run with: `cargo test --test chat_server_test`
use uuid::Uuid;

use gigconnect_backend::chat::protocol::ServerMessage;
use gigconnect_backend::chat::server::ChatServer;

fn system_ping(text: &str) -> ServerMessage {
    ServerMessage::Error {
        message: text.to_string(),
    }
}

#[tokio::test]
async fn notify_reaches_a_connected_user() {
    let server = ChatServer::new();
    let user = Uuid::new_v4();

    let (_conn, mut rx) = server.connect(user).await;
    assert!(server.is_online(user).await);

    server.notify_user(user, system_ping("hello")).await;

    let msg = rx.recv().await.expect("push should arrive");
    assert!(matches!(msg, ServerMessage::Error { message } if message == "hello"));
}

#[tokio::test]
async fn notify_to_offline_user_is_dropped() {
    let server = ChatServer::new();
    let user = Uuid::new_v4();

    assert!(!server.is_online(user).await);
    // Must not panic or error; the persisted row is the durable record.
    server.notify_user(user, system_ping("nobody home")).await;
}

#[tokio::test]
async fn reconnect_overwrites_presence() {
    let server = ChatServer::new();
    let user = Uuid::new_v4();

    let (_old_conn, mut old_rx) = server.connect(user).await;
    let (_new_conn, mut new_rx) = server.connect(user).await;

    server.notify_user(user, system_ping("after reconnect")).await;

    // Only the newer connection receives the push.
    let msg = new_rx.recv().await.expect("newer connection gets the push");
    assert!(matches!(msg, ServerMessage::Error { message } if message == "after reconnect"));
    assert!(old_rx.try_recv().is_err());
}

#[tokio::test]
async fn stale_disconnect_does_not_evict_newer_connection() {
    let server = ChatServer::new();
    let user = Uuid::new_v4();

    let (old_conn, _old_rx) = server.connect(user).await;
    let (_new_conn, mut new_rx) = server.connect(user).await;

    // The old session's teardown arrives after the user already reconnected.
    server.disconnect(user, old_conn).await;

    assert!(server.is_online(user).await);
    server.notify_user(user, system_ping("still here")).await;
    assert!(new_rx.recv().await.is_some());
}

#[tokio::test]
async fn disconnect_removes_current_connection() {
    let server = ChatServer::new();
    let user = Uuid::new_v4();

    let (conn, _rx) = server.connect(user).await;
    server.disconnect(user, conn).await;

    assert!(!server.is_online(user).await);
}

#[tokio::test]
async fn room_broadcast_includes_the_sender() {
    let server = ChatServer::new();
    let gig = Uuid::new_v4();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let (alice_conn, mut alice_rx) = server.connect(alice).await;
    let (bob_conn, mut bob_rx) = server.connect(bob).await;

    server.join_room(gig, alice, alice_conn).await;
    server.join_room(gig, bob, bob_conn).await;

    server.broadcast_to_room(gig, system_ping("room msg")).await;

    assert!(alice_rx.recv().await.is_some());
    assert!(bob_rx.recv().await.is_some());
}

#[tokio::test]
async fn leaving_a_room_stops_delivery() {
    let server = ChatServer::new();
    let gig = Uuid::new_v4();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let (alice_conn, mut alice_rx) = server.connect(alice).await;
    let (bob_conn, mut bob_rx) = server.connect(bob).await;

    server.join_room(gig, alice, alice_conn).await;
    server.join_room(gig, bob, bob_conn).await;
    server.leave_room(gig, bob_conn).await;

    server.broadcast_to_room(gig, system_ping("after leave")).await;

    assert!(alice_rx.recv().await.is_some());
    assert!(bob_rx.try_recv().is_err());
}

#[tokio::test]
async fn join_with_stale_connection_is_ignored() {
    let server = ChatServer::new();
    let gig = Uuid::new_v4();
    let user = Uuid::new_v4();

    let (old_conn, _old_rx) = server.connect(user).await;
    let (_new_conn, mut new_rx) = server.connect(user).await;

    // The old session tries to join after being replaced.
    server.join_room(gig, user, old_conn).await;

    server.broadcast_to_room(gig, system_ping("to the room")).await;
    assert!(new_rx.try_recv().is_err());
}

#[tokio::test]
async fn disconnect_purges_room_membership() {
    let server = ChatServer::new();
    let gig = Uuid::new_v4();
    let user = Uuid::new_v4();

    let (conn, mut rx) = server.connect(user).await;
    server.join_room(gig, user, conn).await;
    server.disconnect(user, conn).await;

    server.broadcast_to_room(gig, system_ping("gone")).await;
    assert!(rx.try_recv().is_err());
}
