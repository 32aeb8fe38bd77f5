use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::notifications::NotificationResponse;

// ── Client -> Server events ──

/// Events the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Join a gig's chat room.
    #[serde(rename_all = "camelCase")]
    JoinRoom { gig: Uuid },
    /// Leave a gig's chat room.
    #[serde(rename_all = "camelCase")]
    LeaveRoom { gig: Uuid },
    /// Send a chat message into a gig's room.
    #[serde(rename_all = "camelCase")]
    SendMessage {
        recipient: Uuid,
        gig: Uuid,
        content: String,
    },
}

// ── Server -> Client events ──

/// Events the server pushes to connected clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// A chat message in a room the client joined. The sender receives its
    /// own message back, with the server-assigned id and timestamp.
    #[serde(rename_all = "camelCase")]
    MessageReceived {
        id: Uuid,
        gig: Uuid,
        sender: Uuid,
        recipient: Uuid,
        content: String,
        created_at: String,
    },
    /// Best-effort live delivery of a freshly persisted notification.
    #[serde(rename_all = "camelCase")]
    NotificationReceived { notification: NotificationResponse },
    /// An error occurred while handling a client event.
    #[serde(rename_all = "camelCase")]
    Error { message: String },
}
