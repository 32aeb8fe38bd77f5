use std::collections::HashMap;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::chat::protocol::ServerMessage;

/// A handle to send events to one connected WebSocket client.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub conn_id: Uuid,
    pub user_id: Uuid,
    pub sender: mpsc::UnboundedSender<ServerMessage>,
}

/// Owns all realtime state: per-gig chat rooms and the user → connection
/// presence map used to route notification pushes.
///
/// The presence map is ephemeral and non-authoritative. It tracks at most one
/// live connection per user: a reconnect overwrites the previous entry, and a
/// disconnect only removes the entry if it still points at the disconnecting
/// connection, so a stale disconnect cannot evict a newer connection. Nothing
/// outside this module reads or writes the map; lifecycle code only ever asks
/// for a notification push.
pub struct ChatServer {
    /// gig_id -> connected clients in that gig's chat room
    rooms: RwLock<HashMap<Uuid, Vec<ClientHandle>>>,
    /// user_id -> that user's single tracked live connection
    online: RwLock<HashMap<Uuid, ClientHandle>>,
}

impl ChatServer {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            online: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection and announce the user's presence, replacing
    /// any previous connection tracked for this user. Returns the connection
    /// id and the receiver the WebSocket session should drain.
    pub async fn connect(&self, user_id: Uuid) -> (Uuid, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn_id = Uuid::new_v4();

        let handle = ClientHandle {
            conn_id,
            user_id,
            sender: tx,
        };

        self.online.write().await.insert(user_id, handle);

        (conn_id, rx)
    }

    /// Tear down a connection: drop its room memberships, and drop its
    /// presence entry only if the user has not reconnected since.
    pub async fn disconnect(&self, user_id: Uuid, conn_id: Uuid) {
        {
            let mut online = self.online.write().await;
            if online.get(&user_id).is_some_and(|h| h.conn_id == conn_id) {
                online.remove(&user_id);
            }
        }

        let mut rooms = self.rooms.write().await;
        rooms.retain(|_, room| {
            room.retain(|c| c.conn_id != conn_id);
            !room.is_empty()
        });
    }

    /// Add the connection to a gig's chat room. No-op if the connection has
    /// already been replaced or is already in the room.
    pub async fn join_room(&self, gig_id: Uuid, user_id: Uuid, conn_id: Uuid) {
        let handle = {
            let online = self.online.read().await;
            match online.get(&user_id) {
                Some(h) if h.conn_id == conn_id => h.clone(),
                _ => return,
            }
        };

        let mut rooms = self.rooms.write().await;
        let room = rooms.entry(gig_id).or_default();
        if !room.iter().any(|c| c.conn_id == conn_id) {
            room.push(handle);
        }
    }

    /// Remove the connection from a gig's chat room.
    pub async fn leave_room(&self, gig_id: Uuid, conn_id: Uuid) {
        let mut rooms = self.rooms.write().await;
        if let Some(room) = rooms.get_mut(&gig_id) {
            room.retain(|c| c.conn_id != conn_id);
            if room.is_empty() {
                rooms.remove(&gig_id);
            }
        }
    }

    /// Broadcast an event to everyone in a gig's room, the sender included.
    /// Room membership is the only filter.
    pub async fn broadcast_to_room(&self, gig_id: Uuid, message: ServerMessage) {
        let rooms = self.rooms.read().await;
        if let Some(room) = rooms.get(&gig_id) {
            for client in room {
                // A failed send means the receiver is gone; disconnect cleanup
                // will remove the handle.
                let _ = client.sender.send(message.clone());
            }
        }
    }

    /// Push an event to a user's live connection, if they have one. Offline
    /// users simply miss the push; the persisted notification row remains.
    pub async fn notify_user(&self, user_id: Uuid, message: ServerMessage) {
        let online = self.online.read().await;
        if let Some(handle) = online.get(&user_id) {
            let _ = handle.sender.send(message);
        }
    }

    /// Whether a user currently has a tracked live connection.
    pub async fn is_online(&self, user_id: Uuid) -> bool {
        self.online.read().await.contains_key(&user_id)
    }
}

impl Default for ChatServer {
    fn default() -> Self {
        Self::new()
    }
}
