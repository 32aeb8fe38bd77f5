use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use futures_util::StreamExt;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::jwt;
use crate::auth::middleware::JwtSecret;
use crate::chat::protocol::{ClientMessage, ServerMessage};
use crate::chat::server::ChatServer;
use crate::db::messages as message_db;
use crate::error::ApiError;
use crate::models::messages::CreateMessage;

/// Query params for the WebSocket handshake endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    pub token: String,
}

/// GET /api/chat/ws?token=<jwt>
///
/// Upgrades the HTTP connection to a WebSocket. Authenticates via a query
/// param token because browsers cannot send Authorization headers during the
/// handshake. Presence is announced from the token's user id; the client then
/// joins per-gig rooms over the socket.
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<WsQuery>,
    db: web::Data<DatabaseConnection>,
    secret: web::Data<JwtSecret>,
    chat_server: web::Data<Arc<ChatServer>>,
) -> Result<HttpResponse, ApiError> {
    let claims = jwt::validate_token(&query.token, &secret.0)?;
    let user_id = claims.user_id()?;

    let (response, session, msg_stream) = actix_ws::handle(&req, stream)
        .map_err(|e| ApiError::Validation(format!("websocket handshake failed: {e}")))?;

    let (conn_id, rx) = chat_server.connect(user_id).await;

    let db_clone = db.get_ref().clone();
    let chat_server_clone = chat_server.get_ref().clone();

    actix_web::rt::spawn(handle_ws_session(
        session,
        msg_stream,
        rx,
        user_id,
        conn_id,
        db_clone,
        chat_server_clone,
    ));

    Ok(response)
}

/// Drives the WebSocket session: reads incoming events from the client, sends
/// outgoing events from the chat server, and cleans up on disconnect.
async fn handle_ws_session(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    user_id: Uuid,
    conn_id: Uuid,
    db: DatabaseConnection,
    chat_server: Arc<ChatServer>,
) {
    loop {
        tokio::select! {
            // Incoming event from the WebSocket client.
            Some(msg) = msg_stream.next() => {
                match msg {
                    Ok(Message::Text(text)) => {
                        handle_client_message(
                            &text,
                            &mut session,
                            user_id,
                            conn_id,
                            &db,
                            &chat_server,
                        )
                        .await;
                    }
                    Ok(Message::Ping(bytes)) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        break;
                    }
                    Err(_) => {
                        break;
                    }
                    _ => {}
                }
            }
            // Outgoing event from the chat server to this client.
            Some(server_msg) = rx.recv() => {
                let json = match serde_json::to_string(&server_msg) {
                    Ok(j) => j,
                    Err(_) => continue,
                };
                if session.text(json).await.is_err() {
                    break;
                }
            }
            // Both channels closed — exit.
            else => break,
        }
    }

    chat_server.disconnect(user_id, conn_id).await;
    let _ = session.close(None).await;
}

async fn send_error(session: &mut actix_ws::Session, message: String) {
    let err = ServerMessage::Error { message };
    let _ = session
        .text(serde_json::to_string(&err).unwrap_or_default())
        .await;
}

/// Parse and handle an incoming client event.
async fn handle_client_message(
    text: &str,
    session: &mut actix_ws::Session,
    user_id: Uuid,
    conn_id: Uuid,
    db: &DatabaseConnection,
    chat_server: &ChatServer,
) {
    let client_msg: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            send_error(session, format!("Invalid message format: {e}")).await;
            return;
        }
    };

    match client_msg {
        ClientMessage::JoinRoom { gig } => {
            chat_server.join_room(gig, user_id, conn_id).await;
        }

        ClientMessage::LeaveRoom { gig } => {
            chat_server.leave_room(gig, conn_id).await;
        }

        ClientMessage::SendMessage {
            recipient,
            gig,
            content,
        } => {
            if content.trim().is_empty() {
                send_error(session, "Message content cannot be empty".to_string()).await;
                return;
            }

            // Persist first; the broadcast carries the stored id and timestamp.
            let input = CreateMessage {
                gig_id: gig,
                sender_id: user_id,
                recipient_id: recipient,
                content,
            };

            match message_db::insert_message(db, input).await {
                Ok(saved) => {
                    let msg = ServerMessage::MessageReceived {
                        id: saved.id,
                        gig: saved.gig_id,
                        sender: saved.sender_id,
                        recipient: saved.recipient_id,
                        content: saved.content,
                        created_at: saved.created_at.to_rfc3339(),
                    };

                    // Everyone in the room gets it, the sender included.
                    chat_server.broadcast_to_room(gig, msg).await;
                }
                Err(e) => {
                    send_error(session, format!("Failed to save message: {e}")).await;
                }
            }
        }
    }
}
