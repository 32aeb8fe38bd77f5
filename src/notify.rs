use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

use crate::chat::protocol::ServerMessage;
use crate::chat::server::ChatServer;
use crate::db::notifications as notification_db;
use crate::models::notifications::{NotificationKind, NotificationResponse};

/// Persist a notification for `recipient` and, if they hold a live
/// connection, push it immediately. The row is the authoritative record; the
/// push is a latency optimization and its loss is harmless.
///
/// Lifecycle code calls this and nothing else on the realtime side, so it
/// never touches the presence map directly.
pub async fn raise(
    db: &DatabaseConnection,
    hub: &ChatServer,
    recipient: Uuid,
    kind: NotificationKind,
    message: String,
    sender: Option<(Uuid, &str)>,
) -> Result<(), DbErr> {
    let row = notification_db::insert_notification(
        db,
        recipient,
        message,
        kind,
        sender.map(|(id, _)| id),
    )
    .await?;

    let response =
        NotificationResponse::from_model(row, sender.map(|(_, username)| username.to_string()));

    hub.notify_user(
        recipient,
        ServerMessage::NotificationReceived {
            notification: response,
        },
    )
    .await;

    Ok(())
}
