use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::notifications as notification_db;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::notifications::NotificationResponse;

/// GET /api/notifications — the caller's notifications, newest first, with
/// sender usernames resolved in one batch query. Deleted senders fall back to
/// "System".
pub async fn get_notifications(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let rows = notification_db::get_notifications_for_user(db.get_ref(), user.0.id).await?;

    let sender_ids: Vec<Uuid> = rows.iter().filter_map(|n| n.sender_id).collect();
    let usernames = user_db::get_usernames_by_ids(db.get_ref(), sender_ids).await?;

    let response: Vec<NotificationResponse> = rows
        .into_iter()
        .map(|n| {
            let sender = n.sender_id.and_then(|id| usernames.get(&id).cloned());
            NotificationResponse::from_model(n, sender)
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/notifications/{id}/read — mark one of the caller's own
/// notifications as read.
pub async fn mark_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let notification = notification_db::get_notification_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Notification {id} not found")))?;

    if notification.user_id != user.0.id {
        return Err(ApiError::Forbidden(
            "Not authorized to modify this notification.".into(),
        ));
    }

    notification_db::mark_as_read(db.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Notification marked as read.",
    })))
}
