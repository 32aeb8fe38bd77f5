use sea_orm::*;
use uuid::Uuid;

use crate::models::notifications::{self, NotificationKind};

/// Persist a notification row. This is the authoritative record; any live
/// push on top of it is best-effort.
pub async fn insert_notification(
    db: &DatabaseConnection,
    user_id: Uuid,
    message: String,
    kind: NotificationKind,
    sender_id: Option<Uuid>,
) -> Result<notifications::Model, DbErr> {
    let new_notification = notifications::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        message: Set(message),
        kind: Set(kind),
        is_read: Set(false),
        sender_id: Set(sender_id),
        created_at: Set(chrono::Utc::now()),
    };

    new_notification.insert(db).await
}

/// A user's notifications, newest first.
pub async fn get_notifications_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<notifications::Model>, DbErr> {
    notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user_id))
        .order_by_desc(notifications::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch a single notification by ID.
pub async fn get_notification_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<notifications::Model>, DbErr> {
    notifications::Entity::find_by_id(id).one(db).await
}

/// Mark a notification as read.
pub async fn mark_as_read(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<notifications::Model, DbErr> {
    let notification = notifications::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Notification not found".to_string()))?;

    let mut active: notifications::ActiveModel = notification.into();
    active.is_read = Set(true);

    active.update(db).await
}
