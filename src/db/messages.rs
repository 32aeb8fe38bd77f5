use sea_orm::*;
use uuid::Uuid;

use crate::models::messages::{self, CreateMessage};

/// Insert a new chat message.
pub async fn insert_message(
    db: &DatabaseConnection,
    input: CreateMessage,
) -> Result<messages::Model, DbErr> {
    let new_message = messages::ActiveModel {
        id: Set(Uuid::new_v4()),
        gig_id: Set(input.gig_id),
        sender_id: Set(input.sender_id),
        recipient_id: Set(input.recipient_id),
        content: Set(input.content),
        created_at: Set(chrono::Utc::now()),
    };

    new_message.insert(db).await
}

/// Paginated history for one gig's conversation, newest first.
pub async fn get_messages_by_gig(
    db: &DatabaseConnection,
    gig_id: Uuid,
    page: u64,
    limit: u64,
) -> Result<Vec<messages::Model>, DbErr> {
    messages::Entity::find()
        .filter(messages::Column::GigId.eq(gig_id))
        .order_by_desc(messages::Column::CreatedAt)
        .order_by_desc(messages::Column::Id)
        .limit(limit)
        .offset(page.saturating_sub(1) * limit)
        .all(db)
        .await
}
