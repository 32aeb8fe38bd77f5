use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Notification category stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[sea_orm(string_value = "proposal")]
    Proposal,
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "system")]
    System,
}

/// SeaORM entity for the `notifications` table.
///
/// The persisted row is the authoritative record; the WebSocket push is a
/// best-effort latency optimization on top of it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub sender_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Recipient,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Wire shape for a notification, both over REST and the WebSocket push.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    /// Sender's username, or "System" when there is no sender.
    pub sender: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl NotificationResponse {
    pub fn from_model(n: Model, sender_username: Option<String>) -> Self {
        Self {
            id: n.id,
            message: n.message,
            kind: n.kind,
            is_read: n.is_read,
            sender: sender_username.unwrap_or_else(|| "System".to_string()),
            created_at: n.created_at,
        }
    }
}
