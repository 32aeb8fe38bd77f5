use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::gigs as gig_db;
use crate::db::messages as message_db;
use crate::error::ApiError;
use crate::models::messages::MessageQuery;

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 200;

/// GET /api/chat/{gig_id}/messages?page=&limit= — paginated history of a
/// gig's conversation, newest first. Only the gig owner and the hired
/// freelancer may read it.
pub async fn get_messages(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    query: web::Query<MessageQuery>,
) -> Result<HttpResponse, ApiError> {
    let gig_id = path.into_inner();

    let gig = gig_db::get_gig_by_id(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {gig_id} not found")))?;

    let is_party = user.0.id == gig.posted_by || gig.hired_freelancer == Some(user.0.id);
    if !is_party {
        return Err(ApiError::Forbidden(
            "Not authorized to view this conversation.".into(),
        ));
    }

    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let messages = message_db::get_messages_by_gig(db.get_ref(), gig_id, page, limit).await?;

    Ok(HttpResponse::Ok().json(messages))
}
