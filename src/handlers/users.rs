use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::users::{UpdateProfile, UserResponse};

/// GET /api/profile — own profile, with the payout address stripped.
pub async fn get_own_profile(user: AuthenticatedUser) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(UserResponse::from(user.0)))
}

/// PUT /api/profile — update own profile. Role is immutable; freelancer-only
/// fields (skills, description, portfolio, payout address) are ignored for
/// clients.
pub async fn update_own_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateProfile>,
) -> Result<HttpResponse, ApiError> {
    let updated = user_db::update_profile(db.get_ref(), user.0.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// GET /api/profile/{id} — anyone may view a public profile; the payout
/// address is never included.
pub async fn get_public_profile(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let user = user_db::get_user_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {id} not found")))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
