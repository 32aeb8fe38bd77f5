use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::users::RegisterUser;

/// POST /api/auth/register — create a user record after the external identity
/// provider has verified the account. The provider-issued `uid` ties the two
/// together. Role is fixed here, once, for the lifetime of the account.
pub async fn register(
    db: web::Data<DatabaseConnection>,
    body: web::Json<RegisterUser>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    if user_db::get_user_by_email(db.get_ref(), &input.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("User already exists.".into()));
    }
    if user_db::get_user_by_username(db.get_ref(), &input.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username is already taken.".into()));
    }

    let user = user_db::insert_user(db.get_ref(), input).await?;
    tracing::info!(user_id = %user.id, "registered new {:?} account", user.role);

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "User registered successfully.",
        "id": user.id,
    })))
}

/// GET /api/auth/me — the authenticated user's own record, payout address
/// included (this backs the owner's dashboard).
pub async fn me(user: AuthenticatedUser) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(user.0))
}
