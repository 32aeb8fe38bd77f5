use actix_web::FromRequest;
use actix_web::{HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::users::{self, Roles};

/// Wrapper type to store the JWT secret in Actix app data.
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// Extractor that authenticates the request and loads the caller's user row.
///
/// Role checks read the stored row, not the token, since the role of record
/// is immutable on the user and the token is merely a credential.
pub struct AuthenticatedUser(pub users::Model);

impl AuthenticatedUser {
    pub fn require_role(&self, role: Roles, action: &str) -> Result<(), ApiError> {
        if self.0.role == role {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!(
                "only {} accounts can {action}",
                match role {
                    Roles::Client => "client",
                    Roles::Freelancer => "freelancer",
                    Roles::Admin => "admin",
                }
            )))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?;

            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                ApiError::Unauthorized("Authorization header must be: Bearer <token>".into())
            })?;

            // 2. Validate the JWT.
            let secret = req
                .app_data::<web::Data<JwtSecret>>()
                .ok_or_else(|| ApiError::Unauthorized("JWT secret not configured".into()))?;

            let claims = jwt::validate_token(token, &secret.0)?;
            let user_id = claims.user_id()?;

            // 3. Load the user row behind the token.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| ApiError::Unauthorized("database not configured".into()))?;

            let user = user_db::get_user_by_id(db.get_ref(), user_id)
                .await?
                .ok_or_else(|| ApiError::Unauthorized("user no longer exists".into()))?;

            Ok(AuthenticatedUser(user))
        })
    }
}
