use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::chat::server::ChatServer;
use crate::db::gigs as gig_db;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::gigs::GigStatus;
use crate::models::notifications::NotificationKind;
use crate::models::users::Roles;
use crate::notify;

#[derive(Debug, Serialize)]
pub struct PlatformStats {
    pub total_users: u64,
    pub total_gigs: u64,
    pub open_gigs: u64,
    pub in_progress_gigs: u64,
    pub completed_gigs: u64,
}

/// GET /api/admin/stats — platform-wide counters.
pub async fn platform_stats(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Roles::Admin, "view platform stats")?;

    let stats = PlatformStats {
        total_users: user_db::count_users(db.get_ref()).await?,
        total_gigs: gig_db::count_all(db.get_ref()).await?,
        open_gigs: gig_db::count_by_status(db.get_ref(), GigStatus::Open).await?,
        in_progress_gigs: gig_db::count_by_status(db.get_ref(), GigStatus::InProgress).await?,
        completed_gigs: gig_db::count_by_status(db.get_ref(), GigStatus::Completed).await?,
    };

    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/admin/payouts — gigs paid by the client and awaiting payout to
/// the freelancer, with the freelancer's name and payout address attached.
pub async fn pending_payouts(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Roles::Admin, "view pending payouts")?;

    let gigs = gig_db::get_pending_payouts(db.get_ref()).await?;

    let mut response = Vec::with_capacity(gigs.len());
    for gig in gigs {
        let freelancer = match gig.hired_freelancer {
            Some(id) => user_db::get_user_by_id(db.get_ref(), id).await?,
            None => None,
        };
        let (freelancer_username, payout_address) = match freelancer {
            Some(f) => (f.username, f.upi_id),
            None => ("Unknown User".to_string(), String::new()),
        };
        response.push(PendingPayout {
            gig,
            freelancer_username,
            payout_address,
        });
    }

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/admin/payouts/{id} — record that the freelancer has been paid.
/// `paid → paidout` is the terminal transition; a repeat is a 409.
pub async fn process_payout(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<Arc<ChatServer>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Roles::Admin, "process payouts")?;

    let gig_id = path.into_inner();

    let gig = gig_db::get_gig_by_id(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {gig_id} not found")))?;

    if !gig_db::transition_payout(db.get_ref(), gig_id).await? {
        return Err(ApiError::Conflict(
            "Gig is not awaiting payout; it may already be paid out.".into(),
        ));
    }

    tracing::info!(gig_id = %gig_id, "payout processed");

    if let Some(freelancer_id) = gig.hired_freelancer {
        notify::raise(
            db.get_ref(),
            hub.get_ref().as_ref(),
            freelancer_id,
            NotificationKind::Payment,
            format!("Your payout for \"{}\" has been processed.", gig.title),
            None,
        )
        .await?;
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Payout processed.",
    })))
}

/// GET /api/admin/users — every user record (payout addresses included, since
/// admins run the payout queue).
pub async fn all_users(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Roles::Admin, "list users")?;

    let users = user_db::get_all_users(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// DELETE /api/admin/users/{id} — remove a user account. Deliberately no
/// cascade: their gigs, proposals, and reviews remain, and reads resolve the
/// missing identity as "Unknown User".
pub async fn delete_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Roles::Admin, "delete users")?;

    let id = path.into_inner();

    if user_db::get_user_by_id(db.get_ref(), id).await?.is_none() {
        return Err(ApiError::NotFound(format!("User {id} not found")));
    }

    user_db::delete_user(db.get_ref(), id).await?;
    tracing::info!(user_id = %id, "user deleted by admin");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User deleted.",
    })))
}

/// GET /api/admin/gigs — every gig on the platform.
pub async fn all_gigs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Roles::Admin, "list gigs")?;

    let gigs = gig_db::get_all_gigs(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(gigs))
}

/// DELETE /api/admin/gigs/{id} — remove a gig regardless of status. Unlike
/// the owner's delete, proposals are left in place; the freelancer's applied
/// list flags them as orphaned.
pub async fn delete_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Roles::Admin, "delete gigs")?;

    let id = path.into_inner();

    if gig_db::get_gig_by_id(db.get_ref(), id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Gig {id} not found")));
    }

    gig_db::delete_gig(db.get_ref(), id).await?;
    tracing::info!(gig_id = %id, "gig deleted by admin");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Gig deleted.",
    })))
}

#[derive(Debug, Serialize)]
struct PendingPayout {
    #[serde(flatten)]
    gig: crate::models::gigs::Model,
    freelancer_username: String,
    payout_address: String,
}
