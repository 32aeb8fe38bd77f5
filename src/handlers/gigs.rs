use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::gigs as gig_db;
use crate::db::proposals as proposal_db;
use crate::db::reviews as review_db;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::gigs::{
    BrowseGigsQuery, CheckoutDetails, ClientStats, CreateGig, FreelancerStats, GigStatus,
    GigWithReviewStatus,
};
use crate::models::users::Roles;

/// POST /api/gigs — a client posts a new gig (status starts at `open`).
pub async fn create_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateGig>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Roles::Client, "post gigs")?;

    let input = body.into_inner();
    input.validate()?;

    let gig = gig_db::insert_gig(db.get_ref(), input, user.0.id).await?;
    Ok(HttpResponse::Created().json(gig))
}

/// GET /api/gigs/all — browse open gigs with optional skill/location/budget
/// filters. Public: freelancers browse before logging in.
pub async fn browse_gigs(
    db: web::Data<DatabaseConnection>,
    query: web::Query<BrowseGigsQuery>,
) -> Result<HttpResponse, ApiError> {
    let gigs = gig_db::browse_open_gigs(db.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(gigs))
}

/// GET /api/gigs/{id} — gig details. Public.
pub async fn get_gig(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let gig = gig_db::get_gig_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {id} not found")))?;

    Ok(HttpResponse::Ok().json(gig))
}

/// DELETE /api/gigs/{id} — the owner deletes a gig that is still `open`.
/// The delete is conditional on the status, so it cannot race an in-flight
/// accept; proposals are removed with it.
pub async fn delete_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let gig_id = path.into_inner();

    let gig = gig_db::get_gig_by_id(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {gig_id} not found")))?;

    if gig.posted_by != user.0.id {
        return Err(ApiError::Forbidden(
            "Not authorized to delete this gig.".into(),
        ));
    }

    if !gig_db::delete_open_gig(db.get_ref(), gig_id).await? {
        return Err(ApiError::Conflict(
            "Cannot delete a gig that is in progress or has been completed.".into(),
        ));
    }

    proposal_db::delete_by_gig(db.get_ref(), gig_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Gig and all associated proposals deleted successfully.",
    })))
}

/// GET /api/gigs/mygigs — a client's own gigs, each flagged with whether the
/// client has already reviewed it.
pub async fn my_gigs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Roles::Client, "view their posted gigs")?;

    let gigs = gig_db::get_gigs_by_owner(db.get_ref(), user.0.id).await?;

    let gig_ids: Vec<Uuid> = gigs.iter().map(|g| g.id).collect();
    let reviewed = review_db::reviewed_gig_ids(db.get_ref(), gig_ids, user.0.id).await?;

    let response: Vec<GigWithReviewStatus> = gigs
        .into_iter()
        .map(|gig| {
            let has_been_reviewed = reviewed.contains(&gig.id);
            GigWithReviewStatus {
                gig,
                has_been_reviewed,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/gigs/hired-freelancers — a client's in-progress gigs with the
/// hired freelancer's name. Deleted freelancers render as "Unknown User".
pub async fn hired_freelancers(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Roles::Client, "view hired freelancers")?;

    let gigs = gig_db::get_in_progress_by_owner(db.get_ref(), user.0.id).await?;

    let freelancer_ids: Vec<Uuid> = gigs.iter().filter_map(|g| g.hired_freelancer).collect();
    let mut usernames = user_db::get_usernames_by_ids(db.get_ref(), freelancer_ids).await?;

    let response: Vec<HiredGig> = gigs
        .into_iter()
        .map(|gig| {
            let freelancer_username = gig
                .hired_freelancer
                .and_then(|id| usernames.remove(&id))
                .unwrap_or_else(|| "Unknown User".to_string());
            HiredGig {
                gig,
                freelancer_username,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/gigs/client/stats — dashboard counters for a client.
pub async fn client_stats(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.0.id;

    let completed = gig_db::count_by_owner_and_statuses(
        db.get_ref(),
        user_id,
        &[GigStatus::Completed, GigStatus::Paid, GigStatus::Paidout],
    )
    .await?;
    let in_progress =
        gig_db::count_by_owner_and_statuses(db.get_ref(), user_id, &[GigStatus::InProgress])
            .await?;
    let active =
        gig_db::count_by_owner_and_statuses(db.get_ref(), user_id, &[GigStatus::Open]).await?;

    Ok(HttpResponse::Ok().json(ClientStats {
        completed,
        in_progress,
        active,
    }))
}

/// GET /api/gigs/freelancer/stats — dashboard counters and earnings for a
/// freelancer.
pub async fn freelancer_stats(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.0.id;

    let completed = gig_db::count_by_freelancer_and_statuses(
        db.get_ref(),
        user_id,
        &[GigStatus::Completed, GigStatus::Paid, GigStatus::Paidout],
    )
    .await?;
    let in_progress =
        gig_db::count_by_freelancer_and_statuses(db.get_ref(), user_id, &[GigStatus::InProgress])
            .await?;
    let earnings = gig_db::earnings_for_freelancer(db.get_ref(), user_id).await?;

    Ok(HttpResponse::Ok().json(FreelancerStats {
        completed,
        in_progress,
        earnings,
    }))
}

/// PUT /api/gigs/{id}/complete — the owner marks an in-progress gig as done.
/// One conditional update: a gig that is not `in progress` is left untouched.
pub async fn complete_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let gig_id = path.into_inner();

    let gig = gig_db::get_gig_by_id(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {gig_id} not found")))?;

    if gig.posted_by != user.0.id {
        return Err(ApiError::Forbidden(
            "Not authorized to complete this gig.".into(),
        ));
    }

    if !gig_db::transition_complete(db.get_ref(), gig_id).await? {
        return Err(ApiError::Conflict("Gig is not in progress.".into()));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Gig marked as completed.",
    })))
}

/// GET /api/gigs/{id}/checkout-details — what the owner is about to pay, and
/// to whom. Only the owner may see it.
pub async fn checkout_details(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let gig_id = path.into_inner();

    let gig = gig_db::get_gig_by_id(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {gig_id} not found")))?;

    if gig.posted_by != user.0.id {
        return Err(ApiError::Forbidden(
            "Not authorized to view these details.".into(),
        ));
    }

    let freelancer_name = match gig.hired_freelancer {
        Some(freelancer_id) => user_db::get_user_by_id(db.get_ref(), freelancer_id)
            .await?
            .map(|u| u.username)
            .unwrap_or_else(|| "Unknown User".to_string()),
        None => "N/A".to_string(),
    };

    let bid_amount = gig.final_amount.unwrap_or(gig.budget);

    Ok(HttpResponse::Ok().json(CheckoutDetails {
        gig,
        freelancer_name,
        bid_amount,
    }))
}

// ── Response DTOs local to these handlers ──

#[derive(Debug, Clone, serde::Serialize)]
struct HiredGig {
    #[serde(flatten)]
    gig: crate::models::gigs::Model,
    freelancer_username: String,
}
