use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::gigs as gig_db;
use crate::db::reviews as review_db;
use crate::error::ApiError;
use crate::models::gigs;
use crate::models::reviews::CreateReview;

/// POST /api/gigs/{id}/review — either party of a finished gig reviews the
/// other. The gate: the gig must be past `in progress`, the caller must be
/// the owner or the hired freelancer, and each party reviews at most once.
pub async fn submit_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CreateReview>,
) -> Result<HttpResponse, ApiError> {
    let gig_id = path.into_inner();
    let input = body.into_inner();
    input.validate()?;

    let gig = gig_db::get_gig_by_id(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {gig_id} not found")))?;

    let already_reviewed =
        review_db::exists_for_gig_and_reviewer(db.get_ref(), gig_id, user.0.id).await?;
    let freelancer_id = review_gate(&gig, user.0.id, already_reviewed)?;

    let review = review_db::insert_review(
        db.get_ref(),
        gig_id,
        gig.posted_by,
        freelancer_id,
        user.0.id,
        input.rating,
        input.comment,
    )
    .await?;

    // Flag the gig so the owner's listing can show "reviewed" without a join.
    if user.0.id == gig.posted_by {
        gig_db::mark_reviewed(db.get_ref(), gig_id).await?;
    }

    Ok(HttpResponse::Created().json(review))
}

/// GET /api/gigs/freelancer/{id}/reviews — a freelancer's public review feed.
pub async fn freelancer_reviews(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let freelancer_id = path.into_inner();
    let reviews = review_db::get_reviews_for_freelancer(db.get_ref(), freelancer_id).await?;

    Ok(HttpResponse::Ok().json(reviews))
}

/// Every precondition of a review, checked before any store mutation:
/// finished gig, a hired freelancer on record, reviewer is one of the two
/// parties, and no repeat review by the same party. Returns the hired
/// freelancer's id for the review row.
fn review_gate(
    gig: &gigs::Model,
    reviewer_id: Uuid,
    already_reviewed: bool,
) -> Result<Uuid, ApiError> {
    if !gig.status.is_reviewable() {
        return Err(ApiError::Conflict(
            "Gig must be completed before it can be reviewed.".into(),
        ));
    }

    let freelancer_id = gig
        .hired_freelancer
        .ok_or_else(|| ApiError::Conflict("Gig has no hired freelancer to review.".into()))?;

    if reviewer_id != gig.posted_by && reviewer_id != freelancer_id {
        return Err(ApiError::Forbidden(
            "Only the client or the hired freelancer can review this gig.".into(),
        ));
    }

    if already_reviewed {
        return Err(ApiError::Conflict(
            "You have already reviewed this gig.".into(),
        ));
    }

    Ok(freelancer_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::gigs::GigStatus;
    use crate::models::users::SkillList;

    fn finished_gig(owner: Uuid, freelancer: Uuid, status: GigStatus) -> gigs::Model {
        gigs::Model {
            id: Uuid::new_v4(),
            title: "Build a site".into(),
            description: "A marketing site".into(),
            budget: 500.0,
            duration: "2 weeks".into(),
            skills: SkillList(vec!["react".into()]),
            location: "Remote".into(),
            posted_by: owner,
            hired_freelancer: Some(freelancer),
            status,
            final_amount: Some(450.0),
            payout_processed: false,
            has_been_reviewed: false,
            posted_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn review_gate_rejects_unfinished_gigs() {
        let owner = Uuid::new_v4();
        let freelancer = Uuid::new_v4();

        for status in [GigStatus::Open, GigStatus::InProgress] {
            let gig = finished_gig(owner, freelancer, status);
            let result = review_gate(&gig, owner, false);
            assert!(matches!(result, Err(ApiError::Conflict(_))));
        }
    }

    #[test]
    fn review_gate_rejects_outsiders() {
        let gig = finished_gig(Uuid::new_v4(), Uuid::new_v4(), GigStatus::Completed);

        let result = review_gate(&gig, Uuid::new_v4(), false);
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn review_gate_rejects_repeat_reviews() {
        let owner = Uuid::new_v4();
        let gig = finished_gig(owner, Uuid::new_v4(), GigStatus::Paid);

        let result = review_gate(&gig, owner, true);
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[test]
    fn review_gate_rejects_a_gig_without_a_freelancer() {
        let owner = Uuid::new_v4();
        let mut gig = finished_gig(owner, Uuid::new_v4(), GigStatus::Completed);
        gig.hired_freelancer = None;

        let result = review_gate(&gig, owner, false);
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[test]
    fn review_gate_admits_both_parties_once_finished() {
        let owner = Uuid::new_v4();
        let freelancer = Uuid::new_v4();

        for status in [GigStatus::Completed, GigStatus::Paid, GigStatus::Paidout] {
            let gig = finished_gig(owner, freelancer, status);
            assert_eq!(review_gate(&gig, owner, false).unwrap(), freelancer);
            assert_eq!(review_gate(&gig, freelancer, false).unwrap(), freelancer);
        }
    }
}
