use sea_orm::*;
use uuid::Uuid;

use crate::models::reviews::{self, ReviewWithClient};

/// Insert a review. The client/freelancer references are copied from the gig
/// by the caller so the review survives later gig mutation or deletion.
pub async fn insert_review(
    db: &DatabaseConnection,
    gig_id: Uuid,
    client_id: Uuid,
    freelancer_id: Uuid,
    reviewer_id: Uuid,
    rating: i32,
    comment: String,
) -> Result<reviews::Model, DbErr> {
    let new_review = reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        gig_id: Set(gig_id),
        client_id: Set(client_id),
        freelancer_id: Set(freelancer_id),
        reviewer_id: Set(reviewer_id),
        rating: Set(rating),
        comment: Set(comment),
        created_at: Set(chrono::Utc::now()),
    };

    new_review.insert(db).await
}

/// Whether this reviewer already reviewed this gig.
pub async fn exists_for_gig_and_reviewer(
    db: &DatabaseConnection,
    gig_id: Uuid,
    reviewer_id: Uuid,
) -> Result<bool, DbErr> {
    let count = reviews::Entity::find()
        .filter(reviews::Column::GigId.eq(gig_id))
        .filter(reviews::Column::ReviewerId.eq(reviewer_id))
        .count(db)
        .await?;

    Ok(count > 0)
}

/// Gig ids among `gig_ids` that this reviewer has already reviewed.
pub async fn reviewed_gig_ids(
    db: &DatabaseConnection,
    gig_ids: Vec<Uuid>,
    reviewer_id: Uuid,
) -> Result<Vec<Uuid>, DbErr> {
    if gig_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = reviews::Entity::find()
        .filter(reviews::Column::GigId.is_in(gig_ids))
        .filter(reviews::Column::ReviewerId.eq(reviewer_id))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|r| r.gig_id).collect())
}

/// Public review feed for a freelancer, newest first, with the reviewing
/// client's username resolved (deleted clients show up as None).
pub async fn get_reviews_for_freelancer(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
) -> Result<Vec<ReviewWithClient>, DbErr> {
    let rows = reviews::Entity::find()
        .filter(reviews::Column::FreelancerId.eq(freelancer_id))
        .order_by_desc(reviews::Column::CreatedAt)
        .all(db)
        .await?;

    let client_ids: Vec<Uuid> = rows.iter().map(|r| r.client_id).collect();
    let mut usernames = crate::db::users::get_usernames_by_ids(db, client_ids).await?;

    Ok(rows
        .into_iter()
        .map(|review| {
            let client_username = usernames.remove(&review.client_id);
            ReviewWithClient {
                review,
                client_username,
            }
        })
        .collect())
}
