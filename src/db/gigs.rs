use sea_orm::prelude::Expr;
use sea_orm::sea_query::Func;
use sea_orm::*;
use uuid::Uuid;

use crate::models::gigs::{self, BrowseGigsQuery, CreateGig, GigStatus};

/// Insert a new gig. Status starts at `open`, with no hired freelancer and no
/// final amount.
pub async fn insert_gig(
    db: &DatabaseConnection,
    input: CreateGig,
    posted_by: Uuid,
) -> Result<gigs::Model, DbErr> {
    let new_gig = gigs::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        description: Set(input.description),
        budget: Set(input.budget),
        duration: Set(input.duration),
        skills: Set(crate::models::users::SkillList(input.skills)),
        location: Set(input.location),
        posted_by: Set(posted_by),
        hired_freelancer: Set(None),
        status: Set(GigStatus::Open),
        final_amount: Set(None),
        payout_processed: Set(false),
        has_been_reviewed: Set(false),
        posted_at: Set(chrono::Utc::now()),
    };

    new_gig.insert(db).await
}

/// Fetch a single gig by ID.
pub async fn get_gig_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<gigs::Model>, DbErr> {
    gigs::Entity::find_by_id(id).one(db).await
}

/// Browse open gigs with optional location/budget filters, newest first.
/// Skill matching happens in Rust because skills live in a JSON column.
pub async fn browse_open_gigs(
    db: &DatabaseConnection,
    query: &BrowseGigsQuery,
) -> Result<Vec<gigs::Model>, DbErr> {
    let mut find = gigs::Entity::find().filter(gigs::Column::Status.eq(GigStatus::Open));

    if let Some(location) = query.location.as_deref().filter(|l| !l.trim().is_empty()) {
        find = find.filter(
            Expr::expr(Func::lower(Expr::col(gigs::Column::Location)))
                .like(format!("%{}%", location.to_lowercase())),
        );
    }
    if let Some(budget) = query.budget {
        find = find.filter(gigs::Column::Budget.lte(budget));
    }

    let mut rows = find.order_by_desc(gigs::Column::PostedAt).all(db).await?;

    let wanted = query.skill_list();
    if !wanted.is_empty() {
        rows.retain(|gig| gig.skills.0.iter().any(|s| wanted.contains(s)));
    }

    Ok(rows)
}

/// Fetch all gigs posted by one client, newest first.
pub async fn get_gigs_by_owner(
    db: &DatabaseConnection,
    posted_by: Uuid,
) -> Result<Vec<gigs::Model>, DbErr> {
    gigs::Entity::find()
        .filter(gigs::Column::PostedBy.eq(posted_by))
        .order_by_desc(gigs::Column::PostedAt)
        .all(db)
        .await
}

/// Fetch a client's gigs currently in progress (hired-freelancer view).
pub async fn get_in_progress_by_owner(
    db: &DatabaseConnection,
    posted_by: Uuid,
) -> Result<Vec<gigs::Model>, DbErr> {
    gigs::Entity::find()
        .filter(gigs::Column::PostedBy.eq(posted_by))
        .filter(gigs::Column::Status.eq(GigStatus::InProgress))
        .all(db)
        .await
}

/// Fetch all gigs (admin view).
pub async fn get_all_gigs(db: &DatabaseConnection) -> Result<Vec<gigs::Model>, DbErr> {
    gigs::Entity::find().all(db).await
}

/// Gigs that have been paid by the client but not yet paid out (admin queue).
pub async fn get_pending_payouts(db: &DatabaseConnection) -> Result<Vec<gigs::Model>, DbErr> {
    gigs::Entity::find()
        .filter(gigs::Column::Status.eq(GigStatus::Paid))
        .filter(gigs::Column::PayoutProcessed.eq(false))
        .all(db)
        .await
}

// ── Lifecycle transitions ──
//
// Each edge of the lifecycle is one conditional `update_many` filtered on the
// expected current status. The database applies the check and the mutation as
// a single operation, so two racing callers cannot both succeed: the loser
// sees `rows_affected == 0` and reports a state conflict with zero mutation.

/// `open → in progress`: hire a freelancer at the accepted bid.
/// Returns false if the gig was not `open` at the instant of the update.
/// Generic over the connection so the accept handler can run it inside the
/// same transaction as the proposal decision.
pub async fn transition_accept<C: ConnectionTrait>(
    db: &C,
    gig_id: Uuid,
    freelancer_id: Uuid,
    final_amount: f64,
) -> Result<bool, DbErr> {
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::Status, Expr::value(GigStatus::InProgress))
        .col_expr(gigs::Column::HiredFreelancer, Expr::value(freelancer_id))
        .col_expr(gigs::Column::FinalAmount, Expr::value(final_amount))
        .filter(gigs::Column::Id.eq(gig_id))
        .filter(gigs::Column::Status.eq(GigStatus::Open))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// `in progress → completed`.
pub async fn transition_complete(db: &DatabaseConnection, gig_id: Uuid) -> Result<bool, DbErr> {
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::Status, Expr::value(GigStatus::Completed))
        .filter(gigs::Column::Id.eq(gig_id))
        .filter(gigs::Column::Status.eq(GigStatus::InProgress))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// `completed → paid`: the gateway confirmed the client's payment.
pub async fn transition_paid(db: &DatabaseConnection, gig_id: Uuid) -> Result<bool, DbErr> {
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::Status, Expr::value(GigStatus::Paid))
        .filter(gigs::Column::Id.eq(gig_id))
        .filter(gigs::Column::Status.eq(GigStatus::Completed))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// `paid → paidout`: the platform paid the freelancer. Terminal.
pub async fn transition_payout(db: &DatabaseConnection, gig_id: Uuid) -> Result<bool, DbErr> {
    let result = gigs::Entity::update_many()
        .col_expr(gigs::Column::Status, Expr::value(GigStatus::Paidout))
        .col_expr(gigs::Column::PayoutProcessed, Expr::value(true))
        .filter(gigs::Column::Id.eq(gig_id))
        .filter(gigs::Column::Status.eq(GigStatus::Paid))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Delete a gig only while it is still `open` (same conditional-update trick,
/// so an in-flight accept cannot race the deletion). Proposal cascade is the
/// caller's follow-up.
pub async fn delete_open_gig(db: &DatabaseConnection, gig_id: Uuid) -> Result<bool, DbErr> {
    let result = gigs::Entity::delete_many()
        .filter(gigs::Column::Id.eq(gig_id))
        .filter(gigs::Column::Status.eq(GigStatus::Open))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Set the reviewed flag once the owner submits their review.
pub async fn mark_reviewed(db: &DatabaseConnection, gig_id: Uuid) -> Result<(), DbErr> {
    gigs::Entity::update_many()
        .col_expr(gigs::Column::HasBeenReviewed, Expr::value(true))
        .filter(gigs::Column::Id.eq(gig_id))
        .exec(db)
        .await?;

    Ok(())
}

/// Unconditional delete (admin only).
pub async fn delete_gig(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    gigs::Entity::delete_by_id(id).exec(db).await
}

// ── Aggregates for dashboards ──

pub async fn count_by_owner_and_statuses(
    db: &DatabaseConnection,
    posted_by: Uuid,
    statuses: &[GigStatus],
) -> Result<u64, DbErr> {
    gigs::Entity::find()
        .filter(gigs::Column::PostedBy.eq(posted_by))
        .filter(gigs::Column::Status.is_in(statuses.iter().copied()))
        .count(db)
        .await
}

pub async fn count_by_freelancer_and_statuses(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
    statuses: &[GigStatus],
) -> Result<u64, DbErr> {
    gigs::Entity::find()
        .filter(gigs::Column::HiredFreelancer.eq(freelancer_id))
        .filter(gigs::Column::Status.is_in(statuses.iter().copied()))
        .count(db)
        .await
}

/// Sum of final amounts across a freelancer's paid and paid-out gigs.
pub async fn earnings_for_freelancer(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
) -> Result<f64, DbErr> {
    let rows = gigs::Entity::find()
        .filter(gigs::Column::HiredFreelancer.eq(freelancer_id))
        .filter(gigs::Column::Status.is_in([GigStatus::Paid, GigStatus::Paidout]))
        .all(db)
        .await?;

    Ok(rows.iter().filter_map(|g| g.final_amount).sum())
}

pub async fn count_all(db: &DatabaseConnection) -> Result<u64, DbErr> {
    gigs::Entity::find().count(db).await
}

pub async fn count_by_status(db: &DatabaseConnection, status: GigStatus) -> Result<u64, DbErr> {
    gigs::Entity::find()
        .filter(gigs::Column::Status.eq(status))
        .count(db)
        .await
}
