use sea_orm::prelude::Expr;
use sea_orm::sea_query::Query;
use sea_orm::*;
use uuid::Uuid;

use crate::models::gigs::{self, GigStatus};
use crate::models::proposals::{self, CreateProposal, ProposalStatus};

/// Insert a new proposal (defaults to Pending status).
pub async fn insert_proposal(
    db: &DatabaseConnection,
    gig_id: Uuid,
    freelancer_id: Uuid,
    input: CreateProposal,
) -> Result<proposals::Model, DbErr> {
    let new_proposal = proposals::ActiveModel {
        id: Set(Uuid::new_v4()),
        gig_id: Set(gig_id),
        freelancer_id: Set(freelancer_id),
        bid_amount: Set(input.bid_amount),
        message: Set(input.message),
        status: Set(ProposalStatus::Pending),
        created_at: Set(chrono::Utc::now()),
    };

    new_proposal.insert(db).await
}

/// Fetch a single proposal by ID.
pub async fn get_proposal_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<proposals::Model>, DbErr> {
    proposals::Entity::find_by_id(id).one(db).await
}

/// Whether a proposal already exists for this (gig, freelancer) pair.
pub async fn exists_for_gig_and_freelancer(
    db: &DatabaseConnection,
    gig_id: Uuid,
    freelancer_id: Uuid,
) -> Result<bool, DbErr> {
    let count = proposals::Entity::find()
        .filter(proposals::Column::GigId.eq(gig_id))
        .filter(proposals::Column::FreelancerId.eq(freelancer_id))
        .count(db)
        .await?;

    Ok(count > 0)
}

/// All proposals on one gig, newest first (owner's review list).
pub async fn get_proposals_by_gig(
    db: &DatabaseConnection,
    gig_id: Uuid,
) -> Result<Vec<proposals::Model>, DbErr> {
    proposals::Entity::find()
        .filter(proposals::Column::GigId.eq(gig_id))
        .order_by_desc(proposals::Column::CreatedAt)
        .all(db)
        .await
}

/// A freelancer's own proposals, each joined with its gig if the gig still
/// exists. Deleted gigs come back as `None` so the caller can mark the entry
/// orphaned instead of dropping it.
pub async fn get_proposals_with_gigs_by_freelancer(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
) -> Result<Vec<(proposals::Model, Option<gigs::Model>)>, DbErr> {
    proposals::Entity::find()
        .filter(proposals::Column::FreelancerId.eq(freelancer_id))
        .find_also_related(gigs::Entity)
        .order_by_desc(proposals::Column::CreatedAt)
        .all(db)
        .await
}

/// The single accepted proposal of a gig, if any.
pub async fn get_accepted_for_gig(
    db: &DatabaseConnection,
    gig_id: Uuid,
) -> Result<Option<proposals::Model>, DbErr> {
    proposals::Entity::find()
        .filter(proposals::Column::GigId.eq(gig_id))
        .filter(proposals::Column::Status.eq(ProposalStatus::Accepted))
        .one(db)
        .await
}

/// Move a proposal out of `pending` in one conditional update. Returns false
/// if the proposal had already been decided, so a second accept/reject fails
/// closed instead of silently no-opping. Generic over the connection so the
/// accept handler can run it inside a transaction with the gig transition.
pub async fn decide_pending<C: ConnectionTrait>(
    db: &C,
    proposal_id: Uuid,
    status: ProposalStatus,
) -> Result<bool, DbErr> {
    let result = proposals::Entity::update_many()
        .col_expr(proposals::Column::Status, Expr::value(status))
        .filter(proposals::Column::Id.eq(proposal_id))
        .filter(proposals::Column::Status.eq(ProposalStatus::Pending))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Reject a pending proposal, but only while its gig is still `open`. The
/// gig check rides inside the same update as a subquery, so a reject cannot
/// land after a concurrent accept has taken the gig: once the gig leaves
/// `open`, this update matches zero rows.
pub async fn reject_pending_while_open(
    db: &DatabaseConnection,
    proposal_id: Uuid,
    gig_id: Uuid,
) -> Result<bool, DbErr> {
    let gig_still_open = Query::select()
        .column(gigs::Column::Id)
        .from(gigs::Entity)
        .and_where(gigs::Column::Id.eq(gig_id))
        .and_where(gigs::Column::Status.eq(GigStatus::Open))
        .to_owned();

    let result = proposals::Entity::update_many()
        .col_expr(
            proposals::Column::Status,
            Expr::value(ProposalStatus::Rejected),
        )
        .filter(proposals::Column::Id.eq(proposal_id))
        .filter(proposals::Column::Status.eq(ProposalStatus::Pending))
        .filter(proposals::Column::GigId.in_subquery(gig_still_open))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Cascade used by gig deletion: proposals are never deleted individually.
pub async fn delete_by_gig(db: &DatabaseConnection, gig_id: Uuid) -> Result<u64, DbErr> {
    let result = proposals::Entity::delete_many()
        .filter(proposals::Column::GigId.eq(gig_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
