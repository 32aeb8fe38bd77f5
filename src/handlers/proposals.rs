use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::chat::server::ChatServer;
use crate::db::gigs as gig_db;
use crate::db::proposals as proposal_db;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::gigs::{self, GigStatus};
use crate::models::notifications::NotificationKind;
use crate::models::proposals::{
    self, AppliedGigSummary, AppliedProposal, CreateProposal, HasAppliedResponse, ProposalStatus,
    ProposalWithFreelancer,
};
use crate::models::users::Roles;
use crate::notify;

/// POST /api/gigs/{id}/proposals — a freelancer bids on an open gig. One
/// proposal per (gig, freelancer); a second submission is a conflict.
pub async fn submit_proposal(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<Arc<ChatServer>>,
    path: web::Path<Uuid>,
    body: web::Json<CreateProposal>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Roles::Freelancer, "submit proposals")?;

    let gig_id = path.into_inner();
    let input = body.into_inner();
    input.validate()?;

    let gig = gig_db::get_gig_by_id(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {gig_id} not found")))?;

    if gig.status != GigStatus::Open {
        return Err(ApiError::Conflict("Gig is not open for proposals.".into()));
    }

    if proposal_db::exists_for_gig_and_freelancer(db.get_ref(), gig_id, user.0.id).await? {
        return Err(ApiError::Conflict(
            "You have already submitted a proposal for this gig.".into(),
        ));
    }

    let proposal = proposal_db::insert_proposal(db.get_ref(), gig_id, user.0.id, input).await?;

    notify::raise(
        db.get_ref(),
        hub.get_ref().as_ref(),
        gig.posted_by,
        NotificationKind::Proposal,
        format!("{} submitted a proposal for \"{}\".", user.0.username, gig.title),
        Some((user.0.id, &user.0.username)),
    )
    .await?;

    Ok(HttpResponse::Created().json(proposal))
}

/// GET /api/gigs/{id}/proposals — the gig owner reviews incoming proposals,
/// each with the bidder's public identity. Deleted bidders come back with
/// `None` identity fields rather than breaking the listing.
pub async fn proposals_for_gig(
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
            "Not authorized to view proposals for this gig.".into(),
        ));
    }

    let proposals = proposal_db::get_proposals_by_gig(db.get_ref(), gig_id).await?;

    let mut response = Vec::with_capacity(proposals.len());
    for proposal in proposals {
        let freelancer = user_db::get_user_by_id(db.get_ref(), proposal.freelancer_id).await?;
        let (freelancer_username, freelancer_profile_picture) = match freelancer {
            Some(f) => (Some(f.username), Some(f.profile_picture)),
            None => (None, None),
        };
        response.push(ProposalWithFreelancer {
            proposal,
            freelancer_username,
            freelancer_profile_picture,
        });
    }

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/gigs/proposals/check/{gig_id} — has the caller already applied?
pub async fn check_applied(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let gig_id = path.into_inner();
    let has_applied =
        proposal_db::exists_for_gig_and_freelancer(db.get_ref(), gig_id, user.0.id).await?;

    Ok(HttpResponse::Ok().json(HasAppliedResponse { has_applied }))
}

/// GET /api/gigs/applied — a freelancer's own proposals with the gig each one
/// targets. Proposals whose gig has since been deleted are kept and flagged
/// `orphaned` instead of being dropped from the list.
pub async fn applied_gigs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    user.require_role(Roles::Freelancer, "view applied gigs")?;

    let rows = proposal_db::get_proposals_with_gigs_by_freelancer(db.get_ref(), user.0.id).await?;

    let response: Vec<AppliedProposal> = rows
        .into_iter()
        .map(|(proposal, gig)| {
            let gig = gig.map(|g| AppliedGigSummary {
                id: g.id,
                title: g.title,
                budget: g.budget,
                status: g.status,
                posted_by: g.posted_by,
            });
            let orphaned = gig.is_none();
            AppliedProposal {
                proposal,
                gig,
                orphaned,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/gigs/{gig_id}/proposals/{proposal_id}/accept — the owner hires a
/// freelancer. The gig moves `open` → `in progress` in one conditional
/// update, so two concurrent accepts cannot both win; the loser gets a 409.
///
/// Only the accepted proposal changes status. The rest stay `pending`: the
/// gig no longer being open is what makes them unactionable.
pub async fn accept_proposal(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<Arc<ChatServer>>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (gig_id, proposal_id) = path.into_inner();

    let gig = gig_db::get_gig_by_id(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {gig_id} not found")))?;

    let proposal = proposal_db::get_proposal_by_id(db.get_ref(), proposal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Proposal {proposal_id} not found")))?;

    accept_gate(&gig, &proposal, user.0.id)?;

    // The status flip and the proposal decision commit together. The gig
    // transition is the arbiter; if a concurrent reject slips in on the
    // proposal, the decide touches zero rows and the whole hire rolls back
    // instead of leaving a hired gig with no accepted proposal.
    let txn = db.get_ref().begin().await?;

    if !gig_db::transition_accept(&txn, gig_id, proposal.freelancer_id, proposal.bid_amount)
        .await?
    {
        txn.rollback().await?;
        return Err(ApiError::Conflict(
            "Gig is no longer open; another proposal may have been accepted.".into(),
        ));
    }

    if !proposal_db::decide_pending(&txn, proposal_id, ProposalStatus::Accepted).await? {
        txn.rollback().await?;
        return Err(ApiError::Conflict(
            "Proposal has already been decided.".into(),
        ));
    }

    txn.commit().await?;

    notify::raise(
        db.get_ref(),
        hub.get_ref().as_ref(),
        proposal.freelancer_id,
        NotificationKind::Proposal,
        format!("Your proposal for \"{}\" was accepted!", gig.title),
        Some((user.0.id, &user.0.username)),
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Proposal accepted. Gig is now in progress.",
    })))
}

/// PUT /api/gigs/{gig_id}/proposals/{proposal_id}/reject — the owner turns a
/// proposal down. Only valid while the gig is still open and the proposal is
/// still pending; the gig-open check rides inside the same update as the
/// decision, so a reject cannot land after a concurrent accept.
pub async fn reject_proposal(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    hub: web::Data<Arc<ChatServer>>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (gig_id, proposal_id) = path.into_inner();

    let gig = gig_db::get_gig_by_id(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {gig_id} not found")))?;

    if gig.posted_by != user.0.id {
        return Err(ApiError::Forbidden(
            "Not authorized to reject proposals for this gig.".into(),
        ));
    }
    if gig.status != GigStatus::Open {
        return Err(ApiError::Conflict("Gig is no longer open.".into()));
    }

    let proposal = proposal_db::get_proposal_by_id(db.get_ref(), proposal_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Proposal {proposal_id} not found")))?;

    if proposal.gig_id != gig_id {
        return Err(ApiError::Validation(
            "Proposal does not belong to this gig.".into(),
        ));
    }

    if !proposal_db::reject_pending_while_open(db.get_ref(), proposal_id, gig_id).await? {
        return Err(ApiError::Conflict(
            "Gig is no longer open or the proposal has already been decided.".into(),
        ));
    }

    notify::raise(
        db.get_ref(),
        hub.get_ref().as_ref(),
        proposal.freelancer_id,
        NotificationKind::Proposal,
        format!("Your proposal for \"{}\" was rejected.", gig.title),
        Some((user.0.id, &user.0.username)),
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Proposal rejected.",
    })))
}

/// Preconditions an accept must satisfy before any store mutation. These
/// produce the right error for the common cases; the conditional gig
/// transition remains the arbiter under concurrency.
fn accept_gate(
    gig: &gigs::Model,
    proposal: &proposals::Model,
    caller: Uuid,
) -> Result<(), ApiError> {
    if gig.posted_by != caller {
        return Err(ApiError::Forbidden(
            "Not authorized to accept proposals for this gig.".into(),
        ));
    }
    if proposal.gig_id != gig.id {
        return Err(ApiError::Validation(
            "Proposal does not belong to this gig.".into(),
        ));
    }
    if proposal.status != ProposalStatus::Pending {
        return Err(ApiError::Conflict(
            "Proposal has already been decided.".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::SkillList;

    fn open_gig(id: Uuid, owner: Uuid) -> gigs::Model {
        gigs::Model {
            id,
            title: "Build a site".into(),
            description: "A marketing site".into(),
            budget: 500.0,
            duration: "2 weeks".into(),
            skills: SkillList(vec!["react".into()]),
            location: "Remote".into(),
            posted_by: owner,
            hired_freelancer: None,
            status: GigStatus::Open,
            final_amount: None,
            payout_processed: false,
            has_been_reviewed: false,
            posted_at: chrono::Utc::now(),
        }
    }

    fn pending_proposal(id: Uuid, gig_id: Uuid) -> proposals::Model {
        proposals::Model {
            id,
            gig_id,
            freelancer_id: Uuid::new_v4(),
            bid_amount: 450.0,
            message: "I can do this".into(),
            status: ProposalStatus::Pending,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn accept_gate_rejects_non_owners() {
        let owner = Uuid::new_v4();
        let gig = open_gig(Uuid::new_v4(), owner);
        let proposal = pending_proposal(Uuid::new_v4(), gig.id);

        let result = accept_gate(&gig, &proposal, Uuid::new_v4());
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn accept_gate_rejects_proposal_from_another_gig() {
        let owner = Uuid::new_v4();
        let gig = open_gig(Uuid::new_v4(), owner);
        let proposal = pending_proposal(Uuid::new_v4(), Uuid::new_v4());

        let result = accept_gate(&gig, &proposal, owner);
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn accept_gate_rejects_decided_proposals() {
        let owner = Uuid::new_v4();
        let gig = open_gig(Uuid::new_v4(), owner);

        for status in [ProposalStatus::Accepted, ProposalStatus::Rejected] {
            let mut proposal = pending_proposal(Uuid::new_v4(), gig.id);
            proposal.status = status;
            let result = accept_gate(&gig, &proposal, owner);
            assert!(matches!(result, Err(ApiError::Conflict(_))));
        }
    }

    #[test]
    fn accept_gate_passes_a_pending_proposal_for_the_owner() {
        let owner = Uuid::new_v4();
        let gig = open_gig(Uuid::new_v4(), owner);
        let proposal = pending_proposal(Uuid::new_v4(), gig.id);

        assert!(accept_gate(&gig, &proposal, owner).is_ok());
    }
}
