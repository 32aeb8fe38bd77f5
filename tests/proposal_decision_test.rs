///! Concurrency tests for proposal decisions against a mocked store.
///!
///! A `MockDatabase` stands in for Postgres so the accept/reject handlers can
///! be driven through interleavings that would need two live writers: the
///! mock's exec results replay what the conditional updates report when a
///! competing decision has already landed.
///!
///! Run with: `cargo test --test proposal_decision_test`
use actix_web::web;
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use std::sync::Arc;
use uuid::Uuid;

use gigconnect_backend::auth::middleware::AuthenticatedUser;
use gigconnect_backend::chat::server::ChatServer;
use gigconnect_backend::error::ApiError;
use gigconnect_backend::handlers::proposals::{accept_proposal, reject_proposal};
use gigconnect_backend::models::gigs::{self, GigStatus};
use gigconnect_backend::models::proposals::{self, ProposalStatus};
use gigconnect_backend::models::users::{self, PortfolioList, Roles, SkillList};

fn client(id: Uuid) -> users::Model {
    users::Model {
        id,
        username: "alice".into(),
        email: "alice@example.com".into(),
        role: Roles::Client,
        uid: "ext-alice".into(),
        profile_picture: String::new(),
        skills: SkillList::default(),
        description: String::new(),
        portfolio: PortfolioList::default(),
        upi_id: String::new(),
        created_at: Utc::now(),
    }
}

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
        posted_at: Utc::now(),
    }
}

fn pending_proposal(id: Uuid, gig_id: Uuid, freelancer: Uuid) -> proposals::Model {
    proposals::Model {
        id,
        gig_id,
        freelancer_id: freelancer,
        bid_amount: 450.0,
        message: "I can do this".into(),
        status: ProposalStatus::Pending,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn accept_rolls_back_when_the_proposal_was_decided_concurrently() {
    let owner = Uuid::new_v4();
    let gig_id = Uuid::new_v4();
    let proposal_id = Uuid::new_v4();
    let freelancer = Uuid::new_v4();

    // Both pre-reads look fine, the gig transition wins, but a reject landed
    // on the proposal in between: the decide touches zero rows. The handler
    // must surface a conflict and roll the hire back rather than commit a
    // hired gig with no accepted proposal.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![open_gig(gig_id, owner)]])
        .append_query_results([vec![pending_proposal(proposal_id, gig_id, freelancer)]])
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let result = accept_proposal(
        AuthenticatedUser(client(owner)),
        web::Data::new(db),
        web::Data::new(Arc::new(ChatServer::new())),
        web::Path::from((gig_id, proposal_id)),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Conflict(_))));
}

#[tokio::test]
async fn accept_conflicts_when_another_accept_took_the_gig() {
    let owner = Uuid::new_v4();
    let gig_id = Uuid::new_v4();
    let proposal_id = Uuid::new_v4();
    let freelancer = Uuid::new_v4();

    // The pre-read still saw the gig open, but the conditional transition
    // reports zero rows: another accept got there first.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![open_gig(gig_id, owner)]])
        .append_query_results([vec![pending_proposal(proposal_id, gig_id, freelancer)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let result = accept_proposal(
        AuthenticatedUser(client(owner)),
        web::Data::new(db),
        web::Data::new(Arc::new(ChatServer::new())),
        web::Path::from((gig_id, proposal_id)),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Conflict(_))));
}

#[tokio::test]
async fn reject_conflicts_when_an_accept_took_the_gig_after_the_read() {
    let owner = Uuid::new_v4();
    let gig_id = Uuid::new_v4();
    let proposal_id = Uuid::new_v4();
    let freelancer = Uuid::new_v4();

    // The pre-read saw the gig open, but by the time the conditional update
    // runs the gig has left `open`, so its subquery matches nothing and the
    // reject must fail closed instead of flipping the proposal.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![open_gig(gig_id, owner)]])
        .append_query_results([vec![pending_proposal(proposal_id, gig_id, freelancer)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let result = reject_proposal(
        AuthenticatedUser(client(owner)),
        web::Data::new(db),
        web::Data::new(Arc::new(ChatServer::new())),
        web::Path::from((gig_id, proposal_id)),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Conflict(_))));
}

#[tokio::test]
async fn reject_conflicts_on_a_gig_that_already_left_open() {
    let owner = Uuid::new_v4();
    let gig_id = Uuid::new_v4();
    let proposal_id = Uuid::new_v4();

    // Stale client view: the gig is already in progress when the reject
    // arrives. The handler refuses before touching the proposal.
    let mut gig = open_gig(gig_id, owner);
    gig.status = GigStatus::InProgress;
    gig.hired_freelancer = Some(Uuid::new_v4());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![gig]])
        .into_connection();

    let result = reject_proposal(
        AuthenticatedUser(client(owner)),
        web::Data::new(db),
        web::Data::new(Arc::new(ChatServer::new())),
        web::Path::from((gig_id, proposal_id)),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Conflict(_))));
}
