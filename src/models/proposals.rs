use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Proposal status stored as a lowercase string in the database.
///
/// Note: when one proposal is accepted, the losing proposals stay `pending`.
/// The gig's own status (no longer `open`) is what makes them unactionable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// SeaORM entity for the `proposals` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "proposals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub gig_id: Uuid,
    pub freelancer_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub bid_amount: f64,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: ProposalStatus,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::gigs::Entity",
        from = "Column::GigId",
        to = "super::gigs::Column::Id"
    )]
    Gig,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FreelancerId",
        to = "super::users::Column::Id"
    )]
    Freelancer,
}

impl Related<super::gigs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Gig.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Freelancer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProposal {
    pub bid_amount: f64,
    pub message: String,
}

impl CreateProposal {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !self.bid_amount.is_finite() || self.bid_amount <= 0.0 {
            return Err(ApiError::Validation("bid_amount must be positive".into()));
        }
        if self.message.trim().is_empty() {
            return Err(ApiError::Validation("message is required".into()));
        }
        Ok(())
    }
}

/// A proposal as seen by the gig owner, with the bidder's public identity.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalWithFreelancer {
    #[serde(flatten)]
    pub proposal: Model,
    pub freelancer_username: Option<String>,
    pub freelancer_profile_picture: Option<String>,
}

/// Short summary of a gig attached to a freelancer's own proposal listing.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedGigSummary {
    pub id: Uuid,
    pub title: String,
    pub budget: f64,
    pub status: super::gigs::GigStatus,
    pub posted_by: Uuid,
}

/// One entry of `GET /api/gigs/applied`: the proposal plus the gig it targets.
/// If the gig has since been deleted the entry is kept and flagged `orphaned`
/// so the caller can render a "no longer available" state.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedProposal {
    #[serde(flatten)]
    pub proposal: Model,
    pub gig: Option<AppliedGigSummary>,
    pub orphaned: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HasAppliedResponse {
    pub has_applied: bool,
}
