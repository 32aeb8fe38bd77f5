use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::users::SkillList;

/// Gig lifecycle status stored as a string in the database.
///
/// The lifecycle only moves forward:
/// `open → in progress → completed → paid → paidout`.
/// Every transition is performed as a single conditional update filtered on
/// the expected current status, so two racing transitions cannot both win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum GigStatus {
    #[sea_orm(string_value = "open")]
    #[serde(rename = "open")]
    Open,
    #[sea_orm(string_value = "in progress")]
    #[serde(rename = "in progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    #[serde(rename = "completed")]
    Completed,
    #[sea_orm(string_value = "paid")]
    #[serde(rename = "paid")]
    Paid,
    #[sea_orm(string_value = "paidout")]
    #[serde(rename = "paidout")]
    Paidout,
}

impl GigStatus {
    /// The one legal successor of this status, if any. `Paidout` is terminal.
    pub fn next(self) -> Option<GigStatus> {
        match self {
            GigStatus::Open => Some(GigStatus::InProgress),
            GigStatus::InProgress => Some(GigStatus::Completed),
            GigStatus::Completed => Some(GigStatus::Paid),
            GigStatus::Paid => Some(GigStatus::Paidout),
            GigStatus::Paidout => None,
        }
    }

    /// Reviews are allowed once the work is finished, whether or not money
    /// has moved yet.
    pub fn is_reviewable(self) -> bool {
        matches!(
            self,
            GigStatus::Completed | GigStatus::Paid | GigStatus::Paidout
        )
    }
}

/// SeaORM entity for the `gigs` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gigs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub budget: f64,
    pub duration: String,
    pub skills: SkillList,
    pub location: String,
    pub posted_by: Uuid,
    /// Null exactly while the gig is still `open`.
    pub hired_freelancer: Option<Uuid>,
    pub status: GigStatus,
    /// Null until a proposal is accepted; then equal to that proposal's bid.
    #[sea_orm(column_type = "Double", nullable)]
    pub final_amount: Option<f64>,
    /// Becomes true only on the `paid → paidout` transition.
    pub payout_processed: bool,
    pub has_been_reviewed: bool,
    pub posted_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::proposals::Entity")]
    Proposals,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::PostedBy",
        to = "super::users::Column::Id"
    )]
    Client,
}

impl Related<super::proposals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proposals.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGig {
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub duration: String,
    pub skills: Vec<String>,
    pub location: String,
}

impl CreateGig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("title is required".into()));
        }
        if self.description.trim().is_empty() {
            return Err(ApiError::Validation("description is required".into()));
        }
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(ApiError::Validation("budget must be positive".into()));
        }
        if self.duration.trim().is_empty() {
            return Err(ApiError::Validation("duration is required".into()));
        }
        if self.location.trim().is_empty() {
            return Err(ApiError::Validation("location is required".into()));
        }
        Ok(())
    }
}

/// Query parameters for browsing open gigs.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowseGigsQuery {
    /// Comma-separated skill tags; a gig matches if it requires any of them.
    pub skills: Option<String>,
    /// Case-insensitive substring match on location.
    pub location: Option<String>,
    /// Maximum budget.
    pub budget: Option<f64>,
}

impl BrowseGigsQuery {
    pub fn skill_list(&self) -> Vec<String> {
        self.skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// A gig enriched with whether the requesting client has already reviewed it.
#[derive(Debug, Clone, Serialize)]
pub struct GigWithReviewStatus {
    #[serde(flatten)]
    pub gig: Model,
    pub has_been_reviewed: bool,
}

/// Dashboard counters for a client.
#[derive(Debug, Clone, Serialize)]
pub struct ClientStats {
    pub completed: u64,
    pub in_progress: u64,
    pub active: u64,
}

/// Dashboard counters for a freelancer, including paid-out earnings.
#[derive(Debug, Clone, Serialize)]
pub struct FreelancerStats {
    pub completed: u64,
    pub in_progress: u64,
    pub earnings: f64,
}

/// Response for the checkout page: what the client is about to pay, and to whom.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutDetails {
    pub gig: Model,
    pub freelancer_name: String,
    pub bid_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_only_moves_forward() {
        assert_eq!(GigStatus::Open.next(), Some(GigStatus::InProgress));
        assert_eq!(GigStatus::InProgress.next(), Some(GigStatus::Completed));
        assert_eq!(GigStatus::Completed.next(), Some(GigStatus::Paid));
        assert_eq!(GigStatus::Paid.next(), Some(GigStatus::Paidout));
        assert_eq!(GigStatus::Paidout.next(), None);
    }

    #[test]
    fn reviewable_statuses() {
        assert!(!GigStatus::Open.is_reviewable());
        assert!(!GigStatus::InProgress.is_reviewable());
        assert!(GigStatus::Completed.is_reviewable());
        assert!(GigStatus::Paid.is_reviewable());
        assert!(GigStatus::Paidout.is_reviewable());
    }

    #[test]
    fn browse_query_splits_skills() {
        let q = BrowseGigsQuery {
            skills: Some("react, rust,,sql ".to_string()),
            location: None,
            budget: None,
        };
        assert_eq!(q.skill_list(), vec!["react", "rust", "sql"]);
    }

    #[test]
    fn create_gig_rejects_non_positive_budget() {
        let gig = CreateGig {
            title: "Build a site".into(),
            description: "A marketing site".into(),
            budget: 0.0,
            duration: "2 weeks".into(),
            skills: vec!["react".into()],
            location: "Remote".into(),
        };
        assert!(gig.validate().is_err());
    }
}
