use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// SeaORM entity for the `reviews` table.
///
/// Client and freelancer ids are copied from the gig at submission time, so a
/// review stays intact even if the gig or either user is later deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub gig_id: Uuid,
    pub client_id: Uuid,
    pub freelancer_id: Uuid,
    /// Whichever of the two parties wrote the review.
    pub reviewer_id: Uuid,
    pub rating: i32,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
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
}

impl Related<super::gigs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Gig.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub rating: i32,
    pub comment: String,
}

impl CreateReview {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ApiError::Validation(
                "rating must be an integer between 1 and 5".into(),
            ));
        }
        if self.comment.trim().is_empty() {
            return Err(ApiError::Validation("comment is required".into()));
        }
        Ok(())
    }
}

/// A review on a freelancer's public page, with the client's username resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithClient {
    #[serde(flatten)]
    pub review: Model,
    pub client_username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_enforced() {
        for rating in [0, 6, -1, 100] {
            let review = CreateReview {
                rating,
                comment: "fine work".into(),
            };
            assert!(review.validate().is_err(), "rating {rating} should fail");
        }
        for rating in 1..=5 {
            let review = CreateReview {
                rating,
                comment: "fine work".into(),
            };
            assert!(review.validate().is_ok());
        }
    }
}
