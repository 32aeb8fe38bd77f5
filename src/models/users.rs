use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Default avatar shown until a user uploads their own picture.
pub const DEFAULT_PROFILE_PICTURE: &str =
    "https://cdn.pixabay.com/photo/2015/10/05/22/37/blank-profile-picture-973460_960_720.png";

/// The `Roles` enum maps to a Postgres TEXT column stored as lowercase strings.
///
/// A user's role is assigned once at registration and never changes afterwards;
/// no endpoint accepts a role update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Roles {
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "freelancer")]
    Freelancer,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// A list of skill tags stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct SkillList(pub Vec<String>);

/// A freelancer's portfolio, stored as a JSON array of entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct PortfolioList(pub Vec<PortfolioEntry>);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub link: Option<String>,
}

/// SeaORM entity for the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub role: Roles,
    /// Unique id issued by the external identity provider.
    #[sea_orm(unique)]
    pub uid: String,
    pub profile_picture: String,
    pub skills: SkillList,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub portfolio: PortfolioList,
    /// Payout address. Stored, but stripped from public profile responses.
    pub upi_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::gigs::Entity")]
    Gigs,
    #[sea_orm(has_many = "super::proposals::Entity")]
    Proposals,
}

impl Related<super::gigs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Gigs.def()
    }
}

impl Related<super::proposals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proposals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body for `POST /api/auth/register`. Identity verification already happened
/// at the external provider; `uid` is the provider-issued id.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub role: Option<Roles>,
    pub uid: String,
}

impl RegisterUser {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.username.trim().is_empty() {
            return Err(ApiError::Validation("username is required".into()));
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(ApiError::Validation("a valid email is required".into()));
        }
        if self.uid.trim().is_empty() {
            return Err(ApiError::Validation("uid is required".into()));
        }
        Ok(())
    }
}

/// Body for `PUT /api/profile`. Role is deliberately absent: it is immutable.
/// Freelancer-specific fields are ignored for clients.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile_picture: Option<String>,
    pub skills: Option<Vec<String>>,
    pub description: Option<String>,
    pub portfolio: Option<Vec<PortfolioEntry>>,
    pub upi_id: Option<String>,
}

/// Public profile representation: never leaks the payout address.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Roles,
    pub profile_picture: String,
    pub skills: SkillList,
    pub description: String,
    pub portfolio: PortfolioList,
    pub created_at: DateTimeUtc,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            role: m.role,
            profile_picture: m.profile_picture,
            skills: m.skills,
            description: m.description,
            portfolio: m.portfolio,
            created_at: m.created_at,
        }
    }
}
