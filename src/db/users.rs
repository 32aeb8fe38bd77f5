use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::users::{
    self, DEFAULT_PROFILE_PICTURE, PortfolioList, RegisterUser, Roles, SkillList, UpdateProfile,
};

/// Insert a new user at registration. Role defaults to client.
pub async fn insert_user(
    db: &DatabaseConnection,
    input: RegisterUser,
) -> Result<users::Model, DbErr> {
    let new_user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(input.username),
        email: Set(input.email),
        role: Set(input.role.unwrap_or(Roles::Client)),
        uid: Set(input.uid),
        profile_picture: Set(DEFAULT_PROFILE_PICTURE.to_string()),
        skills: Set(SkillList::default()),
        description: Set(String::new()),
        portfolio: Set(PortfolioList::default()),
        upi_id: Set(String::new()),
        created_at: Set(chrono::Utc::now()),
    };

    new_user.insert(db).await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Fetch a single user by email (duplicate check at registration).
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}

/// Fetch a single user by username (duplicate check at registration).
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await
}

/// Fetch all users (admin view).
pub async fn get_all_users(db: &DatabaseConnection) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find().all(db).await
}

/// Resolve usernames for a set of user ids in one query. Ids that no longer
/// exist are simply absent from the map; callers render them as "Unknown User".
pub async fn get_usernames_by_ids(
    db: &DatabaseConnection,
    ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, String>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|u| (u.id, u.username)).collect())
}

/// Update the caller's own profile. The role column is never touched here.
pub async fn update_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateProfile,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let is_freelancer = user.role == Roles::Freelancer;
    let mut active: users::ActiveModel = user.into();

    if let Some(username) = input.username {
        active.username = Set(username);
    }
    if let Some(email) = input.email {
        active.email = Set(email);
    }
    if let Some(profile_picture) = input.profile_picture {
        active.profile_picture = Set(profile_picture);
    }

    // Freelancer-specific fields are ignored for other roles.
    if is_freelancer {
        if let Some(skills) = input.skills {
            active.skills = Set(SkillList(skills));
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(portfolio) = input.portfolio {
            active.portfolio = Set(PortfolioList(portfolio));
        }
        if let Some(upi_id) = input.upi_id {
            active.upi_id = Set(upi_id);
        }
    }

    active.update(db).await
}

/// Delete a user by ID. Deliberately no cascade: the user's gigs, proposals,
/// and reviews keep their dangling references and reads stay orphan-tolerant.
pub async fn delete_user(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    users::Entity::delete_by_id(id).exec(db).await
}

/// Total user count (admin stats).
pub async fn count_users(db: &DatabaseConnection) -> Result<u64, DbErr> {
    users::Entity::find().count(db).await
}
