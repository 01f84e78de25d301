//! # User Repository
//!
//! Persistence for user accounts. Password hashing happens before the
//! repository is called; only PHC strings reach the store.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::error::RepositoryError;
use crate::models::user::{self, ActiveModel as UserActiveModel, Entity as User, Model as UserModel};

/// Repository for User database operations
pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new user. The username must already be trimmed and non-empty.
    ///
    /// Returns `RepositoryError::Conflict` when the username is taken.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: String,
    ) -> Result<UserModel, RepositoryError> {
        if username.is_empty() {
            return Err(RepositoryError::validation_error("username is required"));
        }

        let user = UserActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let created = user
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        tracing::info!(user_id = created.id, "Registered user");
        Ok(created)
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserModel>, RepositoryError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<UserModel>, RepositoryError> {
        User::find_by_id(user_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}
