//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::User;
use crate::utils::time;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List all users, oldest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY created_at ASC")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by email (emails are stored lowercased)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_lowercase()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Create a user from an already-hashed password
    ///
    /// The hash never travels through the serialized model (its field is
    /// skip_serializing), so insertion binds it explicitly.
    pub async fn create(&self, email: &str, password_hash: &str, role: &str) -> RepoResult<User> {
        let email = email.to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email {} already in use",
                email
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                "CREATE user CONTENT { email: $email, password_hash: $hash, role: $role, \
                 is_active: true, created_at: $now }",
            )
            .bind(("email", email))
            .bind(("hash", password_hash.to_string()))
            .bind(("role", role.to_string()))
            .bind(("now", time::now_millis()))
            .await?;

        let created: Vec<User> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Change a user's role
    pub async fn update_role(&self, id: &str, role: &str) -> RepoResult<User> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("User {} not found", id)));
        }

        self.base
            .db()
            .query("UPDATE $thing SET role = $role")
            .bind(("thing", thing))
            .bind(("role", role.to_string()))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Replace a user's password hash
    pub async fn update_password(&self, id: &str, password_hash: &str) -> RepoResult<()> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("User {} not found", id)));
        }

        self.base
            .db()
            .query("UPDATE $thing SET password_hash = $hash")
            .bind(("thing", thing))
            .bind(("hash", password_hash.to_string()))
            .await?;
        Ok(())
    }
}
