use sqlx::PgPool;
use uuid::Uuid;

use crate::api_types::PageParams;
use crate::error::{DomainError, Result};
use crate::store::unique_violation;
use crate::user::{User, UserCreateRequest, UserUpdateRequest};

const USERNAME_KEY: &str = "users_username_key";
const EMAIL_KEY: &str = "users_email_key";

#[derive(Debug, Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Signup lookup-or-insert. Re-posting the exact (username, email) pair
    /// returns the existing identity; a partial collision is a
    /// [`DomainError::DuplicateIdentity`].
    pub async fn get_or_create(&self, username: &str, email: &str) -> Result<User> {
        let colliding = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = $1 OR email = $2",
        )
        .bind(username)
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        if let Some(exact) = colliding
            .iter()
            .find(|u| u.username == username && u.email == email)
        {
            return Ok(exact.clone());
        }
        if !colliding.is_empty() {
            return Err(DomainError::DuplicateIdentity);
        }

        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match unique_violation(&err) {
            // Lost a signup race; the constraint is the source of truth
            Some(USERNAME_KEY | EMAIL_KEY) => DomainError::DuplicateIdentity,
            _ => err.into(),
        })
    }

    /// Persist the digest of a freshly issued confirmation code,
    /// superseding any prior one.
    pub async fn store_confirmation(&self, user_id: Uuid, digest: &str) -> Result<()> {
        sqlx::query("UPDATE users SET confirmation_hash = $2 WHERE id = $1")
            .bind(user_id)
            .bind(digest)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn list(&self, search: Option<&str>, page: PageParams) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users \
             WHERE ($1::text IS NULL OR username ILIKE $1 || '%') \
             ORDER BY username LIMIT $2 OFFSET $3",
        )
        .bind(search)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn create(&self, req: &UserCreateRequest) -> Result<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, first_name, last_name, bio, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&req.username)
        .bind(&req.email)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.bio)
        .bind(req.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match unique_violation(&err) {
            Some(USERNAME_KEY | EMAIL_KEY) => DomainError::DuplicateIdentity,
            _ => err.into(),
        })
    }

    /// Partial update by username. The caller decides whether `role` is
    /// honored; the self-profile path strips it before calling.
    pub async fn update(&self, username: &str, req: &UserUpdateRequest) -> Result<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET \
               email = COALESCE($2, email), \
               first_name = COALESCE($3, first_name), \
               last_name = COALESCE($4, last_name), \
               bio = COALESCE($5, bio), \
               role = COALESCE($6, role) \
             WHERE username = $1 RETURNING *",
        )
        .bind(username)
        .bind(&req.email)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.bio)
        .bind(req.role.map(|r| r.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| match unique_violation(&err) {
            Some(EMAIL_KEY) => DomainError::DuplicateIdentity,
            _ => err.into(),
        })?
        .ok_or_else(|| DomainError::UnknownUser(username.to_string()))
    }

    /// Delete a user and, through the schema's CASCADE, their reviews and
    /// comments.
    pub async fn delete(&self, username: &str) -> Result<()> {
        let affected = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(DomainError::UnknownUser(username.to_string()));
        }
        Ok(())
    }
}
