//! User Service - Business rules on top of the user repository
//!
//! Enforces email uniqueness, turns absence into `NotFound`, and maps stored
//! rows to `UserResponse`. Knows nothing about HTTP.

use std::sync::Arc;

use crate::domain::{DomainError, UserRepository};
use crate::models::user::{CreateUser, UpdateUser, UserResponse};

pub const EMAIL_TAKEN: &str = "Email already exists";

fn user_not_found(id: i32) -> DomainError {
    DomainError::NotFound(format!("User not found (id: {})", id))
}

// The unique index is the last word on email races; whatever detail the
// store attached, callers get the same message as the pre-check.
fn email_conflict(err: DomainError) -> DomainError {
    match err {
        DomainError::Duplicate(_) => DomainError::Duplicate(EMAIL_TAKEN.to_string()),
        other => other,
    }
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_user(&self, input: CreateUser) -> Result<UserResponse, DomainError> {
        if self.repo.get_by_email(&input.email).await?.is_some() {
            tracing::warn!("Rejected user creation: email already in use");
            return Err(DomainError::Duplicate(EMAIL_TAKEN.to_string()));
        }

        let user = self.repo.create(input).await.map_err(email_conflict)?;
        tracing::info!("Created user {}", user.id);

        Ok(UserResponse::from(user))
    }

    /// Returns one window of users and the total matching the same search.
    pub async fn get_users(
        &self,
        skip: u64,
        limit: u64,
        search: Option<&str>,
    ) -> Result<(Vec<UserResponse>, u64), DomainError> {
        let users = self.repo.get_all(skip, limit, search).await?;
        let total = self.repo.count(search).await?;

        tracing::debug!(
            "Listed {} of {} users (skip={}, limit={}, search={:?})",
            users.len(),
            total,
            skip,
            limit,
            search
        );

        Ok((users.into_iter().map(UserResponse::from).collect(), total))
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<UserResponse, DomainError> {
        let user = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        Ok(UserResponse::from(user))
    }

    pub async fn update_user(
        &self,
        id: i32,
        patch: UpdateUser,
    ) -> Result<UserResponse, DomainError> {
        let current = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        if let Some(email) = &patch.email
            && *email != current.email
            && let Some(holder) = self.repo.get_by_email(email).await?
            && holder.id != id
        {
            tracing::warn!("Rejected update of user {}: email already in use", id);
            return Err(DomainError::Duplicate(EMAIL_TAKEN.to_string()));
        }

        let user = self.repo.update(id, patch).await.map_err(email_conflict)?;
        tracing::info!("Updated user {}", id);

        Ok(UserResponse::from(user))
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool, DomainError> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Err(user_not_found(id));
        }

        let deleted = self.repo.delete(id).await?;
        tracing::info!("Deleted user {}", id);

        Ok(deleted)
    }
}
