//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::user::{CreateUser, UpdateUser, User};

/// Repository trait for User entity
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return the stored row
    async fn create(&self, input: CreateUser) -> Result<User, DomainError>;

    /// Find a user by ID
    async fn get_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;

    /// Find a user by exact email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// List users ordered by id, optionally filtered by a name/email substring
    async fn get_all(
        &self,
        skip: u64,
        limit: u64,
        search: Option<&str>,
    ) -> Result<Vec<User>, DomainError>;

    /// Count users matching the same filter as `get_all`
    async fn count(&self, search: Option<&str>) -> Result<u64, DomainError>;

    /// Apply the fields present in `patch` to an existing user
    async fn update(&self, id: i32, patch: UpdateUser) -> Result<User, DomainError>;

    /// Delete a user, returning whether a row was removed
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;
}
