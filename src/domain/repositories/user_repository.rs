//! Repository trait for user accounts.

use chrono::{DateTime, Utc};
use async_trait::async_trait;

use crate::domain::entities::{NewUser, Role, User};
use crate::error::AppError;

/// Repository interface for user accounts and their credentials.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Looks up a user by email, compared case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Finds the user holding a reset token with this hash, regardless of its expiry.
    async fn find_by_reset_token_hash(&self, token_hash: &str) -> Result<Option<User>, AppError>;

    /// Stores a new password hash and clears any pending reset token.
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), AppError>;

    async fn set_reset_token(
        &self,
        id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    async fn touch_last_login(&self, id: i64) -> Result<(), AppError>;

    /// All users ordered by id.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Returns `Ok(false)` when no user has this email.
    async fn set_active(&self, email: &str, is_active: bool) -> Result<bool, AppError>;

    /// Returns `Ok(false)` when no user has this email.
    async fn set_role(&self, email: &str, role: Role) -> Result<bool, AppError>;
}
