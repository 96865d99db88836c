pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::AppError;
use crate::models::user::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("storage error: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => {
                AppError::Conflict("Email already registered".to_string())
            }
            StoreError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

/// Storage port for user accounts. Backed by Postgres in production and by an
/// in-memory map in tests and database-less demo runs.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a new user, assigning its id. Fails with `DuplicateEmail` when
    /// the email is already taken.
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError>;
}
