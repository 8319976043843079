// ==================== USER STORE ====================
// Contrato do Record Store: CRUD de usuários por identificador.
// Implementado por MongoUserStore (produção) e MemoryUserStore (dev/testes).

use crate::models::{UserFields, UserRecord};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Unavailable(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user with a generated id and creation timestamp.
    async fn create(&self, fields: UserFields) -> Result<UserRecord, StoreError>;

    /// All users, newest first.
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError>;

    async fn get(&self, id: &str) -> Result<UserRecord, StoreError>;

    /// Replaces every mutable field. Optional fields missing from `fields`
    /// are removed from the stored record; `id` and `created_at` are kept.
    async fn update(&self, id: &str, fields: UserFields) -> Result<UserRecord, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Rejects field sets without a name or an email.
pub fn validate(fields: &UserFields) -> Result<(), StoreError> {
    match fields.missing_required() {
        Some("name") => Err(StoreError::Validation("Name is required".to_string())),
        Some(_) => Err(StoreError::Validation("Email is required".to_string())),
        None => Ok(()),
    }
}
