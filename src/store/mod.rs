/// User store
///
/// The service's only external collaborator with state: a lookup store
/// keyed by user id with a secondary lookup by email. Uniqueness is
/// enforced by the store itself through an atomic
/// insert-if-email-absent, never by a separate existence check
/// followed by a write.
mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;

/// Identity + credential at rest. `password_hash` never appears in a
/// response body; it only travels between the store and the credential
/// verifier.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Build a new record with a fresh id and creation timestamps.
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Outcome of a conditional insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created,
    EmailTaken,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Secondary-index lookup by canonical (lowercased) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Atomic insert-if-email-absent. Two concurrent registrations for
    /// the same email must resolve to exactly one `Created`.
    async fn insert(&self, user: &UserRecord) -> Result<InsertOutcome, AppError>;
}
