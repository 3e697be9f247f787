/// In-memory user store.
///
/// Primary map keyed by user id plus an email index, the same layout
/// as the production table and its email index. All mutation happens
/// under one mutex, which makes the conditional insert atomic. Used by
/// the integration tests and for local runs without a database.
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{InsertOutcome, UserRecord, UserStore};
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    by_id: HashMap<Uuid, UserRecord>,
    email_index: HashMap<String, Uuid>,
}

#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::Internal("User store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let inner = self.lock()?;
        let record = inner
            .email_index
            .get(email)
            .and_then(|id| inner.by_id.get(id))
            .cloned();
        Ok(record)
    }

    async fn insert(&self, user: &UserRecord) -> Result<InsertOutcome, AppError> {
        let mut inner = self.lock()?;
        if inner.email_index.contains_key(&user.email) {
            return Ok(InsertOutcome::EmailTaken);
        }
        inner.email_index.insert(user.email.clone(), user.id);
        inner.by_id.insert(user.id, user.clone());
        Ok(InsertOutcome::Created)
    }
}
