//! In-memory user store for development and tests

use super::user_repo::UserStore;
use crate::{
    error::AppError,
    models::user::{NewUser, UserRecord, UserRole},
};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicI64, Ordering};

/// Concurrent map keyed by username
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<String, UserRecord>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change an account's role, returns false if the user does not exist
    pub fn set_role(&self, username: &str, role: UserRole) -> bool {
        match self.users.get_mut(username) {
            Some(mut user) => {
                user.role = role;
                user.updated_at = chrono::Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users.get(username).map(|user| user.clone()))
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, AppError> {
        match self.users.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(AppError::IdentifierTaken),
            Entry::Vacant(slot) => {
                let now = chrono::Utc::now();
                let record = UserRecord {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    username: user.username,
                    password_hash: user.password_hash,
                    role: user.role,
                    nickname: user.nickname,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn update_profile(
        &self,
        username: &str,
        nickname: &str,
        password_hash: &str,
    ) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users.get_mut(username).map(|mut user| {
            user.nickname = nickname.to_string();
            user.password_hash = password_hash.to_string();
            user.updated_at = chrono::Utc::now();
            user.clone()
        }))
    }

    async fn delete(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.users.remove(username).is_some())
    }
}
