//! 内存用户存储
//!
//! 存储是显式持有的对象，通过应用状态注入处理器。所有写操作（唯一性检查、分配 ID、写入）
//! 都在同一次写锁内完成，因此并发写入也不会产生重复的 ID 或邮箱。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;

use super::model::{NewUser, User, UserCounts, UserPatch};
use crate::core::error::CoreError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("user {0} not found")]
    NotFound(u64),

    #[error("email {0} already in use")]
    DuplicateEmail(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => CoreError::NotFound(id.to_string()),
            StoreError::DuplicateEmail(email) => CoreError::Conflict(email),
        }
    }
}

#[derive(Debug)]
struct Inner {
    users: Vec<User>,
    next_id: u64,
}

impl Inner {
    fn email_taken(&self, email: &str, except: Option<u64>) -> bool {
        self.users
            .iter()
            .any(|u| Some(u.id) != except && same_email(&u.email, email))
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }
}

#[derive(Debug, Clone)]
pub struct UserStore {
    inner: Arc<RwLock<Inner>>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    /// ID 计数器从现有最大 ID 之后开始
    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        Self {
            inner: Arc::new(RwLock::new(Inner { users, next_id })),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按插入顺序返回所有满足条件的用户
    pub fn filter<F>(&self, predicate: F) -> Vec<User>
    where
        F: Fn(&User) -> bool,
    {
        self.inner
            .read()
            .users
            .iter()
            .filter(|u| predicate(u))
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<User> {
        self.filter(|_| true)
    }

    pub fn get(&self, id: u64) -> Option<User> {
        self.inner.read().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn counts(&self) -> UserCounts {
        let inner = self.inner.read();
        let active = inner.users.iter().filter(|u| u.is_active).count();
        UserCounts {
            total: inner.users.len(),
            active,
            inactive: inner.users.len() - active,
        }
    }

    pub fn insert(&self, new_user: NewUser, now: DateTime<Utc>) -> Result<User, StoreError> {
        let mut inner = self.inner.write();
        if inner.email_taken(&new_user.email, None) {
            return Err(StoreError::DuplicateEmail(new_user.email));
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let user = User {
            id,
            name: new_user.name,
            email: new_user.email,
            age: new_user.age,
            city: new_user.city,
            is_active: new_user.is_active,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    pub fn update(&self, id: u64, patch: UserPatch, now: DateTime<Utc>) -> Result<User, StoreError> {
        let mut inner = self.inner.write();
        let index = inner.position(id).ok_or(StoreError::NotFound(id))?;

        if let Some(email) = patch.email.as_deref() {
            if inner.email_taken(email, Some(id)) {
                return Err(StoreError::DuplicateEmail(email.to_string()));
            }
        }

        let user = &mut inner.users[index];
        patch.apply(user, now);
        Ok(user.clone())
    }

    pub fn remove(&self, id: u64) -> Result<User, StoreError> {
        let mut inner = self.inner.write();
        let index = inner.position(id).ok_or(StoreError::NotFound(id))?;
        Ok(inner.users.remove(index))
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
