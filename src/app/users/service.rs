//! 用户业务服务

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{
    model::{User, UserCounts, UserStatus},
    store::UserStore,
    validation,
};
use crate::core::error::CoreError;

#[derive(Clone)]
pub struct UserService {
    store: UserStore,
}

impl UserService {
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }

    pub fn list(&self, active: Option<bool>) -> Vec<User> {
        match active {
            Some(active) => self.store.filter(|u| u.is_active == active),
            None => self.store.all(),
        }
    }

    pub fn get(&self, id: u64) -> Result<User, CoreError> {
        self.store
            .get(id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    /// 城市名不区分大小写完全匹配
    pub fn by_city(&self, city: &str) -> Vec<User> {
        let wanted = city.trim().to_lowercase();
        self.store.filter(|u| u.city.to_lowercase() == wanted)
    }

    pub fn by_status(&self, status: UserStatus) -> Vec<User> {
        self.store.filter(|u| u.is_active == status.is_active())
    }

    pub fn counts(&self) -> UserCounts {
        self.store.counts()
    }

    #[instrument(name = "users.service.create", skip(self, body))]
    pub fn create(&self, body: &Value) -> Result<User, CoreError> {
        let new_user = validation::validate_create(body)?;
        let user = self.store.insert(new_user, Utc::now()).map_err(|e| {
            warn!(error = %e, "create rejected");
            CoreError::from(e)
        })?;
        info!(user_id = user.id, email = %user.email, "user created");
        Ok(user)
    }

    #[instrument(name = "users.service.update", skip(self, body))]
    pub fn update(&self, id: u64, body: &Value) -> Result<User, CoreError> {
        let patch = validation::validate_update(body)?;
        debug!(?patch, "applying patch");
        let user = self.store.update(id, patch, Utc::now()).map_err(|e| {
            warn!(error = %e, "update rejected");
            CoreError::from(e)
        })?;
        info!(user_id = user.id, "user updated");
        Ok(user)
    }

    #[instrument(name = "users.service.delete", skip(self))]
    pub fn delete(&self, id: u64) -> Result<User, CoreError> {
        let user = self.store.remove(id)?;
        info!(user_id = user.id, email = %user.email, "user deleted");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> UserService {
        UserService::new(UserStore::seeded())
    }

    #[test]
    fn city_match_ignores_case() {
        let users = service().by_city("delhi");
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.city == "Delhi"));
    }

    #[test]
    fn status_filter_matches_flag() {
        let svc = service();
        assert!(svc.by_status(UserStatus::Active).iter().all(|u| u.is_active));
        assert!(svc
            .by_status(UserStatus::Inactive)
            .iter()
            .all(|u| !u.is_active));
        assert_eq!(svc.list(Some(true)).len(), 3);
        assert_eq!(svc.list(None).len(), 5);
    }

    #[test]
    fn create_conflict_and_validation_do_not_mutate() {
        let svc = service();
        let dup = json!({
            "name": "Copy Cat",
            "email": "rahul.sharma@example.com",
            "age": 40,
            "city": "Agra"
        });
        assert!(matches!(svc.create(&dup), Err(CoreError::Conflict(_))));

        let bad = json!({ "name": "X" });
        assert!(matches!(svc.create(&bad), Err(CoreError::Validation(_))));
        assert_eq!(svc.counts().total, 5);
    }

    #[test]
    fn update_merges_and_delete_removes() {
        let svc = service();
        let before = svc.get(2).unwrap();
        let after = svc.update(2, &json!({ "city": "Mumbai" })).unwrap();
        assert_eq!(after.city, "Mumbai");
        assert_eq!(after.name, before.name);
        assert!(after.updated_at >= before.updated_at);

        let removed = svc.delete(2).unwrap();
        assert_eq!(removed, after);
        assert!(matches!(svc.get(2), Err(CoreError::NotFound(_))));
    }
}
