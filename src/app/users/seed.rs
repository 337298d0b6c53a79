//! 示例数据

use chrono::Utc;

use super::model::NewUser;
use super::store::UserStore;

fn sample(name: &str, email: &str, age: u32, city: &str, is_active: bool) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        age,
        city: city.to_string(),
        is_active,
    }
}

pub fn sample_users() -> Vec<NewUser> {
    vec![
        sample("Rahul Sharma", "rahul.sharma@example.com", 28, "Delhi", true),
        sample("Priya Patel", "priya.patel@example.com", 32, "Bangalore", true),
        sample("Amit Kumar", "amit.kumar@example.com", 45, "Mumbai", false),
        sample("Sneha Reddy", "sneha.reddy@example.com", 26, "Delhi", true),
        sample("Vikram Singh", "vikram.singh@example.com", 38, "Pune", false),
    ]
}

impl UserStore {
    /// 创建带示例用户（ID 1-5）的存储
    pub fn seeded() -> Self {
        let store = UserStore::new();
        let now = Utc::now();
        for new_user in sample_users() {
            if let Err(e) = store.insert(new_user, now) {
                tracing::warn!(error = %e, "skipping sample user");
            }
        }
        tracing::info!(count = store.len(), "sample users loaded");
        store
    }
}
