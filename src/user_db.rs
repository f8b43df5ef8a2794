//! C2: flat user database — username to password, with the reserved
//! `"anonymous"` username bypassing the password check entirely.
//! Grounded in `examples/original_source/user/database`.

use std::collections::HashMap;

use tokio::sync::RwLock;

/// Usernames that never require a password and always authenticate.
const USERS_WITHOUT_PASSWORD: &[&str] = &["anonymous"];

fn requires_password(username: &str) -> bool {
    !USERS_WITHOUT_PASSWORD.contains(&username)
}

#[derive(Debug, Default)]
pub struct UserDatabase {
    users: RwLock<HashMap<String, String>>,
}

impl UserDatabase {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Rejects reserved usernames and duplicates outright.
    pub async fn add(&self, username: impl Into<String>, password: impl Into<String>) -> bool {
        let username = username.into();
        if !requires_password(&username) {
            return false;
        }
        let mut users = self.users.write().await;
        if users.contains_key(&username) {
            return false;
        }
        users.insert(username, password.into());
        true
    }

    /// `anonymous` authenticates unconditionally, password ignored.
    pub async fn verify(&self, username: &str, password: &str) -> bool {
        if !requires_password(username) {
            return true;
        }
        let users = self.users.read().await;
        users.get(username).map(|p| p == password).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_and_verify_round_trips() {
        let db = UserDatabase::new();
        assert!(db.add("nord", "vpn").await);
        assert!(db.verify("nord", "vpn").await);
        assert!(!db.verify("nord", "wrong").await);
    }

    #[tokio::test]
    async fn anonymous_bypasses_password() {
        let db = UserDatabase::new();
        assert!(db.verify("anonymous", "").await);
        assert!(db.verify("anonymous", "anything").await);
    }

    #[tokio::test]
    async fn anonymous_cannot_be_added() {
        let db = UserDatabase::new();
        assert!(!db.add("anonymous", "x").await);
    }

    #[tokio::test]
    async fn duplicate_add_is_rejected() {
        let db = UserDatabase::new();
        assert!(db.add("nord", "vpn").await);
        assert!(!db.add("nord", "other").await);
        assert!(db.verify("nord", "vpn").await);
    }

    #[tokio::test]
    async fn unknown_user_does_not_verify() {
        let db = UserDatabase::new();
        assert!(!db.verify("ghost", "").await);
    }
}
