//! User account model

use serde::{Deserialize, Serialize};

/// A registered user as held by the user store
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Store-assigned identifier
    pub id: String,
    pub full_name: String,
    /// Trimmed, lower-case email; older accounts may keep their original case
    pub email: String,
    /// bcrypt hash
    pub password_hash: String,
}

/// Fields needed to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
}

/// The user as exposed over the API, without the hash
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PublicUser {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Trim and lower-case an email address for storage and lookup
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_hides_hash() {
        let user = User {
            id: "65a1".to_string(),
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$2b$10$abc".to_string(),
        };
        let json = serde_json::to_value(PublicUser::from(&user)).unwrap();
        assert_eq!(json["fullName"], "Ada Lovelace");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
