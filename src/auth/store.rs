//! User record storage
//!
//! MongoDB in production; an in-memory map when no database is configured
//! and in tests. Email uniqueness is enforced by the store itself.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{NewUser, User};
use crate::{Result, WeatherWiseError};

pub const USERS_COLLECTION: &str = "users";
pub const DUPLICATE_USER: &str = "User already exists";

const DUPLICATE_KEY_CODE: i32 = 11000;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Insert a user; an existing email yields a duplicate-user error
    async fn create(&self, user: NewUser) -> Result<User>;
}

fn duplicate_user() -> WeatherWiseError {
    WeatherWiseError::validation(DUPLICATE_USER)
}

/// Stored document layout
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(rename = "fullName")]
    full_name: String,
    email: String,
    password: String,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            full_name: doc.full_name,
            email: doc.email,
            password_hash: doc.password,
        }
    }
}

pub struct MongoUserStore {
    users: Collection<UserDocument>,
}

impl MongoUserStore {
    /// Connect and make sure the unique email index exists
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let users = client
            .database(database)
            .collection::<UserDocument>(USERS_COLLECTION);

        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        users.create_index(index).await?;

        info!("Connected to MongoDB database '{}'", database);
        Ok(Self { users })
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let found = self.users.find_one(doc! { "email": email }).await?;
        Ok(found.map(User::from))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let found = self.users.find_one(doc! { "_id": object_id }).await?;
        Ok(found.map(User::from))
    }

    async fn create(&self, user: NewUser) -> Result<User> {
        let document = UserDocument {
            id: ObjectId::new(),
            full_name: user.full_name,
            email: user.email,
            password: user.password_hash,
        };

        match self.users.insert_one(&document).await {
            Ok(_) => {
                debug!("Inserted user {}", document.id);
                Ok(User::from(document))
            }
            Err(e) if is_duplicate_key(&e) => Err(duplicate_user()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store keyed by email
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(duplicate_user());
        }

        let created = User {
            id: ObjectId::new().to_hex(),
            full_name: user.full_name,
            email: user.email,
            password_hash: user.password_hash,
        };
        users.insert(created.email.clone(), created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            full_name: "Alan Turing".to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_create_and_find() {
        let store = InMemoryUserStore::new();
        let created = store.create(new_user("alan@example.com")).await.unwrap();

        let by_email = store.find_by_email("alan@example.com").await.unwrap().unwrap();
        assert_eq!(by_email, created);
        let by_id = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alan@example.com");
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_rejects_duplicate_email() {
        let store = InMemoryUserStore::new();
        store.create(new_user("alan@example.com")).await.unwrap();

        let err = store.create(new_user("alan@example.com")).await.unwrap_err();
        assert_eq!(err.user_message(), DUPLICATE_USER);
    }

    #[test]
    fn test_document_layout() {
        let document = UserDocument {
            id: ObjectId::new(),
            full_name: "Alan Turing".to_string(),
            email: "alan@example.com".to_string(),
            password: "hash".to_string(),
        };
        let bson = mongodb::bson::to_document(&document).unwrap();
        assert!(bson.contains_key("_id"));
        assert!(bson.contains_key("fullName"));
        assert!(bson.contains_key("password"));
    }
}
