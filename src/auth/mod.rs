//! Password hashing, bearer tokens and user accounts

pub mod password;
pub mod service;
pub mod store;
pub mod token;

pub use service::{AuthService, AuthSession, LoginRequest, RegisterRequest};
pub use store::{InMemoryUserStore, MongoUserStore, UserStore};
pub use token::{Claims, TokenIssuer};
