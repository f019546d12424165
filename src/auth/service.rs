//! Registration, login and profile lookup

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{info, instrument};

use super::password::{hash_password, verify_password};
use super::store::UserStore;
use super::token::{Claims, TokenIssuer};
use crate::config::AuthConfig;
use crate::models::user::normalize_email;
use crate::models::{NewUser, PublicUser, User};
use crate::{Result, WeatherWiseError};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Verified against when the email is unknown, so both login failures cost one bcrypt check
const DUMMY_PASSWORD: &str = "weatherwise-no-such-account";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token plus the user it was issued for
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, secret: &str, config: &AuthConfig) -> Self {
        Self {
            store,
            tokens: TokenIssuer::new(secret, config.token_ttl_hours),
            bcrypt_cost: config.bcrypt_cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    #[instrument(skip_all)]
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthSession> {
        let full_name = request.full_name.trim();
        let email = normalize_email(&request.email);
        if full_name.is_empty()
            || email.is_empty()
            || request.password.is_empty()
            || request.confirm_password.is_empty()
        {
            return Err(WeatherWiseError::validation("All fields are required"));
        }
        if request.password != request.confirm_password {
            return Err(WeatherWiseError::validation("Passwords do not match"));
        }

        // The store enforces uniqueness too; this avoids hashing for a known duplicate.
        if self.find_account(&request.email).await?.is_some() {
            return Err(WeatherWiseError::validation(super::store::DUPLICATE_USER));
        }

        let password_hash = hash_password(request.password, self.bcrypt_cost).await?;
        let user = self
            .store
            .create(NewUser {
                full_name: full_name.to_string(),
                email,
                password_hash,
            })
            .await?;

        info!("Registered user {}", user.id);
        let token = self.tokens.issue(&user)?;
        Ok(AuthSession {
            token,
            user: PublicUser::from(&user),
        })
    }

    /// Unknown email and wrong password fail identically
    #[instrument(skip_all)]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession> {
        let email = normalize_email(&request.email);
        if email.is_empty() || request.password.is_empty() {
            return Err(WeatherWiseError::validation("All fields are required"));
        }

        let Some(user) = self.find_account(&request.email).await? else {
            let dummy = self
                .dummy_hash
                .get_or_try_init(|| hash_password(DUMMY_PASSWORD.to_string(), self.bcrypt_cost))
                .await?;
            verify_password(request.password, dummy.clone()).await?;
            return Err(WeatherWiseError::unauthorized(INVALID_CREDENTIALS));
        };
        if !verify_password(request.password, user.password_hash.clone()).await? {
            return Err(WeatherWiseError::unauthorized(INVALID_CREDENTIALS));
        }

        info!("User {} signed in", user.id);
        let token = self.tokens.issue(&user)?;
        Ok(AuthSession {
            token,
            user: PublicUser::from(&user),
        })
    }

    /// Look up by normalized email, then by the email exactly as typed.
    /// Accounts stored before emails were lowercased only match the latter.
    async fn find_account(&self, raw_email: &str) -> Result<Option<User>> {
        let email = normalize_email(raw_email);
        if let Some(user) = self.store.find_by_email(&email).await? {
            return Ok(Some(user));
        }
        let typed = raw_email.trim();
        if typed == email {
            return Ok(None);
        }
        self.store.find_by_email(typed).await
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.tokens.verify(token)
    }

    pub async fn profile(&self, user_id: &str) -> Result<PublicUser> {
        self.store
            .find_by_id(user_id)
            .await?
            .map(|user| PublicUser::from(&user))
            .ok_or_else(|| WeatherWiseError::not_found("User not found"))
    }
}
