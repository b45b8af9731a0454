use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    models::{
        AuthResponse, NewUser, SigninRequest, SignupRequest, User, UserPreferences, UserProfile,
        UserSummary,
    },
};

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthClaims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 access tokens
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days.max(1)),
        }
    }

    pub fn issue(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = AuthClaims {
            sub: user.id,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    pub fn verify(&self, token: &str) -> AppResult<AuthClaims> {
        decode::<AuthClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected access token");
                AppError::Unauthorized("Invalid token".to_string())
            })
    }
}

/// Hashes a password with Argon2id into a PHC string
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verifies a password against a stored PHC hash
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash format: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

async fn hash_off_thread(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

async fn verify_off_thread(password: String, password_hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

/// Creates an account and returns a fresh token for it
pub async fn signup(
    users: &dyn UserStore,
    tokens: &TokenService,
    request: SignupRequest,
) -> AppResult<AuthResponse> {
    let request = request.normalized();
    request.validate()?;

    let password_hash = hash_off_thread(request.password).await?;
    let user = users
        .create(NewUser {
            email: request.email,
            username: request.username,
            password_hash,
            preferences: UserPreferences::default(),
        })
        .await?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok(AuthResponse {
        token: tokens.issue(&user)?,
        user: UserSummary::from(&user),
    })
}

/// Exchanges credentials for a token
pub async fn signin(
    users: &dyn UserStore,
    tokens: &TokenService,
    request: SigninRequest,
) -> AppResult<AuthResponse> {
    let request = request.normalized();
    request.validate()?;

    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let user = users
        .find_by_email(&request.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_off_thread(request.password, user.password_hash.clone()).await? {
        tracing::info!(user_id = %user.id, "Rejected sign-in with wrong password");
        return Err(invalid());
    }

    Ok(AuthResponse {
        token: tokens.issue(&user)?,
        user: UserSummary::from(&user),
    })
}

pub async fn profile(users: &dyn UserStore, user_id: Uuid) -> AppResult<UserProfile> {
    users
        .find(user_id)
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
