//! Account registration, login and password management.

use chrono::{Duration, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::entities::{NewUser, Role, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::jwt::JwtService;
use crate::utils::password::{hash_password_async, verify_password_async};
use crate::utils::reset_token;

/// A user together with a freshly issued access token.
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Service for user accounts and bearer-token authentication.
pub struct AuthService<U: UserRepository> {
    users: Arc<U>,
    jwt: JwtService,
    reset_ttl: Duration,
    /// Return reset tokens to the caller instead of only logging them.
    expose_reset_tokens: bool,
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Credenciales inválidas", json!({}))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(
        users: Arc<U>,
        jwt: JwtService,
        reset_ttl: Duration,
        expose_reset_tokens: bool,
    ) -> Self {
        Self {
            users,
            jwt,
            reset_ttl,
            expose_reset_tokens,
        }
    }

    /// Creates an account and signs the new user in.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    pub async fn register(
        &self,
        name: String,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AppError> {
        let email = normalize_email(email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "El correo electrónico ya está registrado",
                json!({ "field": "email" }),
            ));
        }

        let user = self
            .users
            .create(NewUser {
                name: name.trim().to_string(),
                email,
                password_hash: hash_password_async(password).await?,
                role: Role::User,
            })
            .await?;

        info!(user_id = user.id, "User registered");
        let token = self.jwt.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    /// Verifies credentials and issues a token.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let mut user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password_async(password, &user.password_hash).await {
            return Err(invalid_credentials());
        }

        if !user.is_active {
            return Err(AppError::unauthorized(
                "La cuenta está desactivada",
                json!({ "reason": "inactive" }),
            ));
        }

        self.users.touch_last_login(user.id).await?;
        user.last_login_at = Some(Utc::now());

        let token = self.jwt.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    /// Stores a reset token for the account, if one exists.
    ///
    /// Returns the raw token only when exposing tokens is enabled; callers
    /// must respond identically whether or not the email is known.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, AppError> {
        let Some(user) = self.users.find_by_email(&normalize_email(email)).await? else {
            debug!("Password reset requested for unknown email");
            return Ok(None);
        };

        let (raw, hash) = reset_token::generate();
        let expires_at = Utc::now() + self.reset_ttl;
        self.users.set_reset_token(user.id, &hash, expires_at).await?;

        info!(user_id = user.id, %expires_at, "Password reset token issued");

        if self.expose_reset_tokens {
            debug!(user_id = user.id, token = %raw, "Password reset token");
            Ok(Some(raw))
        } else {
            Ok(None)
        }
    }

    /// Sets a new password using a reset token. The token is single use.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] for unknown or expired tokens.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let invalid = || AppError::bad_request("Token inválido o expirado", json!({}));

        let user = self
            .users
            .find_by_reset_token_hash(&reset_token::hash(token))
            .await?
            .ok_or_else(invalid)?;

        let still_valid = user
            .reset_token_expires_at
            .is_some_and(|expires_at| expires_at > Utc::now());
        if !still_valid {
            return Err(invalid());
        }

        self.users
            .update_password(user.id, &hash_password_async(new_password).await?)
            .await?;

        info!(user_id = user.id, "Password reset");
        Ok(())
    }

    /// Changes the password after checking the current one.
    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !verify_password_async(current_password, &user.password_hash).await {
            return Err(AppError::unauthorized(
                "La contraseña actual es incorrecta",
                json!({ "field": "currentPassword" }),
            ));
        }

        self.users
            .update_password(user.id, &hash_password_async(new_password).await?)
            .await?;

        info!(user_id = user.id, "Password changed");
        Ok(())
    }

    /// Resolves a bearer token to an active user.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] for invalid or expired tokens and unknown users
    /// - [`AppError::Forbidden`] for deactivated accounts
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let claims = self.jwt.verify(token).map_err(|e| {
            debug!(error = %e, "Rejected access token");
            AppError::unauthorized("Token inválido o expirado", json!({ "reason": e.to_string() }))
        })?;

        let user_id = claims.user_id().ok_or_else(|| {
            AppError::unauthorized("Token inválido o expirado", json!({ "reason": "bad subject" }))
        })?;

        let user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            AppError::unauthorized("Usuario no encontrado", json!({}))
        })?;

        if !user.is_active {
            return Err(AppError::forbidden("La cuenta está desactivada", json!({})));
        }

        Ok(user)
    }
}
