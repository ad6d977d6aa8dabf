//! Librarian authentication against the configured static credentials

use subtle::ConstantTimeEq;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::session::SessionClaims,
};

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Check credentials and issue a session token
    pub fn login(&self, username: &str, password: &str) -> AppResult<String> {
        let user_ok = username.as_bytes().ct_eq(self.config.admin_username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.config.admin_password.as_bytes());
        if !bool::from(user_ok & pass_ok) {
            tracing::warn!("Rejected login attempt for user {:?}", username);
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        let claims = SessionClaims::new(username, self.config.session_hours);
        let token = claims
            .create_token(&self.config.session_secret)
            .map_err(|e| AppError::Internal(format!("Failed to sign session: {}", e)))?;
        tracing::info!("Librarian {:?} logged in", username);
        Ok(token)
    }

    /// Validate a session token
    pub fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        SessionClaims::from_token(token, &self.config.session_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }
}
