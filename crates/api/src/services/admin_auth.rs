//! Admin login against the configured account.

use shared::jwt::{JwtConfig, JwtError};
use shared::password::{verify_password, PasswordError};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AdminConfig;

#[derive(Debug, Error)]
pub enum AdminAuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password verification failed: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),
}

/// Issued admin session.
#[derive(Debug, Clone)]
pub struct AdminLogin {
    pub subject: String,
    pub token: String,
    pub jti: String,
    pub expires_in: i64,
}

pub struct AdminAuthService<'a> {
    admin: &'a AdminConfig,
    jwt: JwtConfig,
}

impl<'a> AdminAuthService<'a> {
    pub fn new(admin: &'a AdminConfig, jwt: JwtConfig) -> Self {
        Self { admin, jwt }
    }

    /// Checks the credentials and issues a session token.
    ///
    /// The password is verified even for an unknown email so both failures
    /// take the same time.
    pub fn login(&self, email: &str, password: &str) -> Result<AdminLogin, AdminAuthError> {
        let email_matches = email.trim().eq_ignore_ascii_case(&self.admin.email);
        let password_matches = verify_password(password, &self.admin.password_hash)?;

        if !(email_matches && password_matches) {
            warn!("Admin login rejected");
            return Err(AdminAuthError::InvalidCredentials);
        }

        let subject = self.admin.email.to_lowercase();
        let (token, jti) = self.jwt.issue_session_token(&subject)?;
        info!(jti = %jti, "Admin signed in");

        Ok(AdminLogin {
            subject,
            token,
            jti,
            expires_in: self.jwt.session_expiry_secs,
        })
    }
}
