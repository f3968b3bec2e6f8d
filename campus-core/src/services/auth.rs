//! Authentication service.
//!
//! Verifies presented credentials against the admin store and issues signed
//! access tokens. Every login passes through the throttle gate before any
//! credential work happens; failed verifications are recorded in the attempt
//! ledger and successful ones clear the ledger for that `(username, ip)`
//! pair. Registration is unthrottled and is login-equivalent: a successful
//! registration returns a token with the same structure as a login token.

use std::sync::Arc;

use crate::{
    Error,
    admin::{Admin, NewAdmin},
    error::{AuthError, StorageError},
    repositories::{AdminRepository, LoginAttemptRepository},
    services::LoginThrottleService,
    token::{AccessClaims, AccessToken, TokenConfig},
    validation::{validate_password, validate_username},
};

/// Service for admin authentication and registration.
pub struct AuthService<A: AdminRepository, L: LoginAttemptRepository> {
    admins: Arc<A>,
    throttle: Arc<LoginThrottleService<L>>,
    tokens: TokenConfig,
}

impl<A: AdminRepository, L: LoginAttemptRepository> AuthService<A, L> {
    /// Create a new AuthService.
    pub fn new(
        admins: Arc<A>,
        throttle: Arc<LoginThrottleService<L>>,
        tokens: TokenConfig,
    ) -> Self {
        Self {
            admins,
            throttle,
            tokens,
        }
    }

    /// Get the token configuration used for issuance and verification.
    pub fn token_config(&self) -> &TokenConfig {
        &self.tokens
    }

    /// Register a new admin and issue an access token.
    ///
    /// Fails with [`AuthError::UsernameTaken`] if the username exists; in
    /// that case nothing is written. The storage layer's unique constraint
    /// backstops the pre-check under concurrent registration.
    pub async fn register(&self, username: &str, password: &str) -> Result<(Admin, AccessToken), Error> {
        validate_username(username)?;
        validate_password(password)?;

        if self.admins.find_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken.into());
        }

        let password_hash = Self::hash_password(password);

        let admin = match self
            .admins
            .create(NewAdmin::new(username.to_string(), password_hash))
            .await
        {
            Ok(admin) => admin,
            Err(Error::Storage(StorageError::Constraint(_))) => {
                return Err(AuthError::UsernameTaken.into());
            }
            Err(e) => return Err(e),
        };

        let token = self.issue_token(&admin)?;
        Ok((admin, token))
    }

    /// Authenticate an admin and issue an access token.
    ///
    /// State machine per request:
    /// 1. Throttle gate. Blocked requests are rejected with
    ///    [`AuthError::Throttled`] before any credential lookup, and no
    ///    ledger entry is written for them.
    /// 2. Credential lookup and verification. An unknown username and a
    ///    wrong password fail identically: a ledger entry is recorded and
    ///    [`AuthError::InvalidCredentials`] is returned.
    /// 3. On success, ledger entries for this `(username, ip)` pair are
    ///    cleared and a signed token is issued.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        ip_address: &str,
    ) -> Result<(Admin, AccessToken), Error> {
        if self.throttle.is_blocked(username, ip_address).await {
            tracing::info!(username, ip_address, "Login rejected by throttle");
            return Err(AuthError::Throttled.into());
        }

        let admin = match self.admins.find_by_username(username).await? {
            Some(admin) => admin,
            None => {
                // Unknown usernames must be indistinguishable from wrong passwords
                self.throttle.record_failed_attempt(username, ip_address).await;
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !Self::verify_password(password, &admin.password_hash) {
            self.throttle.record_failed_attempt(username, ip_address).await;
            return Err(AuthError::InvalidCredentials.into());
        }

        self.throttle.clear_attempts(username, ip_address).await;

        let token = self.issue_token(&admin)?;
        Ok((admin, token))
    }

    /// Verify a bearer token, returning its claims.
    pub fn verify_token(&self, token: &AccessToken) -> Result<AccessClaims, Error> {
        token.verify(&self.tokens)
    }

    fn issue_token(&self, admin: &Admin) -> Result<AccessToken, Error> {
        let claims = AccessClaims::for_admin(&admin.username, &self.tokens);
        AccessToken::issue(&claims, &self.tokens)
    }

    /// Hash a password using argon2
    fn hash_password(password: &str) -> String {
        use password_auth::generate_hash;
        generate_hash(password)
    }

    /// Verify a password against a hash
    ///
    /// Always goes through the verification primitive, never hash equality:
    /// each stored hash carries its own salt.
    fn verify_password(password: &str, hash: &str) -> bool {
        use password_auth::verify_password;
        verify_password(password, hash).is_ok()
    }
}
