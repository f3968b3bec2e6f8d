//! Access token issuance and verification
//!
//! Tokens are stateless, signed JWTs: no server-side session store is
//! consulted when verifying them. A token encodes the admin's username, an
//! enumerated role set, and a fixed expiry. Downstream request authorization
//! rejects tokens that are expired, malformed, or signed with the wrong key.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    error::{TokenError, ValidationError},
};

/// A role claim carried by an access token.
///
/// Enumerated rather than a free-form string so that new roles can be added
/// without re-architecting the token issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
}

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject - the admin's username
    pub sub: String,
    /// Roles granted to the bearer
    pub roles: Vec<Role>,
    /// Issued at in seconds (as UTC timestamp)
    pub iat: i64,
    /// Expiration time in seconds (as UTC timestamp)
    pub exp: i64,
    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl AccessClaims {
    /// Build claims for an admin, stamped with the configured lifetime.
    pub fn for_admin(username: &str, config: &TokenConfig) -> Self {
        let now = Utc::now();
        Self {
            sub: username.to_string(),
            roles: vec![Role::Admin],
            iat: now.timestamp(),
            exp: (now + config.lifetime).timestamp(),
            iss: config.issuer.clone(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Signature algorithm and key material for access tokens
#[derive(Debug, Clone)]
pub enum TokenAlgorithm {
    /// RS256 - RSA with SHA-256
    RS256 {
        /// Private key for signing tokens (PEM format)
        private_key: Vec<u8>,
        /// Public key for verifying tokens (PEM format)
        public_key: Vec<u8>,
    },
    /// HS256 - HMAC with SHA-256
    HS256 {
        /// Secret key for both signing and verifying
        secret_key: Vec<u8>,
    },
}

/// Configuration for access token issuance
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Algorithm and keys
    pub algorithm: TokenAlgorithm,
    /// Issuer claim
    pub issuer: Option<String>,
    /// Fixed lifetime of issued tokens
    pub lifetime: Duration,
}

impl TokenConfig {
    /// Create a new token configuration with RS256 algorithm
    pub fn new_rs256(private_key: Vec<u8>, public_key: Vec<u8>) -> Self {
        Self {
            algorithm: TokenAlgorithm::RS256 {
                private_key,
                public_key,
            },
            issuer: None,
            lifetime: Duration::hours(24),
        }
    }

    /// Create a new token configuration with HS256 algorithm
    pub fn new_hs256(secret_key: Vec<u8>) -> Self {
        Self {
            algorithm: TokenAlgorithm::HS256 { secret_key },
            issuer: None,
            lifetime: Duration::hours(24),
        }
    }

    /// Create a token configuration from RSA key files (PEM format)
    pub fn from_rs256_pem_files(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
    ) -> Result<Self, Error> {
        use std::fs::read;

        let private_key = read(private_key_path).map_err(|e| {
            ValidationError::InvalidField(format!("Failed to read private key file: {e}"))
        })?;

        let public_key = read(public_key_path).map_err(|e| {
            ValidationError::InvalidField(format!("Failed to read public key file: {e}"))
        })?;

        Ok(Self::new_rs256(private_key, public_key))
    }

    /// Set the issuer claim
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the token lifetime
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Get the algorithm to use with jsonwebtoken
    pub fn jwt_algorithm(&self) -> Algorithm {
        match &self.algorithm {
            TokenAlgorithm::RS256 { .. } => Algorithm::RS256,
            TokenAlgorithm::HS256 { .. } => Algorithm::HS256,
        }
    }

    /// Get the encoding key for signing
    pub fn get_encoding_key(&self) -> Result<EncodingKey, Error> {
        match &self.algorithm {
            TokenAlgorithm::RS256 { private_key, .. } => EncodingKey::from_rsa_pem(private_key)
                .map_err(|e| {
                    ValidationError::InvalidField(format!("Invalid RSA private key: {e}")).into()
                }),
            TokenAlgorithm::HS256 { secret_key } => Ok(EncodingKey::from_secret(secret_key)),
        }
    }

    /// Get the decoding key for verification
    pub fn get_decoding_key(&self) -> Result<DecodingKey, Error> {
        match &self.algorithm {
            TokenAlgorithm::RS256 { public_key, .. } => DecodingKey::from_rsa_pem(public_key)
                .map_err(|e| {
                    ValidationError::InvalidField(format!("Invalid RSA public key: {e}")).into()
                }),
            TokenAlgorithm::HS256 { secret_key } => Ok(DecodingKey::from_secret(secret_key)),
        }
    }

    /// Get the validation configuration for token verification
    pub fn get_validation(&self) -> Validation {
        Validation::new(self.jwt_algorithm())
    }
}

/// A signed bearer token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap an existing token string
    pub fn new(token: &str) -> Self {
        AccessToken(token.to_string())
    }

    /// Sign the given claims into a new token
    pub fn issue(claims: &AccessClaims, config: &TokenConfig) -> Result<Self, Error> {
        let header = Header::new(config.jwt_algorithm());

        let encoding_key = config.get_encoding_key()?;

        let token = encode(&header, claims, &encoding_key)
            .map_err(|e| TokenError::Signing(format!("Failed to encode token: {e}")))?;

        Ok(AccessToken(token))
    }

    /// Verify the signature and expiry, returning the claims
    pub fn verify(&self, config: &TokenConfig) -> Result<AccessClaims, Error> {
        let decoding_key = config.get_decoding_key()?;
        let validation = config.get_validation();

        let token_data =
            decode::<AccessClaims>(&self.0, &decoding_key, &validation).map_err(|e| {
                if matches!(
                    e.kind(),
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature
                ) {
                    Error::Token(TokenError::Expired)
                } else {
                    Error::Token(TokenError::Invalid(format!("Token validation failed: {e}")))
                }
            })?;

        // Check expiry against the decoded claim as well
        let now = Utc::now();
        let exp = DateTime::from_timestamp(token_data.claims.exp, 0).unwrap_or(now);
        if now > exp {
            return Err(Error::Token(TokenError::Expired));
        }

        Ok(token_data.claims)
    }

    /// Get the inner token string
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Get a reference to the token string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccessToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccessToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
