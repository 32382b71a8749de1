/**
 * Session Claims and Token Issuer
 *
 * This module handles JWT generation and validation for user sessions.
 * The issuer is constructed once at startup from configuration and
 * injected through application state; nothing here reads the environment.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::DomainError;

/// Token lifetime in seconds (30 days)
const TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username
    pub username: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

impl Claims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid, DomainError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| DomainError::unauthorized("invalid token subject"))
    }
}

/// Signs and validates bearer claims
///
/// Cheap to clone; held in application state and handed to whatever needs
/// to mint or check tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenIssuer {
    /// Build an issuer from the shared HMAC secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: TOKEN_TTL_SECS,
        }
    }

    /// Issue a signed, expiring claim for a user
    pub fn issue(
        &self,
        user_id: Uuid,
        username: &str,
        email: &str,
    ) -> Result<String, DomainError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| DomainError::unauthorized("system clock before epoch"))?
            .as_secs();

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            exp: now + self.ttl_secs,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            tracing::error!("Failed to sign token: {:?}", e);
            DomainError::unauthorized("failed to issue token")
        })
    }

    /// Decode a token and check its signature and expiry
    ///
    /// This only validates the credential itself. Callers that need the
    /// current account state must re-resolve the user row afterwards.
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| DomainError::unauthorized("invalid or expired token"))?;

        Ok(token_data.claims)
    }
}
