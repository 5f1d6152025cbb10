use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::{error::Error as StdError, fmt};

use crate::services::access::IdentityClaim;
use crate::services::access::role::RoleParseError;

// Errors returned by session-token verification + claim extraction.
#[derive(Debug)]
pub enum SessionJwtError {
    Jwt(jsonwebtoken::errors::Error),
    EmptyClaim(&'static str),
    MissingRole,
    InvalidRole(RoleParseError),
}

impl fmt::Display for SessionJwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
            Self::MissingRole => write!(f, "session token carries no role"),
            Self::InvalidRole(e) => write!(f, "invalid role claim: {}", e),
        }
    }
}

impl StdError for SessionJwtError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            Self::InvalidRole(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for SessionJwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Session token (JWT) claims.
///
/// NOTE:
/// - The identity provider puts the portal role in `metadata.role` (public metadata).
///   A top-level `role` is accepted as a fallback for tokens minted by other tools.
/// - `aud` can be string or array; `Validation::set_audience` checks it.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTokenClaims {
    pub iss: String,
    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub nbf: Option<u64>,
    #[serde(default)]
    pub iat: Option<u64>,
    #[serde(default)]
    pub jti: Option<String>,

    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub metadata: Option<SessionMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionMetadata {
    #[serde(default)]
    pub role: Option<String>,
}

impl SessionTokenClaims {
    fn raw_role(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.role.as_deref())
            .or(self.role.as_deref())
    }
}

/// EdDSA (Ed25519) session-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct SessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SessionVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl SessionVerifier {
    pub fn new(
        public_key_pem: &str,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, SessionJwtError> {
        let decoding_key = DecodingKey::from_ed_pem(public_key_pem.as_bytes())?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    // Verify and decode a JWT session token.
    pub fn decode(&self, token: &str) -> Result<SessionTokenClaims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<SessionTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    /// Verify the token and turn it into the claim the gatekeeper consumes.
    ///
    /// `jsonwebtoken::Validation` already checks signature, `exp`, `iss` and `aud`.
    /// This additionally requires a non-empty `sub` and a known role.
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, SessionJwtError> {
        let claims = self.decode(token)?;

        if claims.sub.trim().is_empty() {
            return Err(SessionJwtError::EmptyClaim("sub"));
        }

        let raw_role = claims.raw_role().ok_or(SessionJwtError::MissingRole)?;
        let claim = IdentityClaim::from_raw_role(claims.sub.clone(), raw_role)
            .map_err(SessionJwtError::InvalidRole)?;

        let expires_at = i64::try_from(claims.exp)
            .ok()
            .and_then(|exp| chrono::DateTime::from_timestamp(exp, 0));

        Ok(claim.with_expiry(expires_at))
    }
}
