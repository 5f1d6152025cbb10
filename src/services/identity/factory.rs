/// Factory: build `SessionVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::identity::{SessionJwtError, SessionVerifier};

pub fn build_session_verifier(config: &Config) -> Result<Arc<SessionVerifier>, SessionJwtError> {
    let verifier = SessionVerifier::new(
        &config.session_jwt_public_key_pem,
        &config.auth_issuer,
        &config.auth_audience,
        config.session_token_leeway_seconds,
    )?;

    Ok(Arc::new(verifier))
}
