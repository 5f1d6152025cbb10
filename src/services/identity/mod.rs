pub mod credentials;
pub mod factory;
pub mod session_jwt;

pub use factory::build_session_verifier;
pub use session_jwt::{SessionJwtError, SessionVerifier};
