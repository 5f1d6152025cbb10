/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - gate: パス認可 (policy table を内包)
 *   - sessions: セッショントークン検証
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::services::{access::Gatekeeper, identity::SessionVerifier};

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: Arc<Gatekeeper>,
    pub sessions: Arc<SessionVerifier>,
    pub session_cookie_name: Arc<str>,
}

impl AppState {
    pub fn new(
        gate: Arc<Gatekeeper>,
        sessions: Arc<SessionVerifier>,
        session_cookie_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            gate,
            sessions,
            session_cookie_name: session_cookie_name.into(),
        }
    }
}
