/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - gatekeeper middleware が Allow のときだけ request extensions に格納する
 *
 * Notes
 * - トークン検証は services::identity、パス認可は services::access の責務
 */
use chrono::{DateTime, Utc};

use crate::services::access::{IdentityClaim, Role};

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `subject` は identity provider 側のユーザー ID (形式は provider 次第なので String のまま)
/// - `role` は正規化済み。画面の出し分けに使う
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub subject: String,
    pub role: Role,
    pub session_expires_at: Option<DateTime<Utc>>,
}

impl From<IdentityClaim> for AuthCtx {
    fn from(claim: IdentityClaim) -> Self {
        Self {
            subject: claim.subject,
            role: claim.role,
            session_expires_at: claim.expires_at,
        }
    }
}
