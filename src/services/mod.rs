/*
 * Responsibility
 * - HTTP 非依存のドメインサービス
 *   - access: ロール別パス認可 (gatekeeper)
 *   - identity: セッショントークン検証 → IdentityClaim
 */
pub mod access;
pub mod identity;
