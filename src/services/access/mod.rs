/*
 * Responsibility
 * - ロールベースのパス認可 (policy table + gatekeeper)
 * - HTTP 非依存。middleware はここの decide() を呼ぶだけ
 */
pub mod gatekeeper;
pub mod pattern;
pub mod policy;
pub mod role;

pub use gatekeeper::{Decision, Gatekeeper, IdentityClaim, SharedPolicy};
pub use policy::{PolicyError, PolicyTable};
pub use role::Role;
