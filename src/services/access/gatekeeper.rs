//! Access gatekeeper: path + identity claim -> allow / redirect.
//!
//! `decide` is pure. It takes one snapshot of the policy table on entry and
//! evaluates the whole request against that snapshot, so a concurrent
//! `SharedPolicy::replace` never produces a mixed decision.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};

use super::policy::{PolicyError, PolicyTable};
use super::role::{Role, RoleParseError};

/// Verified caller identity, as handed over by the session verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    pub subject: String,
    pub role: Role,
    pub expires_at: Option<DateTime<Utc>>,
}

impl IdentityClaim {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
            expires_at: None,
        }
    }

    /// Build a claim from a raw role string. Empty or unknown roles are rejected.
    pub fn from_raw_role(subject: impl Into<String>, role: &str) -> Result<Self, RoleParseError> {
        Ok(Self::new(subject, role.parse()?))
    }

    pub fn with_expiry(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectTo(String),
}

/// Process-wide policy handle. Readers take an `Arc` snapshot; reloads swap the pointer whole.
#[derive(Debug)]
pub struct SharedPolicy {
    current: ArcSwap<PolicyTable>,
}

impl SharedPolicy {
    pub fn new(table: PolicyTable) -> Self {
        Self {
            current: ArcSwap::from_pointee(table),
        }
    }

    pub fn snapshot(&self) -> Arc<PolicyTable> {
        self.current.load_full()
    }

    pub fn replace(&self, table: PolicyTable) {
        self.current.store(Arc::new(table));
    }

    /// Rebuild the table from a policy file and swap it in. On error the current table stays.
    pub fn reload_from_file(&self, path: &Path) -> Result<usize, PolicyError> {
        let table = PolicyTable::from_json_file(path)?;
        let rules = table.rules().len();
        self.replace(table);
        Ok(rules)
    }
}

#[derive(Debug)]
pub struct Gatekeeper {
    policy: SharedPolicy,
    sign_in_path: String,
}

impl Gatekeeper {
    pub fn new(table: PolicyTable, sign_in_path: impl Into<String>) -> Self {
        Self {
            policy: SharedPolicy::new(table),
            sign_in_path: sign_in_path.into(),
        }
    }

    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    pub fn policy(&self) -> &SharedPolicy {
        &self.policy
    }

    pub fn decide(&self, path: &str, claim: Option<&IdentityClaim>) -> Decision {
        let Some(claim) = claim else {
            return Decision::RedirectTo(self.sign_in_path.clone());
        };

        let role = claim.role;

        // Malformed paths never reach a handler.
        if !path.starts_with('/') {
            return Decision::RedirectTo(role.home_path());
        }

        let table = self.policy.snapshot();
        match table.first_match(path) {
            Some(rule) if rule.allows(role) => Decision::Allow,
            Some(_) => Decision::RedirectTo(role.home_path()),
            None => Decision::Allow,
        }
    }
}
