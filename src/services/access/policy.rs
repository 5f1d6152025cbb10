/*
 * Responsibility
 * - PathRule / PolicyTable の定義と構築時バリデーション
 * - 既定テーブル (このポータルの routeAccessMap) と JSON ファイルからの読み込み
 * - 構築後は immutable。差し替えは gatekeeper 側で Arc ごと swap する
 */
use std::{collections::BTreeSet, path::Path};

use serde::Deserialize;
use thiserror::Error;

use super::pattern::{PathPattern, PatternError};
use super::role::{Role, RoleParseError};

const ALL_ROLES: &[&str] = &["admin", "tutor", "student", "parent"];

/// (pattern, allowed roles) in declaration order.
const DEFAULT_RULES: &[(&str, &[&str])] = &[
    ("/admin(.*)", &["admin"]),
    ("/student(.*)", &["student"]),
    ("/tutor(.*)", &["tutor"]),
    ("/parent(.*)", &["parent"]),
    ("/List/tutors", &["admin", "tutor"]),
    ("/List/students", &["admin", "tutor"]),
    ("/List/parents", &["admin", "tutor"]),
    ("/List/subjects", &["admin"]),
    ("/List/classes", &["admin", "tutor"]),
    ("/List/lessons", &["admin", "tutor"]),
    ("/List/exams", ALL_ROLES),
    ("/List/assignments", ALL_ROLES),
    ("/List/results", ALL_ROLES),
    ("/List/attendance", ALL_ROLES),
    ("/List/events", ALL_ROLES),
    ("/List/announcements", ALL_ROLES),
    ("/List/materials", &["admin", "tutor", "student"]),
];

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy rule #{index} ({pattern}): {source}")]
    Pattern {
        index: usize,
        pattern: String,
        #[source]
        source: PatternError,
    },
    #[error("policy rule #{index} ({pattern}): {source}")]
    Role {
        index: usize,
        pattern: String,
        #[source]
        source: RoleParseError,
    },
    #[error("policy rule #{index} ({pattern}) admits no role")]
    EmptyRoles { index: usize, pattern: String },
    #[error("policy table has no rules")]
    EmptyTable,
    #[error("role {role} is denied its own home page {home} (redirect loop)")]
    UnreachableHome { role: Role, home: String },
    #[error("failed to read policy file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse policy file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    pattern: PathPattern,
    allowed: BTreeSet<Role>,
}

impl PathRule {
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }
}

/// On-disk shape of a policy file.
///
/// ```json
/// { "rules": [ { "pattern": "/admin(.*)", "roles": ["admin"] } ] }
/// ```
#[derive(Debug, Deserialize)]
pub struct PolicyDocument {
    pub rules: Vec<RuleDocument>,
}

#[derive(Debug, Deserialize)]
pub struct RuleDocument {
    pub pattern: String,
    pub roles: Vec<String>,
}

/// Ordered, immutable list of path rules. The first matching rule decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    rules: Vec<PathRule>,
}

impl PolicyTable {
    /// Build a table from (pattern, roles) pairs. Fails on the first bad rule.
    pub fn from_rules<I, P, R, S>(rules: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut built = Vec::new();

        for (index, (pattern, roles)) in rules.into_iter().enumerate() {
            let source = pattern.as_ref();
            let pattern = PathPattern::parse(source).map_err(|source_err| PolicyError::Pattern {
                index,
                pattern: source.to_string(),
                source: source_err,
            })?;

            let allowed = roles
                .into_iter()
                .map(|r| r.as_ref().parse::<Role>())
                .collect::<Result<BTreeSet<_>, _>>()
                .map_err(|e| PolicyError::Role {
                    index,
                    pattern: source.to_string(),
                    source: e,
                })?;

            if allowed.is_empty() {
                return Err(PolicyError::EmptyRoles {
                    index,
                    pattern: source.to_string(),
                });
            }

            built.push(PathRule { pattern, allowed });
        }

        if built.is_empty() {
            return Err(PolicyError::EmptyTable);
        }

        let table = Self { rules: built };
        table.check_homes_reachable()?;

        for (shadowed, by) in table.shadowed_rules() {
            tracing::warn!(
                rule = %table.rules[shadowed].pattern,
                shadowed_by = %table.rules[by].pattern,
                "policy rule can never match; an earlier rule covers it"
            );
        }

        Ok(table)
    }

    pub fn from_document(doc: PolicyDocument) -> Result<Self, PolicyError> {
        Self::from_rules(doc.rules.into_iter().map(|r| (r.pattern, r.roles)))
    }

    pub fn from_json_str(path_label: &str, json: &str) -> Result<Self, PolicyError> {
        let doc: PolicyDocument =
            serde_json::from_str(json).map_err(|source| PolicyError::Parse {
                path: path_label.to_string(),
                source,
            })?;
        Self::from_document(doc)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, PolicyError> {
        let label = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: label.clone(),
            source,
        })?;
        Self::from_json_str(&label, &json)
    }

    /// The portal's built-in route access map.
    pub fn builtin() -> Result<Self, PolicyError> {
        Self::from_rules(DEFAULT_RULES.iter().map(|(p, roles)| (*p, roles.iter().copied())))
    }

    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }

    /// First rule (in declaration order) whose pattern matches `path`.
    pub fn first_match(&self, path: &str) -> Option<&PathRule> {
        self.rules.iter().find(|rule| rule.pattern.matches(path))
    }

    /// Pairs of (unreachable rule index, index of the earlier rule covering it).
    pub fn shadowed_rules(&self) -> Vec<(usize, usize)> {
        self.rules
            .iter()
            .enumerate()
            .filter_map(|(i, rule)| {
                self.rules[..i]
                    .iter()
                    .position(|earlier| rule.pattern.is_covered_by(&earlier.pattern))
                    .map(|j| (i, j))
            })
            .collect()
    }

    // Denying a role its own home would bounce it forever.
    fn check_homes_reachable(&self) -> Result<(), PolicyError> {
        for role in Role::ALL {
            let home = role.home_path();
            if let Some(rule) = self.first_match(&home)
                && !rule.allows(role)
            {
                return Err(PolicyError::UnreachableHome { role, home });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_keeps_declaration_order() {
        let table = PolicyTable::builtin().unwrap();
        let patterns: Vec<&str> = table.rules().iter().map(|r| r.pattern().as_str()).collect();
        assert_eq!(patterns.len(), DEFAULT_RULES.len());
        assert_eq!(patterns[0], "/admin(.*)");
        assert_eq!(patterns[4], "/List/tutors");
        assert!(table.shadowed_rules().is_empty());
    }

    #[test]
    fn roles_are_normalized_at_definition_time() {
        let table = PolicyTable::from_rules([("/admin(.*)", ["ADMIN"])]).unwrap();
        assert!(table.rules()[0].allows(Role::Admin));
    }

    #[test]
    fn empty_roles_are_rejected() {
        let err = PolicyTable::from_rules([("/reports", Vec::<&str>::new())]).unwrap_err();
        assert!(matches!(err, PolicyError::EmptyRoles { index: 0, .. }));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = PolicyTable::from_rules([("/reports", ["admin", "janitor"])]).unwrap_err();
        assert!(matches!(err, PolicyError::Role { index: 0, .. }));
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        let err = PolicyTable::from_rules([("reports", ["admin"])]).unwrap_err();
        assert!(matches!(err, PolicyError::Pattern { index: 0, .. }));
    }

    #[test]
    fn empty_table_is_rejected() {
        let rules: Vec<(&str, Vec<&str>)> = Vec::new();
        assert!(matches!(
            PolicyTable::from_rules(rules),
            Err(PolicyError::EmptyTable)
        ));
    }

    #[test]
    fn home_redirect_loop_is_rejected() {
        let err = PolicyTable::from_rules([("/tutor(.*)", ["admin"])]).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::UnreachableHome {
                role: Role::Tutor,
                ..
            }
        ));
    }

    #[test]
    fn shadowed_rules_are_reported() {
        let table =
            PolicyTable::from_rules([("/List(.*)", vec!["admin"]), ("/List/exams", vec!["student"])])
                .unwrap();
        assert_eq!(table.shadowed_rules(), vec![(1, 0)]);
    }

    #[test]
    fn json_document_is_loaded_in_order() {
        let json = r#"{"rules":[
            {"pattern":"/List/exams","roles":["Admin","student"]},
            {"pattern":"/List(.*)","roles":["admin"]}
        ]}"#;
        let table = PolicyTable::from_json_str("inline", json).unwrap();
        let rule = table.first_match("/List/exams/42").unwrap();
        assert_eq!(rule.pattern().as_str(), "/List/exams");
        assert!(rule.allows(Role::Student));
    }

    #[test]
    fn shipped_policy_file_matches_builtin_table() {
        let shipped = PolicyTable::from_json_str(
            "config/access-policy.json",
            include_str!("../../../config/access-policy.json"),
        )
        .unwrap();
        assert_eq!(shipped, PolicyTable::builtin().unwrap());
    }

    #[test]
    fn json_errors_are_reported() {
        assert!(matches!(
            PolicyTable::from_json_str("inline", "{\"rules\": 3}"),
            Err(PolicyError::Parse { .. })
        ));
    }
}
