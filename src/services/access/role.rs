/*
 * Responsibility
 * - ポータルのロール (admin / tutor / student / parent) を閉じた enum で表す
 * - 文字列からの変換は大文字小文字を区別しない (policy 定義側・claim 側で同じ正規化)
 * - 各ロールの「ホーム」(拒否時のリダイレクト先) を決める
 */
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Admin,
    Tutor,
    Student,
    Parent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleParseError {
    Empty,
    Unknown(String),
}

impl fmt::Display for RoleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleParseError::Empty => write!(f, "role is empty"),
            RoleParseError::Unknown(role) => write!(f, "unknown role: {}", role),
        }
    }
}

impl std::error::Error for RoleParseError {}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Tutor, Role::Student, Role::Parent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Tutor => "tutor",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }

    /// Where a caller with this role is sent when a rule denies them.
    pub fn home_path(&self) -> String {
        format!("/{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RoleParseError::Empty);
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "tutor" => Ok(Role::Tutor),
            "student" => Ok(Role::Student),
            "parent" => Ok(Role::Parent),
            _ => Err(RoleParseError::Unknown(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = RoleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
