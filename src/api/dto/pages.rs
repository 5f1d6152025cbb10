/*
 * Responsibility
 * - ページ handler のレスポンス DTO
 * - 一覧ページで扱うエンティティ名 (URL の /List/{entity}) の解釈
 */
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::access::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListEntity {
    Tutors,
    Students,
    Parents,
    Subjects,
    Classes,
    Lessons,
    Exams,
    Assignments,
    Results,
    Attendance,
    Events,
    Announcements,
    Materials,
}

impl FromStr for ListEntity {
    type Err = ();

    // URL segment is matched exactly; the access policy is case-sensitive too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "tutors" => Self::Tutors,
            "students" => Self::Students,
            "parents" => Self::Parents,
            "subjects" => Self::Subjects,
            "classes" => Self::Classes,
            "lessons" => Self::Lessons,
            "exams" => Self::Exams,
            "assignments" => Self::Assignments,
            "results" => Self::Results,
            "attendance" => Self::Attendance,
            "events" => Self::Events,
            "announcements" => Self::Announcements,
            "materials" => Self::Materials,
            _ => return Err(()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub page: &'static str,
    pub dashboard: Role,
    pub viewer: Viewer,
}

#[derive(Debug, Serialize)]
pub struct ListPage {
    pub page: &'static str,
    pub entity: ListEntity,
    pub viewer: Viewer,
    // rows come from the data service; the portal shell renders an empty table
    pub items: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub page: &'static str,
    pub viewer: Viewer,
    pub home: String,
    pub session_expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct SignInPage {
    pub page: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Viewer {
    pub subject: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_entity_parses_exact_segments_only() {
        assert_eq!("exams".parse::<ListEntity>(), Ok(ListEntity::Exams));
        assert_eq!("materials".parse::<ListEntity>(), Ok(ListEntity::Materials));
        assert!("Exams".parse::<ListEntity>().is_err());
        assert!("grades".parse::<ListEntity>().is_err());
    }

    #[test]
    fn list_entity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ListEntity::Announcements).unwrap(),
            "\"announcements\""
        );
    }
}
