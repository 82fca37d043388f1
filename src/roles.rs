#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tracing::info;

use crate::model::Course;

/// Roles an administrator may grant on a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseRole {
    /// Teaches the course; may view and manage enrolled students.
    Instructor,
    /// Edits course content.
    Editor,
}

impl fmt::Display for CourseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseRole::Instructor => write!(f, "instructor"),
            CourseRole::Editor => write!(f, "editor"),
        }
    }
}

impl FromStr for CourseRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instructor" | "instructors" => Ok(CourseRole::Instructor),
            "editor" | "editors" => Ok(CourseRole::Editor),
            other => anyhow::bail!("Unknown course role `{other}`"),
        }
    }
}

/// Principals holding each role on a course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignments {
    /// Usernames with the instructor role.
    #[serde(default)]
    instructors: BTreeSet<String>,
    /// Usernames with the editor role.
    #[serde(default)]
    editors:     BTreeSet<String>,
}

impl RoleAssignments {
    /// The set backing `role`.
    fn set(&self, role: CourseRole) -> &BTreeSet<String> {
        match role {
            CourseRole::Instructor => &self.instructors,
            CourseRole::Editor => &self.editors,
        }
    }

    /// The mutable set backing `role`.
    fn set_mut(&mut self, role: CourseRole) -> &mut BTreeSet<String> {
        match role {
            CourseRole::Instructor => &mut self.instructors,
            CourseRole::Editor => &mut self.editors,
        }
    }

    /// Whether `principal` holds `role`.
    pub fn has(&self, role: CourseRole, principal: &str) -> bool {
        self.set(role).contains(principal)
    }

    /// Principals holding `role`, sorted.
    pub fn principals(&self, role: CourseRole) -> impl Iterator<Item = &str> {
        self.set(role).iter().map(String::as_str)
    }

    /// True when nobody holds any role.
    pub fn is_empty(&self) -> bool {
        self.instructors.is_empty() && self.editors.is_empty()
    }

    /// Merges every assignment of `other` into `self`.
    pub fn merge(&mut self, other: &RoleAssignments) {
        self.instructors.extend(other.instructors.iter().cloned());
        self.editors.extend(other.editors.iter().cloned());
    }
}

/// One row of a course's role listing.
#[derive(Debug, Clone, PartialEq, Eq, Tabled, Serialize)]
pub struct RoleRow {
    /// Role held.
    #[tabled(rename = "Role")]
    pub role:      CourseRole,
    /// Username holding it.
    #[tabled(rename = "Principal")]
    pub principal: String,
}

/// Grants `role` to `principal`. Returns `false` when it was already held.
pub fn grant_role(course: &mut Course, role: CourseRole, principal: &str) -> bool {
    let added = course.roles.set_mut(role).insert(principal.to_string());
    if added {
        info!("Granted {role} on {} to {principal}", course.catalog.ntiid());
    }
    added
}

/// Revokes `role` from `principal`. Returns `false` when it was not held.
pub fn revoke_role(course: &mut Course, role: CourseRole, principal: &str) -> bool {
    let removed = course.roles.set_mut(role).remove(principal);
    if removed {
        info!("Revoked {role} on {} from {principal}", course.catalog.ntiid());
    }
    removed
}

/// All role assignments of `course`, instructors first.
pub fn course_roles(course: &Course) -> Vec<RoleRow> {
    [CourseRole::Instructor, CourseRole::Editor]
        .into_iter()
        .flat_map(|role| {
            course.roles.principals(role).map(move |p| RoleRow {
                role,
                principal: p.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_and_revoke_report_changes() {
        let mut course = Course::new("Fall2015", "CS1323", "tag:cs1323");
        assert!(grant_role(&mut course, CourseRole::Instructor, "harp4162"));
        assert!(!grant_role(&mut course, CourseRole::Instructor, "harp4162"));
        assert!(grant_role(&mut course, CourseRole::Editor, "jmadden"));

        let rows = course_roles(&course);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].role, CourseRole::Instructor);

        assert!(revoke_role(&mut course, CourseRole::Editor, "jmadden"));
        assert!(!revoke_role(&mut course, CourseRole::Editor, "jmadden"));
        assert!(!course.roles.has(CourseRole::Editor, "jmadden"));
    }

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!("Instructor".parse::<CourseRole>().unwrap(), CourseRole::Instructor);
        assert_eq!("editors".parse::<CourseRole>().unwrap(), CourseRole::Editor);
        assert!("student".parse::<CourseRole>().is_err());
    }
}
