#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::{Deserialize, Serialize};

use crate::{
    error::{AdminError, AdminResult},
    model::Course,
    roles::CourseRole,
};

/// Who is asking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Username.
    pub username:   String,
    /// Holds the site administrator role.
    #[serde(default)]
    pub site_admin: bool,
}

impl Principal {
    /// An ordinary user.
    pub fn user(username: impl Into<String>) -> Self {
        Self {
            username:   username.into(),
            site_admin: false,
        }
    }

    /// A site administrator.
    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            username:   username.into(),
            site_admin: true,
        }
    }
}

/// Decides whether a principal may act on a course.
pub trait AccessPolicy: Send + Sync {
    /// Whether `principal` is allowed on `course`.
    fn allows(&self, principal: &Principal, course: &Course) -> bool;
}

/// Allows site administrators, on every course.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteAdminPolicy;

impl AccessPolicy for SiteAdminPolicy {
    fn allows(&self, principal: &Principal, _course: &Course) -> bool {
        principal.site_admin
    }
}

/// Allows holders of a role on the course.
#[derive(Debug, Clone, Copy)]
pub struct RolePolicy(pub CourseRole);

impl AccessPolicy for RolePolicy {
    fn allows(&self, principal: &Principal, course: &Course) -> bool {
        course.roles.has(self.0, &principal.username)
    }
}

/// Allows when any of its policies does.
#[derive(Default)]
pub struct AnyOf(Vec<Box<dyn AccessPolicy>>);

impl AnyOf {
    /// Adds `policy` to the alternatives.
    pub fn or(mut self, policy: impl AccessPolicy + 'static) -> Self {
        self.0.push(Box::new(policy));
        self
    }
}

impl AccessPolicy for AnyOf {
    fn allows(&self, principal: &Principal, course: &Course) -> bool {
        self.0.iter().any(|p| p.allows(principal, course))
    }
}

/// Allows when every one of its policies does. Empty allows nothing.
#[derive(Default)]
pub struct AllOf(Vec<Box<dyn AccessPolicy>>);

impl AllOf {
    /// Adds `policy` to the requirements.
    pub fn and(mut self, policy: impl AccessPolicy + 'static) -> Self {
        self.0.push(Box::new(policy));
        self
    }
}

impl AccessPolicy for AllOf {
    fn allows(&self, principal: &Principal, course: &Course) -> bool {
        !self.0.is_empty() && self.0.iter().all(|p| p.allows(principal, course))
    }
}

/// Site administrators or instructors of the course.
pub fn teaching_policy() -> AnyOf {
    AnyOf::default()
        .or(SiteAdminPolicy)
        .or(RolePolicy(CourseRole::Instructor))
}

/// Site administrators, editors or instructors of the course.
pub fn editing_policy() -> AnyOf {
    teaching_policy().or(RolePolicy(CourseRole::Editor))
}

/// Whether `principal` may teach `course`.
pub fn can_teach(principal: &Principal, course: &Course) -> bool {
    teaching_policy().allows(principal, course)
}

/// Whether `principal` may edit the content of `course`.
pub fn can_edit(principal: &Principal, course: &Course) -> bool {
    editing_policy().allows(principal, course)
}

/// Whether `principal` may run administrative operations (create, import,
/// export, lock, grant roles).
pub fn is_admin(principal: &Principal) -> bool {
    principal.site_admin
}

/// Fails with `PermissionDenied` unless `policy` allows `principal` to
/// `action` on `course`. Without a principal every check passes.
pub fn authorize(
    principal: Option<&Principal>,
    policy: &dyn AccessPolicy,
    course: &Course,
    action: &str,
) -> AdminResult<()> {
    match principal {
        Some(p) if !policy.allows(p, course) => Err(AdminError::PermissionDenied {
            principal: p.username.clone(),
            action:    action.to_string(),
            course:    course.catalog.ntiid().to_string(),
        }),
        _ => Ok(()),
    }
}

/// Fails with `PermissionDenied` unless `principal`, when present, is a
/// site administrator. `target` names what `action` applies to.
pub fn require_admin(
    principal: Option<&Principal>,
    action: &str,
    target: &str,
) -> AdminResult<()> {
    match principal {
        Some(p) if !is_admin(p) => Err(AdminError::PermissionDenied {
            principal: p.username.clone(),
            action:    action.to_string(),
            course:    target.to_string(),
        }),
        _ => Ok(()),
    }
}
