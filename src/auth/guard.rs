//! Central authorization guard. Every protected route asks this module for
//! a decision once instead of repeating role comparisons inline.

use crate::auth::auth::AuthUser;
use crate::errors::ApiError;
use crate::model::role::Role;

/// Row-visibility restriction applied to a query.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Scope {
    /// Restrict queries and mutations to the caller's own records.
    Own,
    /// Administrator view: any record, any owner.
    All,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    LogAttendance,
    ReadAttendance,
    RequestLeave,
    ReadLeaves,
    DecideLeave,
    ListEmployees,
    ManageEmployees,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DenyReason {
    Unauthenticated,
    Forbidden,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Decision {
    Allow(Scope),
    Deny(DenyReason),
}

/// Deterministic rule table: (session, action) -> decision. No side effects.
pub fn authorize(session: Option<&AuthUser>, action: Action) -> Decision {
    let Some(user) = session else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    match (action, user.role) {
        // Everyone logs attendance and requests leave for themselves.
        (Action::LogAttendance | Action::RequestLeave, _) => Decision::Allow(Scope::Own),

        // Reads are scoped by role.
        (
            Action::ReadAttendance | Action::ReadLeaves | Action::ListEmployees,
            Role::Admin,
        ) => Decision::Allow(Scope::All),
        (
            Action::ReadAttendance | Action::ReadLeaves | Action::ListEmployees,
            Role::Manager | Role::Employee,
        ) => Decision::Allow(Scope::Own),

        // Leave decisions and account management are admin-only.
        (Action::DecideLeave | Action::ManageEmployees, Role::Admin) => {
            Decision::Allow(Scope::All)
        }
        (Action::DecideLeave | Action::ManageEmployees, Role::Manager | Role::Employee) => {
            Decision::Deny(DenyReason::Forbidden)
        }
    }
}

impl Decision {
    pub fn require(self) -> Result<Scope, ApiError> {
        match self {
            Decision::Allow(scope) => Ok(scope),
            Decision::Deny(DenyReason::Unauthenticated) => Err(ApiError::Unauthenticated),
            Decision::Deny(DenyReason::Forbidden) => Err(ApiError::Forbidden),
        }
    }
}

impl Scope {
    /// Resolves the user id a listing actually filters on. An explicit
    /// `user_id` query parameter is honored only under `All`; otherwise it
    /// is silently ignored, so scope cannot be escalated from the query
    /// string.
    pub fn visible_user(self, caller_id: u64, requested: Option<u64>) -> u64 {
        match self {
            Scope::All => requested.unwrap_or(caller_id),
            Scope::Own => caller_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: 10,
            email: "u@company.com".into(),
            name: "U".into(),
            role,
        }
    }

    #[test]
    fn missing_session_is_unauthenticated() {
        for action in [
            Action::LogAttendance,
            Action::ReadAttendance,
            Action::RequestLeave,
            Action::ReadLeaves,
            Action::DecideLeave,
            Action::ListEmployees,
            Action::ManageEmployees,
        ] {
            assert_eq!(
                authorize(None, action),
                Decision::Deny(DenyReason::Unauthenticated)
            );
        }
    }

    #[test]
    fn everyone_writes_own_records() {
        for role in [Role::Admin, Role::Manager, Role::Employee] {
            let u = user(role);
            assert_eq!(
                authorize(Some(&u), Action::LogAttendance),
                Decision::Allow(Scope::Own)
            );
            assert_eq!(
                authorize(Some(&u), Action::RequestLeave),
                Decision::Allow(Scope::Own)
            );
        }
    }

    #[test]
    fn reads_scope_by_role() {
        let admin = user(Role::Admin);
        assert_eq!(
            authorize(Some(&admin), Action::ReadAttendance),
            Decision::Allow(Scope::All)
        );
        assert_eq!(
            authorize(Some(&admin), Action::ReadLeaves),
            Decision::Allow(Scope::All)
        );

        for role in [Role::Manager, Role::Employee] {
            let u = user(role);
            assert_eq!(
                authorize(Some(&u), Action::ReadAttendance),
                Decision::Allow(Scope::Own)
            );
            assert_eq!(
                authorize(Some(&u), Action::ReadLeaves),
                Decision::Allow(Scope::Own)
            );
        }
    }

    #[test]
    fn admin_only_actions() {
        let admin = user(Role::Admin);
        assert_eq!(
            authorize(Some(&admin), Action::DecideLeave),
            Decision::Allow(Scope::All)
        );
        assert_eq!(
            authorize(Some(&admin), Action::ManageEmployees),
            Decision::Allow(Scope::All)
        );

        for role in [Role::Manager, Role::Employee] {
            let u = user(role);
            assert_eq!(
                authorize(Some(&u), Action::DecideLeave),
                Decision::Deny(DenyReason::Forbidden)
            );
            assert_eq!(
                authorize(Some(&u), Action::ManageEmployees),
                Decision::Deny(DenyReason::Forbidden)
            );
        }
    }

    #[test]
    fn require_maps_to_errors() {
        assert!(matches!(
            Decision::Allow(Scope::Own).require(),
            Ok(Scope::Own)
        ));
        assert!(matches!(
            Decision::Deny(DenyReason::Unauthenticated).require(),
            Err(ApiError::Unauthenticated)
        ));
        assert!(matches!(
            Decision::Deny(DenyReason::Forbidden).require(),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn foreign_filter_is_ignored_without_all_scope() {
        // A non-admin passing someone else's user id still only sees
        // their own rows.
        assert_eq!(Scope::Own.visible_user(10, Some(99)), 10);
        assert_eq!(Scope::Own.visible_user(10, None), 10);
        assert_eq!(Scope::All.visible_user(10, Some(99)), 99);
        assert_eq!(Scope::All.visible_user(10, None), 10);
    }
}
