use crate::model::{id::UserId, role::Role};
use shared::error::{AppError, AppResult};

/// The authenticated identity on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn can(&self, permission: Permission) -> bool {
        match (self.role, permission) {
            (Role::Admin, _) => true,
            (Role::User, Permission::ActFor(owner)) => owner == self.user_id,
            (Role::User, _) => false,
        }
    }

    pub fn authorize(&self, permission: Permission) -> AppResult<()> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(AppError::ForbiddenOperation)
        }
    }

    /// Like `authorize`, but a refusal reads exactly like a missing `entity`,
    /// so reads do not disclose what exists.
    pub fn authorize_or_hide(&self, permission: Permission, entity: &str) -> AppResult<()> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(AppError::EntityNotFound(format!("specified {entity} not found")))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Create, update or delete trips, destinations and guides.
    ManageCatalog,
    /// List users and change roles.
    ManageUsers,
    ViewActivityLogs,
    /// Read or modify data owned by the given user.
    ActFor(UserId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Permission::ManageCatalog)]
    #[case(Permission::ManageUsers)]
    #[case(Permission::ViewActivityLogs)]
    #[case(Permission::ActFor(UserId::new()))]
    fn admin_holds_every_permission(#[case] permission: Permission) {
        let admin = Caller::new(UserId::new(), Role::Admin);
        assert!(admin.authorize(permission).is_ok());
    }

    #[rstest]
    #[case(Permission::ManageCatalog)]
    #[case(Permission::ManageUsers)]
    #[case(Permission::ViewActivityLogs)]
    #[case(Permission::ActFor(UserId::new()))]
    fn user_is_forbidden_outside_own_data(#[case] permission: Permission) {
        let user = Caller::new(UserId::new(), Role::User);
        assert!(matches!(
            user.authorize(permission),
            Err(AppError::ForbiddenOperation)
        ));
    }

    #[test]
    fn hidden_refusal_matches_a_missing_entity() {
        let owner = UserId::new();
        let stranger = Caller::new(UserId::new(), Role::User);

        let refused = stranger.authorize_or_hide(Permission::ActFor(owner), "registration");
        assert!(matches!(
            refused,
            Err(AppError::EntityNotFound(ref message)) if message == "specified registration not found"
        ));
        assert!(Caller::new(owner, Role::User)
            .authorize_or_hide(Permission::ActFor(owner), "registration")
            .is_ok());
    }

    #[test]
    fn user_may_act_for_self() {
        let user_id = UserId::new();
        let user = Caller::new(user_id, Role::User);
        assert!(user.can(Permission::ActFor(user_id)));
    }
}
