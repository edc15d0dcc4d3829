use crate::models::users::Roles;

/// Whether `actor` may move a user from `current` to `requested`.
///
/// Admin-level grants, and any change to a super admin, are reserved for
/// super admins.
pub fn can_assign_role(actor: &Roles, current: &Roles, requested: &Roles) -> bool {
    if *actor == Roles::SuperAdmin {
        return true;
    }
    let privileged = |role: &Roles| matches!(role, Roles::Admin | Roles::SuperAdmin);
    !privileged(requested) && *current != Roles::SuperAdmin
}

/// Whether `actor` may edit or (de)activate an account holding `target`.
pub fn can_manage(actor: &Roles, target: &Roles) -> bool {
    match target {
        Roles::SuperAdmin => *actor == Roles::SuperAdmin,
        Roles::Admin => matches!(actor, Roles::Admin | Roles::SuperAdmin),
        _ => actor.is_admin_level(),
    }
}
