//! Per-operation authorization decisions, checked before any mutation.

use uuid::Uuid;

use crate::entities::user::UserRole;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
}

impl Decision {
    pub fn check(self) -> AppResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(AppError::Forbidden(reason.to_string())),
        }
    }
}

fn is_admin(claims: &Claims) -> bool {
    claims.role == UserRole::Admin
}

/// Movie create/edit/delete is reserved for admins. The admin router layer
/// enforces this too; handlers still ask so the rule is visible at the call
/// site.
pub fn manage_movies(claims: &Claims) -> Decision {
    if is_admin(claims) {
        Decision::Allow
    } else {
        Decision::Deny("Admin access required")
    }
}

/// The full booking list is admin-only.
pub fn list_all_bookings(claims: &Claims) -> Decision {
    if is_admin(claims) {
        Decision::Allow
    } else {
        Decision::Deny("Admin access required")
    }
}

/// Admins may view any booking, other users only their own.
pub fn view_booking(claims: &Claims, owner_id: Uuid) -> Decision {
    if is_admin(claims) || claims.sub == owner_id {
        Decision::Allow
    } else {
        Decision::Deny("You may only view your own bookings")
    }
}

/// Same rule as viewing: owner or admin. The owner is taken from the stored
/// row, never from a submitted body.
pub fn edit_booking(claims: &Claims, owner_id: Uuid) -> Decision {
    if is_admin(claims) || claims.sub == owner_id {
        Decision::Allow
    } else {
        Decision::Deny("You may only edit your own bookings")
    }
}

/// Deletion is owner-only; admins get no override here.
pub fn delete_booking(claims: &Claims, owner_id: Uuid) -> Decision {
    if claims.sub == owner_id {
        Decision::Allow
    } else {
        Decision::Deny("You may only cancel your own bookings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(role: UserRole) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn test_admin_views_any_booking() {
        let admin = claims(UserRole::Admin);
        assert_eq!(view_booking(&admin, Uuid::new_v4()), Decision::Allow);
    }

    #[test]
    fn test_user_views_only_own_booking() {
        let user = claims(UserRole::User);
        assert_eq!(view_booking(&user, user.sub), Decision::Allow);
        assert!(matches!(
            view_booking(&user, Uuid::new_v4()),
            Decision::Deny(_)
        ));
    }

    #[test]
    fn test_edit_owner_or_admin() {
        let admin = claims(UserRole::Admin);
        let user = claims(UserRole::User);
        assert_eq!(edit_booking(&admin, Uuid::new_v4()), Decision::Allow);
        assert_eq!(edit_booking(&user, user.sub), Decision::Allow);
        assert!(matches!(
            edit_booking(&user, Uuid::new_v4()),
            Decision::Deny(_)
        ));
    }

    #[test]
    fn test_delete_is_owner_only_even_for_admin() {
        let admin = claims(UserRole::Admin);
        let user = claims(UserRole::User);
        assert_eq!(delete_booking(&user, user.sub), Decision::Allow);
        assert!(matches!(
            delete_booking(&admin, Uuid::new_v4()),
            Decision::Deny(_)
        ));
        assert_eq!(delete_booking(&admin, admin.sub), Decision::Allow);
    }

    #[test]
    fn test_full_booking_list_requires_admin() {
        assert_eq!(list_all_bookings(&claims(UserRole::Admin)), Decision::Allow);
        assert!(matches!(
            list_all_bookings(&claims(UserRole::User)),
            Decision::Deny(_)
        ));
    }

    #[test]
    fn test_movie_management_requires_admin() {
        assert_eq!(manage_movies(&claims(UserRole::Admin)), Decision::Allow);
        assert!(matches!(
            manage_movies(&claims(UserRole::User)),
            Decision::Deny(_)
        ));
    }

    #[test]
    fn test_deny_maps_to_forbidden() {
        let err = Decision::Deny("nope").check().unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
