//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PROVIDER: &str = "emprendedor";
pub const ROLE_USER: &str = "usuario";

/// Whether the role carries administrative capability over reservations.
pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}
