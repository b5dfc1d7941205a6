//! Classification of PostgreSQL errors.

/// Name of the unique constraint on `link_mapping.short_link`.
pub const SHORT_LINK_UNIQUE_CONSTRAINT: &str = "link_mapping_short_link_key";

/// Returns true if `e` is a unique violation on the short code column.
///
/// Violations of any other constraint are not collisions and must not be retried.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SHORT_LINK_UNIQUE_CONSTRAINT))
}

/// Unique constraint on `users.user_name`.
pub const USER_NAME_UNIQUE_CONSTRAINT: &str = "users_user_name_key";

/// Unique constraint on `users.email`.
pub const USER_EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// Name of the constraint `e` violated, if it is a unique violation.
pub fn violated_unique_constraint(e: &sqlx::Error) -> Option<&str> {
    e.as_database_error()
        .filter(|db_err| db_err.is_unique_violation())
        .and_then(|db_err| db_err.constraint())
}
