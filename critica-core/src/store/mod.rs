//! SQLx repositories over PostgreSQL.
//!
//! All SQL lives here. Uniqueness is pre-checked where a friendlier error is
//! wanted, but the database constraints stay authoritative: a constraint
//! violation that slips past a pre-check (e.g. two racing duplicate-review
//! inserts) is mapped back to the matching domain error after the fact.

mod catalog;
mod reviews;
mod users;

pub use catalog::{CatalogRepo, TermKind};
pub use reviews::ReviewRepo;
pub use users::UserRepo;

/// Name of the violated constraint, when `err` is a unique violation.
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => db.constraint(),
        _ => None,
    }
}
