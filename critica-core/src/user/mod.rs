//! User identities, roles and signup payloads.
//!
//! Usernames follow the platform rules: word characters plus `.@+-`, at most
//! 150 characters, and never the literal `me` (reserved for the self-profile
//! endpoint).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::error::{DomainError, Result};

pub const USERNAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;

static USERNAME_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[\w.@+-]+$").expect("valid username pattern"));

/// Platform role. Stored as text; the broadest role wins wherever rules
/// overlap (see [`crate::policy`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_moderator(&self) -> bool {
        matches!(self, Role::Moderator)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

/// A registered identity. `confirmation_hash` holds the digest of the
/// last-issued confirmation code; issuing a new code supersedes it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub confirmation_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public representation of a user, as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub role: Role,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
        }
    }
}

/// JWT claims. Username and role are captured at issuance time; role
/// changes only take effect once the caller re-authenticates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Signup payload: the only two fields a caller may supply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
}

/// Code-for-token exchange payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

/// Admin user-creation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreateRequest {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Partial user update. `role` is honored only on the admin path; the
/// self-profile endpoint ignores it entirely.
///
/// Omitted fields stay unchanged; an explicit JSON `null` reads the same as
/// omission, so optional fields such as `bio` cannot be cleared via PATCH.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdateRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

/// Validate a username against the platform rules.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.chars().count() > USERNAME_MAX_LEN {
        return Err(DomainError::InvalidUsername(format!(
            "must be between 1 and {USERNAME_MAX_LEN} characters"
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(DomainError::InvalidUsername(
            "only word characters and .@+- are allowed".to_string(),
        ));
    }
    if username == "me" {
        return Err(DomainError::InvalidUsername(
            "`me` is reserved".to_string(),
        ));
    }
    Ok(())
}

/// Minimal shape check for an email address. Full deliverability is the
/// notification collaborator's problem.
pub fn validate_email(email: &str) -> Result<()> {
    let valid = email.chars().count() <= EMAIL_MAX_LEN
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(DomainError::invalid_field("email", "not a valid email address"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("alice.bob+review@host").is_ok());
        assert!(validate_username("under_score-99").is_ok());
    }

    #[test]
    fn invalid_usernames() {
        assert!(validate_username("").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
        assert!(validate_username("spaced name").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn username_length_counts_characters() {
        // Two bytes per character; the limit is on characters, not bytes
        assert!(validate_username(&"ё".repeat(USERNAME_MAX_LEN)).is_ok());
        assert!(validate_username(&"ё".repeat(USERNAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn me_is_reserved() {
        assert!(matches!(
            validate_username("me"),
            Err(DomainError::InvalidUsername(_))
        ));
        // Substrings are fine, only the exact literal is reserved
        assert!(validate_username("memento").is_ok());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@nodot").is_err());
    }

    #[test]
    fn role_round_trip() {
        for role in [Role::User, Role::Moderator, Role::Admin] {
            assert_eq!(Role::try_from(role.as_str().to_string()), Ok(role));
        }
        assert!(Role::try_from("superuser".to_string()).is_err());
    }

    #[test]
    fn role_defaults_to_user() {
        assert_eq!(Role::default(), Role::User);
        let req: UserCreateRequest =
            serde_json::from_str(r#"{"username": "alice", "email": "a@b.co"}"#).unwrap();
        assert_eq!(req.role, Role::User);
    }

    #[test]
    fn signup_payload_has_no_role_field() {
        // Extra fields in the payload are dropped, not applied
        let req: SignupRequest = serde_json::from_str(
            r#"{"username": "alice", "email": "a@b.co", "role": "admin"}"#,
        )
        .unwrap();
        assert_eq!(req.username, "alice");
    }
}
