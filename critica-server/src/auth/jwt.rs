use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use critica_core::user::{Claims, User};

/// Mint an access token for a confirmed user. Username and role are frozen
/// into the claims; a role change only shows up after re-authentication.
pub fn mint(
    user: &User,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::seconds(ttl_secs);

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

pub fn verify(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use critica_core::user::Role;
    use uuid::Uuid;

    fn sample_user(role: Role) -> User {
        User {
            id: Uuid::now_v7(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: None,
            last_name: None,
            bio: None,
            role,
            confirmation_hash: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn round_trip_preserves_identity_and_role() {
        let user = sample_user(Role::Moderator);
        let token = mint(&user, "secret", 3600).unwrap();
        let claims = verify(&token, "secret").unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Moderator);
    }

    #[test]
    fn wrong_secret_fails() {
        let token = mint(&sample_user(Role::User), "secret", 3600).unwrap();
        assert!(verify(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_token_fails() {
        let token = mint(&sample_user(Role::User), "secret", -120).unwrap();
        assert!(verify(&token, "secret").is_err());
    }
}
