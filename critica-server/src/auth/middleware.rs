use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use critica_core::policy::Actor;

use super::jwt;
use crate::infra::app_state::AppState;

/// Resolve the acting identity for every request. A missing or invalid
/// bearer token degrades to [`Actor::Anonymous`]; mutations then fail at
/// the policy gate instead of here, so public reads stay open.
pub async fn identify(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let actor = resolve_actor(&request, &state.auth.jwt_secret);
    request.extensions_mut().insert(actor);
    next.run(request).await
}

fn resolve_actor(request: &Request, jwt_secret: &str) -> Actor {
    if let Some(token) = extract_bearer_token(request)
        && let Ok(claims) = jwt::verify(&token, jwt_secret)
    {
        return Actor::Known {
            id: claims.sub,
            role: claims.role,
        };
    }
    Actor::Anonymous
}

fn extract_bearer_token(request: &Request) -> Option<String> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;

    auth_header
        .strip_prefix("Bearer ")
        .map(|token| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use chrono::Utc;
    use critica_core::user::{Role, User};
    use uuid::Uuid;

    fn request_with_auth(value: &str) -> Request {
        Request::builder()
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

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
    fn valid_token_resolves_to_known_actor() {
        let user = sample_user(Role::Moderator);
        let token = jwt::mint(&user, "secret", 3600).unwrap();
        let request = request_with_auth(&format!("Bearer {token}"));

        assert_eq!(
            resolve_actor(&request, "secret"),
            Actor::Known {
                id: user.id,
                role: Role::Moderator,
            }
        );
    }

    #[test]
    fn bad_or_missing_token_degrades_to_anonymous() {
        let user = sample_user(Role::User);
        let token = jwt::mint(&user, "secret", 3600).unwrap();

        let wrong_secret = request_with_auth(&format!("Bearer {token}"));
        assert_eq!(resolve_actor(&wrong_secret, "other-secret"), Actor::Anonymous);

        let no_header = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(resolve_actor(&no_header, "secret"), Actor::Anonymous);
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(
            extract_bearer_token(&request_with_auth("Bearer abc.def.ghi")),
            Some("abc.def.ghi".to_string())
        );
        assert_eq!(extract_bearer_token(&request_with_auth("Basic dXNlcg==")), None);
        assert_eq!(
            extract_bearer_token(&Request::builder().body(Body::empty()).unwrap()),
            None
        );
    }
}
