pub mod handlers;
pub mod jwt;
pub mod middleware;

use critica_core::policy::{Action, Actor, Target, can_perform};

use crate::infra::errors::AppError;

/// Gate an action on the policy. Anonymous denials surface as 401, known
/// actors get a bare 403 with no hint of which rule would have granted it.
pub fn authorize(actor: Actor, action: Action, target: Target) -> Result<(), AppError> {
    if can_perform(actor, action, target) {
        return Ok(());
    }
    match actor {
        Actor::Anonymous => Err(AppError::unauthorized("Authentication required")),
        Actor::Known { .. } => Err(AppError::forbidden("Permission denied")),
    }
}

/// Require an authenticated actor, yielding its id and role.
pub fn require_known(actor: Actor) -> Result<(uuid::Uuid, critica_core::user::Role), AppError> {
    match actor {
        Actor::Known { id, role } => Ok((id, role)),
        Actor::Anonymous => Err(AppError::unauthorized("Authentication required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use critica_core::user::Role;
    use uuid::Uuid;

    #[test]
    fn anonymous_mutation_is_401_not_403() {
        let err = authorize(Actor::Anonymous, Action::Create, Target::Title).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn known_actor_denial_is_403() {
        let actor = Actor::Known {
            id: Uuid::now_v7(),
            role: Role::User,
        };
        let err = authorize(actor, Action::Create, Target::Title).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "Permission denied");
    }
}
