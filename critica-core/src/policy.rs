//! Capability checks gating every mutation.
//!
//! [`can_perform`] is a pure function of the acting identity, the attempted
//! action and the targeted resource. Rules combine with logical OR: the
//! broadest matching grant wins and there is no deny-override. Callers must
//! consult the policy before touching the resource graph and surface a bare
//! permission denial, never the rule that would have granted access.

use uuid::Uuid;

use crate::user::Role;

/// The identity behind a request, passed explicitly into every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    Known { id: Uuid, role: Role },
}

impl Actor {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Actor::Anonymous => None,
            Actor::Known { id, .. } => Some(*id),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Actor::Anonymous => None,
            Actor::Known { role, .. } => Some(*role),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(|r| r.is_admin())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn is_read(&self) -> bool {
        matches!(self, Action::List | Action::Get)
    }
}

/// The targeted resource. Reviews and comments carry their author so
/// ownership rules can apply; `author` is `None` at creation time when no
/// row exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Category,
    Genre,
    Title,
    /// Administrative user records, including role changes.
    UserAccount,
    Review { author: Option<Uuid> },
    Comment { author: Option<Uuid> },
}

impl Target {
    fn author(&self) -> Option<Uuid> {
        match self {
            Target::Review { author } | Target::Comment { author } => *author,
            _ => None,
        }
    }

    fn is_user_content(&self) -> bool {
        matches!(self, Target::Review { .. } | Target::Comment { .. })
    }
}

/// Decide whether `actor` may apply `action` to `target`.
pub fn can_perform(actor: Actor, action: Action, target: Target) -> bool {
    // Reads are open to everyone except the user admin surface
    if action.is_read() {
        return !matches!(target, Target::UserAccount) || actor.is_admin();
    }

    let Actor::Known { id, role } = actor else {
        return false;
    };

    // Admins may do anything
    if role.is_admin() {
        return true;
    }

    if target.is_user_content() {
        // Any authenticated user may author content
        if action == Action::Create {
            return true;
        }
        // Moderators curate all reviews and comments
        if role.is_moderator() {
            return true;
        }
        // Authors keep control of their own content
        if target.author() == Some(id) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: Uuid) -> Actor {
        Actor::Known {
            id,
            role: Role::User,
        }
    }

    fn moderator() -> Actor {
        Actor::Known {
            id: Uuid::now_v7(),
            role: Role::Moderator,
        }
    }

    fn admin() -> Actor {
        Actor::Known {
            id: Uuid::now_v7(),
            role: Role::Admin,
        }
    }

    #[test]
    fn anonymous_reads_but_never_writes() {
        for target in [
            Target::Category,
            Target::Genre,
            Target::Title,
            Target::Review { author: None },
            Target::Comment { author: None },
        ] {
            assert!(can_perform(Actor::Anonymous, Action::List, target));
            assert!(can_perform(Actor::Anonymous, Action::Get, target));
            assert!(!can_perform(Actor::Anonymous, Action::Create, target));
            assert!(!can_perform(Actor::Anonymous, Action::Delete, target));
        }
    }

    #[test]
    fn users_own_their_content() {
        let id = Uuid::now_v7();
        let mine = Target::Review { author: Some(id) };
        let theirs = Target::Review {
            author: Some(Uuid::now_v7()),
        };

        assert!(can_perform(user(id), Action::Create, Target::Review { author: None }));
        assert!(can_perform(user(id), Action::Update, mine));
        assert!(can_perform(user(id), Action::Delete, mine));
        assert!(!can_perform(user(id), Action::Update, theirs));
        assert!(!can_perform(user(id), Action::Delete, theirs));
    }

    #[test]
    fn users_cannot_touch_the_catalog() {
        let actor = user(Uuid::now_v7());
        for target in [Target::Category, Target::Genre, Target::Title] {
            assert!(can_perform(actor, Action::Get, target));
            assert!(!can_perform(actor, Action::Create, target));
            assert!(!can_perform(actor, Action::Update, target));
            assert!(!can_perform(actor, Action::Delete, target));
        }
    }

    #[test]
    fn moderators_curate_any_review_or_comment() {
        let someone_else = Target::Comment {
            author: Some(Uuid::now_v7()),
        };
        assert!(can_perform(moderator(), Action::Update, someone_else));
        assert!(can_perform(moderator(), Action::Delete, someone_else));
        // But the catalog stays admin-only
        assert!(!can_perform(moderator(), Action::Create, Target::Title));
        assert!(!can_perform(moderator(), Action::Delete, Target::Category));
    }

    #[test]
    fn admins_are_unrestricted() {
        let foreign_review = Target::Review {
            author: Some(Uuid::now_v7()),
        };
        for target in [
            Target::Category,
            Target::Genre,
            Target::Title,
            Target::UserAccount,
            foreign_review,
        ] {
            for action in [
                Action::List,
                Action::Get,
                Action::Create,
                Action::Update,
                Action::Delete,
            ] {
                assert!(can_perform(admin(), action, target));
            }
        }
    }

    #[test]
    fn user_accounts_are_admin_only_even_for_reads() {
        assert!(!can_perform(Actor::Anonymous, Action::List, Target::UserAccount));
        assert!(!can_perform(user(Uuid::now_v7()), Action::Get, Target::UserAccount));
        assert!(!can_perform(moderator(), Action::List, Target::UserAccount));
        assert!(can_perform(admin(), Action::List, Target::UserAccount));
    }
}
