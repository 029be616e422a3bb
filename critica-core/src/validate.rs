//! Ordered validation rules per payload.
//!
//! Each payload carries an explicit, ordered list of rules; every rule is a
//! pure function from the payload to a result. Rules run in declaration
//! order and the first failure is returned with field-level detail.
//! Uniqueness pre-checks live in [`crate::store`], next to the constraints
//! that remain authoritative.

use crate::catalog::{self, TermPayload, TitleDraft, TitlePatch};
use crate::error::Result;
use crate::review::{self, CommentCreate, CommentPatch, ReviewCreate, ReviewPatch};
use crate::user::{self, SignupRequest, TokenRequest, UserCreateRequest, UserUpdateRequest};

/// One validation rule: the field it covers and the check itself.
#[derive(Debug)]
pub struct Rule<T: 'static> {
    pub field: &'static str,
    pub check: fn(&T) -> Result<()>,
}

/// A payload with an ordered rule list.
pub trait Validate: Sized + 'static {
    const RULES: &'static [Rule<Self>];

    fn validate(&self) -> Result<()> {
        for rule in Self::RULES {
            (rule.check)(self)?;
        }
        Ok(())
    }
}

fn signup_username(p: &SignupRequest) -> Result<()> {
    user::validate_username(&p.username)
}

fn signup_email(p: &SignupRequest) -> Result<()> {
    user::validate_email(&p.email)
}

impl Validate for SignupRequest {
    const RULES: &'static [Rule<Self>] = &[
        Rule { field: "username", check: signup_username },
        Rule { field: "email", check: signup_email },
    ];
}

fn token_username(p: &TokenRequest) -> Result<()> {
    user::validate_username(&p.username)
}

fn token_code(p: &TokenRequest) -> Result<()> {
    if p.confirmation_code.is_empty() {
        return Err(crate::DomainError::invalid_field(
            "confirmation_code",
            "must not be empty",
        ));
    }
    Ok(())
}

impl Validate for TokenRequest {
    const RULES: &'static [Rule<Self>] = &[
        Rule { field: "username", check: token_username },
        Rule { field: "confirmation_code", check: token_code },
    ];
}

fn create_username(p: &UserCreateRequest) -> Result<()> {
    user::validate_username(&p.username)
}

fn create_email(p: &UserCreateRequest) -> Result<()> {
    user::validate_email(&p.email)
}

impl Validate for UserCreateRequest {
    const RULES: &'static [Rule<Self>] = &[
        Rule { field: "username", check: create_username },
        Rule { field: "email", check: create_email },
    ];
}

fn update_email(p: &UserUpdateRequest) -> Result<()> {
    match &p.email {
        Some(email) => user::validate_email(email),
        None => Ok(()),
    }
}

impl Validate for UserUpdateRequest {
    const RULES: &'static [Rule<Self>] = &[Rule { field: "email", check: update_email }];
}

fn term_name(p: &TermPayload) -> Result<()> {
    catalog::validate_name(&p.name)
}

fn term_slug(p: &TermPayload) -> Result<()> {
    catalog::validate_slug(&p.slug)
}

impl Validate for TermPayload {
    const RULES: &'static [Rule<Self>] = &[
        Rule { field: "name", check: term_name },
        Rule { field: "slug", check: term_slug },
    ];
}

fn draft_name(p: &TitleDraft) -> Result<()> {
    catalog::validate_name(&p.name)
}

fn draft_year(p: &TitleDraft) -> Result<()> {
    catalog::validate_year(p.year)
}

fn draft_category(p: &TitleDraft) -> Result<()> {
    catalog::validate_slug(&p.category)
}

fn draft_genres(p: &TitleDraft) -> Result<()> {
    p.genre.iter().try_for_each(|slug| catalog::validate_slug(slug))
}

impl Validate for TitleDraft {
    const RULES: &'static [Rule<Self>] = &[
        Rule { field: "name", check: draft_name },
        Rule { field: "year", check: draft_year },
        Rule { field: "category", check: draft_category },
        Rule { field: "genre", check: draft_genres },
    ];
}

fn patch_name(p: &TitlePatch) -> Result<()> {
    p.name.as_deref().map_or(Ok(()), catalog::validate_name)
}

fn patch_year(p: &TitlePatch) -> Result<()> {
    p.year.map_or(Ok(()), catalog::validate_year)
}

fn patch_category(p: &TitlePatch) -> Result<()> {
    p.category.as_deref().map_or(Ok(()), catalog::validate_slug)
}

fn patch_genres(p: &TitlePatch) -> Result<()> {
    match &p.genre {
        Some(slugs) => slugs.iter().try_for_each(|slug| catalog::validate_slug(slug)),
        None => Ok(()),
    }
}

impl Validate for TitlePatch {
    const RULES: &'static [Rule<Self>] = &[
        Rule { field: "name", check: patch_name },
        Rule { field: "year", check: patch_year },
        Rule { field: "category", check: patch_category },
        Rule { field: "genre", check: patch_genres },
    ];
}

fn review_text(p: &ReviewCreate) -> Result<()> {
    review::validate_text(&p.text)
}

fn review_score(p: &ReviewCreate) -> Result<()> {
    review::validate_score(p.score)
}

impl Validate for ReviewCreate {
    const RULES: &'static [Rule<Self>] = &[
        Rule { field: "text", check: review_text },
        Rule { field: "score", check: review_score },
    ];
}

fn review_patch_text(p: &ReviewPatch) -> Result<()> {
    p.text.as_deref().map_or(Ok(()), review::validate_text)
}

fn review_patch_score(p: &ReviewPatch) -> Result<()> {
    p.score.map_or(Ok(()), review::validate_score)
}

impl Validate for ReviewPatch {
    const RULES: &'static [Rule<Self>] = &[
        Rule { field: "text", check: review_patch_text },
        Rule { field: "score", check: review_patch_score },
    ];
}

fn comment_text(p: &CommentCreate) -> Result<()> {
    review::validate_text(&p.text)
}

impl Validate for CommentCreate {
    const RULES: &'static [Rule<Self>] = &[Rule { field: "text", check: comment_text }];
}

fn comment_patch_text(p: &CommentPatch) -> Result<()> {
    p.text.as_deref().map_or(Ok(()), review::validate_text)
}

impl Validate for CommentPatch {
    const RULES: &'static [Rule<Self>] = &[Rule { field: "text", check: comment_patch_text }];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;

    #[test]
    fn rules_run_in_declaration_order() {
        // Both fields are invalid; the username rule fires first
        let payload = SignupRequest {
            username: "me".to_string(),
            email: "not-an-email".to_string(),
        };
        assert!(matches!(
            payload.validate(),
            Err(DomainError::InvalidUsername(_))
        ));

        // With a valid username the email rule is reached
        let payload = SignupRequest {
            username: "alice".to_string(),
            email: "not-an-email".to_string(),
        };
        assert!(matches!(
            payload.validate(),
            Err(DomainError::InvalidField { field: "email", .. })
        ));
    }

    #[test]
    fn draft_rules_report_year() {
        let draft = TitleDraft {
            name: "Dune".to_string(),
            year: 9999,
            description: None,
            category: "fiction".to_string(),
            genre: vec!["drama".to_string()],
        };
        assert!(matches!(draft.validate(), Err(DomainError::InvalidYear(9999))));
    }

    #[test]
    fn patch_skips_absent_fields() {
        assert!(TitlePatch::default().validate().is_ok());
        assert!(ReviewPatch::default().validate().is_ok());

        let patch = ReviewPatch {
            text: None,
            score: Some(99),
        };
        assert!(matches!(
            patch.validate(),
            Err(DomainError::InvalidField { field: "score", .. })
        ));
    }

    #[test]
    fn genre_slugs_are_each_checked() {
        let draft = TitleDraft {
            name: "Dune".to_string(),
            year: 1965,
            description: None,
            category: "fiction".to_string(),
            genre: vec!["drama".to_string(), "bad slug".to_string()],
        };
        assert!(matches!(
            draft.validate(),
            Err(DomainError::InvalidField { field: "slug", .. })
        ));
    }
}
