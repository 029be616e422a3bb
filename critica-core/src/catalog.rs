//! Catalog entities: categories, genres and the titles they classify.
//!
//! Categories and genres are flat namespaces keyed by slug. Titles reference
//! one optional category and any number of genres; their `rating` is the
//! arithmetic mean of associated review scores, computed at read time and
//! never stored authoritatively.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Result};

pub const NAME_MAX_LEN: usize = 256;
pub const SLUG_MAX_LEN: usize = 50;

/// A category or genre row. Both share the same shape but live in
/// independent tables and namespaces.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Term {
    #[serde(skip_serializing)]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Name/slug pair nested inside title responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TermRef {
    pub name: String,
    pub slug: String,
}

/// Creation payload for a category or genre.
#[derive(Debug, Clone, Deserialize)]
pub struct TermPayload {
    pub name: String,
    pub slug: String,
}

/// A title as returned by the API, with its derived rating.
#[derive(Debug, Clone, Serialize)]
pub struct TitleDto {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Option<TermRef>,
    pub genre: Vec<TermRef>,
    /// Mean review score; `None` until the first review lands. Rounding is
    /// left to presenters.
    pub rating: Option<f64>,
}

/// Title creation payload. Category and genres are referenced by slug and
/// must already exist.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleDraft {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub genre: Vec<String>,
}

/// Partial title update; `genre`, when present, replaces the full set.
///
/// An omitted field leaves the stored value unchanged, and an explicit JSON
/// `null` deserializes the same as omission. Clearing `description` or
/// `category` to null is not supported through PATCH.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitlePatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

/// Title list filters, all optional and combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleFilter {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub name: Option<String>,
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().count() > NAME_MAX_LEN {
        return Err(DomainError::invalid_field(
            "name",
            format!("must be between 1 and {NAME_MAX_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.chars().count() > SLUG_MAX_LEN {
        return Err(DomainError::invalid_field(
            "slug",
            format!("must be between 1 and {SLUG_MAX_LEN} characters"),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::invalid_field(
            "slug",
            "only ASCII letters, digits, hyphens and underscores are allowed",
        ));
    }
    Ok(())
}

/// Titles may not be dated in the future. No lower bound is enforced.
pub fn validate_year(year: i32) -> Result<()> {
    if year > Utc::now().year() {
        return Err(DomainError::InvalidYear(year));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_charset() {
        assert!(validate_slug("fiction").is_ok());
        assert!(validate_slug("sci-fi_2").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("with space").is_err());
        assert!(validate_slug("ümlaut").is_err());
        assert!(validate_slug(&"x".repeat(51)).is_err());
    }

    #[test]
    fn name_length_counts_characters() {
        assert!(validate_name(&"é".repeat(NAME_MAX_LEN)).is_ok());
        assert!(validate_name(&"é".repeat(NAME_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn year_upper_bound_only() {
        let this_year = Utc::now().year();
        assert!(validate_year(this_year).is_ok());
        assert!(matches!(
            validate_year(this_year + 1),
            Err(DomainError::InvalidYear(_))
        ));
        // Deliberately no lower bound
        assert!(validate_year(-500).is_ok());
    }

    #[test]
    fn patch_null_reads_as_omission() {
        let patch: TitlePatch =
            serde_json::from_str(r#"{"description": null, "category": null}"#).unwrap();
        assert!(patch.description.is_none());
        assert!(patch.category.is_none());
    }

    #[test]
    fn genre_list_defaults_to_empty() {
        let draft: TitleDraft = serde_json::from_str(
            r#"{"name": "Dune", "year": 1965, "category": "fiction"}"#,
        )
        .unwrap();
        assert!(draft.genre.is_empty());
    }
}
