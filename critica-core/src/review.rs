//! Reviews and their nested comments.
//!
//! A user may review each title at most once; the database constraint on
//! (author, title) is authoritative, with a friendlier pre-check at
//! submission time. Authorship and publication date are fixed at creation
//! and never accepted from request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Result};

pub const SCORE_MIN: i32 = 1;
pub const SCORE_MAX: i32 = 10;

/// A review row joined with its author's username and title name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReviewDto {
    pub id: Uuid,
    pub text: String,
    /// Title name, output only.
    pub title: String,
    /// Author username, output only.
    pub author: String,
    pub score: i32,
    pub pub_date: DateTime<Utc>,
}

/// Internal review row used for ownership and nesting checks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub title_id: Uuid,
    pub author_id: Uuid,
}

/// A comment row joined with its author's username.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentDto {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub pub_date: DateTime<Utc>,
}

/// Internal comment row used for ownership and nesting checks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub review_id: Uuid,
    pub author_id: Uuid,
}

/// Review creation payload. `author` and `title` come from the request
/// context, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCreate {
    pub text: String,
    pub score: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPatch {
    pub text: Option<String>,
    pub score: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentCreate {
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentPatch {
    pub text: Option<String>,
}

/// Mean of a set of review scores, or `None` when there are none.
///
/// Mirrors the `AVG(r.score)::float8` aggregate the title queries compute at
/// read time; kept in one place so the averaging contract stays checkable
/// without a database.
pub fn rating_of(scores: &[i32]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: i64 = scores.iter().map(|&s| i64::from(s)).sum();
    Some(sum as f64 / scores.len() as f64)
}

pub fn validate_score(score: i32) -> Result<()> {
    if !(SCORE_MIN..=SCORE_MAX).contains(&score) {
        return Err(DomainError::invalid_field(
            "score",
            format!("must be between {SCORE_MIN} and {SCORE_MAX}"),
        ));
    }
    Ok(())
}

pub fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(DomainError::invalid_field("text", "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bounds_inclusive() {
        assert!(validate_score(1).is_ok());
        assert!(validate_score(10).is_ok());
        assert!(validate_score(0).is_err());
        assert!(validate_score(11).is_err());
        assert!(validate_score(-3).is_err());
    }

    #[test]
    fn text_must_not_be_blank() {
        assert!(validate_text("solid debut").is_ok());
        assert!(validate_text("   ").is_err());
    }

    #[test]
    fn rating_is_the_arithmetic_mean() {
        assert_eq!(rating_of(&[8, 6, 10]), Some(8.0));
        assert_eq!(rating_of(&[8, 7]), Some(7.5));
        assert_eq!(rating_of(&[3]), Some(3.0));
    }

    #[test]
    fn rating_absent_without_reviews() {
        assert_eq!(rating_of(&[]), None);
    }

    #[test]
    fn author_in_payload_is_ignored() {
        // The DTO simply has no author field to poison
        let create: ReviewCreate = serde_json::from_str(
            r#"{"text": "great", "score": 9, "author": "someone-else", "title": 42}"#,
        )
        .unwrap();
        assert_eq!(create.score, 9);
        assert_eq!(create.text, "great");
    }
}
