use sqlx::PgPool;
use uuid::Uuid;

use crate::api_types::PageParams;
use crate::error::{DomainError, Result};
use crate::review::{
    CommentCreate, CommentDto, CommentPatch, CommentRow, ReviewCreate, ReviewDto, ReviewPatch,
    ReviewRow,
};
use crate::store::unique_violation;

const AUTHOR_TITLE_KEY: &str = "reviews_author_title_key";

const REVIEW_SELECT: &str = "SELECT r.id, r.text, t.name AS title, u.username AS author, \
     r.score, r.pub_date \
     FROM reviews r \
     JOIN users u ON u.id = r.author_id \
     JOIN titles t ON t.id = r.title_id";

const COMMENT_SELECT: &str = "SELECT c.id, c.text, u.username AS author, c.pub_date \
     FROM comments c JOIN users u ON u.id = c.author_id";

#[derive(Debug, Clone)]
pub struct ReviewRepo {
    pool: PgPool,
}

impl ReviewRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_title(&self, title_id: Uuid) -> Result<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM titles WHERE id = $1)")
                .bind(title_id)
                .fetch_one(&self.pool)
                .await?;
        if exists {
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("title {title_id}")))
        }
    }

    /// Fetch a review and check it belongs to the title implied by the
    /// request path. A review under a different title is a broken
    /// reference, not a missing one.
    pub async fn review_in_title(&self, title_id: Uuid, review_id: Uuid) -> Result<ReviewRow> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, title_id, author_id FROM reviews WHERE id = $1",
        )
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("review {review_id}")))?;

        if row.title_id != title_id {
            return Err(DomainError::UnknownReference(format!(
                "review {review_id} does not belong to title {title_id}"
            )));
        }
        Ok(row)
    }

    pub async fn list_reviews(&self, title_id: Uuid, page: PageParams) -> Result<Vec<ReviewDto>> {
        self.ensure_title(title_id).await?;
        let sql = format!(
            "{REVIEW_SELECT} WHERE r.title_id = $1 ORDER BY r.pub_date LIMIT $2 OFFSET $3"
        );
        let reviews = sqlx::query_as::<_, ReviewDto>(&sql)
            .bind(title_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(reviews)
    }

    pub async fn get_review(&self, title_id: Uuid, review_id: Uuid) -> Result<ReviewDto> {
        self.review_in_title(title_id, review_id).await?;
        self.fetch_review(review_id).await
    }

    pub async fn create_review(
        &self,
        title_id: Uuid,
        author_id: Uuid,
        payload: &ReviewCreate,
    ) -> Result<ReviewDto> {
        self.ensure_title(title_id).await?;

        // Friendlier error than the raw constraint violation
        let already = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        if already {
            return Err(DomainError::DuplicateReview);
        }

        let review_id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO reviews (id, title_id, author_id, text, score) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(review_id)
        .bind(title_id)
        .bind(author_id)
        .bind(&payload.text)
        .bind(payload.score)
        .execute(&self.pool)
        .await
        .map_err(|err| match unique_violation(&err) {
            // Racing duplicate insert; the constraint is authoritative
            Some(AUTHOR_TITLE_KEY) => DomainError::DuplicateReview,
            _ => err.into(),
        })?;

        self.fetch_review(review_id).await
    }

    pub async fn update_review(&self, review_id: Uuid, patch: &ReviewPatch) -> Result<ReviewDto> {
        sqlx::query(
            "UPDATE reviews SET \
               text = COALESCE($2, text), \
               score = COALESCE($3, score) \
             WHERE id = $1",
        )
        .bind(review_id)
        .bind(&patch.text)
        .bind(patch.score)
        .execute(&self.pool)
        .await?;
        self.fetch_review(review_id).await
    }

    /// Delete a review and its comments.
    pub async fn delete_review(&self, review_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM comments WHERE review_id = $1")
            .bind(review_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn comment_in_review(
        &self,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> Result<CommentRow> {
        let row = sqlx::query_as::<_, CommentRow>(
            "SELECT id, review_id, author_id FROM comments WHERE id = $1",
        )
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("comment {comment_id}")))?;

        if row.review_id != review_id {
            return Err(DomainError::UnknownReference(format!(
                "comment {comment_id} does not belong to review {review_id}"
            )));
        }
        Ok(row)
    }

    pub async fn get_comment(&self, review_id: Uuid, comment_id: Uuid) -> Result<CommentDto> {
        self.comment_in_review(review_id, comment_id).await?;
        self.fetch_comment(comment_id).await
    }

    pub async fn list_comments(&self, review_id: Uuid, page: PageParams) -> Result<Vec<CommentDto>> {
        let sql = format!(
            "{COMMENT_SELECT} WHERE c.review_id = $1 ORDER BY c.pub_date LIMIT $2 OFFSET $3"
        );
        let comments = sqlx::query_as::<_, CommentDto>(&sql)
            .bind(review_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    pub async fn create_comment(
        &self,
        review_id: Uuid,
        author_id: Uuid,
        payload: &CommentCreate,
    ) -> Result<CommentDto> {
        let comment_id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO comments (id, review_id, author_id, text) VALUES ($1, $2, $3, $4)",
        )
        .bind(comment_id)
        .bind(review_id)
        .bind(author_id)
        .bind(&payload.text)
        .execute(&self.pool)
        .await?;
        self.fetch_comment(comment_id).await
    }

    pub async fn update_comment(
        &self,
        comment_id: Uuid,
        patch: &CommentPatch,
    ) -> Result<CommentDto> {
        sqlx::query("UPDATE comments SET text = COALESCE($2, text) WHERE id = $1")
            .bind(comment_id)
            .bind(&patch.text)
            .execute(&self.pool)
            .await?;
        self.fetch_comment(comment_id).await
    }

    pub async fn delete_comment(&self, comment_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch_review(&self, review_id: Uuid) -> Result<ReviewDto> {
        let sql = format!("{REVIEW_SELECT} WHERE r.id = $1");
        sqlx::query_as::<_, ReviewDto>(&sql)
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("review {review_id}")))
    }

    async fn fetch_comment(&self, comment_id: Uuid) -> Result<CommentDto> {
        let sql = format!("{COMMENT_SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, CommentDto>(&sql)
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("comment {comment_id}")))
    }
}
