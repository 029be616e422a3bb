use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::api_types::PageParams;
use crate::catalog::{TermPayload, TermRef, Term, TitleDraft, TitleDto, TitleFilter, TitlePatch};
use crate::error::{DomainError, Result};
use crate::store::unique_violation;

/// Which of the two term namespaces a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Category,
    Genre,
}

impl TermKind {
    fn table(&self) -> &'static str {
        match self {
            TermKind::Category => "categories",
            TermKind::Genre => "genres",
        }
    }

    fn slug_key(&self) -> &'static str {
        match self {
            TermKind::Category => "categories_slug_key",
            TermKind::Genre => "genres_slug_key",
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TitleRow {
    id: Uuid,
    name: String,
    year: i32,
    description: Option<String>,
    category_name: Option<String>,
    category_slug: Option<String>,
    rating: Option<f64>,
}

#[derive(Debug, sqlx::FromRow)]
struct GenreJoinRow {
    title_id: Uuid,
    name: String,
    slug: String,
}

// The rating subquery computes the same mean as `review::rating_of`.
const TITLE_SELECT: &str = "SELECT t.id, t.name, t.year, t.description, \
     c.name AS category_name, c.slug AS category_slug, \
     (SELECT AVG(r.score)::float8 FROM reviews r WHERE r.title_id = t.id) AS rating \
     FROM titles t LEFT JOIN categories c ON c.id = t.category_id";

#[derive(Debug, Clone)]
pub struct CatalogRepo {
    pool: PgPool,
}

impl CatalogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_terms(
        &self,
        kind: TermKind,
        search: Option<&str>,
        page: PageParams,
    ) -> Result<Vec<Term>> {
        let sql = format!(
            "SELECT id, name, slug FROM {} \
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
             ORDER BY slug LIMIT $2 OFFSET $3",
            kind.table()
        );
        let terms = sqlx::query_as::<_, Term>(&sql)
            .bind(search)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(terms)
    }

    pub async fn create_term(&self, kind: TermKind, payload: &TermPayload) -> Result<Term> {
        let sql = format!(
            "INSERT INTO {} (id, name, slug) VALUES ($1, $2, $3) RETURNING id, name, slug",
            kind.table()
        );
        sqlx::query_as::<_, Term>(&sql)
            .bind(Uuid::now_v7())
            .bind(&payload.name)
            .bind(&payload.slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if unique_violation(&err) == Some(kind.slug_key()) {
                    DomainError::Conflict(format!("slug `{}` already in use", payload.slug))
                } else {
                    err.into()
                }
            })
    }

    /// Delete a term by slug. Category references on titles are cleared,
    /// not cascaded; genre join rows are removed outright.
    pub async fn delete_term(&self, kind: TermKind, slug: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        match kind {
            TermKind::Category => {
                sqlx::query(
                    "UPDATE titles SET category_id = NULL \
                     WHERE category_id = (SELECT id FROM categories WHERE slug = $1)",
                )
                .bind(slug)
                .execute(&mut *tx)
                .await?;
            }
            TermKind::Genre => {
                sqlx::query(
                    "DELETE FROM title_genres \
                     WHERE genre_id = (SELECT id FROM genres WHERE slug = $1)",
                )
                .bind(slug)
                .execute(&mut *tx)
                .await?;
            }
        }

        let sql = format!("DELETE FROM {} WHERE slug = $1", kind.table());
        let affected = sqlx::query(&sql)
            .bind(slug)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(DomainError::NotFound(format!("{} `{slug}`", kind.table())));
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn create_title(&self, draft: &TitleDraft) -> Result<TitleDto> {
        let mut tx = self.pool.begin().await?;

        let category_id = resolve_category(&mut tx, &draft.category).await?;
        let genre_ids = resolve_genres(&mut tx, &draft.genre).await?;

        let title_id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO titles (id, name, year, description, category_id) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(title_id)
        .bind(&draft.name)
        .bind(draft.year)
        .bind(&draft.description)
        .bind(category_id)
        .execute(&mut *tx)
        .await?;

        link_genres(&mut tx, title_id, &genre_ids).await?;
        tx.commit().await?;

        self.get_title(title_id).await
    }

    pub async fn update_title(&self, id: Uuid, patch: &TitlePatch) -> Result<TitleDto> {
        let mut tx = self.pool.begin().await?;

        let category_id = match &patch.category {
            Some(slug) => Some(resolve_category(&mut tx, slug).await?),
            None => None,
        };

        let affected = sqlx::query(
            "UPDATE titles SET \
               name = COALESCE($2, name), \
               year = COALESCE($3, year), \
               description = COALESCE($4, description), \
               category_id = COALESCE($5, category_id) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&patch.name)
        .bind(patch.year)
        .bind(&patch.description)
        .bind(category_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if affected == 0 {
            return Err(DomainError::NotFound(format!("title {id}")));
        }

        if let Some(slugs) = &patch.genre {
            let genre_ids = resolve_genres(&mut tx, slugs).await?;
            sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_genres(&mut tx, id, &genre_ids).await?;
        }

        tx.commit().await?;
        self.get_title(id).await
    }

    pub async fn get_title(&self, id: Uuid) -> Result<TitleDto> {
        let sql = format!("{TITLE_SELECT} WHERE t.id = $1");
        let row = sqlx::query_as::<_, TitleRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("title {id}")))?;

        let mut genres = self.genres_for(&[row.id]).await?;
        Ok(into_dto(row, &mut genres))
    }

    pub async fn list_titles(
        &self,
        filter: &TitleFilter,
        page: PageParams,
    ) -> Result<Vec<TitleDto>> {
        let sql = format!(
            "{TITLE_SELECT} \
             WHERE ($1::text IS NULL OR c.slug = $1) \
               AND ($2::text IS NULL OR EXISTS (\
                     SELECT 1 FROM title_genres tg JOIN genres g ON g.id = tg.genre_id \
                     WHERE tg.title_id = t.id AND g.slug = $2)) \
               AND ($3::int IS NULL OR t.year = $3) \
               AND ($4::text IS NULL OR t.name ILIKE '%' || $4 || '%') \
             ORDER BY t.name LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, TitleRow>(&sql)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(filter.year)
            .bind(&filter.name)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut genres = self.genres_for(&ids).await?;
        Ok(rows.into_iter().map(|row| into_dto(row, &mut genres)).collect())
    }

    /// Delete a title and its dependent reviews and comments. The schema
    /// cascades too; the explicit statements keep the behavior visible.
    pub async fn delete_title(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM comments WHERE review_id IN \
             (SELECT id FROM reviews WHERE title_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM reviews WHERE title_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let affected = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(DomainError::NotFound(format!("title {id}")));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn genres_for(&self, title_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<TermRef>>> {
        if title_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, GenreJoinRow>(
            "SELECT tg.title_id, g.name, g.slug \
             FROM title_genres tg JOIN genres g ON g.id = tg.genre_id \
             WHERE tg.title_id = ANY($1) ORDER BY g.slug",
        )
        .bind(title_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<Uuid, Vec<TermRef>> = HashMap::new();
        for row in rows {
            map.entry(row.title_id).or_default().push(TermRef {
                name: row.name,
                slug: row.slug,
            });
        }
        Ok(map)
    }
}

fn into_dto(row: TitleRow, genres: &mut HashMap<Uuid, Vec<TermRef>>) -> TitleDto {
    let category = match (row.category_name, row.category_slug) {
        (Some(name), Some(slug)) => Some(TermRef { name, slug }),
        _ => None,
    };
    TitleDto {
        id: row.id,
        name: row.name,
        year: row.year,
        description: row.description,
        category,
        genre: genres.remove(&row.id).unwrap_or_default(),
        rating: row.rating,
    }
}

async fn resolve_category(tx: &mut Transaction<'_, Postgres>, slug: &str) -> Result<Uuid> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM categories WHERE slug = $1")
        .bind(slug)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| DomainError::UnknownReference(format!("category `{slug}`")))
}

async fn resolve_genres(
    tx: &mut Transaction<'_, Postgres>,
    slugs: &[String],
) -> Result<Vec<Uuid>> {
    if slugs.is_empty() {
        return Ok(Vec::new());
    }
    let found: Vec<(Uuid, String)> =
        sqlx::query_as("SELECT id, slug FROM genres WHERE slug = ANY($1)")
            .bind(slugs)
            .fetch_all(&mut **tx)
            .await?;

    for slug in slugs {
        if !found.iter().any(|(_, s)| s == slug) {
            return Err(DomainError::UnknownReference(format!("genre `{slug}`")));
        }
    }
    // Dedup: a title cannot list the same genre twice
    let mut ids: Vec<Uuid> = Vec::with_capacity(found.len());
    for (id, _) in found {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

async fn link_genres(
    tx: &mut Transaction<'_, Postgres>,
    title_id: Uuid,
    genre_ids: &[Uuid],
) -> Result<()> {
    for genre_id in genre_ids {
        sqlx::query(
            "INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(title_id)
        .bind(genre_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
