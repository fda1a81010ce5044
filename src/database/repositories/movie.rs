//! Movie repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use crate::database::store::MovieStore;
use crate::models::movie::Movie;
use crate::utils::errors::Result;

#[derive(Clone)]
#[derive(Debug)]
pub struct MovieRepository {
    pool: PgPool,
}

impl MovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieStore for MovieRepository {
    async fn list(&self) -> Result<Vec<Movie>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, poster_url, video_link FROM movies ORDER BY id DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(movies)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, poster_url, video_link FROM movies WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movie)
    }
}
