//! Movie catalog service

use std::sync::Arc;
use tracing::debug;
use crate::database::MovieStore;
use crate::models::Movie;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct CatalogService {
    movies: Arc<dyn MovieStore>,
}

impl CatalogService {
    pub fn new(movies: Arc<dyn MovieStore>) -> Self {
        Self { movies }
    }

    /// Every movie, newest first
    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        let movies = self.movies.list().await?;
        debug!(count = movies.len(), "Listed movies");
        Ok(movies)
    }
}
