use crate::domain::{models::post::Post, ports::PostRepository};
use crate::error::AppError;
use crate::infra::database::PostgresDb;
use async_trait::async_trait;
use std::sync::Arc;

pub struct PostgresPostRepo {
    db: Arc<PostgresDb>,
}

impl PostgresPostRepo {
    pub fn new(db: Arc<PostgresDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepo {
    async fn create(&self, post: &Post) -> Result<Post, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (id, title, description, image, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *"
        )
            .bind(&post.id)
            .bind(&post.title)
            .bind(&post.description)
            .bind(&post.image)
            .bind(&post.created_at)
            .fetch_one(&pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&pool)
            .await
            .map_err(AppError::Database)
    }
}
