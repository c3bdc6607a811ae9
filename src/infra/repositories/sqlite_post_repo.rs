use crate::domain::{models::post::Post, ports::PostRepository};
use crate::error::AppError;
use crate::infra::database::SqliteDb;
use async_trait::async_trait;
use std::sync::Arc;

pub struct SqlitePostRepo {
    db: Arc<SqliteDb>,
}

impl SqlitePostRepo {
    pub fn new(db: Arc<SqliteDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for SqlitePostRepo {
    async fn create(&self, post: &Post) -> Result<Post, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (id, title, description, image, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *"
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
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&pool)
            .await
            .map_err(AppError::Database)
    }
}
