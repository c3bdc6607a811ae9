use crate::domain::{models::event::Event, ports::{EventFilter, EventRepository}};
use crate::error::AppError;
use crate::infra::database::PostgresDb;
use async_trait::async_trait;
use std::sync::Arc;

pub struct PostgresEventRepo {
    db: Arc<PostgresDb>,
}

impl PostgresEventRepo {
    pub fn new(db: Arc<PostgresDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, slug, description, overview, image, venue, location,
                "date", "time", mode, audience, agenda, organizer, tags, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.title)
            .bind(&event.slug)
            .bind(&event.description)
            .bind(&event.overview)
            .bind(&event.image)
            .bind(&event.venue)
            .bind(&event.location)
            .bind(&event.date)
            .bind(&event.time)
            .bind(&event.mode)
            .bind(&event.audience)
            .bind(&event.agenda)
            .bind(&event.organizer)
            .bind(&event.tags)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>(
            r#"SELECT * FROM events
               WHERE ($1::text IS NULL OR "date" = $1)
                 AND ($2::text IS NULL OR tags @> jsonb_build_array($2::text))
               ORDER BY created_at DESC"#
        )
            .bind(&filter.date)
            .bind(&filter.tag)
            .fetch_all(&pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title=$1, slug=$2, description=$3, overview=$4, image=$5, venue=$6, location=$7,
                "date"=$8, "time"=$9, mode=$10, audience=$11, agenda=$12, organizer=$13, tags=$14, updated_at=$15
               WHERE id=$16 RETURNING *"#
        )
            .bind(&event.title)
            .bind(&event.slug)
            .bind(&event.description)
            .bind(&event.overview)
            .bind(&event.image)
            .bind(&event.venue)
            .bind(&event.location)
            .bind(&event.date)
            .bind(&event.time)
            .bind(&event.mode)
            .bind(&event.audience)
            .bind(&event.agenda)
            .bind(&event.organizer)
            .bind(&event.tags)
            .bind(event.updated_at)
            .bind(&event.id)
            .fetch_optional(&pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let pool = self.db.get().await?;
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }
}
