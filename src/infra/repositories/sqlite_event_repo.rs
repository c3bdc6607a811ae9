use crate::domain::{models::event::Event, ports::{EventFilter, EventRepository}};
use crate::error::AppError;
use crate::infra::database::SqliteDb;
use async_trait::async_trait;
use std::sync::Arc;

pub struct SqliteEventRepo {
    db: Arc<SqliteDb>,
}

impl SqliteEventRepo {
    pub fn new(db: Arc<SqliteDb>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, slug, description, overview, image, venue, location,
                date, time, mode, audience, agenda, organizer, tags, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>(
            r#"SELECT * FROM events
               WHERE (? IS NULL OR date = ?)
                 AND (? IS NULL OR EXISTS (SELECT 1 FROM json_each(events.tags) WHERE json_each.value = ?))
               ORDER BY created_at DESC"#
        )
            .bind(&filter.date)
            .bind(&filter.date)
            .bind(&filter.tag)
            .bind(&filter.tag)
            .fetch_all(&pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        let pool = self.db.get().await?;
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title=?, slug=?, description=?, overview=?, image=?, venue=?, location=?,
                date=?, time=?, mode=?, audience=?, agenda=?, organizer=?, tags=?, updated_at=?
               WHERE id=? RETURNING *"#
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
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
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
