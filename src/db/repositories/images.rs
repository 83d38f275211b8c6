use super::map_write_error;
use crate::{
    db::models::{Image, ImageFields},
    db::store::ImageStore,
    error::Error,
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Images joined to their motion event; `camera_id` comes from the join.
const SELECT_IMAGES: &str = r#"
    SELECT i.id, m.camera_id, i.motion_event_id, i.filepath, i.filesize, i.created_at
    FROM images i
    JOIN motion_events m ON m.id = i.motion_event_id
"#;

/// Images repository
#[derive(Clone)]
pub struct ImagesRepository {
    pool: Arc<PgPool>,
}

impl ImagesRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch_where(&self, filter: &str, value: i64, context: &str) -> Result<Vec<Image>> {
        let sql = format!("{} WHERE {} = $1 ORDER BY i.id", SELECT_IMAGES, filter);

        let result = sqlx::query_as::<_, Image>(&sql)
            .bind(value)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("{}: {}", context, e)))?;

        Ok(result)
    }
}

#[async_trait]
impl ImageStore for ImagesRepository {
    async fn list(&self) -> Result<Vec<Image>> {
        let sql = format!("{} ORDER BY i.id", SELECT_IMAGES);

        let result = sqlx::query_as::<_, Image>(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to get images: {}", e)))?;

        Ok(result)
    }

    async fn list_by_camera(&self, camera_id: i64) -> Result<Vec<Image>> {
        self.fetch_where("m.camera_id", camera_id, "Failed to get images for camera")
            .await
    }

    async fn list_by_motion(&self, motion_event_id: i64) -> Result<Vec<Image>> {
        self.fetch_where(
            "i.motion_event_id",
            motion_event_id,
            "Failed to get images for motion event",
        )
        .await
    }

    async fn get(&self, id: i64) -> Result<Option<Image>> {
        let sql = format!("{} WHERE i.id = $1", SELECT_IMAGES);

        let result = sqlx::query_as::<_, Image>(&sql)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to get image by ID: {}", e)))?;

        Ok(result)
    }

    async fn insert(&self, fields: &ImageFields) -> Result<Image> {
        let result = sqlx::query_as::<_, Image>(
            r#"
            WITH inserted AS (
                INSERT INTO images (motion_event_id, filepath, filesize)
                VALUES ($1, $2, $3)
                RETURNING id, motion_event_id, filepath, filesize, created_at
            )
            SELECT inserted.id, m.camera_id, inserted.motion_event_id,
                   inserted.filepath, inserted.filesize, inserted.created_at
            FROM inserted
            JOIN motion_events m ON m.id = inserted.motion_event_id
            "#,
        )
        .bind(fields.motion_event_id)
        .bind(&fields.filepath)
        .bind(fields.filesize)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create image"))?;

        Ok(result)
    }

    async fn update(&self, id: i64, fields: &ImageFields) -> Result<Option<Image>> {
        let result = sqlx::query_as::<_, Image>(
            r#"
            WITH updated AS (
                UPDATE images
                SET motion_event_id = $1, filepath = $2, filesize = $3
                WHERE id = $4
                RETURNING id, motion_event_id, filepath, filesize, created_at
            )
            SELECT updated.id, m.camera_id, updated.motion_event_id,
                   updated.filepath, updated.filesize, updated.created_at
            FROM updated
            JOIN motion_events m ON m.id = updated.motion_event_id
            "#,
        )
        .bind(fields.motion_event_id)
        .bind(&fields.filepath)
        .bind(fields.filesize)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update image"))?;

        Ok(result)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM images
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete image: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
