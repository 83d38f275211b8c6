use super::map_write_error;
use crate::{
    db::models::{Detection, DetectionFields},
    db::store::DetectionStore,
    error::Error,
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct DetectionsRepository {
    pool: Arc<PgPool>,
}

impl DetectionsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DetectionStore for DetectionsRepository {
    async fn list(&self) -> Result<Vec<Detection>> {
        let result = sqlx::query_as::<_, Detection>(
            r#"
            SELECT id, motion_event_id, image_id, object_class, confidence, created_at
            FROM detections
            ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get detections: {}", e)))?;

        Ok(result)
    }

    async fn get(&self, id: i64) -> Result<Option<Detection>> {
        let result = sqlx::query_as::<_, Detection>(
            r#"
            SELECT id, motion_event_id, image_id, object_class, confidence, created_at
            FROM detections
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get detection by ID: {}", e)))?;

        Ok(result)
    }

    async fn insert(&self, fields: &DetectionFields) -> Result<Detection> {
        let result = sqlx::query_as::<_, Detection>(
            r#"
            INSERT INTO detections (motion_event_id, image_id, object_class, confidence)
            VALUES ($1, $2, $3, $4)
            RETURNING id, motion_event_id, image_id, object_class, confidence, created_at
            "#,
        )
        .bind(fields.motion_event_id)
        .bind(fields.image_id)
        .bind(&fields.object_class)
        .bind(fields.confidence)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create detection"))?;

        Ok(result)
    }

    async fn update(&self, id: i64, fields: &DetectionFields) -> Result<Option<Detection>> {
        let result = sqlx::query_as::<_, Detection>(
            r#"
            UPDATE detections
            SET motion_event_id = $1, image_id = $2, object_class = $3, confidence = $4
            WHERE id = $5
            RETURNING id, motion_event_id, image_id, object_class, confidence, created_at
            "#,
        )
        .bind(fields.motion_event_id)
        .bind(fields.image_id)
        .bind(&fields.object_class)
        .bind(fields.confidence)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update detection"))?;

        Ok(result)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM detections WHERE id = $1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete detection: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
