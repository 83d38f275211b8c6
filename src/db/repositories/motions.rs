use super::map_write_error;
use crate::{
    db::models::{MotionEvent, MotionFields},
    db::store::MotionStore,
    error::Error,
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Motion events repository
#[derive(Clone)]
pub struct MotionsRepository {
    pool: Arc<PgPool>,
}

impl MotionsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MotionStore for MotionsRepository {
    async fn list(&self) -> Result<Vec<MotionEvent>> {
        let result = sqlx::query_as::<_, MotionEvent>(
            r#"
            SELECT id, camera_id, "timestamp", duration, threshold, created_at
            FROM motion_events
            ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get motion events: {}", e)))?;

        Ok(result)
    }

    /// Get motion events for a camera
    async fn list_by_camera(&self, camera_id: i64) -> Result<Vec<MotionEvent>> {
        let result = sqlx::query_as::<_, MotionEvent>(
            r#"
            SELECT id, camera_id, "timestamp", duration, threshold, created_at
            FROM motion_events
            WHERE camera_id = $1
            ORDER BY id
            "#,
        )
        .bind(camera_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get motion events for camera: {}", e)))?;

        Ok(result)
    }

    async fn get(&self, id: i64) -> Result<Option<MotionEvent>> {
        let result = sqlx::query_as::<_, MotionEvent>(
            r#"
            SELECT id, camera_id, "timestamp", duration, threshold, created_at
            FROM motion_events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get motion event by ID: {}", e)))?;

        Ok(result)
    }

    async fn insert(&self, fields: &MotionFields) -> Result<MotionEvent> {
        let result = sqlx::query_as::<_, MotionEvent>(
            r#"
            INSERT INTO motion_events (camera_id, duration, threshold)
            VALUES ($1, $2, $3)
            RETURNING id, camera_id, "timestamp", duration, threshold, created_at
            "#,
        )
        .bind(fields.camera_id)
        .bind(fields.duration)
        .bind(fields.threshold)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create motion event"))?;

        Ok(result)
    }

    async fn update(&self, id: i64, fields: &MotionFields) -> Result<Option<MotionEvent>> {
        let result = sqlx::query_as::<_, MotionEvent>(
            r#"
            UPDATE motion_events
            SET camera_id = $1, duration = $2, threshold = $3
            WHERE id = $4
            RETURNING id, camera_id, "timestamp", duration, threshold, created_at
            "#,
        )
        .bind(fields.camera_id)
        .bind(fields.duration)
        .bind(fields.threshold)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update motion event"))?;

        Ok(result)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM motion_events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete motion event: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
