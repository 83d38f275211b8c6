use super::map_write_error;
use crate::{
    db::models::{Camera, CameraFields, CameraRow},
    db::store::CameraStore,
    error::Error,
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

/// Cameras repository for handling camera operations
#[derive(Clone)]
pub struct CamerasRepository {
    pool: Arc<PgPool>,
}

impl CamerasRepository {
    /// Create a new cameras repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn into_cameras(rows: Vec<CameraRow>) -> Result<Vec<Camera>> {
    rows.into_iter()
        .map(|row| Camera::try_from(row).map_err(anyhow::Error::from))
        .collect()
}

#[async_trait]
impl CameraStore for CamerasRepository {
    /// Get all cameras
    async fn list(&self) -> Result<Vec<Camera>> {
        let rows = sqlx::query_as::<_, CameraRow>(
            r#"
            SELECT id, address, resolution, fps, motion_sensitivity, status
            FROM cameras
            ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get all cameras: {}", e)))?;

        into_cameras(rows)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cameras")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to count cameras: {}", e)))?;

        Ok(count)
    }

    /// Get camera by ID
    async fn get(&self, id: i64) -> Result<Option<Camera>> {
        let row = sqlx::query_as::<_, CameraRow>(
            r#"
            SELECT id, address, resolution, fps, motion_sensitivity, status
            FROM cameras
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get camera by ID: {}", e)))?;

        Ok(row.map(Camera::try_from).transpose()?)
    }

    /// Get camera by address
    async fn get_by_address(&self, address: &str) -> Result<Option<Camera>> {
        let row = sqlx::query_as::<_, CameraRow>(
            r#"
            SELECT id, address, resolution, fps, motion_sensitivity, status
            FROM cameras
            WHERE address = $1
            "#,
        )
        .bind(address)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get camera by address: {}", e)))?;

        Ok(row.map(Camera::try_from).transpose()?)
    }

    /// Create a new camera
    async fn insert(&self, fields: &CameraFields) -> Result<Camera> {
        info!("Creating new camera: {}", fields.address);

        let row = sqlx::query_as::<_, CameraRow>(
            r#"
            INSERT INTO cameras (address, resolution, fps, motion_sensitivity, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, address, resolution, fps, motion_sensitivity, status
            "#,
        )
        .bind(&fields.address)
        .bind(fields.resolution.as_str())
        .bind(fields.fps)
        .bind(fields.motion_sensitivity)
        .bind(&fields.status)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create camera"))?;

        Ok(Camera::try_from(row)?)
    }

    /// Update camera
    async fn update(&self, id: i64, fields: &CameraFields) -> Result<Option<Camera>> {
        let row = sqlx::query_as::<_, CameraRow>(
            r#"
            UPDATE cameras
            SET address = $1, resolution = $2, fps = $3, motion_sensitivity = $4, status = $5
            WHERE id = $6
            RETURNING id, address, resolution, fps, motion_sensitivity, status
            "#,
        )
        .bind(&fields.address)
        .bind(fields.resolution.as_str())
        .bind(fields.fps)
        .bind(fields.motion_sensitivity)
        .bind(&fields.status)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update camera"))?;

        Ok(row.map(Camera::try_from).transpose()?)
    }

    /// Delete camera; dependents go through `ON DELETE CASCADE`
    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM cameras
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete camera: {}", e)))?;

        if result.rows_affected() > 0 {
            info!("Deleted camera {} and its dependent records", id);
        }

        Ok(result.rows_affected() > 0)
    }
}
