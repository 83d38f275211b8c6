use super::map_write_error;
use crate::{
    db::models::{Alert, AlertFields},
    db::store::AlertStore,
    error::Error,
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AlertsRepository {
    pool: Arc<PgPool>,
}

impl AlertsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for AlertsRepository {
    async fn list(&self) -> Result<Vec<Alert>> {
        let result = sqlx::query_as::<_, Alert>(
            r#"
            SELECT id, detection_id, message, delivered, created_at
            FROM alerts
            ORDER BY id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get alerts: {}", e)))?;

        Ok(result)
    }

    async fn get(&self, id: i64) -> Result<Option<Alert>> {
        let result = sqlx::query_as::<_, Alert>(
            r#"
            SELECT id, detection_id, message, delivered, created_at
            FROM alerts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get alert by ID: {}", e)))?;

        Ok(result)
    }

    async fn insert(&self, fields: &AlertFields) -> Result<Alert> {
        let result = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (detection_id, message, delivered)
            VALUES ($1, $2, $3)
            RETURNING id, detection_id, message, delivered, created_at
            "#,
        )
        .bind(fields.detection_id)
        .bind(&fields.message)
        .bind(fields.delivered)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create alert"))?;

        Ok(result)
    }

    async fn update(&self, id: i64, fields: &AlertFields) -> Result<Option<Alert>> {
        let result = sqlx::query_as::<_, Alert>(
            r#"
            UPDATE alerts
            SET detection_id = $1, message = $2, delivered = $3
            WHERE id = $4
            RETURNING id, detection_id, message, delivered, created_at
            "#,
        )
        .bind(fields.detection_id)
        .bind(&fields.message)
        .bind(fields.delivered)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update alert"))?;

        Ok(result)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete alert: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
