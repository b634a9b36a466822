//! 预警数据仓库

use crate::db::PostgresPool;
use crate::errors::AppError;
use crate::models::{AlertState, AlertType, PerformanceAlert};
use crate::repositories::AlertStore;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 预警数据仓库
#[derive(Clone)]
pub struct AlertRepository {
    pool: PostgresPool,
}

impl AlertRepository {
    pub fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AlertStore for AlertRepository {
    async fn find_active(
        &self,
        student_id: Uuid,
        course_id: Uuid,
        alert_type: AlertType,
    ) -> Result<Option<PerformanceAlert>, AppError> {
        let alert = sqlx::query_as::<_, PerformanceAlert>(
            r#"
            SELECT * FROM performance_alerts
            WHERE student_id = $1 AND course_id = $2 AND alert_type = $3 AND state = 'active'
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .bind(alert_type)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(alert)
    }

    async fn insert(&self, alert: PerformanceAlert) -> Result<Option<PerformanceAlert>, AppError> {
        // 部分唯一索引兜底：并发评估同时插入时只保留一条活跃预警
        let inserted = sqlx::query_as::<_, PerformanceAlert>(
            r#"
            INSERT INTO performance_alerts
                (id, student_id, course_id, config_id, alert_type, description, context, state, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT DO NOTHING
            RETURNING *
            "#,
        )
        .bind(alert.id)
        .bind(alert.student_id)
        .bind(alert.course_id)
        .bind(alert.config_id)
        .bind(alert.alert_type)
        .bind(&alert.description)
        .bind(&alert.context)
        .bind(alert.state)
        .bind(alert.created_at)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(inserted)
    }

    async fn find_by_id(&self, alert_id: Uuid) -> Result<Option<PerformanceAlert>, AppError> {
        let alert = sqlx::query_as::<_, PerformanceAlert>(
            "SELECT * FROM performance_alerts WHERE id = $1",
        )
        .bind(alert_id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(alert)
    }

    async fn set_state(
        &self,
        alert_id: Uuid,
        state: AlertState,
        resolved_at: DateTime<Utc>,
    ) -> Result<PerformanceAlert, AppError> {
        let alert = sqlx::query_as::<_, PerformanceAlert>(
            "UPDATE performance_alerts SET state = $2, resolved_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(alert_id)
        .bind(state)
        .bind(resolved_at)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::NotFound(format!("预警不存在: {}", alert_id)),
            _ => e.into(),
        })?;

        Ok(alert)
    }

    async fn list_active_by_course(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<PerformanceAlert>, AppError> {
        let alerts = sqlx::query_as::<_, PerformanceAlert>(
            r#"
            SELECT * FROM performance_alerts
            WHERE course_id = $1 AND state = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .bind(course_id)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(alerts)
    }

    async fn list_active_by_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<PerformanceAlert>, AppError> {
        let alerts = sqlx::query_as::<_, PerformanceAlert>(
            r#"
            SELECT * FROM performance_alerts
            WHERE student_id = $1 AND state = 'active'
            ORDER BY created_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(alerts)
    }
}
