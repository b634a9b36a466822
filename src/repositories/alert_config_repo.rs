//! 预警配置数据仓库

use crate::db::PostgresPool;
use crate::errors::AppError;
use crate::models::{AlertConfig, CreateAlertConfigRequest};
use crate::repositories::ConfigStore;
use chrono::Utc;
use uuid::Uuid;

/// 预警配置数据仓库
#[derive(Clone)]
pub struct AlertConfigRepository {
    pool: PostgresPool,
}

impl AlertConfigRepository {
    pub fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ConfigStore for AlertConfigRepository {
    async fn create(&self, request: &CreateAlertConfigRequest) -> Result<AlertConfig, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        // 停用旧配置和创建新配置在同一事务内完成，
        // 保证每门课程至多一份启用配置
        let mut tx = self.pool.pool().begin().await?;

        sqlx::query(
            "UPDATE alert_configs SET active = false, updated_at = $2 WHERE course_id = $1 AND active = true",
        )
        .bind(request.course_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let config = sqlx::query_as::<_, AlertConfig>(
            r#"
            INSERT INTO alert_configs
                (id, course_id, owner_id, inactivity_days, min_completion_percent,
                 below_average_points, min_pending_missions, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, true, $8, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.course_id)
        .bind(request.owner_id)
        .bind(request.inactivity_days)
        .bind(request.min_completion_percent)
        .bind(request.below_average_points)
        .bind(request.min_pending_missions)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(config)
    }

    async fn find_by_id(&self, config_id: Uuid) -> Result<Option<AlertConfig>, AppError> {
        let config = sqlx::query_as::<_, AlertConfig>(
            "SELECT * FROM alert_configs WHERE id = $1",
        )
        .bind(config_id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(config)
    }

    async fn find_active_by_course(
        &self,
        course_id: Uuid,
    ) -> Result<Option<AlertConfig>, AppError> {
        let config = sqlx::query_as::<_, AlertConfig>(
            "SELECT * FROM alert_configs WHERE course_id = $1 AND active = true",
        )
        .bind(course_id)
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(config)
    }

    async fn list_active(&self) -> Result<Vec<AlertConfig>, AppError> {
        let configs = sqlx::query_as::<_, AlertConfig>(
            "SELECT * FROM alert_configs WHERE active = true ORDER BY created_at",
        )
        .fetch_all(self.pool.pool())
        .await?;

        Ok(configs)
    }
}
