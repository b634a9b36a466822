//! 学习进度数据仓库（指标网关的 Postgres 实现）

use crate::db::PostgresPool;
use crate::errors::AppError;
use crate::models::MissionCounts;
use crate::repositories::MetricsGateway;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 学习进度数据仓库
///
/// 所有查询均为只读聚合，评估引擎不修改进度数据。
#[derive(Clone)]
pub struct ProgressRepository {
    pool: PostgresPool,
}

impl ProgressRepository {
    pub fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MetricsGateway for ProgressRepository {
    async fn last_activity(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<DateTime<Utc>, AppError> {
        let latest: Option<(Option<DateTime<Utc>>,)> = sqlx::query_as(
            r#"
            SELECT MAX(p.updated_at) FROM mission_progress p
            JOIN missions m ON m.id = p.mission_id
            WHERE p.student_id = $1 AND m.course_id = $2
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(self.pool.pool())
        .await?;

        if let Some((Some(ts),)) = latest {
            return Ok(ts);
        }

        // 无任何进度记录时回退为选课时间
        let enrolled: Option<(DateTime<Utc>,)> = sqlx::query_as(
            "SELECT enrolled_at FROM enrollments WHERE student_id = $1 AND course_id = $2",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(self.pool.pool())
        .await?;

        enrolled.map(|(ts,)| ts).ok_or_else(|| {
            AppError::MetricUnavailable(format!(
                "学生 {} 在课程 {} 无选课记录",
                student_id, course_id
            ))
        })
    }

    async fn mission_counts(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<MissionCounts, AppError> {
        let (total, completed): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE p.completed)
            FROM mission_progress p
            JOIN missions m ON m.id = p.mission_id
            WHERE p.student_id = $1 AND m.course_id = $2
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(self.pool.pool())
        .await?;

        Ok(MissionCounts { total, completed })
    }

    async fn student_points(&self, student_id: Uuid, course_id: Uuid) -> Result<i64, AppError> {
        let (points,): (Option<i64>,) = sqlx::query_as(
            r#"
            SELECT SUM(m.reward_points)::BIGINT
            FROM mission_progress p
            JOIN missions m ON m.id = p.mission_id
            WHERE p.student_id = $1 AND m.course_id = $2 AND p.completed
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(self.pool.pool())
        .await?;

        Ok(points.unwrap_or(0))
    }

    async fn course_average_points(&self, course_id: Uuid) -> Result<Option<f64>, AppError> {
        // 仅统计至少完成一个任务的学生；课程内无人有完成记录时返回 NULL
        let (average,): (Option<f64>,) = sqlx::query_as(
            r#"
            SELECT AVG(points)::FLOAT8 FROM (
                SELECT SUM(m.reward_points) AS points
                FROM mission_progress p
                JOIN missions m ON m.id = p.mission_id
                WHERE m.course_id = $1 AND p.completed
                GROUP BY p.student_id
            ) per_student
            "#,
        )
        .bind(course_id)
        .fetch_one(self.pool.pool())
        .await?;

        Ok(average)
    }

    async fn pending_mission_count(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<i64, AppError> {
        let (pending,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM mission_progress p
            JOIN missions m ON m.id = p.mission_id
            WHERE p.student_id = $1 AND m.course_id = $2 AND NOT p.completed
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(self.pool.pool())
        .await?;

        Ok(pending)
    }
}
