//! 选课数据仓库

use crate::db::PostgresPool;
use crate::errors::AppError;
use crate::repositories::EnrollmentGateway;
use uuid::Uuid;

/// 选课数据仓库
#[derive(Clone)]
pub struct EnrollmentRepository {
    pool: PostgresPool,
}

impl EnrollmentRepository {
    pub fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl EnrollmentGateway for EnrollmentRepository {
    async fn active_students(&self, course_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT student_id FROM enrollments WHERE course_id = $1 AND status = 'active'",
        )
        .bind(course_id)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
