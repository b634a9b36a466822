//! 数据访问契约（用于依赖注入与测试替身）
//!
//! 评估引擎只通过这组 trait 读取学习指标和读写预警数据，
//! 生产环境由 Postgres 仓库实现，测试中由内存实现替代。

use crate::errors::AppError;
use crate::models::{
    AlertConfig, AlertState, AlertType, CreateAlertConfigRequest, MissionCounts, PerformanceAlert,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 学习指标网关（只读聚合数据）
#[async_trait::async_trait]
pub trait MetricsGateway: Send + Sync {
    /// 学生在课程内的最近活动时间（无任何进度记录时回退为选课时间）
    async fn last_activity(&self, student_id: Uuid, course_id: Uuid)
        -> Result<DateTime<Utc>, AppError>;

    /// 学生在课程内的任务总数与已完成数
    async fn mission_counts(&self, student_id: Uuid, course_id: Uuid)
        -> Result<MissionCounts, AppError>;

    /// 学生在课程内已完成任务的积分总和
    async fn student_points(&self, student_id: Uuid, course_id: Uuid) -> Result<i64, AppError>;

    /// 课程平均积分，仅统计至少完成一个任务的学生；
    /// 课程内无人有完成记录时平均分无定义，返回 None
    async fn course_average_points(&self, course_id: Uuid) -> Result<Option<f64>, AppError>;

    /// 学生在课程内未完成的任务数
    async fn pending_mission_count(&self, student_id: Uuid, course_id: Uuid)
        -> Result<i64, AppError>;
}

/// 选课网关
#[async_trait::async_trait]
pub trait EnrollmentGateway: Send + Sync {
    /// 课程内处于在读状态的学生
    async fn active_students(&self, course_id: Uuid) -> Result<Vec<Uuid>, AppError>;
}

/// 预警存储
#[async_trait::async_trait]
pub trait AlertStore: Send + Sync {
    /// 查找同一 (学生, 课程, 类型) 下处于活跃状态的预警，用于去重
    async fn find_active(
        &self,
        student_id: Uuid,
        course_id: Uuid,
        alert_type: AlertType,
    ) -> Result<Option<PerformanceAlert>, AppError>;

    /// 插入新预警；若唯一约束冲突（并发评估）返回 None
    async fn insert(&self, alert: PerformanceAlert) -> Result<Option<PerformanceAlert>, AppError>;

    async fn find_by_id(&self, alert_id: Uuid) -> Result<Option<PerformanceAlert>, AppError>;

    /// 变更预警状态并记录处理时间
    async fn set_state(
        &self,
        alert_id: Uuid,
        state: AlertState,
        resolved_at: DateTime<Utc>,
    ) -> Result<PerformanceAlert, AppError>;

    async fn list_active_by_course(&self, course_id: Uuid)
        -> Result<Vec<PerformanceAlert>, AppError>;

    async fn list_active_by_student(&self, student_id: Uuid)
        -> Result<Vec<PerformanceAlert>, AppError>;
}

/// 预警配置存储
#[async_trait::async_trait]
pub trait ConfigStore: Send + Sync {
    /// 创建新配置并停用该课程之前的启用配置
    async fn create(&self, request: &CreateAlertConfigRequest) -> Result<AlertConfig, AppError>;

    async fn find_by_id(&self, config_id: Uuid) -> Result<Option<AlertConfig>, AppError>;

    /// 课程当前启用的配置
    async fn find_active_by_course(&self, course_id: Uuid)
        -> Result<Option<AlertConfig>, AppError>;

    /// 所有启用配置（调度器每轮重新读取）
    async fn list_active(&self) -> Result<Vec<AlertConfig>, AppError>;
}
