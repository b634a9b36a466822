//! 预警规则配置模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// 课程预警规则配置
///
/// 每门课程同一时间至多一份启用配置；四项阈值相互独立，
/// 为空的阈值表示该项标准不参与评估（而非按 0 处理）。
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AlertConfig {
    pub id: Uuid,
    pub course_id: Uuid,
    pub owner_id: Uuid,
    /// 连续无活动天数 ≥ 该值时触发
    pub inactivity_days: Option<i32>,
    /// 任务完成率 < 该百分比时触发
    pub min_completion_percent: Option<f64>,
    /// 为 true 时，积分低于课程平均分即触发
    pub below_average_points: Option<bool>,
    /// 未完成任务数 ≥ 该值时触发
    pub min_pending_missions: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AlertConfig {
    /// 是否配置了至少一项风险标准
    pub fn has_any_criterion(&self) -> bool {
        self.inactivity_days.is_some()
            || self.min_completion_percent.is_some()
            || self.below_average_points == Some(true)
            || self.min_pending_missions.is_some()
    }
}

/// 创建预警配置请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAlertConfigRequest {
    pub course_id: Uuid,
    pub owner_id: Uuid,

    #[validate(range(min = 1, max = 365, message = "无活动天数应在 1-365 之间"))]
    pub inactivity_days: Option<i32>,

    #[validate(range(min = 0.0, max = 100.0, message = "最低完成率应在 0-100 之间"))]
    pub min_completion_percent: Option<f64>,

    pub below_average_points: Option<bool>,

    #[validate(range(min = 1, max = 1000, message = "未完成任务阈值应在 1-1000 之间"))]
    pub min_pending_missions: Option<i32>,
}
