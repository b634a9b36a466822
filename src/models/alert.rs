//! 学业预警模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// 预警类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "alert_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Inactivity,
    LowCompletion,
    BelowAverage,
    PendingMissions,
}

/// 预警状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "alert_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    Active,
    Resolved,
    Ignored,
}

impl AlertState {
    /// 是否为终态（已解决/已忽略后不可再变更）
    pub fn is_terminal(&self) -> bool {
        matches!(self, AlertState::Resolved | AlertState::Ignored)
    }
}

/// 触发预警时的指标快照，按类型区分字段
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertContext {
    Inactivity {
        days_inactive: i64,
        last_activity: DateTime<Utc>,
    },
    LowCompletion {
        percent: f64,
        completed: i64,
        total: i64,
    },
    BelowAverage {
        student_points: i64,
        course_average: f64,
    },
    PendingMissions {
        pending: i64,
    },
}

/// 学业表现预警
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PerformanceAlert {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub config_id: Uuid,
    pub alert_type: AlertType,
    pub description: String,
    pub context: Json<AlertContext>,
    pub state: AlertState,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// 单条判定结果：某学生在某课程触发了一项风险标准
#[derive(Debug, Clone, PartialEq)]
pub struct Breach {
    pub alert_type: AlertType,
    pub description: String,
    pub context: AlertContext,
}

/// 学生任务进度计数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionCounts {
    pub total: i64,
    pub completed: i64,
}

impl MissionCounts {
    /// 完成率（百分比）；无任何任务时比率无定义
    pub fn completion_percent(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.completed as f64 * 100.0 / self.total as f64)
    }
}
