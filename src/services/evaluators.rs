//! 风险标准判定函数
//!
//! 四项标准相互独立，均为纯函数：输入指标快照与阈值，
//! 输出是否触发及触发时的上下文。IO 和错误隔离由编排方负责。

use crate::models::{AlertContext, AlertType, Breach, MissionCounts};
use chrono::{DateTime, Utc};

/// 无活动判定：距最近活动天数 ≥ 阈值即触发（含相等）
pub fn evaluate_inactivity(
    now: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    inactivity_days: i32,
) -> Option<Breach> {
    let days_inactive = (now - last_activity).num_days();
    if days_inactive < inactivity_days as i64 {
        return None;
    }

    Some(Breach {
        alert_type: AlertType::Inactivity,
        description: format!("连续 {} 天无学习活动", days_inactive),
        context: AlertContext::Inactivity {
            days_inactive,
            last_activity,
        },
    })
}

/// 低完成率判定：完成率 < 阈值即触发；无任何任务时比率无定义，不判定
pub fn evaluate_completion(counts: MissionCounts, min_percent: f64) -> Option<Breach> {
    let percent = counts.completion_percent()?;
    if percent >= min_percent {
        return None;
    }

    Some(Breach {
        alert_type: AlertType::LowCompletion,
        description: format!("任务完成率仅 {:.1}%", percent),
        context: AlertContext::LowCompletion {
            percent,
            completed: counts.completed,
            total: counts.total,
        },
    })
}

/// 低于平均分判定：学生积分 < 课程平均分即触发。
/// 平均分由编排方按课程计算一次后传入，整批学生共享同一快照。
pub fn evaluate_below_average(student_points: i64, course_average: f64) -> Option<Breach> {
    if (student_points as f64) >= course_average {
        return None;
    }

    Some(Breach {
        alert_type: AlertType::BelowAverage,
        description: format!(
            "积分 {} 低于课程平均分 {:.1}",
            student_points, course_average
        ),
        context: AlertContext::BelowAverage {
            student_points,
            course_average,
        },
    })
}

/// 积压任务判定：未完成任务数 ≥ 阈值即触发（含相等）
pub fn evaluate_pending_missions(pending: i64, min_pending: i32) -> Option<Breach> {
    if pending < min_pending as i64 {
        return None;
    }

    Some(Breach {
        alert_type: AlertType::PendingMissions,
        description: format!("{} 个任务未完成", pending),
        context: AlertContext::PendingMissions { pending },
    })
}
