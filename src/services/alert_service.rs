//! 预警业务服务
//!
//! 负责预警配置管理、按配置批量评估学生、预警去重创建与生命周期流转。

use crate::errors::AppError;
use crate::models::{
    AlertConfig, AlertState, Breach, CreateAlertConfigRequest, PerformanceAlert,
};
use crate::services::evaluators;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use sqlx::types::Json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::repositories::{AlertStore, ConfigStore, EnrollmentGateway, MetricsGateway};

/// 单轮评估内并发处理的学生数上限
const EVAL_CONCURRENCY: usize = 8;

/// 预警业务服务
pub struct AlertService {
    config_store: Arc<dyn ConfigStore>,
    alert_store: Arc<dyn AlertStore>,
    metrics: Arc<dyn MetricsGateway>,
    enrollment: Arc<dyn EnrollmentGateway>,
}

impl AlertService {
    pub fn new(
        config_store: Arc<dyn ConfigStore>,
        alert_store: Arc<dyn AlertStore>,
        metrics: Arc<dyn MetricsGateway>,
        enrollment: Arc<dyn EnrollmentGateway>,
    ) -> Self {
        Self {
            config_store,
            alert_store,
            metrics,
            enrollment,
        }
    }

    // ========== 配置管理 ==========

    /// 创建预警配置（自动停用该课程旧配置），创建后立即执行一轮评估
    pub async fn create_config(
        &self,
        request: CreateAlertConfigRequest,
    ) -> Result<AlertConfig, AppError> {
        let config = self.config_store.create(&request).await?;

        if !config.has_any_criterion() {
            tracing::warn!(
                config_id = %config.id,
                course_id = %config.course_id,
                "配置未启用任何风险标准，评估不会产生预警"
            );
        }

        tracing::info!(
            config_id = %config.id,
            course_id = %config.course_id,
            "预警配置已创建"
        );

        // 评估失败不影响配置创建结果
        if let Err(e) = self.evaluate(config.id).await {
            tracing::warn!(
                config_id = %config.id,
                error = %e,
                "配置创建后的首轮评估失败"
            );
        }

        Ok(config)
    }

    /// 获取课程当前启用的预警配置
    pub async fn get_config(&self, course_id: Uuid) -> Result<AlertConfig, AppError> {
        self.config_store
            .find_active_by_course(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("课程 {} 未配置预警规则", course_id)))
    }

    // ========== 批量评估 ==========

    /// 按配置评估课程内全部在读学生
    ///
    /// 单个学生或单项标准失败只跳过该项，不中断整轮评估。
    pub async fn evaluate(&self, config_id: Uuid) -> Result<(), AppError> {
        let config = self
            .config_store
            .find_by_id(config_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("预警配置不存在: {}", config_id)))?;

        if !config.active {
            tracing::debug!(config_id = %config_id, "配置已停用，跳过评估");
            return Ok(());
        }

        let students = self.enrollment.active_students(config.course_id).await?;

        // 课程平均分每轮只计算一次，整批学生共享同一快照；
        // 课程内无人有完成记录时平均分无定义，本轮跳过该项标准
        let course_average = if config.below_average_points == Some(true) {
            match self.metrics.course_average_points(config.course_id).await {
                Ok(avg) => {
                    if avg.is_none() {
                        tracing::debug!(
                            course_id = %config.course_id,
                            "课程内无完成记录，平均分无定义，跳过低于平均分判定"
                        );
                    }
                    avg
                }
                Err(e) => {
                    tracing::warn!(
                        course_id = %config.course_id,
                        error = %e,
                        "课程平均分读取失败，跳过低于平均分判定"
                    );
                    None
                }
            }
        } else {
            None
        };

        tracing::info!(
            config_id = %config_id,
            course_id = %config.course_id,
            students = students.len(),
            "开始评估课程学生"
        );

        let created = AtomicUsize::new(0);

        stream::iter(students)
            .for_each_concurrent(EVAL_CONCURRENCY, |student_id| {
                let config = &config;
                let created = &created;
                async move {
                    let count = self
                        .evaluate_student(student_id, config, course_average)
                        .await;
                    created.fetch_add(count, Ordering::Relaxed);
                }
            })
            .await;

        tracing::info!(
            config_id = %config_id,
            course_id = %config.course_id,
            alerts_created = created.load(Ordering::Relaxed),
            "课程评估完成"
        );

        Ok(())
    }

    /// 手动触发课程评估；课程无启用配置时返回 NotFound
    pub async fn evaluate_course_now(&self, course_id: Uuid) -> Result<(), AppError> {
        let config = self.get_config(course_id).await?;
        self.evaluate(config.id).await
    }

    /// 评估单个学生的全部适用标准，返回新建预警数
    async fn evaluate_student(
        &self,
        student_id: Uuid,
        config: &AlertConfig,
        course_average: Option<f64>,
    ) -> usize {
        let mut breaches: Vec<Breach> = Vec::new();

        // 1. 无活动
        if let Some(days) = config.inactivity_days {
            match self.metrics.last_activity(student_id, config.course_id).await {
                Ok(last_activity) => {
                    breaches.extend(evaluators::evaluate_inactivity(
                        Utc::now(),
                        last_activity,
                        days,
                    ));
                }
                Err(e) => self.log_metric_failure(student_id, "last_activity", &e),
            }
        }

        // 2. 低完成率
        if let Some(min_percent) = config.min_completion_percent {
            match self.metrics.mission_counts(student_id, config.course_id).await {
                Ok(counts) => {
                    breaches.extend(evaluators::evaluate_completion(counts, min_percent));
                }
                Err(e) => self.log_metric_failure(student_id, "mission_counts", &e),
            }
        }

        // 3. 低于平均分（平均分无定义时整轮跳过）
        if let Some(average) = course_average {
            match self.metrics.student_points(student_id, config.course_id).await {
                Ok(points) => {
                    breaches.extend(evaluators::evaluate_below_average(points, average));
                }
                Err(e) => self.log_metric_failure(student_id, "student_points", &e),
            }
        }

        // 4. 积压任务
        if let Some(min_pending) = config.min_pending_missions {
            match self
                .metrics
                .pending_mission_count(student_id, config.course_id)
                .await
            {
                Ok(pending) => {
                    breaches.extend(evaluators::evaluate_pending_missions(pending, min_pending));
                }
                Err(e) => self.log_metric_failure(student_id, "pending_mission_count", &e),
            }
        }

        let mut created = 0;
        for breach in breaches {
            match self.try_create_alert(student_id, config, breach).await {
                Ok(true) => created += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        student_id = %student_id,
                        course_id = %config.course_id,
                        error = %e,
                        "预警创建失败"
                    );
                }
            }
        }

        created
    }

    /// 幂等创建预警：同一 (学生, 课程, 类型) 已有活跃预警时静默跳过
    async fn try_create_alert(
        &self,
        student_id: Uuid,
        config: &AlertConfig,
        breach: Breach,
    ) -> Result<bool, AppError> {
        let existing = self
            .alert_store
            .find_active(student_id, config.course_id, breach.alert_type)
            .await?;

        if existing.is_some() {
            tracing::debug!(
                student_id = %student_id,
                course_id = %config.course_id,
                alert_type = ?breach.alert_type,
                "同类型活跃预警已存在，跳过"
            );
            return Ok(false);
        }

        let alert = PerformanceAlert {
            id: Uuid::new_v4(),
            student_id,
            course_id: config.course_id,
            config_id: config.id,
            alert_type: breach.alert_type,
            description: breach.description,
            context: Json(breach.context),
            state: AlertState::Active,
            created_at: Utc::now(),
            resolved_at: None,
        };

        // 并发评估下唯一索引兜底，插入被冲突吞掉同样视为已去重
        match self.alert_store.insert(alert).await? {
            Some(inserted) => {
                tracing::info!(
                    alert_id = %inserted.id,
                    student_id = %student_id,
                    course_id = %config.course_id,
                    alert_type = ?inserted.alert_type,
                    "预警已创建"
                );
                Ok(true)
            }
            None => {
                tracing::debug!(
                    student_id = %student_id,
                    course_id = %config.course_id,
                    alert_type = ?breach.alert_type,
                    "并发插入被唯一约束拦截，跳过"
                );
                Ok(false)
            }
        }
    }

    fn log_metric_failure(&self, student_id: Uuid, metric: &str, error: &AppError) {
        tracing::warn!(
            student_id = %student_id,
            metric = metric,
            error = %error,
            "指标读取失败，跳过该项标准"
        );
    }

    // ========== 生命周期 ==========

    /// 解决预警：ACTIVE → RESOLVED；重复解决幂等，已忽略的预警不可再解决
    pub async fn resolve(&self, alert_id: Uuid) -> Result<PerformanceAlert, AppError> {
        self.transition(alert_id, AlertState::Resolved).await
    }

    /// 忽略预警：ACTIVE → IGNORED；重复忽略幂等，已解决的预警不可再忽略
    pub async fn ignore(&self, alert_id: Uuid) -> Result<PerformanceAlert, AppError> {
        self.transition(alert_id, AlertState::Ignored).await
    }

    async fn transition(
        &self,
        alert_id: Uuid,
        target: AlertState,
    ) -> Result<PerformanceAlert, AppError> {
        let alert = self
            .alert_store
            .find_by_id(alert_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("预警不存在: {}", alert_id)))?;

        if alert.state == target {
            return Ok(alert);
        }

        if alert.state.is_terminal() {
            return Err(AppError::Conflict(format!(
                "预警 {} 已处理完毕，不可再变更状态",
                alert_id
            )));
        }

        let updated = self
            .alert_store
            .set_state(alert_id, target, Utc::now())
            .await?;

        tracing::info!(
            alert_id = %alert_id,
            state = ?target,
            "预警状态已变更"
        );

        Ok(updated)
    }

    // ========== 查询 ==========

    /// 课程内全部活跃预警
    pub async fn list_active_by_course(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<PerformanceAlert>, AppError> {
        self.alert_store.list_active_by_course(course_id).await
    }

    /// 学生名下全部活跃预警
    pub async fn list_active_by_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<PerformanceAlert>, AppError> {
        self.alert_store.list_active_by_student(student_id).await
    }
}
