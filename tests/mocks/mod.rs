//! Mock 对象
//!
//! 数据访问契约的内存实现，行为与 Postgres 仓库一致
//! （包括活跃预警唯一约束与配置停用语义）。

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

use verbena::errors::AppError;
use verbena::models::{
    AlertConfig, AlertState, AlertType, CreateAlertConfigRequest, MissionCounts, PerformanceAlert,
};
use verbena::repositories::{AlertStore, ConfigStore, EnrollmentGateway, MetricsGateway};

/// 内存预警存储
#[derive(Default)]
pub struct InMemoryAlertStore {
    alerts: Mutex<Vec<PerformanceAlert>>,
}

impl InMemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部活跃预警（测试断言用）
    pub fn active_alerts(&self) -> Vec<PerformanceAlert> {
        self.alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.state == AlertState::Active)
            .cloned()
            .collect()
    }

    /// 某学生某类型的活跃预警数（测试断言用）
    pub fn count_active(&self, student_id: Uuid, alert_type: AlertType) -> usize {
        self.alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| {
                a.student_id == student_id
                    && a.alert_type == alert_type
                    && a.state == AlertState::Active
            })
            .count()
    }
}

#[async_trait::async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn find_active(
        &self,
        student_id: Uuid,
        course_id: Uuid,
        alert_type: AlertType,
    ) -> Result<Option<PerformanceAlert>, AppError> {
        Ok(self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .find(|a| {
                a.student_id == student_id
                    && a.course_id == course_id
                    && a.alert_type == alert_type
                    && a.state == AlertState::Active
            })
            .cloned())
    }

    async fn insert(&self, alert: PerformanceAlert) -> Result<Option<PerformanceAlert>, AppError> {
        let mut alerts = self.alerts.lock().unwrap();

        // 模拟部分唯一索引：同键活跃预警已存在时插入被吞掉
        let duplicate = alerts.iter().any(|a| {
            a.student_id == alert.student_id
                && a.course_id == alert.course_id
                && a.alert_type == alert.alert_type
                && a.state == AlertState::Active
        });
        if duplicate {
            return Ok(None);
        }

        alerts.push(alert.clone());
        Ok(Some(alert))
    }

    async fn find_by_id(&self, alert_id: Uuid) -> Result<Option<PerformanceAlert>, AppError> {
        Ok(self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == alert_id)
            .cloned())
    }

    async fn set_state(
        &self,
        alert_id: Uuid,
        state: AlertState,
        resolved_at: DateTime<Utc>,
    ) -> Result<PerformanceAlert, AppError> {
        let mut alerts = self.alerts.lock().unwrap();
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == alert_id)
            .ok_or_else(|| AppError::NotFound(format!("预警不存在: {}", alert_id)))?;

        alert.state = state;
        alert.resolved_at = Some(resolved_at);
        Ok(alert.clone())
    }

    async fn list_active_by_course(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<PerformanceAlert>, AppError> {
        Ok(self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.course_id == course_id && a.state == AlertState::Active)
            .cloned()
            .collect())
    }

    async fn list_active_by_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<PerformanceAlert>, AppError> {
        Ok(self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.student_id == student_id && a.state == AlertState::Active)
            .cloned()
            .collect())
    }
}

/// 内存预警配置存储
#[derive(Default)]
pub struct InMemoryConfigStore {
    configs: Mutex<Vec<AlertConfig>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接放入一份配置（测试停用配置等场景）
    pub fn insert_raw(&self, config: AlertConfig) {
        self.configs.lock().unwrap().push(config);
    }

    pub fn get(&self, config_id: Uuid) -> Option<AlertConfig> {
        self.configs
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == config_id)
            .cloned()
    }
}

#[async_trait::async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn create(&self, request: &CreateAlertConfigRequest) -> Result<AlertConfig, AppError> {
        let mut configs = self.configs.lock().unwrap();
        let now = Utc::now();

        for config in configs.iter_mut() {
            if config.course_id == request.course_id && config.active {
                config.active = false;
                config.updated_at = now;
            }
        }

        let config = AlertConfig {
            id: Uuid::new_v4(),
            course_id: request.course_id,
            owner_id: request.owner_id,
            inactivity_days: request.inactivity_days,
            min_completion_percent: request.min_completion_percent,
            below_average_points: request.below_average_points,
            min_pending_missions: request.min_pending_missions,
            active: true,
            created_at: now,
            updated_at: now,
        };
        configs.push(config.clone());
        Ok(config)
    }

    async fn find_by_id(&self, config_id: Uuid) -> Result<Option<AlertConfig>, AppError> {
        Ok(self.get(config_id))
    }

    async fn find_active_by_course(
        &self,
        course_id: Uuid,
    ) -> Result<Option<AlertConfig>, AppError> {
        Ok(self
            .configs
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.course_id == course_id && c.active)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<AlertConfig>, AppError> {
        Ok(self
            .configs
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.active)
            .cloned()
            .collect())
    }
}

/// 单个学生的指标固定值
#[derive(Debug, Clone)]
pub struct StudentFixture {
    pub last_activity: DateTime<Utc>,
    pub counts: MissionCounts,
    pub points: i64,
    pub pending: i64,
}

impl StudentFixture {
    /// 各项指标均不触发预警的基线学生
    pub fn healthy() -> Self {
        Self {
            last_activity: Utc::now(),
            counts: MissionCounts { total: 4, completed: 4 },
            points: 1000,
            pending: 0,
        }
    }
}

/// 内存指标网关；`failing` 中的学生所有指标读取均失败
#[derive(Default)]
pub struct MockMetricsGateway {
    students: Mutex<HashMap<Uuid, StudentFixture>>,
    course_average: Mutex<Option<f64>>,
    failing: Mutex<HashSet<Uuid>>,
}

impl MockMetricsGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_student(&self, student_id: Uuid, fixture: StudentFixture) {
        self.students.lock().unwrap().insert(student_id, fixture);
    }

    pub fn set_course_average(&self, average: Option<f64>) {
        *self.course_average.lock().unwrap() = average;
    }

    pub fn fail_student(&self, student_id: Uuid) {
        self.failing.lock().unwrap().insert(student_id);
    }

    fn fixture(&self, student_id: Uuid) -> Result<StudentFixture, AppError> {
        if self.failing.lock().unwrap().contains(&student_id) {
            return Err(AppError::MetricUnavailable(format!(
                "指标读取失败: {}",
                student_id
            )));
        }
        self.students
            .lock()
            .unwrap()
            .get(&student_id)
            .cloned()
            .ok_or_else(|| AppError::MetricUnavailable(format!("无指标数据: {}", student_id)))
    }
}

#[async_trait::async_trait]
impl MetricsGateway for MockMetricsGateway {
    async fn last_activity(
        &self,
        student_id: Uuid,
        _course_id: Uuid,
    ) -> Result<DateTime<Utc>, AppError> {
        Ok(self.fixture(student_id)?.last_activity)
    }

    async fn mission_counts(
        &self,
        student_id: Uuid,
        _course_id: Uuid,
    ) -> Result<MissionCounts, AppError> {
        Ok(self.fixture(student_id)?.counts)
    }

    async fn student_points(&self, student_id: Uuid, _course_id: Uuid) -> Result<i64, AppError> {
        Ok(self.fixture(student_id)?.points)
    }

    async fn course_average_points(&self, _course_id: Uuid) -> Result<Option<f64>, AppError> {
        Ok(*self.course_average.lock().unwrap())
    }

    async fn pending_mission_count(
        &self,
        student_id: Uuid,
        _course_id: Uuid,
    ) -> Result<i64, AppError> {
        Ok(self.fixture(student_id)?.pending)
    }
}

/// 内存选课网关；`failing` 中的课程名册读取失败
#[derive(Default)]
pub struct MockEnrollmentGateway {
    enrollments: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    failing: Mutex<HashSet<Uuid>>,
}

impl MockEnrollmentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enroll(&self, course_id: Uuid, student_id: Uuid) {
        self.enrollments
            .lock()
            .unwrap()
            .entry(course_id)
            .or_default()
            .push(student_id);
    }

    pub fn fail_course(&self, course_id: Uuid) {
        self.failing.lock().unwrap().insert(course_id);
    }
}

#[async_trait::async_trait]
impl EnrollmentGateway for MockEnrollmentGateway {
    async fn active_students(&self, course_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        if self.failing.lock().unwrap().contains(&course_id) {
            return Err(AppError::InternalError(format!(
                "名册读取失败: {}",
                course_id
            )));
        }
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .get(&course_id)
            .cloned()
            .unwrap_or_default())
    }
}
