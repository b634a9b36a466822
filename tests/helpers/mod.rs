//! 测试辅助工具

use crate::mocks::{
    InMemoryAlertStore, InMemoryConfigStore, MockEnrollmentGateway, MockMetricsGateway,
};
use std::sync::Arc;
use uuid::Uuid;
use verbena::models::CreateAlertConfigRequest;
use verbena::services::AlertService;

/// 组装好的被测服务与全部内存依赖
pub struct TestHarness {
    pub service: Arc<AlertService>,
    pub alert_store: Arc<InMemoryAlertStore>,
    pub config_store: Arc<InMemoryConfigStore>,
    pub metrics: Arc<MockMetricsGateway>,
    pub enrollment: Arc<MockEnrollmentGateway>,
}

impl TestHarness {
    pub fn new() -> Self {
        let alert_store = Arc::new(InMemoryAlertStore::new());
        let config_store = Arc::new(InMemoryConfigStore::new());
        let metrics = Arc::new(MockMetricsGateway::new());
        let enrollment = Arc::new(MockEnrollmentGateway::new());

        let service = Arc::new(AlertService::new(
            config_store.clone(),
            alert_store.clone(),
            metrics.clone(),
            enrollment.clone(),
        ));

        Self {
            service,
            alert_store,
            config_store,
            metrics,
            enrollment,
        }
    }
}

/// 不含任何标准的配置请求，测试按需填充阈值
pub fn config_request(course_id: Uuid) -> CreateAlertConfigRequest {
    CreateAlertConfigRequest {
        course_id,
        owner_id: Uuid::new_v4(),
        inactivity_days: None,
        min_completion_percent: None,
        below_average_points: None,
        min_pending_missions: None,
    }
}
