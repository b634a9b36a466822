//! 预警生命周期测试：状态流转、幂等与终态约束

use crate::helpers::{config_request, TestHarness};
use crate::mocks::StudentFixture;
use chrono::{Duration, Utc};
use uuid::Uuid;
use verbena::errors::AppError;
use verbena::models::{AlertState, AlertType, PerformanceAlert};

/// 产生一条无活动预警并返回
async fn create_inactivity_alert(harness: &TestHarness) -> PerformanceAlert {
    let course_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();

    harness.enrollment.enroll(course_id, student_id);
    harness.metrics.set_student(
        student_id,
        StudentFixture {
            last_activity: Utc::now() - Duration::days(30),
            ..StudentFixture::healthy()
        },
    );

    let mut request = config_request(course_id);
    request.inactivity_days = Some(7);
    harness.service.create_config(request).await.unwrap();

    harness
        .alert_store
        .active_alerts()
        .into_iter()
        .find(|a| a.student_id == student_id)
        .expect("评估应产生一条无活动预警")
}

#[tokio::test]
async fn test_resolve_sets_state_and_timestamp() {
    let harness = TestHarness::new();
    let alert = create_inactivity_alert(&harness).await;

    let resolved = harness.service.resolve(alert.id).await.unwrap();

    assert_eq!(resolved.state, AlertState::Resolved);
    assert!(resolved.resolved_at.is_some(), "解决时应记录处理时间");
}

#[tokio::test]
async fn test_ignore_sets_state_and_timestamp() {
    let harness = TestHarness::new();
    let alert = create_inactivity_alert(&harness).await;

    let ignored = harness.service.ignore(alert.id).await.unwrap();

    assert_eq!(ignored.state, AlertState::Ignored);
    assert!(ignored.resolved_at.is_some());
}

#[tokio::test]
async fn test_resolve_missing_alert() {
    let harness = TestHarness::new();

    let result = harness.service.resolve(Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_is_idempotent() {
    let harness = TestHarness::new();
    let alert = create_inactivity_alert(&harness).await;

    harness.service.resolve(alert.id).await.unwrap();
    let again = harness.service.resolve(alert.id).await.unwrap();

    assert_eq!(again.state, AlertState::Resolved, "重复解决应为幂等空操作");
}

/// 终态互斥：一条预警不能同时处于已解决和已忽略
#[tokio::test]
async fn test_terminal_states_are_exclusive() {
    let harness = TestHarness::new();

    let alert = create_inactivity_alert(&harness).await;
    harness.service.resolve(alert.id).await.unwrap();
    let result = harness.service.ignore(alert.id).await;
    assert!(
        matches!(result, Err(AppError::Conflict(_))),
        "已解决的预警不可再忽略"
    );

    let alert = create_inactivity_alert(&harness).await;
    harness.service.ignore(alert.id).await.unwrap();
    let result = harness.service.resolve(alert.id).await;
    assert!(
        matches!(result, Err(AppError::Conflict(_))),
        "已忽略的预警不可再解决"
    );
}

/// 预警关闭后再次违反同一标准应产生新预警
#[tokio::test]
async fn test_new_breach_after_resolution() {
    let harness = TestHarness::new();
    let alert = create_inactivity_alert(&harness).await;
    let config = harness
        .config_store
        .get(alert.config_id)
        .expect("配置应存在");

    harness.service.resolve(alert.id).await.unwrap();
    assert_eq!(
        harness.alert_store.count_active(alert.student_id, AlertType::Inactivity),
        0
    );

    // 学生仍然不活跃，重新评估产生新的活跃预警
    harness.service.evaluate(config.id).await.unwrap();

    assert_eq!(
        harness.alert_store.count_active(alert.student_id, AlertType::Inactivity),
        1,
        "关闭后的再次违反应产生新预警"
    );

    let reopened = harness
        .alert_store
        .active_alerts()
        .into_iter()
        .find(|a| a.student_id == alert.student_id)
        .unwrap();
    assert_ne!(reopened.id, alert.id, "应是新记录而非复用旧预警");
}

#[tokio::test]
async fn test_list_active_excludes_closed() {
    let harness = TestHarness::new();
    let alert = create_inactivity_alert(&harness).await;

    let listed = harness
        .service
        .list_active_by_course(alert.course_id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    harness.service.ignore(alert.id).await.unwrap();

    let listed = harness
        .service
        .list_active_by_course(alert.course_id)
        .await
        .unwrap();
    assert!(listed.is_empty(), "已忽略的预警不应出现在活跃列表");

    let by_student = harness
        .service
        .list_active_by_student(alert.student_id)
        .await
        .unwrap();
    assert!(by_student.is_empty());
}
