//! 预警 API 处理器

use crate::errors::AppError;
use crate::models::ApiResponse;
use crate::services::AlertService;
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;

/// 查询课程活跃预警
pub async fn list_course_alerts(
    alert_service: web::Data<Arc<AlertService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let course_id = path.into_inner();

    let alerts = alert_service.list_active_by_course(course_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(alerts)))
}

/// 查询学生活跃预警
pub async fn list_student_alerts(
    alert_service: web::Data<Arc<AlertService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let student_id = path.into_inner();

    let alerts = alert_service.list_active_by_student(student_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(alerts)))
}

/// 解决预警
pub async fn resolve_alert(
    alert_service: web::Data<Arc<AlertService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let alert_id = path.into_inner();

    let alert = alert_service.resolve(alert_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(alert)))
}

/// 忽略预警
pub async fn ignore_alert(
    alert_service: web::Data<Arc<AlertService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let alert_id = path.into_inner();

    let alert = alert_service.ignore(alert_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(alert)))
}

/// 手动触发课程评估
///
/// 部分学生评估失败不影响返回结果；仅课程未配置预警时返回 404
pub async fn evaluate_course(
    alert_service: web::Data<Arc<AlertService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let course_id = path.into_inner();

    alert_service.evaluate_course_now(course_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("评估已完成")))
}
