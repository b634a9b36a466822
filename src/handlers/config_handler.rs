//! 预警配置 API 处理器

use crate::errors::AppError;
use crate::models::{ApiResponse, CreateAlertConfigRequest};
use crate::services::AlertService;
use actix_web::{web, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 创建预警配置（自动停用该课程旧配置）
pub async fn create_alert_config(
    alert_service: web::Data<Arc<AlertService>>,
    body: web::Json<CreateAlertConfigRequest>,
) -> Result<HttpResponse, AppError> {
    // 验证请求
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let config = alert_service.create_config(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::created(config)))
}

/// 获取课程当前启用的预警配置
pub async fn get_alert_config(
    alert_service: web::Data<Arc<AlertService>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let course_id = path.into_inner();

    let config = alert_service.get_config(course_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(config)))
}
