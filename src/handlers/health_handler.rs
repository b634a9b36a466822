//! 健康检查 API 处理器

use crate::db::PostgresPool;
use actix_web::{web, HttpResponse};
use std::sync::Arc;

/// 简单健康检查（用于负载均衡器）
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 就绪检查（用于 Kubernetes）
pub async fn ready(pg_pool: web::Data<Arc<PostgresPool>>) -> HttpResponse {
    match pg_pool.health_check().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "ready": true
        })),
        Err(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "ready": false,
            "database": false
        })),
    }
}
