//! 路由配置模块

use crate::handlers;
use actix_web::web;

/// 配置所有路由
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // 健康检查路由（公开）
        .service(
            web::scope("/health")
                .route("", web::get().to(handlers::health))
                .route("/ready", web::get().to(handlers::ready)),
        )
        // API v1 路由
        .service(
            web::scope("/api/v1")
                // 预警配置路由
                .service(
                    web::scope("/alert-configs")
                        .route("", web::post().to(handlers::create_alert_config))
                        .route(
                            "/{course_id}",
                            web::get().to(handlers::get_alert_config),
                        ),
                )
                // 课程评估路由
                .service(
                    web::scope("/courses").route(
                        "/{course_id}/evaluate",
                        web::post().to(handlers::evaluate_course),
                    ),
                )
                // 预警路由
                .service(
                    web::scope("/alerts")
                        .route(
                            "/courses/{course_id}",
                            web::get().to(handlers::list_course_alerts),
                        )
                        .route(
                            "/students/{student_id}",
                            web::get().to(handlers::list_student_alerts),
                        )
                        .route("/{id}/resolve", web::post().to(handlers::resolve_alert))
                        .route("/{id}/ignore", web::post().to(handlers::ignore_alert)),
                ),
        );
}
