//! Verbena - 课程学习预警后端服务
//!
//! 学生参与度跟踪与早期预警系统

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use verbena::{
    config::Settings,
    db::PostgresPool,
    repositories::{
        AlertConfigRepository, AlertRepository, AlertStore, ConfigStore, EnrollmentGateway,
        EnrollmentRepository, MetricsGateway, ProgressRepository,
    },
    routes,
    services::{AlertScheduler, AlertService},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 初始化日志
    init_tracing();

    info!("🌿 Verbena 服务启动中...");

    // 加载配置
    let settings = Settings::load().expect("配置加载失败");
    info!("✅ 配置加载完成");

    // 连接数据库
    let pg_pool = Arc::new(
        PostgresPool::new(&settings)
            .await
            .expect("数据库连接失败"),
    );
    info!("✅ 数据库连接成功");

    // 运行迁移
    pg_pool.run_migrations().await.expect("数据库迁移失败");
    info!("✅ 数据库迁移完成");

    // 初始化仓库
    let config_store: Arc<dyn ConfigStore> =
        Arc::new(AlertConfigRepository::new((*pg_pool).clone()));
    let alert_store: Arc<dyn AlertStore> = Arc::new(AlertRepository::new((*pg_pool).clone()));
    let metrics: Arc<dyn MetricsGateway> = Arc::new(ProgressRepository::new((*pg_pool).clone()));
    let enrollment: Arc<dyn EnrollmentGateway> =
        Arc::new(EnrollmentRepository::new((*pg_pool).clone()));

    // 初始化服务
    let alert_service = Arc::new(AlertService::new(
        config_store.clone(),
        alert_store,
        metrics,
        enrollment,
    ));

    // 启动周期评估调度器
    let scheduler = Arc::new(AlertScheduler::new(
        config_store,
        alert_service.clone(),
        settings.scheduler.clone(),
    ));
    scheduler.start();

    let server_addr = settings.server_addr();
    let workers = if settings.server.workers == 0 {
        num_cpus::get()
    } else {
        settings.server.workers
    };

    info!("🚀 服务启动在 http://{}", server_addr);
    info!("📊 工作线程数: {}", workers);

    // 启动 HTTP 服务器
    let server = HttpServer::new(move || {
        // 配置 CORS
        let cors = Cors::default()
            .allowed_origin_fn(|origin, _req_head| {
                // 开发环境允许所有来源，生产环境应配置白名单
                origin.as_bytes().starts_with(b"http://localhost")
                    || origin.as_bytes().starts_with(b"https://")
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec!["Authorization", "Content-Type"])
            .max_age(3600);

        App::new()
            // 全局中间件
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            // 注入服务
            .app_data(web::Data::new(pg_pool.clone()))
            .app_data(web::Data::new(alert_service.clone()))
            // 配置 HTTP 路由
            .configure(routes::configure)
    })
    .workers(workers)
    .bind(&server_addr)?
    .run()
    .await;

    // 停机时回收调度任务
    scheduler.stop();
    info!("Verbena 服务已退出");

    server
}

/// 初始化日志系统
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,verbena=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
