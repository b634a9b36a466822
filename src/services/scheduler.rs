//! 预警评估调度器
//!
//! 进程级周期触发器：按固定间隔重新读取全部启用配置并逐一评估。
//! 生命周期由宿主进程管理（启动时 start，停机时 stop），
//! 自身不持有任何预警状态。

use crate::config::SchedulerSettings;
use crate::repositories::ConfigStore;
use crate::services::AlertService;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// 预警评估调度器
pub struct AlertScheduler {
    config_store: Arc<dyn ConfigStore>,
    alert_service: Arc<AlertService>,
    settings: SchedulerSettings,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl AlertScheduler {
    pub fn new(
        config_store: Arc<dyn ConfigStore>,
        alert_service: Arc<AlertService>,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            config_store,
            alert_service,
            settings,
            handle: Mutex::new(None),
        }
    }

    /// 启动周期评估任务；重复调用会先停掉旧任务
    pub fn start(&self) {
        if !self.settings.enabled {
            tracing::info!("预警调度器未启用");
            return;
        }

        self.stop();

        let config_store = self.config_store.clone();
        let alert_service = self.alert_service.clone();
        let interval_seconds = self.settings.interval_seconds;
        let run_on_startup = self.settings.run_on_startup;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_seconds));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            // interval 的首个 tick 立即返回；
            // 未开启启动即评估时消费掉它，等满一个周期再跑
            if !run_on_startup {
                ticker.tick().await;
            }

            loop {
                ticker.tick().await;
                run_evaluation_round(&config_store, &alert_service).await;
            }
        });

        *self.handle.lock().unwrap() = Some(task);

        tracing::info!(
            interval_seconds = self.settings.interval_seconds,
            "预警调度器已启动"
        );
    }

    /// 停止周期评估任务
    pub fn stop(&self) {
        if let Some(task) = self.handle.lock().unwrap().take() {
            task.abort();
            tracing::info!("预警调度器已停止");
        }
    }

    /// 立即执行一轮评估（测试与手动运维入口）
    pub async fn run_round(&self) {
        run_evaluation_round(&self.config_store, &self.alert_service).await;
    }
}

/// 一轮评估：每轮重新读取启用配置，单个配置失败不影响其余配置
async fn run_evaluation_round(
    config_store: &Arc<dyn ConfigStore>,
    alert_service: &Arc<AlertService>,
) {
    tracing::info!("开始周期预警评估");

    let configs = match config_store.list_active().await {
        Ok(configs) => configs,
        Err(e) => {
            tracing::error!(error = %e, "启用配置读取失败，本轮评估取消");
            return;
        }
    };

    tracing::info!(configs = configs.len(), "读取到启用配置");

    for config in configs {
        if let Err(e) = alert_service.evaluate(config.id).await {
            tracing::error!(
                config_id = %config.id,
                course_id = %config.course_id,
                error = %e,
                "课程评估失败，继续评估其余课程"
            );
        }
    }

    tracing::info!("周期预警评估完成");
}

impl Drop for AlertScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.handle.lock().unwrap().take() {
            task.abort();
        }
    }
}
