//! 配置管理模块

mod settings;

pub use settings::{
    DatabaseSettings,
    LoggingSettings,
    SchedulerSettings,
    ServerSettings,
    Settings,
};
