//! HTTP 处理器模块

mod alert_handler;
mod config_handler;
mod health_handler;

pub use alert_handler::*;
pub use config_handler::*;
pub use health_handler::*;
