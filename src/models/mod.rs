//! 数据模型模块

mod alert;
mod alert_config;
mod common;

pub use alert::*;
pub use alert_config::*;
pub use common::*;
