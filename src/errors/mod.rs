//! 错误类型模块

mod app_error;

pub use app_error::AppError;
