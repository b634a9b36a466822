//! Verbena - 课程学习预警后端服务
//!
//! 学生参与度跟踪与早期预警系统，支持：
//! - 教师按课程配置风险阈值
//! - 周期性批量评估在读学生
//! - 四类独立风险标准（无活动、低完成率、低于平均分、积压任务）
//! - 幂等预警创建与生命周期管理

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use errors::AppError;
