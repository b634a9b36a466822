//! 业务逻辑层（Service）

mod alert_service;
pub mod evaluators;
mod scheduler;

pub use alert_service::AlertService;
pub use scheduler::AlertScheduler;
