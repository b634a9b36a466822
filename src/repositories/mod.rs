//! 数据访问层（Repository）

mod alert_config_repo;
mod alert_repo;
mod enrollment_repo;
mod gateway;
mod progress_repo;

pub use alert_config_repo::AlertConfigRepository;
pub use alert_repo::AlertRepository;
pub use enrollment_repo::EnrollmentRepository;
pub use gateway::{AlertStore, ConfigStore, EnrollmentGateway, MetricsGateway};
pub use progress_repo::ProgressRepository;
