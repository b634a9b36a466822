//! 数据库连接模块

mod postgres;

pub use postgres::PostgresPool;
