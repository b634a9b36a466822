//! 通用数据结构

use chrono::{DateTime, Utc};
use serde::Serialize;

/// 统一 API 响应结构
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "success".to_string(),
            data: Some(data),
            timestamp: Utc::now(),
        }
    }

    /// 创建成功响应（无数据）
    pub fn success_message(message: &str) -> ApiResponse<()> {
        ApiResponse {
            code: 200,
            message: message.to_string(),
            data: None,
            timestamp: Utc::now(),
        }
    }

    /// 创建创建成功响应 (201)
    pub fn created(data: T) -> Self {
        Self {
            code: 201,
            message: "created".to_string(),
            data: Some(data),
            timestamp: Utc::now(),
        }
    }
}
