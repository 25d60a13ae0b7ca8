//! 规范化错误模块
//!
//! 所有网络层失败（无响应、非 2xx、响应体解析失败）在 HTTP 客户端边界
//! 统一收敛为 `ApiError { message, status_code }`，调用方只需根据
//! `status_code` 分支处理。

use serde::Deserialize;
use std::fmt;

/// 无响应（网络故障/超时）时使用的哨兵状态码
pub const STATUS_NO_RESPONSE: u16 = 500;

/// 服务端未提供可读消息时的兜底文案
pub const GENERIC_ERROR_MESSAGE: &str = "请求发生意外错误";

/// 规范化的 API 错误
///
/// `message` 优先取服务端返回的 message 字段，取不到时退回兜底文案；
/// `status_code` 为 HTTP 状态码，无响应时为 [`STATUS_NO_RESPONSE`]。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub message: String,
    pub status_code: u16,
}

/// 服务端错误响应体的常见形态
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }

    /// 网络故障/超时：没有收到任何响应
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(message, STATUS_NO_RESPONSE)
    }

    /// 从非 2xx 响应构造：优先服务端 message 字段
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
        Self::new(message, status)
    }

    /// 2xx 响应但 JSON 无法解码为期望类型
    pub fn malformed(detail: impl fmt::Display) -> Self {
        Self::new(
            format!("{}: {}", GENERIC_ERROR_MESSAGE, detail),
            STATUS_NO_RESPONSE,
        )
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code == 401
    }

    pub fn is_forbidden(&self) -> bool {
        self.status_code == 403
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == 404
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code >= 500
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status_code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_server_message_field() {
        let err = ApiError::from_response(422, r#"{"message":"手机号格式不正确"}"#);
        assert_eq!(err.message, "手机号格式不正确");
        assert_eq!(err.status_code, 422);
    }

    #[test]
    fn falls_back_to_error_field_then_generic() {
        let err = ApiError::from_response(400, r#"{"error":"bad request"}"#);
        assert_eq!(err.message, "bad request");

        let err = ApiError::from_response(500, "not even json");
        assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
        assert!(err.is_server_error());
    }

    #[test]
    fn network_error_uses_sentinel_status() {
        let err = ApiError::network("连接被拒绝");
        assert_eq!(err.status_code, STATUS_NO_RESPONSE);
        assert!(err.is_server_error());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn status_class_helpers() {
        assert!(ApiError::new("x", 401).is_unauthorized());
        assert!(ApiError::new("x", 403).is_forbidden());
        assert!(ApiError::new("x", 404).is_not_found());
        assert!(!ApiError::new("x", 404).is_server_error());
    }
}
