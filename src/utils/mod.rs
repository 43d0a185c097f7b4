use axum::Json;
use serde::{Deserialize, Serialize};

/// 通用的API响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 错误码，0表示成功，非0表示失败
    pub code: i32,
    /// 错误消息，成功时为"success"
    pub msg: String,
    /// 响应数据，错误时为None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resp_data: Option<T>,
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: error_codes::SUCCESS,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const RATE_LIMIT: i32 = 1005;
}

/// 日志脱敏用的固定掩码
pub const MASK_MARKER: &str = "***";

/// 最多保留的明文前缀字符数
const MASK_PREFIX_CHARS: usize = 3;

/// 凭据类字符串脱敏：最多保留前 3 个字符（且不超过一半），其余替换为掩码
pub fn mask_secret(secret: &str) -> String {
    let total = secret.chars().count();
    let visible = MASK_PREFIX_CHARS.min(total / 2);
    let prefix: String = secret.chars().take(visible).collect();
    format!("{}{}", prefix, MASK_MARKER)
}
