// API 错误类型

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// 统一的错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub message: String,
}

/// API 错误
///
/// 对外只暴露固定的短消息，上游细节只写服务端日志
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// 缺少 url 参数
    #[error("Missing required parameter 'url'.")]
    MissingUrl,

    /// 分享链接格式错误
    #[error("Invalid Terabox URL format.")]
    InvalidUrl,

    /// 分享中没有文件
    #[error("No files found in the provided URL.")]
    NoFiles,

    /// 分享信息接口失败
    #[error("Failed to fetch file info.")]
    InfoFailed,

    /// 下载直链接口失败
    #[error("Failed to fetch download link.")]
    DownloadFailed,

    /// 其他未预期错误（网络异常、解析失败等）
    #[error("An unexpected error occurred.")]
    Unexpected,
}

impl ApiError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::InvalidUrl => StatusCode::BAD_REQUEST,
            ApiError::NoFiles => StatusCode::NOT_FOUND,
            ApiError::InfoFailed | ApiError::DownloadFailed | ApiError::Unexpected => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            ok: false,
            message: self.to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

/// API 结果类型
pub type ApiResult<T> = Result<T, ApiError>;
