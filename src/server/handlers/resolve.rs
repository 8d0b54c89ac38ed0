//! 分享链接解析 API Handler
//!
//! 整个服务只有这一条业务接口：校验分享链接，串行调用两个上游接口，
//! 返回精简后的 JSON 结果。任一步失败立即短路返回错误，不做重试。

use crate::server::error::{ApiError, ApiResult};
use crate::server::AppState;
use crate::terabox::{self, TeraboxError};
use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

/// 署名字段内容，成功响应固定携带
const ATTRIBUTION: &str = "pikachufrombd.t.me";

/// 解析请求参数
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// 分享链接（必填，缺失时由 handler 返回 400 而不是框架默认错误）
    pub url: Option<String>,
    /// 提取码（可选）
    pub pwd: Option<String>,
}

/// 解析成功响应
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub ok: bool,
    /// 文件名
    pub filename: String,
    /// 可读文件大小（如 "12.34 MB"）
    pub size: String,
    /// 文件类别（上游原样透传）
    pub category: Value,
    /// ISO-8601 格式的创建时间（UTC）
    pub create_time: String,
    /// 下载直链
    #[serde(rename = "downloadLink")]
    pub download_link: String,
    /// 署名字段
    #[serde(rename = "Dev")]
    pub dev: &'static str,
}

/// 解析分享链接
///
/// GET /api/v1/resolve?url=<分享链接>&pwd=<提取码>
///
/// # 响应
/// ```json
/// {
///     "ok": true,
///     "filename": "a.mp4",
///     "size": "2.00 MB",
///     "category": "video",
///     "create_time": "2023-11-14T22:13:20.000Z",
///     "downloadLink": "https://...",
///     "Dev": "pikachufrombd.t.me"
/// }
/// ```
pub async fn resolve_link(
    State(state): State<AppState>,
    Query(params): Query<ResolveQuery>,
) -> ApiResult<Json<ResolveResponse>> {
    // 1. 参数校验
    let url = params.url.as_deref().ok_or(ApiError::MissingUrl)?;
    let shorturl = terabox::extract_shorturl(url).ok_or_else(|| {
        warn!("无效的分享链接格式: {}", url);
        ApiError::InvalidUrl
    })?;

    info!("收到解析请求: shorturl={}", shorturl);

    // 2. 获取分享文件信息
    let file_info = state
        .terabox
        .get_share_info(&shorturl, params.pwd.as_deref())
        .await
        .map_err(map_info_error)?;

    // 3. 换取下载直链
    let download_link = state
        .terabox
        .get_download_link(&file_info)
        .await
        .map_err(map_download_error)?;

    // 4. 组装响应
    let create_time = format_create_time(&file_info.create_time).ok_or_else(|| {
        error!("无法解析创建时间: {:?}", file_info.create_time);
        ApiError::Unexpected
    })?;

    info!("解析成功: filename={}", file_info.filename);

    Ok(Json(ResolveResponse {
        ok: true,
        filename: file_info.filename,
        size: format_size_mb(&file_info.size),
        category: file_info.category,
        create_time,
        download_link,
        dev: ATTRIBUTION,
    }))
}

/// 分享信息接口错误 -> API 错误
fn map_info_error(e: TeraboxError) -> ApiError {
    match e {
        TeraboxError::NoFiles => ApiError::NoFiles,
        TeraboxError::Upstream(_) => ApiError::InfoFailed,
        TeraboxError::NetworkError(_) | TeraboxError::ParseError(_) => ApiError::Unexpected,
    }
}

/// 下载直链接口错误 -> API 错误
fn map_download_error(e: TeraboxError) -> ApiError {
    match e {
        TeraboxError::Upstream(_) => ApiError::DownloadFailed,
        _ => ApiError::Unexpected,
    }
}

/// 字节数转可读大小（保留两位小数，单位 MB）
///
/// 上游偶尔会给出非数字的 size，此时结果为 "NaN MB"，与历史行为一致
fn format_size_mb(size: &str) -> String {
    let bytes = size.parse::<f64>().unwrap_or(f64::NAN);
    format!("{:.2} MB", bytes / (1024.0 * 1024.0))
}

/// Unix 秒级时间戳转 ISO-8601 字符串（UTC，毫秒精度）
fn format_create_time(create_time: &str) -> Option<String> {
    let secs = create_time.parse::<i64>().ok()?;
    let dt = DateTime::from_timestamp(secs, 0)?;
    Some(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}
