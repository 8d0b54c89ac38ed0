// TeraBox 上游API数据类型

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 分享信息响应
///
/// 上游返回示例:
/// ```json
/// {
///   "ok": true,
///   "shareid": 123456,
///   "uk": 654321,
///   "sign": "abcdef",
///   "timestamp": 1700000000,
///   "list": [{"fs_id": "111", "filename": "a.mp4", "size": "2097152",
///             "create_time": "1700000000", "category": "video"}]
/// }
/// ```
///
/// 字段全部按可缺省处理，取值校验集中在 [`ShareInfoResponse::into_file_info`]
#[derive(Debug, Deserialize)]
pub struct ShareInfoResponse {
    /// 上游成功标志
    #[serde(default)]
    pub ok: bool,

    /// 分享 ID
    #[serde(default, deserialize_with = "opt_string_or_i64")]
    pub shareid: Option<i64>,

    /// 分享者 UK
    #[serde(default, deserialize_with = "opt_string_or_i64")]
    pub uk: Option<i64>,

    /// 签名令牌
    #[serde(default)]
    pub sign: Option<String>,

    /// 签名时间戳
    #[serde(default, deserialize_with = "opt_string_or_i64")]
    pub timestamp: Option<i64>,

    /// 分享内文件列表
    #[serde(default)]
    pub list: Vec<ShareFileItem>,
}

/// 分享文件条目
#[derive(Debug, Clone, Deserialize)]
pub struct ShareFileItem {
    /// 文件服务器ID（可能是字符串或数字）
    #[serde(rename = "fs_id", default, deserialize_with = "opt_string_or_u64")]
    pub fs_id: Option<u64>,

    /// 文件名
    #[serde(default)]
    pub filename: String,

    /// 文件大小（字节，可能是字符串或数字，保留原始字面值）
    #[serde(default, deserialize_with = "raw_number_string")]
    pub size: String,

    /// 创建时间（Unix 秒，可能是字符串或数字，保留原始字面值）
    #[serde(default, deserialize_with = "raw_number_string")]
    pub create_time: String,

    /// 文件类别（原样透传给调用方）
    #[serde(default)]
    pub category: Value,
}

/// 校验后的分享文件信息
///
/// 两次上游调用之间传递的数据都在这里
#[derive(Debug, Clone, PartialEq)]
pub struct ShareFileInfo {
    pub shareid: i64,
    pub uk: i64,
    pub sign: String,
    pub timestamp: i64,
    pub fs_id: u64,
    pub filename: String,
    pub size: String,
    pub create_time: String,
    pub category: Value,
}

impl ShareInfoResponse {
    /// 校验响应并取出第一个文件的信息
    ///
    /// - 文件列表为空 -> [`TeraboxError::NoFiles`]
    /// - 必要字段缺失 -> [`TeraboxError::Upstream`]
    pub fn into_file_info(self) -> Result<ShareFileInfo, TeraboxError> {
        // 先判空再校验令牌：列表为空时固定返回"没有文件"
        let file = self
            .list
            .into_iter()
            .next()
            .ok_or(TeraboxError::NoFiles)?;

        let shareid = self
            .shareid
            .ok_or_else(|| TeraboxError::Upstream("响应缺少 shareid 字段".to_string()))?;
        let uk = self
            .uk
            .ok_or_else(|| TeraboxError::Upstream("响应缺少 uk 字段".to_string()))?;
        let sign = self
            .sign
            .ok_or_else(|| TeraboxError::Upstream("响应缺少 sign 字段".to_string()))?;
        let timestamp = self
            .timestamp
            .ok_or_else(|| TeraboxError::Upstream("响应缺少 timestamp 字段".to_string()))?;

        let fs_id = file
            .fs_id
            .ok_or_else(|| TeraboxError::Upstream("文件条目缺少 fs_id 字段".to_string()))?;

        Ok(ShareFileInfo {
            shareid,
            uk,
            sign,
            timestamp,
            fs_id,
            filename: file.filename,
            size: file.size,
            create_time: file.create_time,
            category: file.category,
        })
    }
}

/// 下载直链请求体
#[derive(Debug, Serialize)]
pub struct DownloadLinkRequest<'a> {
    pub shareid: i64,
    pub uk: i64,
    pub sign: &'a str,
    pub timestamp: i64,
    pub fs_id: u64,
}

impl<'a> DownloadLinkRequest<'a> {
    pub fn from_file_info(info: &'a ShareFileInfo) -> Self {
        Self {
            shareid: info.shareid,
            uk: info.uk,
            sign: &info.sign,
            timestamp: info.timestamp,
            fs_id: info.fs_id,
        }
    }
}

/// 下载直链响应
#[derive(Debug, Deserialize)]
pub struct DownloadLinkResponse {
    /// 上游成功标志
    #[serde(default)]
    pub ok: bool,

    /// 下载直链
    #[serde(default, rename = "downloadLink")]
    pub download_link: Option<String>,
}

/// 上游调用错误类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeraboxError {
    /// 上游返回 ok=false 或载荷缺少必要字段（原始载荷已写入日志）
    Upstream(String),
    /// 分享中没有文件
    NoFiles,
    /// 网络错误（含超时和非 2xx 状态）
    NetworkError(String),
    /// 响应解析错误
    ParseError(String),
}

impl std::fmt::Display for TeraboxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeraboxError::Upstream(msg) => write!(f, "上游接口异常: {}", msg),
            TeraboxError::NoFiles => write!(f, "分享中没有文件"),
            TeraboxError::NetworkError(msg) => write!(f, "网络错误: {}", msg),
            TeraboxError::ParseError(msg) => write!(f, "解析错误: {}", msg),
        }
    }
}

impl std::error::Error for TeraboxError {}

/// 自定义反序列化：支持字符串或数字类型的 i64 字段
///
/// 形状不对的取值一律当作缺失，由 into_file_info 统一报错
fn opt_string_or_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrI64 {
        Str(String),
        Num(i64),
        Other(Value),
    }

    match Option::<StringOrI64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrI64::Str(s)) => Ok(s.parse().ok()),
        Some(StringOrI64::Num(n)) => Ok(Some(n)),
        Some(StringOrI64::Other(_)) => Ok(None),
    }
}

/// 自定义反序列化：支持字符串或数字类型的 u64 字段
fn opt_string_or_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrU64 {
        Str(String),
        Num(u64),
        Other(Value),
    }

    match Option::<StringOrU64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrU64::Str(s)) => Ok(s.parse().ok()),
        Some(StringOrU64::Num(n)) => Ok(Some(n)),
        Some(StringOrU64::Other(_)) => Ok(None),
    }
}

/// 自定义反序列化：字符串或数字都保留为原始字面值
fn raw_number_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Str(String),
        Num(serde_json::Number),
        Other(Value),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Str(s) => Ok(s),
        StringOrNumber::Num(n) => Ok(n.to_string()),
        StringOrNumber::Other(_) => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info_json() -> &'static str {
        r#"{
            "ok": true,
            "shareid": 123456,
            "uk": 654321,
            "sign": "abcdef0123",
            "timestamp": 1700000000,
            "list": [
                {
                    "fs_id": "111222333",
                    "filename": "a.mp4",
                    "size": "2097152",
                    "create_time": "1700000000",
                    "category": "video"
                },
                {
                    "fs_id": 444555666,
                    "filename": "b.mp4",
                    "size": 1048576,
                    "create_time": 1700000001,
                    "category": 1
                }
            ]
        }"#
    }

    #[test]
    fn test_deserialize_share_info() {
        let resp: ShareInfoResponse = serde_json::from_str(sample_info_json()).unwrap();

        assert!(resp.ok);
        assert_eq!(resp.shareid, Some(123456));
        assert_eq!(resp.uk, Some(654321));
        assert_eq!(resp.sign.as_deref(), Some("abcdef0123"));
        assert_eq!(resp.timestamp, Some(1700000000));
        assert_eq!(resp.list.len(), 2);

        // 字符串和数字形式的字段都应能解析
        assert_eq!(resp.list[0].fs_id, Some(111222333));
        assert_eq!(resp.list[0].size, "2097152");
        assert_eq!(resp.list[1].fs_id, Some(444555666));
        assert_eq!(resp.list[1].size, "1048576");
        assert_eq!(resp.list[1].create_time, "1700000001");
    }

    #[test]
    fn test_into_file_info_takes_first() {
        let resp: ShareInfoResponse = serde_json::from_str(sample_info_json()).unwrap();
        let info = resp.into_file_info().unwrap();

        assert_eq!(info.shareid, 123456);
        assert_eq!(info.uk, 654321);
        assert_eq!(info.sign, "abcdef0123");
        assert_eq!(info.timestamp, 1700000000);
        assert_eq!(info.fs_id, 111222333);
        assert_eq!(info.filename, "a.mp4");
        assert_eq!(info.size, "2097152");
        assert_eq!(info.create_time, "1700000000");
        assert_eq!(info.category, serde_json::json!("video"));
    }

    #[test]
    fn test_into_file_info_empty_list() {
        let json = r#"{"ok": true, "shareid": 1, "uk": 2, "sign": "s", "timestamp": 3, "list": []}"#;
        let resp: ShareInfoResponse = serde_json::from_str(json).unwrap();

        assert_eq!(resp.into_file_info(), Err(TeraboxError::NoFiles));
    }

    #[test]
    fn test_into_file_info_missing_list() {
        // list 缺失时即使令牌也缺失，仍按"没有文件"处理
        let json = r#"{"ok": true}"#;
        let resp: ShareInfoResponse = serde_json::from_str(json).unwrap();

        assert_eq!(resp.into_file_info(), Err(TeraboxError::NoFiles));
    }

    #[test]
    fn test_into_file_info_missing_tokens() {
        // 缺少 sign，属于上游载荷异常
        let json = r#"{"ok": true, "shareid": 1, "uk": 2, "timestamp": 3,
                       "list": [{"fs_id": 1, "filename": "a"}]}"#;
        let resp: ShareInfoResponse = serde_json::from_str(json).unwrap();

        match resp.into_file_info() {
            Err(TeraboxError::Upstream(msg)) => assert!(msg.contains("sign")),
            other => panic!("应返回 Upstream 错误, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_into_file_info_missing_fs_id() {
        let json = r#"{"ok": true, "shareid": 1, "uk": 2, "sign": "s", "timestamp": 3,
                       "list": [{"filename": "a"}]}"#;
        let resp: ShareInfoResponse = serde_json::from_str(json).unwrap();

        match resp.into_file_info() {
            Err(TeraboxError::Upstream(msg)) => assert!(msg.contains("fs_id")),
            other => panic!("应返回 Upstream 错误, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_not_ok_with_garbage() {
        // ok=false 时其余字段可能是任意形状，解析不应失败
        let json = r#"{"ok": false, "errno": -1, "shareid": "oops",
                       "list": [{"fs_id": null}]}"#;
        let resp: ShareInfoResponse = serde_json::from_str(json).unwrap();

        assert!(!resp.ok);
        assert_eq!(resp.shareid, None);
        assert_eq!(resp.list[0].fs_id, None);
    }

    #[test]
    fn test_download_request_body_shape() {
        let info = ShareFileInfo {
            shareid: 123,
            uk: 456,
            sign: "sig".to_string(),
            timestamp: 789,
            fs_id: 111,
            filename: "a.mp4".to_string(),
            size: "1".to_string(),
            create_time: "2".to_string(),
            category: Value::Null,
        };

        let body = serde_json::to_value(DownloadLinkRequest::from_file_info(&info)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "shareid": 123,
                "uk": 456,
                "sign": "sig",
                "timestamp": 789,
                "fs_id": 111
            })
        );
    }

    #[test]
    fn test_deserialize_download_response() {
        let json = r#"{"ok": true, "downloadLink": "https://x/y"}"#;
        let resp: DownloadLinkResponse = serde_json::from_str(json).unwrap();
        assert!(resp.ok);
        assert_eq!(resp.download_link.as_deref(), Some("https://x/y"));

        let json = r#"{"ok": false}"#;
        let resp: DownloadLinkResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.download_link, None);
    }
}
