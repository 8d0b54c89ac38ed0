//! 分享链接格式校验与 shorturl 提取

use regex::Regex;

/// TeraBox 分享链接格式
///
/// 支持格式：
/// - https://terabox.com/s/1abcDEFg
/// - https://1024terabox.com/s/1abcDEFg
///
/// 必须整串匹配，shorturl 只允许字母、数字、连字符和下划线
const SHARE_URL_PATTERN: &str = r"^https://(terabox\.com|1024terabox\.com)/s/([A-Za-z0-9_-]+)$";

/// 从分享链接中提取 shorturl
///
/// 链接格式不合法时返回 None
pub fn extract_shorturl(url: &str) -> Option<String> {
    let re = Regex::new(SHARE_URL_PATTERN).ok()?;
    let caps = re.captures(url)?;
    Some(caps.get(2)?.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_shorturl_valid() {
        assert_eq!(
            extract_shorturl("https://terabox.com/s/1abcDEFg"),
            Some("1abcDEFg".to_string())
        );
        assert_eq!(
            extract_shorturl("https://1024terabox.com/s/abc-123_XYZ"),
            Some("abc-123_XYZ".to_string())
        );
    }

    #[test]
    fn test_extract_shorturl_invalid() {
        let invalid_urls = vec![
            "",
            "not-a-url",
            // 错误的协议
            "http://terabox.com/s/1abcDEFg",
            // 错误的域名
            "https://example.com/s/1abcDEFg",
            "https://pan.baidu.com/s/1abcDEFg",
            // 错误的路径
            "https://terabox.com/share/1abcDEFg",
            "https://terabox.com/s/",
            // 非法字符
            "https://terabox.com/s/abc$123",
            "https://terabox.com/s/abc/123",
            // 带查询参数（不允许，必须整串匹配）
            "https://terabox.com/s/1abcDEFg?pwd=1234",
            // 前后有多余内容
            " https://terabox.com/s/1abcDEFg",
            "https://terabox.com/s/1abcDEFg ",
        ];

        for url in invalid_urls {
            assert_eq!(extract_shorturl(url), None, "URL 不应通过校验: {:?}", url);
        }
    }

    proptest! {
        /// 合法 token 提取后应与原始 token 完全一致
        #[test]
        fn prop_extract_shorturl_round_trip(token in "[A-Za-z0-9_-]{1,40}") {
            let url = format!("https://terabox.com/s/{}", token);
            let got = extract_shorturl(&url);
            prop_assert_eq!(got.as_deref(), Some(token.as_str()));

            let url = format!("https://1024terabox.com/s/{}", token);
            let got = extract_shorturl(&url);
            prop_assert_eq!(got.as_deref(), Some(token.as_str()));
        }

        /// 包含 token 字母表之外字符的 token 应被拒绝
        #[test]
        fn prop_extract_shorturl_rejects_bad_chars(
            prefix in "[A-Za-z0-9_-]{0,10}",
            bad in "[^A-Za-z0-9_-]",
            suffix in "[A-Za-z0-9_-]{0,10}",
        ) {
            let url = format!("https://terabox.com/s/{}{}{}", prefix, bad, suffix);
            prop_assert_eq!(extract_shorturl(&url), None);
        }
    }
}
