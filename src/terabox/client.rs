// TeraBox 上游客户端实现

use crate::config::UpstreamConfig;
use crate::terabox::{
    DownloadLinkRequest, DownloadLinkResponse, ShareFileInfo, ShareInfoResponse, TeraboxError,
};
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, error, info};

/// TeraBox 上游客户端
///
/// 进程内只构造一次，内部的 reqwest Client 可以廉价克隆复用
#[derive(Debug, Clone)]
pub struct TeraboxClient {
    /// HTTP客户端
    client: Client,
    /// 分享信息接口地址
    info_url: String,
    /// 下载直链接口地址
    download_url: String,
    /// 固定 User-Agent
    user_agent: String,
}

impl TeraboxClient {
    /// 创建新的上游客户端
    ///
    /// # 参数
    /// * `config` - 上游API配置（接口地址、UA、超时）
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        info!(
            "初始化上游客户端成功, info_url={}, download_url={}, 超时={}s",
            config.info_url, config.download_url, config.timeout_secs
        );

        Ok(Self {
            client,
            info_url: config.info_url.clone(),
            download_url: config.download_url.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// 附加上游要求的固定请求头
    ///
    /// 这三个头属于第三方接口契约，两个接口完全一致
    fn with_fixed_headers(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("Content-Type", "application/json")
            .header("User-Agent", &self.user_agent)
            .header("Accept", "*/*")
    }

    /// 获取分享文件信息（第一步）
    ///
    /// # 参数
    /// * `shorturl` - 分享短链 ID
    /// * `pwd` - 提取码（可选）
    ///
    /// # 返回
    /// 校验后的第一个文件的信息（含后续换链所需令牌）
    pub async fn get_share_info(
        &self,
        shorturl: &str,
        pwd: Option<&str>,
    ) -> Result<ShareFileInfo, TeraboxError> {
        info!("获取分享信息: shorturl={}", shorturl);

        let mut query: Vec<(&str, &str)> = vec![("shorturl", shorturl)];
        if let Some(pwd) = pwd {
            query.push(("pwd", pwd));
        }

        let request = self.with_fixed_headers(self.client.get(&self.info_url).query(&query));
        let payload = self.execute(request, "get-info").await?;

        let response: ShareInfoResponse = serde_json::from_str(&payload).map_err(|e| {
            error!("解析分享信息响应失败: {}, 响应: {}", e, payload);
            TeraboxError::ParseError(e.to_string())
        })?;

        if !response.ok {
            // 原始载荷只进日志，不回传给调用方
            error!("分享信息接口返回失败: {}", payload);
            return Err(TeraboxError::Upstream("get-info 返回 ok=false".to_string()));
        }

        let file_info = response.into_file_info().map_err(|e| {
            match &e {
                TeraboxError::NoFiles => error!("分享中没有文件: shorturl={}", shorturl),
                _ => error!("分享信息载荷异常: {}, 响应: {}", e, payload),
            }
            e
        })?;

        info!(
            "获取分享信息成功: filename={}, fs_id={}",
            file_info.filename, file_info.fs_id
        );
        Ok(file_info)
    }

    /// 获取下载直链（第二步）
    ///
    /// 使用第一步返回的令牌和 fs_id 换取直链
    pub async fn get_download_link(&self, info: &ShareFileInfo) -> Result<String, TeraboxError> {
        info!("获取下载直链: fs_id={}", info.fs_id);

        let body = DownloadLinkRequest::from_file_info(info);
        let request = self.with_fixed_headers(self.client.post(&self.download_url).json(&body));
        let payload = self.execute(request, "get-download").await?;

        let response: DownloadLinkResponse = serde_json::from_str(&payload).map_err(|e| {
            error!("解析下载直链响应失败: {}, 响应: {}", e, payload);
            TeraboxError::ParseError(e.to_string())
        })?;

        if !response.ok {
            error!("下载直链接口返回失败: {}", payload);
            return Err(TeraboxError::Upstream(
                "get-download 返回 ok=false".to_string(),
            ));
        }

        let link = response.download_link.ok_or_else(|| {
            error!("下载直链响应缺少 downloadLink 字段: {}", payload);
            TeraboxError::Upstream("响应缺少 downloadLink 字段".to_string())
        })?;

        info!("获取下载直链成功: fs_id={}", info.fs_id);
        Ok(link)
    }

    /// 发送请求并读取响应体
    ///
    /// 传输层错误和非 2xx 状态都归类为网络错误
    async fn execute(&self, request: RequestBuilder, step: &str) -> Result<String, TeraboxError> {
        let response = request.send().await.map_err(|e| {
            error!("{} 请求发送失败: {}", step, e);
            TeraboxError::NetworkError(e.to_string())
        })?;

        let status = response.status();
        debug!("{} 响应状态: {}", step, status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("{} HTTP 状态异常: status={}, 响应: {}", step, status, error_text);
            return Err(TeraboxError::NetworkError(format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| {
            error!("{} 读取响应失败: {}", step, e);
            TeraboxError::NetworkError(e.to_string())
        })
    }
}
