// 应用状态

use crate::config::AppConfig;
use crate::terabox::TeraboxClient;
use std::sync::Arc;

/// 应用全局状态
///
/// 没有跨请求的可变状态，上游客户端无状态、可复用
#[derive(Clone)]
pub struct AppState {
    /// TeraBox 上游客户端
    pub terabox: TeraboxClient,
    /// 应用配置
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let terabox = TeraboxClient::new(&config.upstream)?;

        Ok(Self {
            terabox,
            config: Arc::new(config),
        })
    }
}
