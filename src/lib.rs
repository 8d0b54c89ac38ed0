// TeraBox Resolver Rust Library
// TeraBox 分享链接直链解析服务核心库

// 配置管理模块
pub mod config;

// 日志系统模块
pub mod logging;

// Web服务器模块
pub mod server;

// TeraBox 上游API模块
pub mod terabox;

// 导出常用类型
pub use config::{AppConfig, LogConfig, ServerConfig, UpstreamConfig};
pub use server::{ApiError, ApiResult, AppState};
pub use terabox::{ShareFileInfo, TeraboxClient, TeraboxError};
