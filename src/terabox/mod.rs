// TeraBox 上游API模块

pub mod client;
pub mod share;
pub mod types;

pub use client::TeraboxClient;
pub use share::extract_shorturl;
pub use types::{
    DownloadLinkRequest, DownloadLinkResponse, ShareFileInfo, ShareFileItem, ShareInfoResponse,
    TeraboxError,
};
