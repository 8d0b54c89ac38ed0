// API处理器模块

pub mod resolve;

pub use resolve::*;
