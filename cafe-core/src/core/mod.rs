//! 核心模块 - 应用配置
//!
//! - [`Config`] - 环境变量配置

pub mod config;

pub use config::Config;
