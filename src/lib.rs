//! Admission Webhook - Kubernetes 风格的变更准入控制器服务器
//!
//! 这个库提供了一个完整的准入 webhook 服务器骨架，灵感来自
//! Kubernetes API Server 的准入控制机制。
//!
//! # 核心特性
//!
//! - **版本无关策略**：每条策略只针对 admission.k8s.io/v1 写一次，
//!   v1beta1 请求由分发层自动适配
//! - **无损版本转换**：v1 和 v1beta1 之间逐字段来回转换
//! - **失败关闭**：策略内部的任何失败都折叠成结构化的拒绝响应，
//!   不会以裸的传输故障挡住集群操作
//! - **无共享可变状态**：配置启动时解析一次，请求路径上只读
//!
//! # 使用示例
//!
//! ```rust,no_run
//! use admission_webhook::config::{Config, Options};
//! use admission_webhook::server::WebhookServer;
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = Options::parse();
//!     let config = Config::resolve(options)?;
//!     WebhookServer::new(config).run().await
//! }
//! ```

pub mod config;
pub mod serve;
pub mod server;
pub mod tls;

// 重新导出主要类型
pub use config::{Config, Options};
pub use serve::serve;
pub use server::WebhookServer;
