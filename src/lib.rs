//! # Apps Script Provision
//!
//! 一个用于批量创建 Apps Script 工程并上传初始内容的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 基础设施层（Auth / Clients / Api）
//! - `auth/` - 凭据的加载、刷新、交互式授权与持久化
//! - `clients/` - 绑定凭据的 API 客户端，唯一发请求的模块
//! - `api/` - 请求/响应数据模型与 multipart/mixed 批量报文
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `Provisioner` - 批量建工程能力，逐项结果按提交顺序返回
//! - `ContentUploader` - 向单个工程整体写入文件集合的能力
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/app` - 串起凭据 → 客户端 → 批量创建 → 上传 → 汇报
//!
//! ## 模块结构

pub mod api;
pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use auth::{Credential, CredentialManager};
pub use clients::ScriptClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{load_parent_ids, project_files};
pub use orchestrator::App;
pub use services::{BatchOutcome, ContentUploader, ParentOutcome, Provisioner};
