//! Apps Script API 请求/响应数据模型
//!
//! 字段命名与 Google 的 JSON 表示保持一致（camelCase）

use serde::{Deserialize, Serialize};

/// projects.create 请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// 脚本工程标题
    pub title: String,
    /// 拥有该工程的父文档ID（表格）
    pub parent_id: String,
}

/// 脚本工程（projects.create 响应）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// 服务端分配的脚本ID
    pub script_id: String,
    /// 工程标题
    #[serde(default)]
    pub title: Option<String>,
    /// 父文档ID
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// 脚本文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileType {
    ServerJs,
    Json,
    Html,
}

/// 工程中的单个文件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptFile {
    /// 文件名（不含扩展名）
    pub name: String,
    /// 文件类型
    #[serde(rename = "type")]
    pub file_type: FileType,
    /// 文件内容
    pub source: String,
}

impl ScriptFile {
    pub fn new(name: impl Into<String>, file_type: FileType, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_type,
            source: source.into(),
        }
    }
}

/// projects.updateContent 请求体
///
/// 语义为整体替换：工程的文件集合会被 files 完全覆盖
#[derive(Debug, Clone, Serialize)]
pub struct UpdateContentRequest {
    pub files: Vec<ScriptFile>,
}

/// projects.updateContent 响应（工程内容）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub script_id: String,
    #[serde(default)]
    pub files: Vec<ScriptFile>,
}

/// Google API 标准错误体
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

/// 错误体内层
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
