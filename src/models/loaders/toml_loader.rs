//! 父表格列表加载器
//!
//! 从 TOML 文件读取要挂载脚本工程的父表格ID列表；
//! 文件不存在时退回到内置的默认列表

use crate::error::{AppError, AppResult, FileError};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// 内置的默认父表格ID列表
const DEFAULT_PARENT_IDS: &[&str] = &[
    "1XgAlL-HaBQ9h5xAaU6E1Tomu_6BqzRj6Pi6XkrQgQvo",
    "1jwO2WAg5nFIiGv1WHD1JsQLkPDVdguBVhR8khlnwfB8",
    "1ygG7WNIrgK6DaCO3hSPgy7edz8Z3akgXMjwS1h0xR_Q",
    "1u6ReCG1DJBBUO2NMyp_R9ongtPGW0T8cyK0ITIEQHZw",
    "1oPiwWOPi4zsm0dpli0FSau8XvLeKV97O2x2A7HlTrUs",
    "1uZBXHnxZzxx2ZbXkKzswTKUUf7UwA6yphUuqsBpuRKE",
    "1wpySFHMOzYKHVl3Wn66jci8Cvhh9Oac7vypNUEspXjI",
    "1D5oaqrhGe66eK2Xco7W702IC6wbUw4re8Nqpses2gZw",
    "1G53YM6quQsHdHBKdKE9vrCY4mYmei3B8L7F1F-znAfE",
    "1x8gyyNicQedJTC5Eva4T6D9xuh5c1yyhG0j3Xfg-b6s",
    "124dXODFEnMBGtMN8IpgYyRF7nZAVIegNkJ48Euecgk8",
];

/// parents.toml 的结构
#[derive(Debug, Deserialize)]
struct ParentList {
    parents: Vec<String>,
}

/// 加载父表格ID列表
///
/// # 参数
/// - `path`: parents.toml 路径
///
/// # 返回
/// 文件存在时返回其中的列表，否则返回默认列表
pub async fn load_parent_ids(path: &str) -> AppResult<Vec<String>> {
    if !Path::new(path).exists() {
        info!("未找到 {}，使用内置的 {} 个父表格ID", path, DEFAULT_PARENT_IDS.len());
        return Ok(DEFAULT_PARENT_IDS.iter().map(|s| s.to_string()).collect());
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path, e))?;
    parse_parent_list(&raw, path)
}

/// 解析 TOML 文本
fn parse_parent_list(raw: &str, path: &str) -> AppResult<Vec<String>> {
    let list: ParentList = toml::from_str(raw).map_err(|e| {
        AppError::File(FileError::TomlParseFailed {
            path: path.to_string(),
            source: Box::new(e),
        })
    })?;
    Ok(list.parents)
}
