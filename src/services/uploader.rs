//! 内容上传服务 - 业务能力层
//!
//! 把固定的文件集合写入指定的脚本工程。
//! updateContent 是整体替换语义：远端文件集合会被传入的文件完全覆盖，
//! 所以用相同内容重复上传是幂等的。

use crate::api::types::{Content, ScriptFile};
use crate::clients::ScriptClient;
use anyhow::{bail, Context, Result};
use tracing::info;

/// 内容上传服务
pub struct ContentUploader<'a> {
    client: &'a ScriptClient,
}

impl<'a> ContentUploader<'a> {
    /// 创建内容上传服务
    pub fn new(client: &'a ScriptClient) -> Self {
        Self { client }
    }

    /// 上传文件集合到指定工程
    ///
    /// # 参数
    /// - `script_id`: 目标工程ID（由调用方显式选择）
    /// - `files`: 新的完整文件集合
    ///
    /// # 返回
    /// 返回服务端确认后的工程内容
    pub async fn upload(&self, script_id: &str, files: Vec<ScriptFile>) -> Result<Content> {
        if script_id.is_empty() {
            bail!("上传目标工程ID不能为空");
        }
        if files.is_empty() {
            bail!("上传的文件集合不能为空");
        }

        info!("📤 上传 {} 个文件到工程 {}...", files.len(), script_id);

        let content = self
            .client
            .update_content(script_id, files)
            .await
            .with_context(|| format!("向工程 {} 上传内容失败", script_id))?;

        info!("✓ 上传完成，工程现有 {} 个文件", content.files.len());

        Ok(content)
    }
}
