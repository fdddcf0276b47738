//! 批量建工程服务 - 业务能力层
//!
//! 把一组父表格ID变成一组"新建脚本工程"的内嵌请求，
//! 在单个网络往返中全部执行，并按提交顺序返回逐项结果。
//! 单项失败不影响其余各项，只记录并继续。

use crate::api::batch::BatchPart;
use crate::api::types::Project;
use crate::clients::ScriptClient;
use crate::error::{ApiError, AppError, AppResult};
use anyhow::Result;
use tracing::{info, warn};

/// 单个父表格的建工程结果
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    /// 工程创建成功
    Created(Project),
    /// 该项失败，保留原始错误体
    Failed { status: u16, body: String },
}

impl BatchOutcome {
    /// 成功时返回脚本ID
    pub fn script_id(&self) -> Option<&str> {
        match self {
            BatchOutcome::Created(project) => Some(&project.script_id),
            BatchOutcome::Failed { .. } => None,
        }
    }
}

/// 一个父表格ID与其结果的配对
#[derive(Debug, Clone)]
pub struct ParentOutcome {
    pub parent_id: String,
    pub outcome: BatchOutcome,
}

/// 批量建工程服务
pub struct Provisioner<'a> {
    client: &'a ScriptClient,
    title: String,
}

impl<'a> Provisioner<'a> {
    /// 创建批量建工程服务
    pub fn new(client: &'a ScriptClient, title: impl Into<String>) -> Self {
        Self {
            client,
            title: title.into(),
        }
    }

    /// 为每个父表格创建一个脚本工程
    ///
    /// # 参数
    /// - `parent_ids`: 按提交顺序排列的父表格ID
    ///
    /// # 返回
    /// 每个输入ID对应恰好一个结果，顺序与输入一致
    pub async fn create_all(&self, parent_ids: &[String]) -> Result<Vec<ParentOutcome>> {
        let mut items = Vec::with_capacity(parent_ids.len());
        for (index, parent_id) in parent_ids.iter().enumerate() {
            items.push(self.client.create_project_item(index, &self.title, parent_id)?);
        }

        info!("📦 批量创建 {} 个脚本工程...", items.len());
        let parts = self.client.execute_batch(&items).await?;

        let outcomes = correlate(parent_ids, parts)?;
        for item in &outcomes {
            match &item.outcome {
                BatchOutcome::Created(project) => {
                    info!("✓ {} -> {}", item.parent_id, project.script_id);
                }
                BatchOutcome::Failed { status, body } => {
                    warn!("❌ {} 创建失败 (HTTP {}): {}", item.parent_id, status, body);
                }
            }
        }

        Ok(outcomes)
    }
}

/// 将内嵌响应按提交顺序关联回父表格ID
///
/// 批量端点保证响应顺序与请求顺序一致，这里依赖该顺序而不是 Content-ID
fn correlate(parent_ids: &[String], parts: Vec<BatchPart>) -> AppResult<Vec<ParentOutcome>> {
    if parts.len() != parent_ids.len() {
        return Err(AppError::Api(ApiError::BatchMalformed {
            detail: format!(
                "提交 {} 条请求但收到 {} 个响应 part",
                parent_ids.len(),
                parts.len()
            ),
        }));
    }

    let outcomes = parent_ids
        .iter()
        .zip(parts)
        .map(|(parent_id, part)| {
            let outcome = if part.is_success() {
                match serde_json::from_str::<Project>(&part.body) {
                    Ok(project) => BatchOutcome::Created(project),
                    // 2xx 但响应体不是工程：按失败处理，保留原文
                    Err(_) => BatchOutcome::Failed {
                        status: part.status,
                        body: part.body,
                    },
                }
            } else {
                BatchOutcome::Failed {
                    status: part.status,
                    body: part.body,
                }
            };
            ParentOutcome {
                parent_id: parent_id.clone(),
                outcome,
            }
        })
        .collect();

    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(status: u16, body: &str) -> BatchPart {
        BatchPart {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_correlate_order_preserving() {
        let parents = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let parts = vec![
            part(200, r#"{"scriptId":"id1"}"#),
            part(200, r#"{"scriptId":"id2"}"#),
            part(404, r#"{"error":{"code":404,"message":"not found"}}"#),
        ];

        let outcomes = correlate(&parents, parts).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].parent_id, "a");
        assert_eq!(outcomes[0].outcome.script_id(), Some("id1"));
        assert_eq!(outcomes[1].outcome.script_id(), Some("id2"));
        assert_eq!(outcomes[2].parent_id, "c");
        assert!(outcomes[2].outcome.script_id().is_none());
    }

    #[test]
    fn test_correlate_count_mismatch() {
        let parents = vec!["a".to_string(), "b".to_string()];
        let parts = vec![part(200, r#"{"scriptId":"id1"}"#)];

        assert!(correlate(&parents, parts).is_err());
    }

    #[test]
    fn test_correlate_success_with_garbage_body() {
        let parents = vec!["a".to_string()];
        let parts = vec![part(200, "not json at all")];

        let outcomes = correlate(&parents, parts).unwrap();
        assert!(outcomes[0].outcome.script_id().is_none());
    }
}
