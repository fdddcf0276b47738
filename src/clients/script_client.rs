/// Apps Script API 客户端
///
/// 封装所有与 Apps Script API 相关的调用逻辑
use crate::api::batch::{self, BatchItem, BatchPart};
use crate::api::types::{Content, CreateProjectRequest, ScriptFile, UpdateContentRequest};
use crate::auth::Credential;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use tracing::debug;

/// 已知的服务/版本端点表
///
/// 工厂只做本地校验，不发现现请求；对应官方客户端的 discovery 元数据
const KNOWN_SERVICES: &[(&str, &str)] = &[("script", "v1")];

/// Apps Script API 客户端
pub struct ScriptClient {
    http: reqwest::Client,
    base_url: String,
    batch_url: String,
    version: String,
    access_token: String,
}

impl ScriptClient {
    /// 构建客户端（纯构造，不发网络请求）
    ///
    /// # 参数
    /// - `service`: 服务名（如 "script"）
    /// - `version`: 服务版本（如 "v1"）
    /// - `credential`: 当前有效的凭据
    ///
    /// # 返回
    /// 服务/版本不在已知端点表中时返回 `ApiError::UnknownService`
    pub fn build(
        service: &str,
        version: &str,
        credential: &Credential,
        config: &Config,
    ) -> AppResult<Self> {
        if !KNOWN_SERVICES.contains(&(service, version)) {
            return Err(AppError::Api(ApiError::UnknownService {
                service: service.to_string(),
                version: version.to_string(),
            }));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            batch_url: config.batch_url.clone(),
            version: version.to_string(),
            access_token: credential.token.clone(),
        })
    }

    /// 构建一条 projects.create 的批量内嵌请求
    ///
    /// # 参数
    /// - `index`: 在批次中的序号（用于 Content-ID）
    /// - `title`: 工程标题
    /// - `parent_id`: 拥有工程的父文档ID
    pub fn create_project_item(
        &self,
        index: usize,
        title: &str,
        parent_id: &str,
    ) -> AppResult<BatchItem> {
        let body = serde_json::to_string(&CreateProjectRequest {
            title: title.to_string(),
            parent_id: parent_id.to_string(),
        })?;
        Ok(BatchItem::post(
            index,
            format!("/{}/projects", self.version),
            body,
        ))
    }

    /// 执行一次批量请求（单个网络往返）
    ///
    /// # 返回
    /// 按提交顺序排列的内嵌响应；外层请求失败时整体报错
    pub async fn execute_batch(&self, items: &[BatchItem]) -> AppResult<Vec<BatchPart>> {
        let boundary = batch::new_boundary();
        let body = batch::build_body(items, &boundary);

        debug!("批量请求: {} 条内嵌请求, boundary={}", items.len(), boundary);

        let response = self
            .http
            .post(&self.batch_url)
            .bearer_auth(&self.access_token)
            .header(
                "Content-Type",
                format!("multipart/mixed; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get("Content-Type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AppError::api_http(status.as_u16(), text));
        }

        let response_boundary = batch::extract_boundary(&content_type).ok_or_else(|| {
            AppError::Api(ApiError::BatchMalformed {
                detail: format!("响应 Content-Type 中没有边界串: {}", content_type),
            })
        })?;

        batch::parse_response(&text, &response_boundary)
    }

    /// 整体替换工程的文件集合（projects.updateContent）
    ///
    /// # 参数
    /// - `script_id`: 目标工程ID
    /// - `files`: 新的完整文件集合
    pub async fn update_content(
        &self,
        script_id: &str,
        files: Vec<ScriptFile>,
    ) -> AppResult<Content> {
        let url = format!(
            "{}/{}/projects/{}/content",
            self.base_url, self.version, script_id
        );

        debug!("updateContent: {} 个文件 -> {}", files.len(), script_id);

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.access_token)
            .json(&UpdateContentRequest { files })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AppError::api_http(status.as_u16(), text));
        }

        Ok(serde_json::from_str(&text)?)
    }
}
