//! 凭据管理器
//!
//! 负责凭据的完整生命周期：加载 → 校验 → 刷新或交互式授权 → 持久化。
//! token.json 存在且有效则直接使用；过期但有刷新令牌则静默刷新；
//! 否则走一次交互式授权。

use crate::auth::credential::{load_client_secrets, Credential, TokenResponse};
use crate::auth::flow::InstalledAppFlow;
use crate::config::Config;
use crate::error::{AppError, AppResult, AuthError};
use chrono::Utc;
use std::path::Path;
use tracing::{debug, info};

/// 凭据管理器
pub struct CredentialManager {
    token_path: String,
    client_secrets_path: String,
    scopes: Vec<String>,
    auth_uri: String,
    token_uri: String,
    http: reqwest::Client,
}

impl CredentialManager {
    /// 创建凭据管理器
    pub fn new(config: &Config) -> Self {
        Self {
            token_path: config.token_path.clone(),
            client_secrets_path: config.client_secrets_path.clone(),
            scopes: config.scopes.clone(),
            auth_uri: config.auth_uri.clone(),
            token_uri: config.token_uri.clone(),
            http: reqwest::Client::new(),
        }
    }

    /// 获取一份可用的凭据
    ///
    /// # 返回
    /// 返回有效的凭据；刷新或交互式授权成功后会覆写 token.json
    pub async fn obtain(&self) -> AppResult<Credential> {
        if Path::new(&self.token_path).exists() {
            let credential = Credential::load(&self.token_path)?;
            let now = Utc::now();

            if credential.is_valid(now) {
                debug!("token.json 中的访问令牌仍然有效");
                return Ok(credential);
            }

            if credential.refresh_token.is_some() {
                info!("🔄 访问令牌已过期，使用刷新令牌续期...");
                let refreshed = self.refresh(credential).await?;
                refreshed.persist(&self.token_path)?;
                info!("✓ 续期成功，已写回 {}", self.token_path);
                return Ok(refreshed);
            }

            info!("⚠️ token.json 不可用且没有刷新令牌，进入交互式授权");
        } else {
            info!("未找到 {}，进入交互式授权", self.token_path);
        }

        let credential = self.interactive_flow().await?;
        credential.persist(&self.token_path)?;
        info!("✓ 授权完成，凭据已保存至 {}", self.token_path);
        Ok(credential)
    }

    /// 用刷新令牌换取新的访问令牌
    async fn refresh(&self, mut credential: Credential) -> AppResult<Credential> {
        let refresh_token = credential
            .refresh_token
            .clone()
            .ok_or(AppError::Auth(AuthError::MissingRefreshToken))?;

        let form = [
            ("client_id", credential.client_id.as_str()),
            ("client_secret", credential.client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http
            .post(&credential.token_uri)
            .form(&form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AppError::Auth(AuthError::RefreshFailed {
                status: status.as_u16(),
                body,
            }));
        }

        let resp: TokenResponse = serde_json::from_str(&body)?;
        credential.apply_token_response(&resp, Utc::now());
        Ok(credential)
    }

    /// 走一次完整的交互式授权
    async fn interactive_flow(&self) -> AppResult<Credential> {
        let secrets = load_client_secrets(&self.client_secrets_path)?;
        let flow = InstalledAppFlow::new(
            secrets,
            self.scopes.clone(),
            &self.auth_uri,
            &self.token_uri,
        );
        flow.run_local_server().await
    }
}
