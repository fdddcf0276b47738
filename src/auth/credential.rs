//! 授权凭据数据模型
//!
//! token.json 的字段布局与 Google 官方客户端持久化的格式一致，
//! 两边可以互相读取同一个文件

use crate::error::{AppError, AppResult, AuthError, FileError};
use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 访问令牌的提前过期余量（秒），抵消本地时钟偏差
const EXPIRY_SKEW_SECS: i64 = 60;

/// 持久化的 OAuth2 凭据（token.json）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// 访问令牌
    pub token: String,
    /// 刷新令牌（静默续期用）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// 令牌端点
    pub token_uri: String,
    /// OAuth2 客户端ID
    pub client_id: String,
    /// OAuth2 客户端密钥
    pub client_secret: String,
    /// 已授权的权限范围
    #[serde(default)]
    pub scopes: Vec<String>,
    /// 过期时间（RFC3339 文本，缺失视为不过期）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

impl Credential {
    /// 解析过期时间
    ///
    /// 兼容带时区的 RFC3339 和官方客户端写出的无时区微秒格式
    pub fn expiry_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.expiry.as_deref()?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    /// 访问令牌是否已过期（含时钟偏差余量）
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry_utc() {
            Some(expiry) => now + Duration::seconds(EXPIRY_SKEW_SECS) >= expiry,
            None => false,
        }
    }

    /// 凭据当前是否可直接使用
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && !self.is_expired(now)
    }

    /// 用令牌端点的响应更新凭据
    pub fn apply_token_response(&mut self, resp: &TokenResponse, now: DateTime<Utc>) {
        self.token = resp.access_token.clone();
        if let Some(refresh) = &resp.refresh_token {
            self.refresh_token = Some(refresh.clone());
        }
        self.expiry = resp.expires_in.map(|secs| {
            (now + Duration::seconds(secs)).to_rfc3339_opts(SecondsFormat::Micros, true)
        });
        if let Some(scope) = &resp.scope {
            self.scopes = scope.split_whitespace().map(str::to_string).collect();
        }
    }

    /// 从磁盘加载凭据文件
    pub fn load(path: &str) -> AppResult<Self> {
        if !Path::new(path).exists() {
            return Err(AppError::File(FileError::NotFound {
                path: path.to_string(),
            }));
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path, e))?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Auth(AuthError::TokenFileInvalid {
                path: path.to_string(),
                source: Box::new(e),
            })
        })
    }

    /// 将凭据完整写回磁盘，覆盖旧文件
    pub fn persist(&self, path: &str) -> AppResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| AppError::file_write_failed(path, e))
    }
}

/// 令牌端点响应（刷新和授权码换取共用）
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// credentials.json 外层结构
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecretsFile {
    pub installed: ClientSecrets,
}

/// OAuth2 客户端密钥（credentials.json 的 installed 段）
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub auth_uri: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

/// 加载客户端密钥文件
pub fn load_client_secrets(path: &str) -> AppResult<ClientSecrets> {
    if !Path::new(path).exists() {
        return Err(AppError::File(FileError::NotFound {
            path: path.to_string(),
        }));
    }
    let raw = std::fs::read_to_string(path).map_err(|e| AppError::file_read_failed(path, e))?;
    let file: ClientSecretsFile = serde_json::from_str(&raw)?;
    Ok(file.installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 创建测试用的凭据
    fn sample_credential(expiry: Option<&str>) -> Credential {
        Credential {
            token: "ya29.test".to_string(),
            refresh_token: Some("1//refresh".to_string()),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/script.projects".to_string()],
            expiry: expiry.map(str::to_string),
        }
    }

    #[test]
    fn test_expiry_rfc3339() {
        let cred = sample_credential(Some("2030-01-01T00:00:00Z"));
        assert!(cred.expiry_utc().is_some());
        assert!(!cred.is_expired(Utc::now()));
        assert!(cred.is_valid(Utc::now()));
    }

    #[test]
    fn test_expiry_naive_micros() {
        // 官方客户端写出的无时区格式
        let cred = sample_credential(Some("2021-08-12T08:19:37.615630"));
        assert!(cred.expiry_utc().is_some());
        assert!(cred.is_expired(Utc::now()));
        assert!(!cred.is_valid(Utc::now()));
    }

    #[test]
    fn test_missing_expiry_is_not_expired() {
        let cred = sample_credential(None);
        assert!(!cred.is_expired(Utc::now()));
    }

    #[test]
    fn test_expiry_skew() {
        // 55秒后过期：在60秒余量内，视为已过期
        let soon = (Utc::now() + Duration::seconds(55))
            .to_rfc3339_opts(SecondsFormat::Micros, true);
        let cred = sample_credential(Some(&soon));
        assert!(cred.is_expired(Utc::now()));
    }

    #[test]
    fn test_apply_token_response() {
        let mut cred = sample_credential(Some("2021-08-12T08:19:37.615630"));
        let resp = TokenResponse {
            access_token: "ya29.fresh".to_string(),
            expires_in: Some(3599),
            refresh_token: None,
            scope: None,
        };
        let now = Utc::now();
        cred.apply_token_response(&resp, now);

        assert_eq!(cred.token, "ya29.fresh");
        // 没有新的刷新令牌时保留旧的
        assert_eq!(cred.refresh_token.as_deref(), Some("1//refresh"));
        assert!(!cred.is_expired(now));
    }

    #[test]
    fn test_roundtrip_json() {
        let cred = sample_credential(Some("2030-01-01T00:00:00Z"));
        let json = serde_json::to_string(&cred).unwrap();
        let back: Credential = serde_json::from_str(&json).unwrap();
        assert_eq!(back.token, cred.token);
        assert_eq!(back.scopes, cred.scopes);
    }

    #[test]
    fn test_client_secrets_parse() {
        let raw = r#"{"installed":{"client_id":"abc","client_secret":"xyz","auth_uri":"https://accounts.google.com/o/oauth2/auth","token_uri":"https://oauth2.googleapis.com/token","redirect_uris":["http://localhost"]}}"#;
        let file: ClientSecretsFile = serde_json::from_str(raw).unwrap();
        assert_eq!(file.installed.client_id, "abc");
        assert_eq!(
            file.installed.token_uri.as_deref(),
            Some("https://oauth2.googleapis.com/token")
        );
    }
}
