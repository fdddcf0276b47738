/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 持久化凭据文件路径（token.json）
    pub token_path: String,
    /// OAuth2 客户端密钥文件路径（credentials.json）
    pub client_secrets_path: String,
    /// Apps Script API 基础URL
    pub api_base_url: String,
    /// 批量请求端点
    pub batch_url: String,
    /// OAuth2 授权端点
    pub auth_uri: String,
    /// OAuth2 令牌端点
    pub token_uri: String,
    /// 申请的 OAuth 权限范围
    pub scopes: Vec<String>,
    /// 新建脚本工程的标题
    pub project_title: String,
    /// 父表格ID列表文件（TOML）
    pub parents_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_path: "token.json".to_string(),
            client_secrets_path: "credentials.json".to_string(),
            api_base_url: "https://script.googleapis.com".to_string(),
            batch_url: "https://script.googleapis.com/batch".to_string(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/script.projects".to_string()],
            project_title: "Core Logging".to_string(),
            parents_file: "parents.toml".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            token_path: std::env::var("TOKEN_PATH").unwrap_or(default.token_path),
            client_secrets_path: std::env::var("CLIENT_SECRETS_PATH").unwrap_or(default.client_secrets_path),
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            batch_url: std::env::var("BATCH_URL").unwrap_or(default.batch_url),
            auth_uri: std::env::var("AUTH_URI").unwrap_or(default.auth_uri),
            token_uri: std::env::var("TOKEN_URI").unwrap_or(default.token_uri),
            scopes: std::env::var("OAUTH_SCOPES").map(|v| v.split(',').map(str::to_string).collect()).unwrap_or(default.scopes),
            project_title: std::env::var("PROJECT_TITLE").unwrap_or(default.project_title),
            parents_file: std::env::var("PARENTS_FILE").unwrap_or(default.parents_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.token_path, "token.json");
        assert_eq!(config.scopes.len(), 1);
        assert!(config.batch_url.starts_with(&config.api_base_url));
    }
}
