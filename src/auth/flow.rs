//! 交互式授权流程（installed-app flow）
//!
//! 在本地回环地址上起一个临时监听器，引导用户在浏览器中完成授权，
//! 接收回调中的授权码并换取令牌。整个监听器只存活一次回调的时间。

use crate::auth::credential::{ClientSecrets, Credential, TokenResponse};
use crate::error::{AppError, AppResult, AuthError};
use chrono::Utc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{info, warn};
use uuid::Uuid;

/// 授权完成后展示给用户的页面
const CONSENT_DONE_PAGE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\n\r\n\
    <html><body><h3>授权完成</h3><p>可以关闭此页面，回到终端继续。</p></body></html>";

/// 交互式授权流程
pub struct InstalledAppFlow {
    secrets: ClientSecrets,
    scopes: Vec<String>,
    auth_uri: String,
    token_uri: String,
    http: reqwest::Client,
}

impl InstalledAppFlow {
    /// 创建授权流程
    ///
    /// credentials.json 中自带的端点优先于配置中的端点
    pub fn new(secrets: ClientSecrets, scopes: Vec<String>, auth_uri: &str, token_uri: &str) -> Self {
        let auth_uri = secrets.auth_uri.clone().unwrap_or_else(|| auth_uri.to_string());
        let token_uri = secrets.token_uri.clone().unwrap_or_else(|| token_uri.to_string());
        Self {
            secrets,
            scopes,
            auth_uri,
            token_uri,
            http: reqwest::Client::new(),
        }
    }

    /// 运行本地回调服务器并完成授权
    ///
    /// # 返回
    /// 返回带刷新令牌的完整凭据
    pub async fn run_local_server(&self) -> AppResult<Credential> {
        // 临时端口，只接受一次连接
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.map_err(|e| {
            AppError::Auth(AuthError::ListenerFailed {
                source: Box::new(e),
            })
        })?;
        let port = listener
            .local_addr()
            .map_err(|e| {
                AppError::Auth(AuthError::ListenerFailed {
                    source: Box::new(e),
                })
            })?
            .port();
        let redirect_uri = format!("http://127.0.0.1:{}", port);

        let state = Uuid::new_v4().simple().to_string();
        let auth_url = build_auth_url(
            &self.auth_uri,
            &self.secrets.client_id,
            &redirect_uri,
            &self.scopes,
            &state,
        )?;

        info!("🔐 请在浏览器中打开以下链接完成授权:");
        info!("{}", auth_url);

        let params = wait_for_redirect(&listener).await?;
        if params.state.as_deref() != Some(state.as_str()) {
            return Err(AppError::Auth(AuthError::StateMismatch));
        }
        let code = match params.code {
            Some(code) => code,
            None => {
                return Err(AppError::Auth(AuthError::ConsentDenied {
                    reason: params
                        .error
                        .unwrap_or_else(|| "回调中没有授权码".to_string()),
                }))
            }
        };

        info!("✓ 收到授权码，正在换取令牌...");
        let resp = self.exchange_code(&code, &redirect_uri).await?;

        if resp.refresh_token.is_none() {
            warn!("⚠️ 授权服务器未返回刷新令牌，令牌过期后需要重新授权");
        }

        let mut credential = Credential {
            token: String::new(),
            refresh_token: None,
            token_uri: self.token_uri.clone(),
            client_id: self.secrets.client_id.clone(),
            client_secret: self.secrets.client_secret.clone(),
            scopes: self.scopes.clone(),
            expiry: None,
        };
        credential.apply_token_response(&resp, Utc::now());

        Ok(credential)
    }

    /// 用授权码换取令牌
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> AppResult<TokenResponse> {
        let form = [
            ("code", code),
            ("client_id", self.secrets.client_id.as_str()),
            ("client_secret", self.secrets.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        let response = self.http.post(&self.token_uri).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AppError::Auth(AuthError::ExchangeFailed {
                status: status.as_u16(),
                body,
            }));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// 回调请求中携带的参数
#[derive(Debug, Default, PartialEq)]
pub struct RedirectParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// 构建授权链接
///
/// access_type=offline 加 prompt=consent 才能确保返回刷新令牌
pub fn build_auth_url(
    auth_uri: &str,
    client_id: &str,
    redirect_uri: &str,
    scopes: &[String],
    state: &str,
) -> AppResult<String> {
    let scope = scopes.join(" ");
    let url = reqwest::Url::parse_with_params(
        auth_uri,
        &[
            ("response_type", "code"),
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("scope", scope.as_str()),
            ("state", state),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|e| AppError::Other(format!("授权链接构建失败: {}", e)))?;
    Ok(url.to_string())
}

/// 等待一次回调，解析其中的参数并给浏览器返回完成页面
async fn wait_for_redirect(listener: &TcpListener) -> AppResult<RedirectParams> {
    let (mut stream, _) = listener.accept().await.map_err(|e| {
        AppError::Auth(AuthError::ListenerFailed {
            source: Box::new(e),
        })
    })?;

    // 只需要请求行，读到头部结束即可
    let mut buf = Vec::with_capacity(2048);
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.map_err(|e| {
            AppError::Auth(AuthError::ListenerFailed {
                source: Box::new(e),
            })
        })?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let request = String::from_utf8_lossy(&buf);
    let params = parse_redirect_request(&request);

    let _ = stream.write_all(CONSENT_DONE_PAGE.as_bytes()).await;
    let _ = stream.shutdown().await;

    Ok(params)
}

// ========== 辅助函数 ==========

/// 从 HTTP 请求文本中解析回调参数
///
/// 请求行形如 `GET /?state=xxx&code=yyy&scope=... HTTP/1.1`
fn parse_redirect_request(request: &str) -> RedirectParams {
    let mut params = RedirectParams::default();

    let path = match request.lines().next().and_then(|line| line.split_whitespace().nth(1)) {
        Some(path) => path,
        None => return params,
    };

    let url = match reqwest::Url::parse(&format!("http://127.0.0.1{}", path)) {
        Ok(url) => url,
        Err(_) => return params,
    };

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => params.code = Some(value.into_owned()),
            "state" => params.state = Some(value.into_owned()),
            "error" => params.error = Some(value.into_owned()),
            _ => {}
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_auth_url_encodes_params() {
        let scopes = vec!["https://www.googleapis.com/auth/script.projects".to_string()];
        let url = build_auth_url(
            "https://accounts.google.com/o/oauth2/auth",
            "client-id",
            "http://127.0.0.1:4242",
            &scopes,
            "state123",
        )
        .unwrap();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("state=state123"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        // scope 必须经过URL编码
        assert!(url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fscript.projects"));
    }

    #[test]
    fn test_parse_redirect_success() {
        let request = "GET /?state=abc&code=4%2F0AX4XfWg&scope=foo HTTP/1.1\r\nHost: 127.0.0.1\r\n\r\n";
        let params = parse_redirect_request(request);
        assert_eq!(params.state.as_deref(), Some("abc"));
        assert_eq!(params.code.as_deref(), Some("4/0AX4XfWg"));
        assert!(params.error.is_none());
    }

    #[test]
    fn test_parse_redirect_denied() {
        let request = "GET /?error=access_denied&state=abc HTTP/1.1\r\n\r\n";
        let params = parse_redirect_request(request);
        assert!(params.code.is_none());
        assert_eq!(params.error.as_deref(), Some("access_denied"));
    }

    #[test]
    fn test_parse_redirect_garbage() {
        let params = parse_redirect_request("");
        assert_eq!(params, RedirectParams::default());
    }
}
