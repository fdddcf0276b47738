//! 批量请求模块
//!
//! Google API 的批量端点接受一个 multipart/mixed 请求体，
//! 每个 part 是一条内嵌的 HTTP 请求（Content-Type: application/http）。
//! 响应同样是 multipart/mixed，part 顺序与提交顺序一致，
//! 因此结果按提交顺序做关联，Content-ID 仅用于排查问题。

use crate::error::{ApiError, AppError, AppResult};
use uuid::Uuid;

/// 批量请求中的一条内嵌请求
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// part 的 Content-ID（调试用，关联依赖提交顺序）
    pub content_id: String,
    /// HTTP 方法
    pub method: String,
    /// 相对路径（如 /v1/projects）
    pub path: String,
    /// JSON 请求体
    pub body: String,
}

impl BatchItem {
    /// 创建一条 POST 内嵌请求
    pub fn post(index: usize, path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            content_id: format!("item{}", index),
            method: "POST".to_string(),
            path: path.into(),
            body: body.into(),
        }
    }
}

/// 批量响应中的一个 part（内嵌的 HTTP 响应）
#[derive(Debug, Clone)]
pub struct BatchPart {
    /// 内嵌响应的 HTTP 状态码
    pub status: u16,
    /// 内嵌响应体（通常是 JSON）
    pub body: String,
}

impl BatchPart {
    /// 内嵌响应是否为成功状态
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 生成一个批量请求边界串
pub fn new_boundary() -> String {
    format!("batch_{}", Uuid::new_v4().simple())
}

/// 构建 multipart/mixed 请求体
///
/// # 参数
/// - `items`: 按提交顺序排列的内嵌请求
/// - `boundary`: 边界串
///
/// # 返回
/// 返回完整的请求体文本（CRLF 换行）
pub fn build_body(items: &[BatchItem], boundary: &str) -> String {
    let mut body = String::new();

    for item in items {
        body.push_str(&format!("--{}\r\n", boundary));
        body.push_str("Content-Type: application/http\r\n");
        body.push_str(&format!("Content-ID: <{}>\r\n", item.content_id));
        body.push_str("\r\n");
        body.push_str(&format!("{} {} HTTP/1.1\r\n", item.method, item.path));
        body.push_str("Content-Type: application/json\r\n");
        body.push_str("\r\n");
        body.push_str(&item.body);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", boundary));

    body
}

/// 从响应的 Content-Type 头中提取边界串
///
/// 兼容带引号和不带引号两种写法：
/// `multipart/mixed; boundary=batch_xyz` 或 `boundary="batch_xyz"`
pub fn extract_boundary(content_type: &str) -> Option<String> {
    for param in content_type.split(';') {
        let param = param.trim();
        if let Some(value) = param.strip_prefix("boundary=") {
            let value = value.trim_matches('"');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// 解析 multipart/mixed 响应体
///
/// # 参数
/// - `body`: 完整响应体文本
/// - `boundary`: 从响应 Content-Type 中提取的边界串
///
/// # 返回
/// 按服务端返回顺序（即提交顺序）排列的内嵌响应
pub fn parse_response(body: &str, boundary: &str) -> AppResult<Vec<BatchPart>> {
    let delimiter = format!("--{}", boundary);
    let mut parts = Vec::new();

    // 第一段是 preamble，最后一段跟在结束边界 "--boundary--" 之后
    for raw in body.split(&delimiter).skip(1) {
        let raw = raw.trim_start_matches("\r\n").trim_start_matches('\n');
        if raw.starts_with("--") || raw.trim().is_empty() {
            break;
        }
        parts.push(parse_part(raw)?);
    }

    if parts.is_empty() {
        return Err(AppError::Api(ApiError::BatchMalformed {
            detail: format!("响应中没有找到边界 {} 的任何 part", boundary),
        }));
    }

    Ok(parts)
}

// ========== 辅助函数 ==========

/// 解析单个 part：跳过外层 part 头，读取内嵌 HTTP 响应的状态行和响应体
fn parse_part(raw: &str) -> AppResult<BatchPart> {
    // 外层头（Content-Type: application/http 等）止于第一个空行
    let inner = skip_headers(raw).ok_or_else(|| malformed("part 缺少外层头结束空行"))?;

    // 内嵌响应：状态行 + 响应头 + 空行 + 响应体
    let status_line = inner
        .lines()
        .next()
        .ok_or_else(|| malformed("part 缺少状态行"))?;
    let status = parse_status_line(status_line)
        .ok_or_else(|| malformed(&format!("无法解析状态行: {}", status_line)))?;

    let payload = skip_headers(inner).unwrap_or("");

    Ok(BatchPart {
        status,
        body: payload.trim().to_string(),
    })
}

/// 跳到第一个空行之后，兼容 CRLF 和 LF
fn skip_headers(text: &str) -> Option<&str> {
    if let Some(pos) = text.find("\r\n\r\n") {
        return Some(&text[pos + 4..]);
    }
    if let Some(pos) = text.find("\n\n") {
        return Some(&text[pos + 2..]);
    }
    None
}

/// 从 "HTTP/1.1 200 OK" 中取出 200
fn parse_status_line(line: &str) -> Option<u16> {
    let mut fields = line.split_whitespace();
    let version = fields.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    fields.next()?.parse().ok()
}

fn malformed(detail: &str) -> AppError {
    AppError::Api(ApiError::BatchMalformed {
        detail: detail.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 构造测试用的响应体
    fn sample_response(boundary: &str) -> String {
        format!(
            "--{b}\r\n\
             Content-Type: application/http\r\n\
             Content-ID: <response-item0>\r\n\
             \r\n\
             HTTP/1.1 200 OK\r\n\
             Content-Type: application/json; charset=UTF-8\r\n\
             \r\n\
             {{\"scriptId\":\"id-one\"}}\r\n\
             --{b}\r\n\
             Content-Type: application/http\r\n\
             Content-ID: <response-item1>\r\n\
             \r\n\
             HTTP/1.1 404 Not Found\r\n\
             Content-Type: application/json; charset=UTF-8\r\n\
             \r\n\
             {{\"error\":{{\"code\":404,\"message\":\"not found\"}}}}\r\n\
             --{b}--\r\n",
            b = boundary
        )
    }

    #[test]
    fn test_build_body_contains_all_items() {
        let items = vec![
            BatchItem::post(0, "/v1/projects", r#"{"title":"t","parentId":"a"}"#),
            BatchItem::post(1, "/v1/projects", r#"{"title":"t","parentId":"b"}"#),
        ];
        let body = build_body(&items, "batch_test");

        assert_eq!(body.matches("--batch_test\r\n").count(), 2);
        assert!(body.contains("POST /v1/projects HTTP/1.1"));
        assert!(body.contains("Content-ID: <item0>"));
        assert!(body.contains("Content-ID: <item1>"));
        assert!(body.ends_with("--batch_test--\r\n"));
        // 结束边界在所有 part 之后
        assert!(body.rfind("--batch_test--").unwrap() > body.rfind(r#""parentId":"b""#).unwrap());
    }

    #[test]
    fn test_extract_boundary() {
        assert_eq!(
            extract_boundary("multipart/mixed; boundary=batch_abc").as_deref(),
            Some("batch_abc")
        );
        assert_eq!(
            extract_boundary("multipart/mixed; boundary=\"batch_abc\"; charset=UTF-8").as_deref(),
            Some("batch_abc")
        );
        assert_eq!(extract_boundary("application/json"), None);
    }

    #[test]
    fn test_parse_response_order_preserving() {
        let parts = parse_response(&sample_response("batch_xyz"), "batch_xyz").unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].status, 200);
        assert!(parts[0].is_success());
        assert!(parts[0].body.contains("id-one"));
        assert_eq!(parts[1].status, 404);
        assert!(!parts[1].is_success());
        assert!(parts[1].body.contains("not found"));
    }

    #[test]
    fn test_parse_response_lf_only() {
        let body = sample_response("batch_xyz").replace("\r\n", "\n");
        let parts = parse_response(&body, "batch_xyz").unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].status, 200);
    }

    #[test]
    fn test_parse_response_empty_is_error() {
        let result = parse_response("", "batch_xyz");
        assert!(result.is_err());
    }

    #[test]
    fn test_new_boundary_unique() {
        assert_ne!(new_boundary(), new_boundary());
    }
}
