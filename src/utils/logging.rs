use anyhow::Result;
/// 日志工具模块
///
/// 提供结果输出和日志格式化的辅助函数
use std::fs;
use std::time::Duration;
use tracing::{info, warn};

use crate::services::{BatchOutcome, ParentOutcome};

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n脚本工程创建日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 拼出脚本工程的编辑器链接
///
/// # 参数
/// - `script_id`: 脚本工程ID
pub fn editor_url(script_id: &str) -> String {
    format!("https://script.google.com/d/{}/edit", script_id)
}

/// 输出单项批量结果
///
/// # 参数
/// - `index`: 项序号（从1开始）
/// - `item`: 父表格ID与结果的配对
pub fn log_outcome(index: usize, item: &ParentOutcome) {
    match &item.outcome {
        BatchOutcome::Created(project) => {
            info!("[{:>2}] {}", index, project.script_id);
        }
        BatchOutcome::Failed { status, body } => {
            warn!(
                "[{:>2}] 失败 (HTTP {}): {}",
                index,
                status,
                truncate_text(body, 200)
            );
        }
    }
}

/// 输出批量阶段耗时
///
/// # 参数
/// - `elapsed`: 耗时
pub fn log_elapsed(elapsed: Duration) {
    info!("⏱️ done in {:.3}s", elapsed.as_secs_f64());
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `url`: 最终编辑器链接（上传成功时）
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(
    success: usize,
    failed: usize,
    total: usize,
    url: Option<&str>,
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    if let Some(url) = url {
        info!("🔗 {}", url);
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
