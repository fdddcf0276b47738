//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，串起一次完整的开通流程：
//!
//! 1. **凭据**：加载/刷新/交互式授权，拿到可用凭据
//! 2. **客户端**：构建绑定凭据的 Apps Script API 客户端
//! 3. **批量创建**：每个父表格一个脚本工程，单次网络往返
//! 4. **上传**：把固定的脚本和清单写入第一个创建成功的工程
//! 5. **汇报**：逐项结果、耗时、最终编辑器链接
//!
//! ## 设计特点
//!
//! - **顶层编排**：不关心批量报文和令牌刷新的细节
//! - **显式选择上传目标**：取第一个成功项，整批失败则报错退出
//! - **单项失败不致命**：只影响该项，其余照常进行

use crate::auth::CredentialManager;
use crate::clients::ScriptClient;
use crate::config::Config;
use crate::models::{load_parent_ids, project_files};
use crate::services::{ContentUploader, ParentOutcome, Provisioner};
use crate::utils::logging;
use anyhow::{bail, Result};
use std::time::Instant;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    client: ScriptClient,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        log_startup(&config);

        // 获取凭据并构建客户端
        let credential = CredentialManager::new(&config).obtain().await?;
        let client = ScriptClient::build("script", "v1", &credential, &config)?;

        Ok(Self { config, client })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载父表格ID列表
        let parents = load_parent_ids(&self.config.parents_file).await?;

        if parents.is_empty() {
            warn!("⚠️ 父表格ID列表为空，程序结束");
            return Ok(());
        }

        info!("📄 共 {} 个父表格待处理", parents.len());

        // 批量创建脚本工程
        let tic = Instant::now();
        let provisioner = Provisioner::new(&self.client, &self.config.project_title);
        let outcomes = provisioner.create_all(&parents).await?;
        logging::log_elapsed(tic.elapsed());

        // 逐项汇报
        for (index, item) in outcomes.iter().enumerate() {
            logging::log_outcome(index + 1, item);
        }

        let success = outcomes.iter().filter(|o| o.outcome.script_id().is_some()).count();
        let failed = outcomes.len() - success;

        // 上传目标：第一个成功创建的工程，显式选择
        let target = first_created(&outcomes);
        let script_id = match target {
            Some(script_id) => script_id,
            None => {
                logging::print_final_stats(
                    success,
                    failed,
                    outcomes.len(),
                    None,
                    &self.config.output_log_file,
                );
                bail!("整批创建全部失败，没有可上传的工程");
            }
        };

        // 上传固定的脚本和清单
        let uploader = ContentUploader::new(&self.client);
        match uploader.upload(script_id, project_files()).await {
            Ok(content) => {
                let url = logging::editor_url(&content.script_id);
                info!("🔗 {}", url);
                logging::print_final_stats(
                    success,
                    failed,
                    outcomes.len(),
                    Some(&url),
                    &self.config.output_log_file,
                );
                Ok(())
            }
            Err(e) => {
                error!("❌ 上传失败: {:#}", e);
                logging::print_final_stats(
                    success,
                    failed,
                    outcomes.len(),
                    None,
                    &self.config.output_log_file,
                );
                Err(e)
            }
        }
    }
}

/// 取第一个成功创建的工程ID
fn first_created(outcomes: &[ParentOutcome]) -> Option<&str> {
    outcomes.iter().find_map(|item| item.outcome.script_id())
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量创建脚本工程");
    info!("📋 工程标题: {}", config.project_title);
    info!("{}", "=".repeat(60));
}
