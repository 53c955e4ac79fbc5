//! 应用入口 - 编排层
//!
//! 持有 `FormHttpClient`，根据运行模式串起各个步骤：
//!
//! ```text
//! parse:  SchemaExtractor → schema TOML
//! submit: schema TOML → distribution_planner → BatchExecutor → 结果 JSON
//! all:    SchemaExtractor → distribution_planner → BatchExecutor
//! ```

use crate::config::{Config, RunMode};
use crate::error::{AppResult, FileError};
use crate::infrastructure::FormHttpClient;
use crate::models::question::FormSchema;
use crate::models::result::ResultSet;
use crate::models::{load_schema_file, save_schema_file};
use crate::orchestrator::batch_executor::BatchExecutor;
use crate::services::{distribution_planner, MarkerClassifier, SchemaExtractor};
use crate::utils::logging::{log_schema_summary, log_startup, print_final_stats};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    client: FormHttpClient,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);

        let client = FormHttpClient::new(&config)?;

        Ok(Self { config, client })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<Option<ResultSet>> {
        match self.config.run_mode {
            RunMode::Parse => {
                let schema = self.extract().await?;
                self.save_schema(&schema).await?;
                Ok(None)
            }
            RunMode::Submit => {
                let schema = self.load_schema().await?;
                let results = self.submit(&schema).await?;
                Ok(Some(results))
            }
            RunMode::All => {
                let schema = self.extract().await?;
                self.save_schema(&schema).await?;
                let results = self.submit(&schema).await?;
                Ok(Some(results))
            }
        }
    }

    /// 解析表单结构
    async fn extract(&self) -> AppResult<FormSchema> {
        let form_url = self.config.require_form_url()?;
        let extractor = SchemaExtractor::new(&self.client, &self.config);
        let schema = extractor.extract(form_url).await?;
        log_schema_summary(&schema);
        Ok(schema)
    }

    async fn save_schema(&self, schema: &FormSchema) -> AppResult<()> {
        let path = Path::new(&self.config.schema_file);
        save_schema_file(path, schema).await?;
        info!("💾 表单结构已保存至: {}", path.display());
        info!("💡 可编辑其中的权重后以 submit 模式运行");
        Ok(())
    }

    async fn load_schema(&self) -> AppResult<FormSchema> {
        info!("\n📁 正在读取表单结构: {}", self.config.schema_file);
        let schema = load_schema_file(Path::new(&self.config.schema_file)).await?;
        log_schema_summary(&schema);
        Ok(schema)
    }

    /// 规划并执行整批提交
    async fn submit(&self, schema: &FormSchema) -> AppResult<ResultSet> {
        let runs = self.config.runs;
        let mut rng = match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let plan = distribution_planner::plan(schema.questions(), runs, &mut rng);
        let unanswered = plan.sequences().filter(|(_, seq)| seq.is_empty()).count();
        if unanswered > 0 {
            warn!("⚠️ 有 {} 个问题权重为 0 或没有选项，将不作答", unanswered);
        }

        let classifier = MarkerClassifier::from_config(&self.config);
        let executor =
            BatchExecutor::new(&self.client, &classifier).verbose(self.config.verbose_logging);
        let results = executor
            .execute(&schema.submit_url, &plan, runs, self.config.break_seconds)
            .await;

        self.save_results(&results).await?;
        print_final_stats(&results, &self.config.result_file);

        Ok(results)
    }

    /// 写出结果 JSON（未配置路径时跳过）
    async fn save_results(&self, results: &ResultSet) -> AppResult<()> {
        if self.config.result_file.is_empty() {
            return Ok(());
        }

        let content = serde_json::to_string_pretty(results).map_err(FileError::from)?;
        tokio::fs::write(&self.config.result_file, content)
            .await
            .map_err(|source| FileError::WriteFailed {
                path: self.config.result_file.clone(),
                source,
            })?;
        Ok(())
    }
}
