//! 单次提交流程 - 流程层
//!
//! 核心职责：定义"一次提交"的完整流程
//!
//! 流程顺序：
//! 1. 组装答案 → 编码为表单键值对
//! 2. POST 到提交地址
//! 3. 判定结果 → 记录 RunResult
//!
//! 任何错误都在这里被转成失败的 RunResult，不会向上抛出

use tracing::{debug, info, warn};

use crate::infrastructure::http_client::FormTransport;
use crate::models::plan::AnswerMap;
use crate::models::result::RunResult;
use crate::services::response_classifier::ResponseClassifier;
use crate::utils::logging::truncate_text;
use crate::workflow::run_ctx::RunCtx;

/// 单次提交流程
///
/// - 不持有任何资源，只借用提交通道和判定策略
/// - 不关心批次、间隔和统计
pub struct SubmissionFlow<'a, T, C> {
    transport: &'a T,
    classifier: &'a C,
    verbose_logging: bool,
}

impl<'a, T, C> SubmissionFlow<'a, T, C>
where
    T: FormTransport,
    C: ResponseClassifier,
{
    pub fn new(transport: &'a T, classifier: &'a C) -> Self {
        Self {
            transport,
            classifier,
            verbose_logging: false,
        }
    }

    /// 输出每次提交的答案和响应片段
    pub fn verbose(mut self, verbose_logging: bool) -> Self {
        self.verbose_logging = verbose_logging;
        self
    }

    pub async fn run(&self, ctx: &RunCtx, answers: &AnswerMap) -> RunResult {
        let fields = answers.to_form_pairs();
        debug!("{} 共 {} 个字段", ctx, fields.len());
        if self.verbose_logging {
            info!("{} 📝 答案: {:?}", ctx, fields);
        }

        let response = match self.transport.post_form(&ctx.endpoint, &fields).await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} ❌ 提交异常: {}", ctx, e);
                return RunResult {
                    run: ctx.run,
                    status: None,
                    success: false,
                    url: ctx.endpoint.clone(),
                    message: Some(e.to_string()),
                };
            }
        };

        if self.verbose_logging {
            info!("{} 响应内容: {}", ctx, truncate_text(&response.body, 200));
        }

        let verdict = self.classifier.classify(&response);
        if verdict.success {
            info!("{} ✓ 状态码 {} | {}", ctx, response.status, verdict.message);
        } else {
            warn!("{} ⚠️ 状态码 {} | {}", ctx, response.status, verdict.message);
        }

        RunResult {
            run: ctx.run,
            status: Some(response.status),
            success: verdict.success,
            url: response.url,
            message: Some(verdict.message),
        }
    }
}
