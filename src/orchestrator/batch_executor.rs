//! 批量提交执行器 - 编排层
//!
//! ## 职责
//!
//! 1. 按计划逐次取出答案
//! 2. 委托 `SubmissionFlow` 完成单次提交
//! 3. 两次提交之间等待固定间隔（最后一次之后不等待）
//! 4. 汇总所有提交结果
//!
//! 提交严格串行，同一时刻只有一个请求在途。
//! 单次失败只记录，不会中断整批

use crate::infrastructure::http_client::FormTransport;
use crate::models::plan::RunPlan;
use crate::models::result::ResultSet;
use crate::services::response_classifier::ResponseClassifier;
use crate::workflow::{RunCtx, SubmissionFlow};
use std::time::Duration;
use tracing::{debug, info};

/// 批量提交执行器
///
/// 借用提交通道和判定策略，本身不持有网络资源
pub struct BatchExecutor<'a, T, C> {
    transport: &'a T,
    classifier: &'a C,
    verbose_logging: bool,
}

impl<'a, T, C> BatchExecutor<'a, T, C>
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

    pub fn verbose(mut self, verbose_logging: bool) -> Self {
        self.verbose_logging = verbose_logging;
        self
    }

    /// 执行整批提交
    ///
    /// # 参数
    /// - `endpoint`: 提交地址
    /// - `plan`: 提交计划
    /// - `run_count`: 提交次数
    /// - `break_seconds`: 两次提交之间的间隔，负数或非有限值按 0 处理
    pub async fn execute(
        &self,
        endpoint: &str,
        plan: &RunPlan,
        run_count: usize,
        break_seconds: f64,
    ) -> ResultSet {
        let pause = pause_duration(break_seconds);
        let flow = SubmissionFlow::new(self.transport, self.classifier).verbose(self.verbose_logging);
        let mut results = ResultSet::new(run_count);

        info!("📤 开始提交: 共 {} 次 | 间隔 {:?}", run_count, pause);

        for run in 1..=run_count {
            let ctx = RunCtx::new(run, run_count, endpoint);
            let answers = plan.answers_for_run(ctx.plan_index());

            let result = flow.run(&ctx, &answers).await;
            results.record(result);

            if !ctx.is_last() && !pause.is_zero() {
                debug!("{} 等待 {:?} 后继续", ctx, pause);
                tokio::time::sleep(pause).await;
            }
        }

        info!(
            "📊 提交结束: 成功 {}/{} | 失败 {}",
            results.successful, results.total, results.failed
        );

        results
    }
}

fn pause_duration(break_seconds: f64) -> Duration {
    if break_seconds.is_finite() && break_seconds > 0.0 {
        Duration::from_secs_f64(break_seconds)
    } else {
        Duration::ZERO
    }
}
