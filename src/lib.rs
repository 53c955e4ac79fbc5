//! # Auto Form Submit
//!
//! 一个用于批量填写在线表单的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端），只暴露能力
//! - `FormHttpClient` - 唯一的 reqwest::Client 持有者，提供取页面和提交表单能力
//! - `html_document` - 把 HTML 解析为与解析库无关的 `DomTree`
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `SchemaExtractor` - 从表单页面解析问题列表
//! - `field_inference` - 基于 DOM 的字段推断规则
//! - `distribution_planner` - 按权重生成每次提交的答案
//! - `response_classifier` - 判定一次提交是否成功
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次提交"的完整流程
//! - `RunCtx` - 上下文封装（提交序号 + 提交地址）
//! - `SubmissionFlow` - 流程编排（编码 → POST → 判定）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，按运行模式调度
//! - `orchestrator/batch_executor` - 批量提交执行器，控制间隔并汇总结果

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, RunMode};
pub use error::{AppError, AppResult};
pub use infrastructure::{FormHttpClient, FormTransport, SubmitResponse};
pub use models::{Answer, AnswerMap, FormSchema, Question, QuestionKind, ResultSet, RunPlan, RunResult};
pub use orchestrator::{App, BatchExecutor};
pub use services::{MarkerClassifier, ResponseClassifier, SchemaExtractor, Verdict};
pub use workflow::{RunCtx, SubmissionFlow};
