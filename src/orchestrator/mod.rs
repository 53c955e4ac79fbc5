//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责按运行模式调度各个步骤，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 持有 HTTP 客户端
//! - 按运行模式串起解析、规划和提交
//! - 读写 schema 文件和结果文件
//!
//! ### `batch_executor` - 批量提交执行器
//! - 按计划逐次提交
//! - 控制提交间隔
//! - 汇总提交结果
//!
//! ## 层次关系
//!
//! ```text
//! app (解析 / 规划 / 提交)
//!     ↓
//! batch_executor (处理 N 次提交)
//!     ↓
//! workflow::SubmissionFlow (处理单次提交)
//!     ↓
//! services (能力层：schema / planner / classifier)
//!     ↓
//! infrastructure (基础设施：FormHttpClient)
//! ```

pub mod app;
pub mod batch_executor;

// 重新导出主要类型
pub use app::App;
pub use batch_executor::BatchExecutor;
