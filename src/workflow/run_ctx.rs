//! 提交上下文
//!
//! 封装"这是整批中的第几次提交"这一信息

use std::fmt::Display;

/// 单次提交的上下文
#[derive(Debug, Clone)]
pub struct RunCtx {
    /// 提交序号（从 1 开始，用于结果和日志）
    pub run: usize,

    /// 本批提交总数
    pub total_runs: usize,

    /// 提交地址
    pub endpoint: String,
}

impl RunCtx {
    pub fn new(run: usize, total_runs: usize, endpoint: impl Into<String>) -> Self {
        Self {
            run,
            total_runs,
            endpoint: endpoint.into(),
        }
    }

    /// 计划中的下标（从 0 开始）
    pub fn plan_index(&self) -> usize {
        self.run.saturating_sub(1)
    }

    pub fn is_last(&self) -> bool {
        self.run >= self.total_runs
    }
}

impl Display for RunCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[提交 {}/{}]", self.run, self.total_runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctx_indexes() {
        let ctx = RunCtx::new(3, 3, "https://example.com/formResponse");
        assert_eq!(ctx.plan_index(), 2);
        assert!(ctx.is_last());
        assert_eq!(ctx.to_string(), "[提交 3/3]");
        assert!(!RunCtx::new(1, 3, "u").is_last());
    }
}
