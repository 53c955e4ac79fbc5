use serde::{Deserialize, Serialize};

/// 单次提交结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// 提交序号（从 1 开始）
    pub run: usize,
    /// HTTP 状态码，未收到响应时为空
    pub status: Option<u16>,
    pub success: bool,
    /// 最终响应地址
    pub url: String,
    pub message: Option<String>,
}

/// 整批提交的汇总结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub details: Vec<RunResult>,
}

impl ResultSet {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            details: Vec::with_capacity(total),
            ..Default::default()
        }
    }

    /// 记录一次提交并更新计数
    pub fn record(&mut self, result: RunResult) {
        if result.success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.details.push(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_updates_counters() {
        let mut set = ResultSet::new(2);
        set.record(RunResult {
            run: 1,
            status: Some(200),
            success: true,
            url: "https://example.com/formResponse".to_string(),
            message: None,
        });
        set.record(RunResult {
            run: 2,
            status: None,
            success: false,
            url: "https://example.com/formResponse".to_string(),
            message: Some("timeout".to_string()),
        });

        assert_eq!(set.total, 2);
        assert_eq!(set.successful, 1);
        assert_eq!(set.failed, 1);

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["details"][1]["run"], 2);
        assert!(json["details"][1]["status"].is_null());
    }
}
