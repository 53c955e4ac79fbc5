//! 提交结果判定 - 业务能力层
//!
//! 远端不会给出明确的成功回执，只能根据状态码和页面内容推测。
//! 判定规则可以整体替换，标记文字来自配置

use crate::config::Config;
use crate::infrastructure::http_client::SubmitResponse;

/// 判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub success: bool,
    pub message: String,
}

impl Verdict {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// 提交响应判定策略
pub trait ResponseClassifier {
    fn classify(&self, response: &SubmitResponse) -> Verdict;
}

impl<F> ResponseClassifier for F
where
    F: Fn(&SubmitResponse) -> Verdict,
{
    fn classify(&self, response: &SubmitResponse) -> Verdict {
        self(response)
    }
}

/// 基于标记文字的默认判定
///
/// - 状态码不在接受列表中：失败
/// - 响应中出现失败标记：降级为失败
/// - 响应中出现成功标记：确认成功（最后判断，优先级最高）
#[derive(Debug, Clone)]
pub struct MarkerClassifier {
    accepted_statuses: Vec<u16>,
    success_markers: Vec<String>,
    failure_markers: Vec<String>,
}

impl MarkerClassifier {
    pub fn new(success_markers: Vec<String>, failure_markers: Vec<String>) -> Self {
        Self {
            accepted_statuses: vec![200, 302, 303],
            success_markers,
            failure_markers,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.success_markers.clone(), config.failure_markers.clone())
    }

    /// 替换可接受的状态码
    pub fn with_accepted_statuses(mut self, statuses: Vec<u16>) -> Self {
        self.accepted_statuses = statuses;
        self
    }

    fn find_marker<'m>(markers: &'m [String], response: &SubmitResponse) -> Option<&'m str> {
        markers
            .iter()
            .map(String::as_str)
            .find(|marker| response.body.contains(*marker) || response.url.contains(*marker))
    }
}

impl Default for MarkerClassifier {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ResponseClassifier for MarkerClassifier {
    fn classify(&self, response: &SubmitResponse) -> Verdict {
        if !self.accepted_statuses.contains(&response.status) {
            return Verdict::failure(format!("非预期的状态码: {}", response.status));
        }

        let confirmed = Self::find_marker(&self.success_markers, response);
        let rejected = Self::find_marker(&self.failure_markers, response);

        match (confirmed, rejected) {
            (Some(marker), _) => Verdict::success(format!("提交成功，检测到确认标记: {}", marker)),
            (None, Some(marker)) => Verdict::failure(format!("响应中包含错误提示: {}", marker)),
            (None, None) => Verdict::success(format!(
                "状态码 {}，未检测到确认标记",
                response.status
            )),
        }
    }
}
