//! HTTP 客户端 - 基础设施层
//!
//! 唯一持有 reqwest::Client，只暴露"取页面"和"提交表单"两种能力

use crate::config::Config;
use crate::error::SubmissionError;
use reqwest::header::{ORIGIN, REFERER};
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// 取回的表单页面
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 跟随重定向后的最终地址
    pub final_url: String,
    pub status: u16,
    pub body: String,
}

/// 提交后收到的响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub status: u16,
    /// 跟随重定向后的最终地址
    pub url: String,
    pub body: String,
}

/// 表单提交通道
///
/// 批量执行器只依赖这个能力，测试时可以替换成桩实现
#[allow(async_fn_in_trait)]
pub trait FormTransport {
    async fn post_form(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
    ) -> Result<SubmitResponse, SubmissionError>;
}

/// 表单 HTTP 客户端
pub struct FormHttpClient {
    client: reqwest::Client,
}

impl FormHttpClient {
    /// 按配置创建客户端（浏览器标识、超时、重定向上限）
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(Policy::limited(config.max_redirects))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// GET 页面，跟随重定向
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, reqwest::Error> {
        debug!("请求表单页面: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;
        debug!("页面响应: 状态码 {} | 最终地址 {} | 长度 {}", status, final_url, body.len());
        Ok(FetchedPage {
            final_url,
            status,
            body,
        })
    }
}

impl FormTransport for FormHttpClient {
    async fn post_form(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
    ) -> Result<SubmitResponse, SubmissionError> {
        let mut request = self.client.post(endpoint).form(fields);
        if let Some(origin) = origin_of(endpoint) {
            request = request.header(ORIGIN, origin);
        }
        request = request.header(REFERER, referer_for(endpoint));

        let response = request.send().await?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text().await?;

        Ok(SubmitResponse { status, url, body })
    }
}

/// 提交地址所在的源，如 `https://docs.google.com`
pub fn origin_of(endpoint: &str) -> Option<String> {
    let url = Url::parse(endpoint).ok()?;
    let origin = url.origin();
    if origin.is_tuple() {
        Some(origin.ascii_serialization())
    } else {
        None
    }
}

/// 表单填写页地址，用作 Referer
pub fn referer_for(endpoint: &str) -> String {
    endpoint.replace("/formResponse", "/viewform")
}
