//! 表单结构解析服务 - 业务能力层
//!
//! 负责"给一个表单地址，得到问题列表"：
//! 1. 规范化地址，请求填写页
//! 2. 跟随重定向，以最终地址为准解析表单ID
//! 3. 从静态 HTML 推断字段（失败时退回到全文扫描）

use crate::config::Config;
use crate::error::ExtractError;
use crate::infrastructure::html_document::parse_html;
use crate::infrastructure::http_client::FormHttpClient;
use crate::models::question::FormSchema;
use crate::services::field_inference;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use url::Url;

const VIEW_SUFFIX: &str = "viewform";
const EDIT_SUFFIX: &str = "edit";

fn form_id_regex() -> Result<&'static Regex, ExtractError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    field_inference::cached_regex(&RE, r"/forms/(?:u/\d+/)?d/e/([A-Za-z0-9_-]+)")
}

/// 表单结构解析服务
///
/// 每次解析只发一次请求，不保存任何状态
pub struct SchemaExtractor<'a> {
    client: &'a FormHttpClient,
    submit_url_template: String,
}

impl<'a> SchemaExtractor<'a> {
    pub fn new(client: &'a FormHttpClient, config: &Config) -> Self {
        Self {
            client,
            submit_url_template: config.submit_url_template.clone(),
        }
    }

    /// 解析表单
    ///
    /// # 参数
    /// - `form_url`: 用户提供的表单地址
    ///
    /// # 返回
    /// 成功时返回完整的表单结构，任何失败都不会返回部分结果
    pub async fn extract(&self, form_url: &str) -> Result<FormSchema, ExtractError> {
        let view_url = normalize_form_url(form_url)?;
        info!("🔍 正在获取表单页面: {}", view_url);

        let page = self
            .client
            .fetch_page(&view_url)
            .await
            .map_err(|e| ExtractError::extraction(format!("网络请求失败: {}", e)))?;

        if page.status != 200 {
            warn!("⚠️ 表单页面返回状态码 {}", page.status);
            return Err(ExtractError::Fetch {
                status: page.status,
            });
        }

        if page.final_url != view_url {
            debug!("重定向后的最终地址: {}", page.final_url);
        }

        parse_schema(&page.body, &page.final_url, &self.submit_url_template)
    }
}

/// 规范化表单地址，使其指向填写页
///
/// - 已包含 `viewform` 的地址保持不变
/// - 以 `edit` 结尾的地址改为 `viewform`
/// - 其他 `/forms/` 地址在路径末尾追加 `viewform`
///
/// 短链接等非表单路径交给重定向处理
pub fn normalize_form_url(form_url: &str) -> Result<String, ExtractError> {
    let mut url = Url::parse(form_url.trim())
        .map_err(|e| ExtractError::extraction(format!("无效的表单地址 '{}': {}", form_url, e)))?;

    let path = url.path().to_string();
    if path.contains(VIEW_SUFFIX) || !path.contains("/forms/") {
        return Ok(url.to_string());
    }

    let trimmed = path.trim_end_matches('/');
    let new_path = match trimmed.rsplit_once('/') {
        Some((head, last)) if last == EDIT_SUFFIX => format!("{}/{}", head, VIEW_SUFFIX),
        _ => format!("{}/{}", trimmed, VIEW_SUFFIX),
    };
    url.set_path(&new_path);

    Ok(url.to_string())
}

/// 从最终地址中取出表单ID
pub fn extract_form_id(final_url: &str) -> Result<String, ExtractError> {
    form_id_regex()?
        .captures(final_url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ExtractError::IdentifierNotFound {
            url: final_url.to_string(),
        })
}

/// 把表单ID代入提交地址模板
pub fn build_submit_url(template: &str, form_id: &str) -> String {
    template.replace("{form_id}", form_id)
}

/// 从页面内容解析表单结构（不访问网络）
///
/// 同样的输入总是得到同样的结果
pub fn parse_schema(
    html: &str,
    final_url: &str,
    submit_url_template: &str,
) -> Result<FormSchema, ExtractError> {
    let form_id = extract_form_id(final_url)?;
    let submit_url = build_submit_url(submit_url_template, &form_id);

    if html.trim().is_empty() {
        return Err(ExtractError::extraction("表单页面内容为空"));
    }

    let tree = parse_html(html);
    let mut questions = field_inference::infer_questions(&tree)?;

    if questions.is_empty() {
        warn!("⚠️ 未找到 sentinel 字段，改为全文扫描问题ID");
        questions = field_inference::fallback_questions(html)?;
    }

    if questions.is_empty() {
        return Err(ExtractError::extraction("页面中没有找到任何表单字段"));
    }

    let schema = FormSchema::from_questions(submit_url, form_id, questions);
    info!(
        "✓ 解析完成: 单选 {} | 多选 {} | 填空 {}",
        schema.selectable_questions.len(),
        schema.checkbox_questions.len(),
        schema.text_field_questions.len()
    );

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionKind;

    const TEMPLATE: &str = "https://docs.google.com/forms/d/e/{form_id}/formResponse";
    const FINAL_URL: &str = "https://docs.google.com/forms/d/e/1FAIpQLSdTest_-9/viewform";

    const FORM_HTML: &str = r#"
<!DOCTYPE html>
<html><head><title>调查</title><script>var FB_PUBLIC_LOAD_DATA_ = [];</script></head>
<body>
<form action="formResponse" method="POST">
  <div role="list">
    <div role="listitem">
      <div role="heading" aria-level="3">你的年级</div>
      <div role="radiogroup">
        <div role="radio" data-value="初一" aria-label="初一"></div>
        <div role="radio" data-value="初二" aria-label="初二"></div>
      </div>
      <input type="hidden" name="entry.111_sentinel">
    </div>
    <div role="listitem">
      <div role="heading" aria-level="3">喜欢的科目</div>
      <div role="list">
        <div role="listitem"><div role="checkbox" data-answer-value="数学"></div></div>
        <div role="listitem"><div role="checkbox" data-answer-value="物理"></div></div>
        <div role="listitem"><div role="checkbox" data-answer-value="历史"></div></div>
      </div>
      <input type="hidden" name="entry.222_sentinel">
    </div>
    <div role="listitem">
      <div role="heading" aria-level="3">其他意见</div>
      <input type="text" class="whsOnd">
      <input type="hidden" name="entry.333">
    </div>
  </div>
</form>
</body></html>
"#;

    #[test]
    fn test_normalize_keeps_viewform() {
        assert_eq!(normalize_form_url(FINAL_URL).unwrap(), FINAL_URL);
    }

    #[test]
    fn test_normalize_rewrites_edit() {
        assert_eq!(
            normalize_form_url("https://docs.google.com/forms/d/abc123/edit").unwrap(),
            "https://docs.google.com/forms/d/abc123/viewform"
        );
    }

    #[test]
    fn test_normalize_appends_viewform_and_keeps_query() {
        assert_eq!(
            normalize_form_url("https://docs.google.com/forms/d/e/XYZ/?usp=sf_link").unwrap(),
            "https://docs.google.com/forms/d/e/XYZ/viewform?usp=sf_link"
        );
    }

    #[test]
    fn test_normalize_leaves_short_links() {
        assert_eq!(
            normalize_form_url("https://forms.gle/AbCdEf").unwrap(),
            "https://forms.gle/AbCdEf"
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_form_url("not a url"),
            Err(ExtractError::Extraction { .. })
        ));
    }

    #[test]
    fn test_extract_form_id() {
        assert_eq!(extract_form_id(FINAL_URL).unwrap(), "1FAIpQLSdTest_-9");
        assert_eq!(
            extract_form_id("https://docs.google.com/forms/u/0/d/e/ABC/viewform").unwrap(),
            "ABC"
        );
        assert!(matches!(
            extract_form_id("https://docs.google.com/forms/d/abc123/viewform"),
            Err(ExtractError::IdentifierNotFound { .. })
        ));
    }

    #[test]
    fn test_build_submit_url() {
        assert_eq!(
            build_submit_url(TEMPLATE, "ID1"),
            "https://docs.google.com/forms/d/e/ID1/formResponse"
        );
    }

    #[test]
    fn test_parse_schema_from_static_html() {
        let schema = parse_schema(FORM_HTML, FINAL_URL, TEMPLATE).unwrap();

        assert_eq!(schema.form_id, "1FAIpQLSdTest_-9");
        assert_eq!(
            schema.submit_url,
            "https://docs.google.com/forms/d/e/1FAIpQLSdTest_-9/formResponse"
        );

        assert_eq!(schema.selectable_questions.len(), 1);
        let grade = &schema.selectable_questions[0];
        assert_eq!(grade.identifier, "entry.111");
        assert_eq!(grade.display_text, "你的年级");
        assert_eq!(grade.options.len(), 2);

        assert_eq!(schema.checkbox_questions.len(), 1);
        let subjects = &schema.checkbox_questions[0];
        assert_eq!(subjects.kind, QuestionKind::MultiSelect);
        let labels: Vec<&String> = subjects.options.keys().collect();
        assert_eq!(labels, vec!["数学", "物理", "历史"]);

        assert_eq!(schema.text_field_questions.len(), 1);
        assert_eq!(schema.text_field_questions[0].display_text, "其他意见");
    }

    #[test]
    fn test_parse_schema_is_idempotent() {
        let first = parse_schema(FORM_HTML, FINAL_URL, TEMPLATE).unwrap();
        let second = parse_schema(FORM_HTML, FINAL_URL, TEMPLATE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_schema_falls_back_to_id_scan() {
        let html = r#"<html><body><div data-params="[[&quot;entry.7&quot;],[&quot;entry.8&quot;]]"></div></body></html>"#;
        let schema = parse_schema(html, FINAL_URL, TEMPLATE).unwrap();

        assert!(schema.selectable_questions.is_empty());
        assert!(schema.checkbox_questions.is_empty());
        let ids: Vec<&str> = schema
            .text_field_questions
            .iter()
            .map(|q| q.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["entry.7", "entry.8"]);
    }

    #[test]
    fn test_parse_schema_without_fields_fails() {
        let err = parse_schema("<html><body>关闭</body></html>", FINAL_URL, TEMPLATE).unwrap_err();
        assert!(matches!(err, ExtractError::Extraction { .. }));
    }

    #[test]
    fn test_parse_schema_requires_form_id() {
        let err = parse_schema(FORM_HTML, "https://example.com/other", TEMPLATE).unwrap_err();
        assert_eq!(
            err,
            ExtractError::IdentifierNotFound {
                url: "https://example.com/other".to_string()
            }
        );
    }
}
