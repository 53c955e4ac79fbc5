//! 字段推断 - 业务能力层
//!
//! 从静态 HTML 的约定（隐藏的 sentinel 输入框、ARIA role）推断问题结构。
//! 全部是 `DomTree` 上的纯函数，不关心网络和解析库

use crate::error::ExtractError;
use crate::models::dom::{DomTree, NodeId};
use crate::models::question::{Question, QuestionKind};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// 向上查找标题时最多经过的祖先层数
pub const MAX_ANCESTOR_DEPTH: usize = 6;

/// 选项找不到标注属性时，向外查找文字的最大层数
const OPTION_TEXT_DEPTH: usize = 2;

/// 选项组的 role，找选项文字时不越过它们
const OPTION_GROUP_ROLES: [&str; 2] = ["radiogroup", "list"];

/// 选项标签属性，按优先级排列
const OPTION_LABEL_ATTRS: [&str; 3] = ["data-answer-value", "data-value", "aria-label"];

/// 编译并缓存正则，编译失败作为解析错误返回
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    pattern: &str,
) -> Result<&'static Regex, ExtractError> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| ExtractError::extraction(format!("正则表达式无效 '{}': {}", pattern, e)))
}

fn sentinel_name_regex() -> Result<&'static Regex, ExtractError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    cached_regex(&RE, r"^(entry\.\d+)(?:_sentinel)?$")
}

fn entry_id_regex() -> Result<&'static Regex, ExtractError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    cached_regex(&RE, r"entry\.\d+")
}

/// 一个字段的锚点：问题ID + 隐藏输入框节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel {
    pub identifier: String,
    pub node: NodeId,
}

/// 找出所有隐藏的 sentinel 输入框
///
/// 同一个ID出现多次时只保留第一次
pub fn find_sentinels(tree: &DomTree) -> Result<Vec<Sentinel>, ExtractError> {
    let name_regex = sentinel_name_regex()?;
    let mut seen = HashSet::new();
    let mut sentinels = Vec::new();

    for node in tree.elements() {
        if tree.tag(node) != Some("input") {
            continue;
        }
        let is_hidden = tree
            .attr(node, "type")
            .map(|t| t.eq_ignore_ascii_case("hidden"))
            .unwrap_or(false);
        if !is_hidden {
            continue;
        }
        let Some(name) = tree.attr(node, "name") else {
            continue;
        };
        let Some(caps) = name_regex.captures(name.trim()) else {
            continue;
        };
        let identifier = caps[1].to_string();
        if seen.insert(identifier.clone()) {
            sentinels.push(Sentinel { identifier, node });
        }
    }

    Ok(sentinels)
}

/// 推断所有 sentinel 对应的问题
pub fn infer_questions(tree: &DomTree) -> Result<Vec<Question>, ExtractError> {
    let sentinels = find_sentinels(tree)?;
    Ok(sentinels
        .iter()
        .map(|sentinel| infer_question(tree, sentinel, &sentinels))
        .collect())
}

/// 推断单个问题
///
/// 标题只在本问题的容器里找，找不到就用本问题ID生成占位标题。
/// 连父节点都和其他字段共用时没有自己的容器，按无选项的填空题处理
pub fn infer_question(tree: &DomTree, sentinel: &Sentinel, all: &[Sentinel]) -> Question {
    let container = locate_container(tree, sentinel, all);
    let display_text = container
        .heading
        .unwrap_or_else(|| placeholder_label(&sentinel.identifier));

    let Some(node) = container.node else {
        return Question::new(
            sentinel.identifier.clone(),
            display_text,
            QuestionKind::FreeText,
        );
    };

    let mut question = Question::new(
        sentinel.identifier.clone(),
        display_text,
        classify_kind(tree, node),
    );

    match question.kind {
        QuestionKind::MultiSelect => {
            for label in collect_option_labels(tree, node, "checkbox") {
                question.options.insert(label, 1);
            }
        }
        QuestionKind::SingleSelect => {
            for label in collect_option_labels(tree, node, "radio") {
                question.options.insert(label, 1);
            }
            // 没有选项的单选组不可信
            if question.options.is_empty() {
                question.kind = QuestionKind::FreeText;
            }
        }
        QuestionKind::FreeText => {}
    }

    question
}

/// 没有找到标题时使用的占位标题
pub fn placeholder_label(identifier: &str) -> String {
    format!("问题 {}", identifier)
}

struct Container {
    /// 不包含其他字段的最外层祖先
    node: Option<NodeId>,
    heading: Option<String>,
}

/// 向上查找字段容器
///
/// 最多走 `MAX_ANCESTOR_DEPTH` 层；遇到包含其他字段 sentinel 的祖先即停止，
/// 避免越界拿到别的问题的标题和选项
fn locate_container(tree: &DomTree, sentinel: &Sentinel, all: &[Sentinel]) -> Container {
    let mut last_inside = None;

    for ancestor in tree.ancestors(sentinel.node).take(MAX_ANCESTOR_DEPTH) {
        let crosses_boundary = all.iter().any(|other| {
            other.identifier != sentinel.identifier && tree.is_ancestor_of(ancestor, other.node)
        });
        if crosses_boundary {
            break;
        }
        last_inside = Some(ancestor);

        if let Some(heading) = first_heading_text(tree, ancestor) {
            return Container {
                node: Some(ancestor),
                heading: Some(heading),
            };
        }
    }

    Container {
        node: last_inside,
        heading: None,
    }
}

fn first_heading_text(tree: &DomTree, node: NodeId) -> Option<String> {
    tree.find_by_role(node, "heading")
        .into_iter()
        .map(|h| tree.text_content(h))
        .find(|text| !text.is_empty())
}

/// 根据容器内结构判断题型
///
/// 勾选列表 ⇒ 多选，单选组 ⇒ 单选，否则填空
pub fn classify_kind(tree: &DomTree, container: NodeId) -> QuestionKind {
    let has_checkbox_list = tree
        .find_by_role(container, "list")
        .into_iter()
        .any(|list| !tree.find_by_role(list, "checkbox").is_empty());
    if has_checkbox_list {
        return QuestionKind::MultiSelect;
    }
    if !tree.find_by_role(container, "radiogroup").is_empty() {
        return QuestionKind::SingleSelect;
    }
    QuestionKind::FreeText
}

/// 收集容器内某种 role 的选项文字，去掉空标签和重复标签
pub fn collect_option_labels(tree: &DomTree, container: NodeId, role: &str) -> Vec<String> {
    let option_nodes = tree.find_by_role(container, role);
    let mut seen = HashSet::new();
    let mut labels = Vec::new();

    for &node in &option_nodes {
        let Some(label) = option_label(tree, node, &option_nodes) else {
            continue;
        };
        if seen.insert(label.clone()) {
            labels.push(label);
        }
    }

    labels
}

/// 选项标签：先读标注属性，再找最近的文字
fn option_label(tree: &DomTree, node: NodeId, siblings: &[NodeId]) -> Option<String> {
    for attr in OPTION_LABEL_ATTRS {
        if let Some(value) = tree.attr(node, attr) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    let own = tree.text_content(node);
    if !own.is_empty() {
        return Some(own);
    }

    for ancestor in tree.ancestors(node).take(OPTION_TEXT_DEPTH) {
        if OPTION_GROUP_ROLES.iter().any(|role| tree.has_role(ancestor, role)) {
            break;
        }
        let shared = siblings
            .iter()
            .any(|&other| other != node && tree.is_ancestor_of(ancestor, other));
        if shared {
            break;
        }
        let text = tree.text_content(ancestor);
        if !text.is_empty() {
            return Some(text);
        }
    }

    None
}

/// 兜底：扫描整份 HTML 中出现过的全部问题ID，每个生成一个填空题
///
/// 只保证覆盖，不猜测选项
pub fn fallback_questions(raw_html: &str) -> Result<Vec<Question>, ExtractError> {
    let mut seen = HashSet::new();
    Ok(entry_id_regex()?
        .find_iter(raw_html)
        .map(|m| m.as_str())
        .filter(|id| seen.insert(id.to_string()))
        .map(|id| Question::new(id, placeholder_label(id), QuestionKind::FreeText))
        .collect())
}
