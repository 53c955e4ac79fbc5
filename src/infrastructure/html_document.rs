//! HTML 解析 - 基础设施层
//!
//! 用 scraper 解析页面，再转换成与解析库无关的 `DomTree`

use crate::models::dom::DomTree;
use scraper::{Html, Node};

/// 内容与表单结构无关的标签，转换时整体跳过
const SKIPPED_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// 解析 HTML 文本
///
/// 注释、doctype 以及纯空白文本节点不会进入结果树
pub fn parse_html(html: &str) -> DomTree {
    let document = Html::parse_document(html);
    let mut tree = DomTree::new();
    let root = tree.root();

    let mut stack: Vec<_> = document
        .tree
        .root()
        .children()
        .rev()
        .map(|child| (child, root))
        .collect();

    // 先序遍历，保证兄弟节点按文档顺序追加
    while let Some((node, parent)) = stack.pop() {
        match node.value() {
            Node::Element(element) => {
                let name = element.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                let attrs: Vec<(&str, &str)> = element.attrs().collect();
                let id = tree.append_element(parent, name, &attrs);
                stack.extend(node.children().rev().map(|child| (child, id)));
            }
            Node::Text(text) => {
                let content: &str = text;
                if !content.trim().is_empty() {
                    tree.append_text(parent, content);
                }
            }
            _ => {}
        }
    }

    tree
}
