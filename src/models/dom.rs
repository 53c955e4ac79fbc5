//! 与具体 HTML 解析库无关的文档树
//!
//! 字段推断规则只依赖这里的接口，测试时可以直接手工搭树

/// 节点编号（在所属树内有效）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DomNode {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// 文档树，节点按插入顺序存放，根节点为 `#document`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomTree {
    nodes: Vec<DomNode>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![DomNode {
                data: NodeData::Element {
                    tag: "#document".to_string(),
                    attrs: Vec::new(),
                },
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// 在 `parent` 下追加元素节点，标签名统一转为小写
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect();
        self.push(
            parent,
            NodeData::Element {
                tag: tag.to_ascii_lowercase(),
                attrs,
            },
        )
    }

    /// 在 `parent` 下追加文本节点
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, NodeData::Text(text.to_string()))
    }

    fn push(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DomNode {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    /// 元素标签名，文本节点返回 None
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].data, NodeData::Element { .. })
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// 由近到远的祖先节点（不含自身）
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// 先序遍历的后代节点（不含自身）
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// 整棵树中的全部元素，按文档顺序
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| self.is_element(id))
            .collect()
    }

    /// 满足条件的后代元素，按文档顺序
    pub fn find_descendants<F>(&self, id: NodeId, pred: F) -> Vec<NodeId>
    where
        F: Fn(&DomTree, NodeId) -> bool,
    {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.is_element(n) && pred(self, n))
            .collect()
    }

    /// `role` 属性等于给定值的后代元素
    pub fn find_by_role(&self, id: NodeId, role: &str) -> Vec<NodeId> {
        self.find_descendants(id, |tree, n| tree.has_role(n, role))
    }

    pub fn has_role(&self, id: NodeId, role: &str) -> bool {
        self.attr(id, "role")
            .map(|r| r.trim().eq_ignore_ascii_case(role))
            .unwrap_or(false)
    }

    /// `ancestor` 是否为 `id` 的祖先
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// 节点下所有文本拼接，连续空白折叠为一个空格
    pub fn text_content(&self, id: NodeId) -> String {
        let mut raw = String::new();
        if let NodeData::Text(text) = &self.nodes[id.0].data {
            raw.push_str(text);
        }
        for n in self.descendants(id) {
            if let NodeData::Text(text) = &self.nodes[n.0].data {
                raw.push(' ');
                raw.push_str(text);
            }
        }
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let root = tree.root();
        let form = tree.append_element(root, "FORM", &[("ID", "f")]);
        let item = tree.append_element(form, "div", &[("role", "listitem")]);
        let heading = tree.append_element(item, "div", &[("role", "heading")]);
        tree.append_text(heading, "  你最喜欢的\n颜色 ");
        let input = tree.append_element(item, "input", &[("type", "hidden"), ("name", "entry.1")]);
        (tree, form, heading, input)
    }

    #[test]
    fn test_tags_and_attrs_are_case_insensitive() {
        let (tree, form, _, _) = sample();
        assert_eq!(tree.tag(form), Some("form"));
        assert_eq!(tree.attr(form, "id"), Some("f"));
        assert_eq!(tree.attr(form, "missing"), None);
    }

    #[test]
    fn test_ancestors_walk_to_root() {
        let (tree, form, _, input) = sample();
        let chain: Vec<NodeId> = tree.ancestors(input).collect();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[1], form);
        assert_eq!(chain[2], tree.root());
        assert!(tree.is_ancestor_of(form, input));
    }

    #[test]
    fn test_text_content_collapses_whitespace() {
        let (tree, _, heading, _) = sample();
        assert_eq!(tree.text_content(heading), "你最喜欢的 颜色");
    }

    #[test]
    fn test_find_by_role_in_document_order() {
        let (tree, form, heading, _) = sample();
        assert_eq!(tree.find_by_role(form, "HEADING"), vec![heading]);
        assert!(tree.find_by_role(heading, "heading").is_empty());
    }
}
