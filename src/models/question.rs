use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 问题类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    /// 单选
    SingleSelect,
    /// 多选
    MultiSelect,
    /// 填空
    FreeText,
}

impl QuestionKind {
    /// 获取显示名称
    pub fn name(self) -> &'static str {
        match self {
            QuestionKind::SingleSelect => "单选",
            QuestionKind::MultiSelect => "多选",
            QuestionKind::FreeText => "填空",
        }
    }
}

/// 表单中的一个问题
///
/// `options` 的权重含义取决于类型：
/// - 单选 / 填空：按比例分配的份数
/// - 多选：每个选项独立的入选分数（1-10）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub identifier: String,
    #[serde(rename = "text")]
    pub display_text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: IndexMap<String, u32>,
}

impl Question {
    pub fn new(
        identifier: impl Into<String>,
        display_text: impl Into<String>,
        kind: QuestionKind,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            display_text: display_text.into(),
            kind,
            options: IndexMap::new(),
        }
    }

    /// 追加一个选项
    pub fn with_option(mut self, label: impl Into<String>, weight: u32) -> Self {
        self.options.insert(label.into(), weight);
        self
    }

    /// 所有选项权重之和
    pub fn total_weight(&self) -> u64 {
        self.options.values().map(|&w| u64::from(w)).sum()
    }
}

/// 表单结构
///
/// 三个列表按类型互不相交，问题 ID 在整个 schema 内唯一
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    /// 提交地址
    pub submit_url: String,
    /// 表单ID
    pub form_id: String,
    #[serde(default)]
    pub selectable_questions: Vec<Question>,
    #[serde(default)]
    pub checkbox_questions: Vec<Question>,
    #[serde(default)]
    pub text_field_questions: Vec<Question>,
}

impl FormSchema {
    /// 按类型把问题分到对应列表
    pub fn from_questions(
        submit_url: impl Into<String>,
        form_id: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        let mut schema = Self {
            submit_url: submit_url.into(),
            form_id: form_id.into(),
            selectable_questions: Vec::new(),
            checkbox_questions: Vec::new(),
            text_field_questions: Vec::new(),
        };
        for question in questions {
            match question.kind {
                QuestionKind::SingleSelect => schema.selectable_questions.push(question),
                QuestionKind::MultiSelect => schema.checkbox_questions.push(question),
                QuestionKind::FreeText => schema.text_field_questions.push(question),
            }
        }
        schema
    }

    /// 依次遍历单选、多选、填空问题
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.selectable_questions
            .iter()
            .chain(self.checkbox_questions.iter())
            .chain(self.text_field_questions.iter())
    }

    /// 第一个重复出现的问题ID（跨三个列表检查）
    pub fn duplicate_identifier(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.questions()
            .map(|q| q.identifier.as_str())
            .find(|id| !seen.insert(*id))
    }

    pub fn question_count(&self) -> usize {
        self.selectable_questions.len()
            + self.checkbox_questions.len()
            + self.text_field_questions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_questions_partitions_by_kind() {
        let schema = FormSchema::from_questions(
            "https://example.com/formResponse",
            "abc",
            vec![
                Question::new("entry.1", "Q1", QuestionKind::FreeText),
                Question::new("entry.2", "Q2", QuestionKind::SingleSelect).with_option("A", 1),
                Question::new("entry.3", "Q3", QuestionKind::MultiSelect).with_option("X", 5),
            ],
        );

        assert_eq!(schema.selectable_questions.len(), 1);
        assert_eq!(schema.checkbox_questions.len(), 1);
        assert_eq!(schema.text_field_questions.len(), 1);
        let ids: Vec<&str> = schema.questions().map(|q| q.identifier.as_str()).collect();
        assert_eq!(ids, vec!["entry.2", "entry.3", "entry.1"]);
    }

    #[test]
    fn test_question_serializes_with_wire_keys() {
        let question = Question::new("entry.9", "颜色", QuestionKind::SingleSelect)
            .with_option("红", 2)
            .with_option("蓝", 1);
        let value = serde_json::to_value(&question).unwrap();

        assert_eq!(value["question"], "entry.9");
        assert_eq!(value["text"], "颜色");
        assert_eq!(value["type"], "single-select");
        assert_eq!(value["options"]["红"], 2);

        let keys: Vec<&String> = value["options"].as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_duplicate_identifier_across_lists() {
        let mut schema = FormSchema::from_questions(
            "https://example.com/formResponse",
            "abc",
            vec![
                Question::new("entry.1", "Q1", QuestionKind::SingleSelect).with_option("A", 1),
                Question::new("entry.2", "Q2", QuestionKind::FreeText),
            ],
        );
        assert_eq!(schema.duplicate_identifier(), None);

        schema
            .checkbox_questions
            .push(Question::new("entry.1", "Q1 again", QuestionKind::MultiSelect));
        assert_eq!(schema.duplicate_identifier(), Some("entry.1"));
    }

    #[test]
    fn test_options_default_to_empty() {
        let question: Question = serde_json::from_str(
            r#"{"question":"entry.1","text":"备注","type":"free-text"}"#,
        )
        .unwrap();
        assert!(question.options.is_empty());
        assert_eq!(question.total_weight(), 0);
    }
}
