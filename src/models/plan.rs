use indexmap::IndexMap;
use serde::Serialize;

/// 某一次提交中某个问题的答案
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    /// 单个值
    Scalar(String),
    /// 多选题选中了多个选项
    List(Vec<String>),
}

impl Answer {
    /// 把多选结果转为答案：空选择不作答，一个选项按单值处理
    pub fn from_selection(selection: &[String]) -> Option<Self> {
        match selection {
            [] => None,
            [single] => Some(Answer::Scalar(single.clone())),
            many => Some(Answer::List(many.to_vec())),
        }
    }
}

/// 一次提交的全部答案（按问题顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerMap(IndexMap<String, Answer>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, answer: Answer) {
        self.0.insert(identifier.into(), answer);
    }

    pub fn get(&self, identifier: &str) -> Option<&Answer> {
        self.0.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 转为 URL 编码表单的键值对，多值答案重复同一个键
    pub fn to_form_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, answer) in &self.0 {
            match answer {
                Answer::Scalar(value) => pairs.push((key.clone(), value.clone())),
                Answer::List(values) => {
                    for value in values {
                        pairs.push((key.clone(), value.clone()));
                    }
                }
            }
        }
        pairs
    }
}

/// 单个问题在所有提交中的计划答案
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedSequence {
    /// 单选 / 填空：每次一个值；权重总和为 0 时为空，表示不作答
    Single(Vec<String>),
    /// 多选：每次一组选中的选项
    Multi(Vec<Vec<String>>),
}

impl PlannedSequence {
    pub fn len(&self) -> usize {
        match self {
            PlannedSequence::Single(values) => values.len(),
            PlannedSequence::Multi(selections) => selections.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn answer_at(&self, run: usize) -> Option<Answer> {
        match self {
            PlannedSequence::Single(values) => values.get(run).cloned().map(Answer::Scalar),
            PlannedSequence::Multi(selections) => selections
                .get(run)
                .and_then(|selection| Answer::from_selection(selection)),
        }
    }
}

/// 提交计划，构建后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    run_count: usize,
    sequences: IndexMap<String, PlannedSequence>,
}

impl RunPlan {
    pub fn new(run_count: usize, sequences: IndexMap<String, PlannedSequence>) -> Self {
        Self {
            run_count,
            sequences,
        }
    }

    pub fn run_count(&self) -> usize {
        self.run_count
    }

    pub fn sequence(&self, identifier: &str) -> Option<&PlannedSequence> {
        self.sequences.get(identifier)
    }

    pub fn sequences(&self) -> impl Iterator<Item = (&String, &PlannedSequence)> {
        self.sequences.iter()
    }

    /// 第 `run` 次（从 0 开始）提交的答案，没有答案的问题不出现
    pub fn answers_for_run(&self, run: usize) -> AnswerMap {
        let mut answers = AnswerMap::new();
        for (identifier, sequence) in &self.sequences {
            if let Some(answer) = sequence.answer_at(run) {
                answers.insert(identifier.clone(), answer);
            }
        }
        answers
    }
}
