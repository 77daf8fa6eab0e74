use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::Serialize;

use crate::error::ParseFailure;

/// 选项标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Label {
    A,
    B,
    C,
    D,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::A, Label::B, Label::C, Label::D];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::A => "A",
            Label::B => "B",
            Label::C => "C",
            Label::D => "D",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Label::A),
            "B" | "b" => Ok(Label::B),
            "C" | "c" => Ok(Label::C),
            "D" | "d" => Ok(Label::D),
            other => Err(format!("unknown option label: {}", other)),
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一道选择题
///
/// 创建后不可变，四个选项都必须有内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: [String; 4],
}

impl Question {
    /// 创建题目，题干或任一选项为空时失败
    pub fn new(text: impl Into<String>, options: [String; 4]) -> Result<Self, ParseFailure> {
        let text = text.into().trim().to_string();
        let options = options.map(|o| o.trim().to_string());

        if text.is_empty() || options.iter().any(|o| o.is_empty()) {
            return Err(ParseFailure);
        }

        Ok(Self { text, options })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn option(&self, label: Label) -> &str {
        &self.options[label.index()]
    }

    /// 按 A→D 顺序遍历选项
    pub fn options(&self) -> impl Iterator<Item = (Label, &str)> {
        Label::ALL
            .into_iter()
            .map(move |label| (label, self.option(label)))
    }

    /// 选项映射的 JSON 表示，用于评分提示词
    pub fn options_json(&self) -> String {
        let map: BTreeMap<Label, &str> = self.options().collect();
        serde_json::to_string(&map).unwrap_or_default()
    }
}

/// 用户勾选的选项集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSelection {
    labels: BTreeSet<Label>,
}

impl UserSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 切换选项的勾选状态，返回切换后是否选中
    pub fn toggle(&mut self, label: Label) -> bool {
        if self.labels.remove(&label) {
            false
        } else {
            self.labels.insert(label);
            true
        }
    }

    pub fn contains(&self, label: Label) -> bool {
        self.labels.contains(&label)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.labels.iter().copied()
    }

    /// 形如 `['A', 'C']` 的答案列表
    pub fn answer_list(&self) -> String {
        let items: Vec<String> = self.labels().map(|l| format!("'{}'", l)).collect();
        format!("[{}]", items.join(", "))
    }
}

impl FromIterator<Label> for UserSelection {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

/// 模型给出的评分与解析，原样展示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingResult {
    raw_explanation_text: String,
}

impl GradingResult {
    pub fn new(raw_explanation_text: impl Into<String>) -> Self {
        Self {
            raw_explanation_text: raw_explanation_text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.raw_explanation_text
    }
}
