//! 题目解析 - 业务能力层
//!
//! 从模型的原始文本中切出五个有序字段：`Question:`、`A:`、`B:`、`C:`、`D:`。
//!
//! 标签只在行首（允许前导空格/制表符）被识别。行首标签必须恰好是
//! `Question`、`A`、`B`、`C`、`D` 各一次且按此顺序，多出、缺少或顺序颠倒都直接失败。
//! 每个字段从标签之后一直到下一个标签之前，`D:` 一直到文本末尾。
//!
//! 与"全文第一次出现"的朴素匹配不同，选项内容中间出现的 `B:` 之类文本
//! 不会被当成标签；但字段内另起一行以标签开头的内容会导致解析失败。
//! 不做模糊匹配，也不返回部分结果。

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::ParseFailure;
use crate::models::Question;
use crate::utils::logging::truncate_text;

/// 字段标签，按必须出现的顺序排列
const SEGMENT_LABELS: [&str; 5] = ["Question", "A", "B", "C", "D"];

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(Question|A|B|C|D):").expect("label pattern is valid")
});

/// 解析模型输出为题目
pub fn parse(raw_text: &str) -> Result<Question, ParseFailure> {
    // (标签起始位置, 内容起始位置)
    let mut bounds: Vec<(usize, usize)> = Vec::with_capacity(SEGMENT_LABELS.len());

    for caps in LABEL_RE.captures_iter(raw_text) {
        let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        match SEGMENT_LABELS.get(bounds.len()) {
            Some(expected) if label.as_str() == *expected => {
                bounds.push((whole.start(), whole.end()));
            }
            expected => {
                warn!(
                    "⚠️ 模型输出标签顺序错误: 期望 {:?}，遇到 {}",
                    expected,
                    label.as_str()
                );
                debug!("原始输出: {}", truncate_text(raw_text, 200));
                return Err(ParseFailure);
            }
        }
    }

    if bounds.len() < SEGMENT_LABELS.len() {
        warn!(
            "⚠️ 模型输出缺少标签，仅找到 {}/{} 个",
            bounds.len(),
            SEGMENT_LABELS.len()
        );
        debug!("原始输出: {}", truncate_text(raw_text, 200));
        return Err(ParseFailure);
    }

    let segment = |i: usize| -> String {
        let start = bounds[i].1;
        let end = bounds.get(i + 1).map_or(raw_text.len(), |next| next.0);
        raw_text[start..end].trim().to_string()
    };

    let question = Question::new(
        segment(0),
        [segment(1), segment(2), segment(3), segment(4)],
    );

    if question.is_err() {
        warn!("⚠️ 模型输出存在空字段");
        debug!("原始输出: {}", truncate_text(raw_text, 200));
    }

    question
}
