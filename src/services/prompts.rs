//! 提示词构建
//!
//! 出题提示词只由考试方向参数化；评分提示词嵌入题干、完整选项映射和用户的答案。
//! 出题提示词要求的五标签格式与 [`question_parser`](super::question_parser) 的约定一致。

use crate::models::{ExamTopic, Question, UserSelection};

/// 构建出题提示词
pub fn question_prompt(topic: ExamTopic) -> String {
    format!(
        r#"You are an expert in {topic} exams. Your role is to generate questions related to {topic} for candidates appearing for the exam.
Generate only one question at a time, followed by four options labeled A, B, C and D. Do not use any numbering.
The options must be mutually exclusive.
Do not ask any clarification questions. Do not engage in any chit chat. Generate questions only about {topic} exam.
Format the output strictly as follows:

Question: <Question>
A: <Option A>
B: <Option B>
C: <Option C>
D: <Option D>
"#,
        topic = topic.name()
    )
}

/// 构建评分提示词
///
/// `selection` 应为提交时冻结的选项集合
pub fn grading_prompt(topic: ExamTopic, question: &Question, selection: &UserSelection) -> String {
    format!(
        r#"You are an expert in {topic} exams.
Given the following question, options, and the user's chosen option(s), your task is to:
1.  Identify the correct option(s). The correct answer can be a single answer or multiple answers.
2.  Provide a detailed explanation for why each of the correct options is the right one.
3.  Provide a detailed explanation for why each of the incorrect options are wrong.
4.  Provide references/sources for the correctness/incorrectness of the options.

Question: {question}
Options: {options}
User's answer: {answer}

Your output should be as follows:

Correct Answer(s): <list of correct options like ['A', 'B']>
Explanation for correct option(s): <detailed explanation and sources>
Explanation for incorrect option(s): <detailed explanation and sources>
"#,
        topic = topic.name(),
        question = question.text(),
        options = question.options_json(),
        answer = selection.answer_list(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Label;
    use crate::services::question_parser;

    #[test]
    fn test_question_prompt_names_topic_and_format() {
        let prompt = question_prompt(ExamTopic::AzureDataFundamentals);

        assert!(prompt.contains("You are an expert in Microsoft Azure Data Fundamentals exams."));
        for line in ["Question: <Question>", "A: <Option A>", "D: <Option D>"] {
            assert!(prompt.contains(line), "missing {}", line);
        }
    }

    #[test]
    fn test_grading_prompt_embeds_question_options_and_answer() {
        let question =
            question_parser::parse("Question: What is 2+2?\nA: 3\nB: 4\nC: 5\nD: 6").unwrap();
        let selection: UserSelection = [Label::A, Label::C].into_iter().collect();

        let prompt = grading_prompt(ExamTopic::default(), &question, &selection);

        assert!(prompt.contains("Question: What is 2+2?"));
        assert!(prompt.contains(r#"Options: {"A":"3","B":"4","C":"5","D":"6"}"#));
        assert!(prompt.contains("User's answer: ['A', 'C']"));
        assert!(prompt.contains("Correct Answer(s):"));
    }
}
