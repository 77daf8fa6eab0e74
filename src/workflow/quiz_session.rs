//! 答题会话状态机
//!
//! ```text
//! Idle ──begin_question──▶ AwaitingQuestion ──complete_question(ok)──▶ AwaitingAnswer
//!  ▲                              │ (模型失败 / 解析失败)                 │ toggle_option
//!  │◀─────────────────────────────┘                                      │ begin_grading
//!  │                                                                     ▼
//!  └──acknowledge── Graded ◀──complete_grading(ok)── AwaitingGrading ──(失败)──▶ AwaitingAnswer
//! ```
//!
//! 所有转换都是同步的，不发起网络请求；模型调用由 [`QuizFlow`](super::QuizFlow) 负责。
//! 同一时刻只允许一道题处于活动状态，评分提示词引用的就是这道题。

use tracing::{debug, info, warn};

use crate::error::{AppResult, LlmError, SessionError};
use crate::models::{ExamTopic, GradingResult, Label, Question, UserSelection};
use crate::services::{prompts, question_parser};

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// 没有活动题目
    #[default]
    Idle,
    /// 出题请求进行中
    AwaitingQuestion,
    /// 题目已展示，等待作答
    AwaitingAnswer,
    /// 答案已提交，评分请求进行中
    AwaitingGrading,
    /// 解析已展示
    Graded,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::AwaitingQuestion => "awaiting a question",
            Phase::AwaitingAnswer => "awaiting an answer",
            Phase::AwaitingGrading => "awaiting grading",
            Phase::Graded => "graded",
        };
        f.write_str(s)
    }
}

/// 会话状态，每个交互会话恰好一份
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    question: Option<Question>,
    selection: UserSelection,
    /// 提交时冻结的选项，评分提示词只读取它
    submitted: Option<UserSelection>,
    phase: Phase,
    grading: Option<GradingResult>,
}

/// 答题会话
#[derive(Debug, Default)]
pub struct QuizSession {
    state: SessionState,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn question(&self) -> Option<&Question> {
        self.state.question.as_ref()
    }

    pub fn selection(&self) -> &UserSelection {
        &self.state.selection
    }

    pub fn submitted_selection(&self) -> Option<&UserSelection> {
        self.state.submitted.as_ref()
    }

    pub fn grading(&self) -> Option<&GradingResult> {
        self.state.grading.as_ref()
    }

    /// 是否有题目处于活动状态（包括出题请求进行中）
    pub fn has_active_question(&self) -> bool {
        self.state.phase != Phase::Idle
    }

    /// Idle → AwaitingQuestion
    pub fn begin_question(&mut self) -> Result<(), SessionError> {
        if self.has_active_question() {
            warn!("⚠️ 已有活动题目，拒绝重复出题 (阶段: {})", self.state.phase);
            return Err(SessionError::QuestionAlreadyActive);
        }

        self.state = SessionState {
            phase: Phase::AwaitingQuestion,
            ..SessionState::default()
        };
        Ok(())
    }

    /// 处理出题结果：成功进入 AwaitingAnswer，任何失败都回到 Idle
    pub fn complete_question(&mut self, outcome: Result<String, LlmError>) -> AppResult<&Question> {
        self.expect_phase(Phase::AwaitingQuestion, "receive a question")?;

        let raw_text = match outcome {
            Ok(raw_text) => raw_text,
            Err(e) => {
                warn!("⚠️ 出题失败: {}", e);
                self.reset();
                return Err(e.into());
            }
        };

        let question = match question_parser::parse(&raw_text) {
            Ok(question) => question,
            Err(e) => {
                self.reset();
                return Err(e.into());
            }
        };

        info!("✓ 题目解析成功");
        self.state.selection = UserSelection::new();
        self.state.phase = Phase::AwaitingAnswer;
        Ok(&*self.state.question.insert(question))
    }

    /// 切换选项，返回切换后是否选中
    pub fn toggle_option(&mut self, label: Label) -> Result<bool, SessionError> {
        self.expect_phase(Phase::AwaitingAnswer, "toggle an option")?;

        let selected = self.state.selection.toggle(label);
        debug!("选项 {} {}", label, if selected { "已选中" } else { "已取消" });
        Ok(selected)
    }

    /// AwaitingAnswer → AwaitingGrading
    ///
    /// 冻结当前选项并返回评分提示词
    pub fn begin_grading(&mut self, topic: ExamTopic) -> Result<String, SessionError> {
        self.expect_phase(Phase::AwaitingAnswer, "submit an answer")?;

        let Some(question) = self.state.question.as_ref() else {
            return Err(self.illegal("submit an answer"));
        };
        if self.state.selection.is_empty() {
            return Err(SessionError::EmptySelection);
        }

        let frozen = self.state.selection.clone();
        let prompt = prompts::grading_prompt(topic, question, &frozen);

        info!("📝 提交答案: {}", frozen.answer_list());
        self.state.submitted = Some(frozen);
        self.state.phase = Phase::AwaitingGrading;
        Ok(prompt)
    }

    /// 处理评分结果：成功进入 Graded，失败回到 AwaitingAnswer 以便重新提交
    pub fn complete_grading(
        &mut self,
        outcome: Result<String, LlmError>,
    ) -> AppResult<&GradingResult> {
        self.expect_phase(Phase::AwaitingGrading, "receive grading")?;

        match outcome {
            Ok(text) => {
                info!("✓ 评分完成");
                self.state.phase = Phase::Graded;
                Ok(&*self.state.grading.insert(GradingResult::new(text)))
            }
            Err(e) => {
                warn!("⚠️ 评分失败，回到作答阶段: {}", e);
                self.state.submitted = None;
                self.state.phase = Phase::AwaitingAnswer;
                Err(e.into())
            }
        }
    }

    /// Graded → Idle，清空题目、选项和评分
    pub fn acknowledge(&mut self) -> Result<(), SessionError> {
        match self.state.phase {
            Phase::Graded | Phase::Idle => {
                self.reset();
                Ok(())
            }
            _ => Err(self.illegal("move to the next question")),
        }
    }

    fn reset(&mut self) {
        self.state = SessionState::default();
    }

    fn expect_phase(&self, expected: Phase, action: &'static str) -> Result<(), SessionError> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(self.illegal(action))
        }
    }

    fn illegal(&self, action: &'static str) -> SessionError {
        SessionError::IllegalTransition {
            action,
            phase: self.state.phase,
        }
    }
}
