//! 答题流程 - 流程层
//!
//! 核心职责：把会话状态机和模型调用串起来
//!
//! 流程顺序：
//! 1. 出题提示词 → 模型 → 解析 → 展示
//! 2. 勾选选项
//! 3. 评分提示词 → 模型 → 展示解析
//! 4. 确认后回到空闲，开始下一题
//!
//! 每次模型调用都会阻塞当前会话直到返回，同一会话内不会有并发请求。

use tracing::info;

use crate::error::{AppResult, SessionError};
use crate::models::{ExamTopic, GradingResult, Label, Question};
use crate::services::{prompts, ModelClient};
use crate::workflow::quiz_session::{Phase, QuizSession};

/// 答题流程
///
/// - 持有可选的模型客户端（未输入 API key 时为空）
/// - 持有当前考试方向
/// - 独占会话状态
pub struct QuizFlow<M: ModelClient> {
    client: Option<M>,
    topic: ExamTopic,
    session: QuizSession,
}

impl<M: ModelClient> QuizFlow<M> {
    pub fn new(topic: ExamTopic) -> Self {
        Self {
            client: None,
            topic,
            session: QuizSession::new(),
        }
    }

    pub fn with_client(client: M, topic: ExamTopic) -> Self {
        Self {
            client: Some(client),
            ..Self::new(topic)
        }
    }

    /// 设置或清除模型客户端
    pub fn configure(&mut self, client: Option<M>) {
        self.client = client;
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn topic(&self) -> ExamTopic {
        self.topic
    }

    /// 只有空闲时才能切换考试方向
    pub fn set_topic(&mut self, topic: ExamTopic) -> Result<(), SessionError> {
        if self.session.has_active_question() {
            return Err(SessionError::TopicLocked);
        }
        self.topic = topic;
        Ok(())
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// "生成题目"是否可用
    pub fn can_generate(&self) -> bool {
        self.has_client() && self.session.phase() == Phase::Idle
    }

    /// "提交答案"是否可用
    pub fn can_submit(&self) -> bool {
        self.has_client()
            && self.session.phase() == Phase::AwaitingAnswer
            && !self.session.selection().is_empty()
    }

    /// 生成一道新题目
    pub async fn request_question(&mut self) -> AppResult<&Question> {
        let client = self.client.as_ref().ok_or(SessionError::MissingCredential)?;
        self.session.begin_question()?;

        info!("🤖 正在为 {} 生成题目 (模型: {})", self.topic, client.model_name());
        let prompt = prompts::question_prompt(self.topic);
        let outcome = client.generate(&prompt).await;

        self.session.complete_question(outcome)
    }

    pub fn toggle_option(&mut self, label: Label) -> AppResult<bool> {
        Ok(self.session.toggle_option(label)?)
    }

    /// 提交答案并请求评分
    pub async fn submit_answer(&mut self) -> AppResult<&GradingResult> {
        let client = self.client.as_ref().ok_or(SessionError::MissingCredential)?;
        let prompt = self.session.begin_grading(self.topic)?;

        info!("🤖 正在评分 (模型: {})", client.model_name());
        let outcome = client.generate(&prompt).await;

        self.session.complete_grading(outcome)
    }

    /// 解析展示完毕，进入下一轮
    pub fn acknowledge(&mut self) -> AppResult<()> {
        Ok(self.session.acknowledge()?)
    }
}
