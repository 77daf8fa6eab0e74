//! # Exam Practice QnA
//!
//! 一个用大模型出题、评分的认证考试练习程序
//!
//! ## 架构设计
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心会话状态
//! - `ModelClient` / `LlmService` - 提示词进，原始文本出
//! - `question_parser` - 把模型输出切成题干和四个选项
//! - `prompts` - 出题与评分提示词
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 定义"一道题"的完整生命周期
//! - `QuizSession` - 状态机（Idle → AwaitingQuestion → AwaitingAnswer → AwaitingGrading → Graded）
//! - `QuizFlow` - 把状态机和模型调用串起来
//!
//! ### ③ 界面层（App）
//! - `app` - 终端界面，只负责输入和渲染
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ExamTopic, GradingResult, Label, Question, UserSelection};
pub use services::{LlmService, ModelClient};
pub use workflow::{Phase, QuizFlow, QuizSession};
