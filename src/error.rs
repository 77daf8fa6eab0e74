use thiserror::Error;

use crate::workflow::Phase;

/// 应用程序错误类型
///
/// 所有错误都在会话边界恢复，不会导致进程退出
#[derive(Debug, Error)]
pub enum AppError {
    /// LLM 服务错误
    #[error(transparent)]
    Llm(#[from] LlmError),
    /// 模型输出格式不符合约定
    #[error(transparent)]
    Parse(#[from] ParseFailure),
    /// 会话状态机错误
    #[error(transparent)]
    Session(#[from] SessionError),
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// 终端读写错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 提示词为空
    #[error("prompt must not be empty")]
    EmptyPrompt,
    /// 构建请求失败
    #[error("failed to build model request: {source}")]
    RequestBuildFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 调用失败（网络或鉴权）
    #[error("model call failed (model: {model}): {source}")]
    ApiCallFailed {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("model returned no content (model: {model})")]
    EmptyContent { model: String },
}

/// 题目解析失败
///
/// 不返回部分结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to parse the question. Please try again.")]
pub struct ParseFailure;

/// 会话状态机错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 未配置模型客户端
    #[error("Please enter an API key to continue.")]
    MissingCredential,
    /// 已有进行中的题目
    #[error("A question is already active. Answer it before generating a new one.")]
    QuestionAlreadyActive,
    /// 未选择任何选项
    #[error("Select at least one option before submitting.")]
    EmptySelection,
    /// 当前阶段不允许该操作
    #[error("cannot {action} while {phase}")]
    IllegalTransition { action: &'static str, phase: Phase },
    /// 题目进行中不能切换考试方向
    #[error("The exam topic cannot be changed while a question is active.")]
    TopicLocked,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("failed to read config file {path}: {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("failed to parse config file {path}: {source}")]
    TomlParseFailed {
        path: String,
        source: toml::de::Error,
    },
    /// 未知考试方向
    #[error("{0}")]
    UnknownTopic(String),
}

impl AppError {
    /// 是否属于远程模型不可用
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, AppError::Llm(_))
    }

    /// 展示给用户的错误文本
    pub fn user_message(&self) -> String {
        match self {
            AppError::Llm(e) => format!("The model is unavailable. Please try again. ({})", e),
            other => other.to_string(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
