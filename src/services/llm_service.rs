//! LLM 服务 - 业务能力层
//!
//! 只负责"根据提示词生成文本"能力，不关心会话状态
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 默认走 Gemini 的 OpenAI 兼容端点，也可换成任意兼容 OpenAI API 的服务

use std::future::Future;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;
use crate::utils::logging::truncate_text;

/// 模型客户端能力
///
/// 只有一个操作：提示词进，原始文本出。不做重试，不做缓存。
pub trait ModelClient {
    /// 模型名称（仅用于日志）
    fn model_name(&self) -> &str;

    /// 发送提示词并返回模型的原始响应
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send;
}

/// 基于 OpenAI 兼容接口的模型客户端
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmService {
    /// 用会话内输入的 API key 创建客户端
    ///
    /// key 不在本地校验，无效时由远程调用报错
    pub fn new(config: &Config, api_key: &str) -> Self {
        Self {
            client: Client::with_config(openai_config(config, api_key)),
            model_name: config.llm_model_name.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    async fn send_to_llm(&self, user_message: &str) -> Result<String, LlmError> {
        if user_message.trim().is_empty() {
            return Err(LlmError::EmptyPrompt);
        }

        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| LlmError::RequestBuildFailed {
                source: Box::new(e),
            })?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| LlmError::RequestBuildFailed {
                source: Box::new(e),
            })?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::ApiCallFailed {
                model: self.model_name.clone(),
                source: Box::new(e),
            }
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        debug!("模型响应: {}", truncate_text(&content, 200));

        Ok(content.trim().to_string())
    }
}

/// async-openai 直接在 base 后拼接 `/chat/completions`，base 末尾不能带 `/`
fn openai_config(config: &Config, api_key: &str) -> OpenAIConfig {
    OpenAIConfig::new()
        .with_api_key(api_key)
        .with_api_base(config.llm_api_base_url.trim_end_matches('/'))
}

impl ModelClient for LlmService {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.send_to_llm(prompt).await
    }
}
