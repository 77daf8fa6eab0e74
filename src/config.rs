use std::path::Path;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};
use crate::models::ExamTopic;

/// 程序配置
///
/// API key 只来自环境变量或会话内输入，不从配置文件读取，也不写入任何文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    #[serde(skip)]
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// 启动时默认选中的考试方向
    pub default_topic: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: None,
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-1.5-flash-001".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            default_topic: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载非敏感配置
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// 加载配置文件（存在时），再用环境变量覆盖
    pub fn load(path: &Path) -> AppResult<Self> {
        let base = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    fn from_toml_str(content: &str, path: &Path) -> AppResult<Self> {
        let config = toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(config)
    }

    fn with_env_overrides(self) -> Self {
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            llm_api_key: env("LLM_API_KEY")
                .or_else(|| env("GEMINI_API_KEY"))
                .or(self.llm_api_key),
            llm_api_base_url: env("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: env("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            temperature: env("LLM_TEMPERATURE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.temperature),
            max_tokens: env("LLM_MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.max_tokens),
            default_topic: env("EXAM_TOPIC").or(self.default_topic),
            verbose_logging: env("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
        }
    }

    /// 解析默认考试方向，未配置时取菜单第一项
    pub fn topic(&self) -> AppResult<ExamTopic> {
        match &self.default_topic {
            Some(name) => Ok(name.parse().map_err(ConfigError::UnknownTopic)?),
            None => Ok(ExamTopic::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_toml_overrides_defaults() {
        let config = Config::from_toml_str(
            r#"
llm_model_name = "gemini-2.0-flash"
max_tokens = 2048
default_topic = "AWS Solution Architect Associate"
"#,
            Path::new("exam_practice.toml"),
        )
        .unwrap();

        assert_eq!(config.llm_model_name, "gemini-2.0-flash");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, Config::default().temperature);
        assert_eq!(config.topic().unwrap(), ExamTopic::AwsSolutionArchitectAssociate);
    }

    #[test]
    fn test_api_key_never_read_from_file() {
        let config = Config::from_toml_str(
            r#"llm_api_key = "secret""#,
            Path::new("exam_practice.toml"),
        )
        .unwrap();

        assert!(config.llm_api_key.is_none());
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let err =
            Config::from_toml_str("max_tokens = \"many\"", Path::new("bad.toml")).unwrap_err();

        assert!(matches!(err, AppError::Config(ConfigError::TomlParseFailed { .. })));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_unknown_topic() {
        let config = Config {
            default_topic: Some("CKA".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.topic(),
            Err(AppError::Config(ConfigError::UnknownTopic(_)))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load(Path::new("definitely/not/here.toml")).unwrap();
        assert!(!config.llm_api_base_url.is_empty());
    }
}
