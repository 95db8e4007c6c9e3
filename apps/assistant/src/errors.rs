use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Nothing here is fatal: every variant maps to a message shown for the
/// current turn, after which the next input is processed normally.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// The text shown to the user for this error. Internal details go to the log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Llm(LlmError::MissingApiKey) => {
                tracing::warn!("Model call skipped: no API key configured");
                "未检测到 OPENAI_API_KEY，暂时无法完成该请求。请设置环境变量后重试。".to_string()
            }
            AppError::Llm(LlmError::Api { status, message }) => {
                tracing::error!("LLM API error (status {status}): {message}");
                "抱歉，模型服务返回了错误，请稍后再试。".to_string()
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                "抱歉，暂时无法连接到模型服务，请稍后再试。".to_string()
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                format!("发生错误：{e}")
            }
        }
    }
}
