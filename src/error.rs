use thiserror::Error;

/// Failures a command reports to the user.
///
/// Handlers return `anyhow::Result`; these travel inside `anyhow::Error` and
/// the dispatcher downcasts them to pick the exit code and decide whether the
/// command's help is shown alongside the message.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("{0}")]
    UserInput(String),

    #[error("{message}")]
    Precondition {
        message: String,
        detail: Option<String>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{tool} failed: {message}")]
    ExternalTool { tool: &'static str, message: String },
}

impl FlowError {
    pub fn user_input(message: impl Into<String>) -> Self {
        Self::UserInput(message.into())
    }

    pub fn precondition(message: impl Into<String>, detail: Option<String>) -> Self {
        Self::Precondition {
            message: message.into(),
            detail,
        }
    }

    pub fn external(tool: &'static str, message: impl Into<String>) -> Self {
        Self::ExternalTool {
            tool,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Whether the failing command's help text should accompany the error
    pub fn shows_help(&self) -> bool {
        matches!(self, Self::UserInput(_))
    }
}
