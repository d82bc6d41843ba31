use thiserror::Error;

/// Unified error type for svn-trigger operations
#[derive(Error, Debug)]
pub enum SvnTriggerError {
    #[error("Malformed revision info: {0}")]
    MalformedRevisionInfo(String),

    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Invalid revision number: {0}")]
    InvalidRevisionNumber(String),

    #[error("Rule has no criteria")]
    EmptyCriteria,

    #[error("Rule has no callback")]
    MissingCallback,

    #[error("Cannot compare against unknown attribute: {0}")]
    CannotCompare(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Callback failed: {0}")]
    Callback(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("Svnlook operation failed: {0}")]
    Svn(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in svn-trigger
pub type Result<T> = std::result::Result<T, SvnTriggerError>;

impl SvnTriggerError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SvnTriggerError::Config(msg.into())
    }

    /// Create a template error with context
    pub fn template(msg: impl Into<String>) -> Self {
        SvnTriggerError::Template(msg.into())
    }

    /// Create a mail error with context
    pub fn mail(msg: impl Into<String>) -> Self {
        SvnTriggerError::Mail(msg.into())
    }

    /// Create an svnlook error with context
    pub fn svn(msg: impl Into<String>) -> Self {
        SvnTriggerError::Svn(msg.into())
    }

    /// Create a command error with context
    pub fn command(msg: impl Into<String>) -> Self {
        SvnTriggerError::Command(msg.into())
    }

    /// Create a callback error with context
    pub fn callback(msg: impl Into<String>) -> Self {
        SvnTriggerError::Callback(msg.into())
    }
}
