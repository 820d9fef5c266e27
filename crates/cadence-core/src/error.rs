use std::fmt;

/// Machine-readable error codes for scripted and agent-driven callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    AlreadyInitialized,
    ConfigParseError,
    ImportParseError,
    TaskNotFound,
    InvalidPeriodicity,
    OccurrenceNotScheduled,
    DuplicateCompletion,
    TaskExhausted,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::AlreadyInitialized => "E1002",
            Self::ConfigParseError => "E1003",
            Self::ImportParseError => "E1004",
            Self::TaskNotFound => "E2001",
            Self::InvalidPeriodicity => "E2002",
            Self::OccurrenceNotScheduled => "E2003",
            Self::DuplicateCompletion => "E2004",
            Self::TaskExhausted => "E2005",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Schedule not initialized",
            Self::AlreadyInitialized => "Schedule already initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::ImportParseError => "Task file parse error",
            Self::TaskNotFound => "Task not found",
            Self::InvalidPeriodicity => "Invalid periodicity value",
            Self::OccurrenceNotScheduled => "Date is not a scheduled occurrence",
            Self::DuplicateCompletion => "Occurrence already completed",
            Self::TaskExhausted => "Task has no pending due date",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `cad init` to initialize this directory."),
            Self::AlreadyInitialized => Some("Use `cad init --force` to reinitialize."),
            Self::ConfigParseError => Some("Fix syntax in .cadence/config.toml and retry."),
            Self::ImportParseError => {
                Some("Expected a JSON array of task records with policy/task/periodicity/due_date.")
            }
            Self::TaskNotFound => Some("Use `cad list` to see task indices."),
            Self::InvalidPeriodicity => {
                Some("Use one of: daily, weekly, monthly, quarterly, semiannually, annually, other.")
            }
            Self::OccurrenceNotScheduled => {
                Some("Pass a due date produced by the task's recurrence, or omit --date.")
            }
            Self::DuplicateCompletion => {
                Some("Set completions.allow_duplicates = true in config to permit repeats.")
            }
            Self::TaskExhausted => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Core error: a code plus a contextualized message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct CadenceError {
    pub code: ErrorCode,
    pub message: String,
}

impl CadenceError {
    /// Build an error from a code with its stock message.
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.message().to_string(),
        }
    }

    /// Build an error from a code with a situation-specific message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
