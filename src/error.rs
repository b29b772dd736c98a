//! Error handling for rdap-lookup

use thiserror::Error;

/// Main error type for rdap-lookup
#[derive(Error, Debug, Clone)]
pub enum RdapError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RdapError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an upstream error
    pub fn upstream(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Upstream {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the lookup reached a registry (or server) that has no record
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Upstream { status_code, .. } => matches!(status_code, Some(404)),
            _ => false,
        }
    }

    /// Whether repeating the same call could plausibly succeed.
    ///
    /// Nothing in the crate retries on its own; this is for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Upstream { status_code, .. } => match status_code {
                Some(code) => *code == 429 || *code >= 500,
                None => true,
            },
            _ => false,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { message } => {
                format!("❌ Invalid query: {}\n💡 Check the domain, IP address or AS number format", message)
            }
            Self::NotFound { message } => {
                format!("🔍 Not found: {}\n💡 The bootstrap registry has no RDAP service for this resource", message)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 The server returned data in an unexpected shape", message)
            }
            Self::Upstream { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Upstream error{}: {}\n💡 Check your internet connection or try another server", status, message)
            }
            Self::Timeout { operation, timeout_secs } => {
                format!("⏱️  Operation '{}' timed out after {}s\n💡 Try increasing RDAP_TIMEOUT_SECS", operation, timeout_secs)
            }
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or environment", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

/// Convert from common error types
impl From<reqwest::Error> for RdapError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::timeout("HTTP request", 30)
        } else if err.is_connect() {
            Self::upstream("Connection failed", status_code, url)
        } else if err.is_decode() {
            Self::parse(err.to_string(), None)
        } else {
            Self::upstream(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for RdapError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<std::io::Error> for RdapError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

impl From<tokio::time::error::Elapsed> for RdapError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::timeout("Operation", 30)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RdapError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! invalid_input {
    ($msg:expr) => {
        $crate::error::RdapError::invalid_input($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::RdapError::invalid_input(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! parse_error {
    ($msg:expr) => {
        $crate::error::RdapError::parse($msg, None)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::RdapError::parse(format!($fmt, $($arg)*), None)
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::RdapError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::RdapError::internal(format!($fmt, $($arg)*))
    };
}
