//! SDK error types

use std::fmt;

use thiserror::Error;

/// Raw fault reported by the transport before classification
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", .message.as_deref().unwrap_or("unknown transport fault"))]
pub struct TransportFault {
    /// Custom program error code, when the fault came from program execution
    pub code: Option<u32>,
    pub message: Option<String>,
    /// Program log lines captured with the fault
    pub logs: Vec<String>,
}

impl TransportFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: Some(message.into()),
            logs: Vec::new(),
        }
    }

    pub fn with_code(code: u32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn logs(mut self, logs: Vec<String>) -> Self {
        self.logs = logs;
        self
    }

    /// Whether the fault text says the requested account does not exist
    pub fn is_not_found(&self) -> bool {
        self.message
            .as_deref()
            .map(crate::core::is_not_found_message)
            .unwrap_or(false)
    }
}

/// Code, log trace and operation carried through classification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub code: Option<u32>,
    pub logs: Vec<String>,
    pub operation: Option<String>,
}

impl Diagnostics {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Which party check failed on the program side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedReason {
    NotSeller,
    NotBuyer,
    NotDealBuyer,
    Generic,
}

/// Deal status precondition that the program rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusConflict {
    NotActive,
    NotEnded,
    AlreadyEnded,
    AlreadyActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistViolation {
    AssetNotAllowed,
    WhitelistFull,
    AlreadyWhitelisted,
    NotWhitelisted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionViolation {
    InvalidPosition,
    PoolMismatch,
    InvalidPositionToken,
}

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Caller-supplied data failed a local precondition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{message}")]
    InvalidDuration {
        days: Option<u64>,
        message: String,
        diagnostics: Diagnostics,
    },

    #[error("{message}")]
    ProtocolPaused {
        message: String,
        diagnostics: Diagnostics,
    },

    #[error("{message}")]
    InvalidPrice {
        message: String,
        diagnostics: Diagnostics,
    },

    #[error("{message}")]
    InvalidAmount {
        message: String,
        diagnostics: Diagnostics,
    },

    #[error("{message}")]
    DealNotAvailable {
        deal_id: Option<u64>,
        message: String,
        diagnostics: Diagnostics,
    },

    #[error("{message}")]
    StatusConflict {
        conflict: StatusConflict,
        deal_id: Option<u64>,
        message: String,
        diagnostics: Diagnostics,
    },

    #[error("{message}")]
    Unauthorized {
        reason: UnauthorizedReason,
        message: String,
        diagnostics: Diagnostics,
    },

    #[error("{message}")]
    InsufficientFunds {
        message: String,
        diagnostics: Diagnostics,
    },

    #[error("{message}")]
    Overflow {
        message: String,
        diagnostics: Diagnostics,
    },

    #[error("{message}")]
    Whitelist {
        violation: WhitelistViolation,
        message: String,
        diagnostics: Diagnostics,
    },

    #[error("{message}")]
    LiquidityPosition {
        violation: PositionViolation,
        message: String,
        diagnostics: Diagnostics,
    },

    /// Program error with a code outside the known table
    #[error("Program error{}: {message}", CodeSuffix(.diagnostics.code))]
    Program {
        message: String,
        diagnostics: Diagnostics,
    },

    /// Transport failure that is not "account not found"
    #[error("Failed to fetch {target}: {source}")]
    Fetch {
        target: String,
        #[source]
        source: TransportFault,
    },

    /// Unclassified transport fault
    #[error("Transport fault: {0}")]
    Transport(TransportFault),

    /// Account carries a variant tag this SDK does not know about
    #[error("Unknown {field} variant tag {tag}; the SDK does not match the deployed program")]
    UnknownVariant { field: &'static str, tag: u64 },

    #[error("Value {0} exceeds the largest integer representable without precision loss")]
    PrecisionOverflow(String),

    #[error("Invalid amount format: {0:?}")]
    InvalidAmountFormat(String),

    #[error("Negative value not allowed: {0}")]
    NegativeValue(i128),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Failed to deserialize account: {0}")]
    DeserializationError(String),

    #[error("Failed to serialize data: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

struct CodeSuffix(Option<u32>);

impl fmt::Display for CodeSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, " {}", code),
            None => Ok(()),
        }
    }
}

impl SdkError {
    /// Diagnostics attached to program-originated errors
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            SdkError::InvalidDuration { diagnostics, .. }
            | SdkError::ProtocolPaused { diagnostics, .. }
            | SdkError::InvalidPrice { diagnostics, .. }
            | SdkError::InvalidAmount { diagnostics, .. }
            | SdkError::DealNotAvailable { diagnostics, .. }
            | SdkError::StatusConflict { diagnostics, .. }
            | SdkError::Unauthorized { diagnostics, .. }
            | SdkError::InsufficientFunds { diagnostics, .. }
            | SdkError::Overflow { diagnostics, .. }
            | SdkError::Whitelist { diagnostics, .. }
            | SdkError::LiquidityPosition { diagnostics, .. }
            | SdkError::Program { diagnostics, .. } => Some(diagnostics),
            _ => None,
        }
    }

    /// Original numeric program code, if any
    pub fn code(&self) -> Option<u32> {
        match self {
            SdkError::Fetch { source, .. } | SdkError::Transport(source) => source.code,
            other => other.diagnostics().and_then(|d| d.code),
        }
    }

    /// Raw program log trace, if any
    pub fn logs(&self) -> &[String] {
        match self {
            SdkError::Fetch { source, .. } | SdkError::Transport(source) => &source.logs,
            other => other.diagnostics().map(|d| d.logs.as_slice()).unwrap_or(&[]),
        }
    }

    /// Errors that were raised locally and never reached the transport
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            SdkError::InvalidInput(_)
                | SdkError::PrecisionOverflow(_)
                | SdkError::InvalidAmountFormat(_)
                | SdkError::NegativeValue(_)
                | SdkError::InvalidArgument(_)
        ) || matches!(self, SdkError::InvalidDuration { diagnostics, .. } if diagnostics.code.is_none())
    }

    /// Decode incompatibilities cannot be fixed by retrying or changing input
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            SdkError::UnknownVariant { .. } | SdkError::DeserializationError(_)
        )
    }

    pub(crate) fn overflow(message: impl Into<String>) -> Self {
        SdkError::Overflow {
            message: message.into(),
            diagnostics: Diagnostics::none(),
        }
    }
}

impl From<TransportFault> for SdkError {
    fn from(fault: TransportFault) -> Self {
        SdkError::Transport(fault)
    }
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::SerializationError(err.to_string())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_error_display_includes_code() {
        let err = SdkError::Program {
            message: "custom failure".to_string(),
            diagnostics: Diagnostics {
                code: Some(6099),
                ..Diagnostics::none()
            },
        };
        assert_eq!(err.to_string(), "Program error 6099: custom failure");
        assert_eq!(err.code(), Some(6099));
    }

    #[test]
    fn test_fetch_error_keeps_source() {
        let fault = TransportFault::new("connection refused").logs(vec!["log".to_string()]);
        let err = SdkError::Fetch {
            target: "deal".to_string(),
            source: fault,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.logs(), ["log".to_string()]);
    }

    #[test]
    fn test_unknown_variant_is_not_recoverable() {
        let err = SdkError::UnknownVariant {
            field: "status",
            tag: 9,
        };
        assert!(!err.is_recoverable());
        assert!(SdkError::InvalidInput("x".into()).is_local());
    }
}
