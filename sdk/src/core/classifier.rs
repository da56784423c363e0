//! Maps program fault codes onto the SDK error taxonomy

use crate::core::{
    Diagnostics, PositionViolation, SdkError, StatusConflict, TransportFault,
    UnauthorizedReason, WhitelistViolation, ALLOWED_DURATION_DAYS,
};

/// Fault phrasings that mean "the account does not exist"
const NOT_FOUND_PHRASES: [&str; 4] = [
    "account does not exist",
    "could not find account",
    "accountnotfound",
    "account not found",
];

/// Custom error codes emitted by the Yield Market program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramErrorCode {
    ProtocolPaused = 6000,
    InvalidDuration = 6001,
    InvalidPrice = 6002,
    InvalidAmount = 6003,
    DealNotAvailable = 6004,
    DealNotActive = 6005,
    DealNotEnded = 6006,
    DealAlreadyEnded = 6007,
    DealAlreadyActive = 6008,
    NotSeller = 6009,
    NotBuyer = 6010,
    InsufficientFunds = 6011,
    Unauthorized = 6012,
    Overflow = 6013,
    AssetNotAllowed = 6014,
    WhitelistFull = 6015,
    AlreadyWhitelisted = 6016,
    NotWhitelisted = 6017,
    InvalidPosition = 6018,
    PositionPoolMismatch = 6019,
    InvalidPositionToken = 6020,
    NotDealBuyer = 6021,
}

impl ProgramErrorCode {
    pub const ALL: [ProgramErrorCode; 22] = [
        Self::ProtocolPaused,
        Self::InvalidDuration,
        Self::InvalidPrice,
        Self::InvalidAmount,
        Self::DealNotAvailable,
        Self::DealNotActive,
        Self::DealNotEnded,
        Self::DealAlreadyEnded,
        Self::DealAlreadyActive,
        Self::NotSeller,
        Self::NotBuyer,
        Self::InsufficientFunds,
        Self::Unauthorized,
        Self::Overflow,
        Self::AssetNotAllowed,
        Self::WhitelistFull,
        Self::AlreadyWhitelisted,
        Self::NotWhitelisted,
        Self::InvalidPosition,
        Self::PositionPoolMismatch,
        Self::InvalidPositionToken,
        Self::NotDealBuyer,
    ];

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    /// Default human-readable message for the code
    pub fn message(self) -> &'static str {
        match self {
            Self::ProtocolPaused => "Protocol is paused",
            Self::InvalidDuration => "Invalid deal duration",
            Self::InvalidPrice => "Invalid selling price",
            Self::InvalidAmount => "Invalid amount",
            Self::DealNotAvailable => "Deal is not available for purchase",
            Self::DealNotActive => "Deal is not active",
            Self::DealNotEnded => "Deal has not ended yet",
            Self::DealAlreadyEnded => "Deal has already ended",
            Self::DealAlreadyActive => "Deal is already active",
            Self::NotSeller => "Signer is not the seller",
            Self::NotBuyer => "Signer is not the buyer",
            Self::InsufficientFunds => "Insufficient funds",
            Self::Unauthorized => "Unauthorized",
            Self::Overflow => "Arithmetic overflow",
            Self::AssetNotAllowed => "Asset is not allowed",
            Self::WhitelistFull => "Whitelist is full",
            Self::AlreadyWhitelisted => "Asset is already whitelisted",
            Self::NotWhitelisted => "Asset is not whitelisted",
            Self::InvalidPosition => "Invalid liquidity position",
            Self::PositionPoolMismatch => "Position does not belong to the pool",
            Self::InvalidPositionToken => "Invalid position token",
            Self::NotDealBuyer => "Signer is not this deal's buyer",
        }
    }
}

/// Caller-supplied context used to enrich classified errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub deal_id: Option<u64>,
    pub duration_days: Option<u64>,
    pub operation: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operation(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Self::default()
        }
    }

    pub fn with_deal_id(mut self, deal_id: u64) -> Self {
        self.deal_id = Some(deal_id);
        self
    }

    pub fn with_duration(mut self, days: u64) -> Self {
        self.duration_days = Some(days);
        self
    }
}

/// Case-insensitive check for the transport's "account not found" phrasings.
///
/// This is a text match against the transport's wording; the transport offers
/// no dedicated not-found signal.
pub fn is_not_found_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    NOT_FOUND_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// First run of ASCII digits in `text`, if it parses as u64
pub fn first_decimal_run(text: &str) -> Option<u64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Classify an error. Structured errors pass through unchanged; only raw
/// transport faults are mapped.
pub fn classify_error(err: SdkError, context: &ErrorContext) -> SdkError {
    match err {
        SdkError::Transport(fault) => classify_fault(fault, context),
        structured => structured,
    }
}

/// Map a raw transport fault onto the taxonomy using the fixed code table.
/// A fault without a program code never reached program execution and stays
/// a [`SdkError::Transport`].
pub fn classify_fault(fault: TransportFault, context: &ErrorContext) -> SdkError {
    if fault.code.is_none() {
        return SdkError::Transport(fault);
    }

    let TransportFault {
        code,
        message,
        logs,
    } = fault;

    let diagnostics = Diagnostics {
        code,
        logs,
        operation: context.operation.clone(),
    };

    let Some(known) = code.and_then(ProgramErrorCode::from_code) else {
        return SdkError::Program {
            message: message.unwrap_or_else(|| "Unknown program error".to_string()),
            diagnostics,
        };
    };

    let raw_message = message.unwrap_or_default();
    let default_message = known.message().to_string();

    match known {
        ProgramErrorCode::ProtocolPaused => SdkError::ProtocolPaused {
            message: default_message,
            diagnostics,
        },
        ProgramErrorCode::InvalidDuration => {
            let days = context
                .duration_days
                .or_else(|| first_decimal_run(&raw_message));
            SdkError::InvalidDuration {
                message: duration_message(days),
                days,
                diagnostics,
            }
        }
        ProgramErrorCode::InvalidPrice => SdkError::InvalidPrice {
            message: default_message,
            diagnostics,
        },
        ProgramErrorCode::InvalidAmount => SdkError::InvalidAmount {
            message: default_message,
            diagnostics,
        },
        ProgramErrorCode::DealNotAvailable => {
            let deal_id = context.deal_id.or_else(|| first_decimal_run(&raw_message));
            let message = match deal_id {
                Some(id) => format!("Deal {} is not available for purchase", id),
                None => default_message,
            };
            SdkError::DealNotAvailable {
                deal_id,
                message,
                diagnostics,
            }
        }
        ProgramErrorCode::DealNotActive => {
            status_conflict(StatusConflict::NotActive, known, context, diagnostics)
        }
        ProgramErrorCode::DealNotEnded => {
            status_conflict(StatusConflict::NotEnded, known, context, diagnostics)
        }
        ProgramErrorCode::DealAlreadyEnded => {
            status_conflict(StatusConflict::AlreadyEnded, known, context, diagnostics)
        }
        ProgramErrorCode::DealAlreadyActive => {
            status_conflict(StatusConflict::AlreadyActive, known, context, diagnostics)
        }
        ProgramErrorCode::NotSeller => {
            unauthorized(UnauthorizedReason::NotSeller, known, diagnostics)
        }
        ProgramErrorCode::NotBuyer => {
            unauthorized(UnauthorizedReason::NotBuyer, known, diagnostics)
        }
        ProgramErrorCode::Unauthorized => {
            unauthorized(UnauthorizedReason::Generic, known, diagnostics)
        }
        ProgramErrorCode::NotDealBuyer => {
            unauthorized(UnauthorizedReason::NotDealBuyer, known, diagnostics)
        }
        ProgramErrorCode::InsufficientFunds => SdkError::InsufficientFunds {
            message: default_message,
            diagnostics,
        },
        ProgramErrorCode::Overflow => SdkError::Overflow {
            message: default_message,
            diagnostics,
        },
        ProgramErrorCode::AssetNotAllowed => {
            whitelist(WhitelistViolation::AssetNotAllowed, known, diagnostics)
        }
        ProgramErrorCode::WhitelistFull => {
            whitelist(WhitelistViolation::WhitelistFull, known, diagnostics)
        }
        ProgramErrorCode::AlreadyWhitelisted => {
            whitelist(WhitelistViolation::AlreadyWhitelisted, known, diagnostics)
        }
        ProgramErrorCode::NotWhitelisted => {
            whitelist(WhitelistViolation::NotWhitelisted, known, diagnostics)
        }
        ProgramErrorCode::InvalidPosition => {
            position(PositionViolation::InvalidPosition, known, diagnostics)
        }
        ProgramErrorCode::PositionPoolMismatch => {
            position(PositionViolation::PoolMismatch, known, diagnostics)
        }
        ProgramErrorCode::InvalidPositionToken => {
            position(PositionViolation::InvalidPositionToken, known, diagnostics)
        }
    }
}

pub(crate) fn duration_message(days: Option<u64>) -> String {
    let allowed = ALLOWED_DURATION_DAYS
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    match days {
        Some(days) => format!(
            "Invalid duration: {} days. Allowed durations: {} days",
            days, allowed
        ),
        None => format!("Invalid duration. Allowed durations: {} days", allowed),
    }
}

fn status_conflict(
    conflict: StatusConflict,
    code: ProgramErrorCode,
    context: &ErrorContext,
    diagnostics: Diagnostics,
) -> SdkError {
    let message = match context.deal_id {
        Some(id) => format!("{} (deal {})", code.message(), id),
        None => code.message().to_string(),
    };
    SdkError::StatusConflict {
        conflict,
        deal_id: context.deal_id,
        message,
        diagnostics,
    }
}

fn unauthorized(
    reason: UnauthorizedReason,
    code: ProgramErrorCode,
    diagnostics: Diagnostics,
) -> SdkError {
    SdkError::Unauthorized {
        reason,
        message: code.message().to_string(),
        diagnostics,
    }
}

fn whitelist(
    violation: WhitelistViolation,
    code: ProgramErrorCode,
    diagnostics: Diagnostics,
) -> SdkError {
    SdkError::Whitelist {
        violation,
        message: code.message().to_string(),
        diagnostics,
    }
}

fn position(
    violation: PositionViolation,
    code: ProgramErrorCode,
    diagnostics: Diagnostics,
) -> SdkError {
    SdkError::LiquidityPosition {
        violation,
        message: code.message().to_string(),
        diagnostics,
    }
}
