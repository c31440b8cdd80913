//! Validation result records
//!
//! A field either has no result (valid, nothing to report) or exactly one
//! [`ValidationResult`]. Only [`Severity::Error`] makes an outcome fail.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Machine-readable result code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Required,
    Length,
    MinLength,
    MaxLength,
    Min,
    Max,
    Precision,
    Pattern,
    Source,
    Accept,
    MaxSize,
    Pair,
    InvalidText,
    InvalidNumber,
    InvalidBoolean,
    InvalidDate,
    InvalidMonth,
    InvalidDateTime,
    InvalidFile,
    /// Code chosen by a caller-supplied validator
    Custom(String),
}

impl ResultCode {
    pub fn as_str(&self) -> &str {
        match self {
            ResultCode::Required => "required",
            ResultCode::Length => "length",
            ResultCode::MinLength => "minLength",
            ResultCode::MaxLength => "maxLength",
            ResultCode::Min => "min",
            ResultCode::Max => "max",
            ResultCode::Precision => "precision",
            ResultCode::Pattern => "pattern",
            ResultCode::Source => "source",
            ResultCode::Accept => "accept",
            ResultCode::MaxSize => "maxSize",
            ResultCode::Pair => "pair",
            ResultCode::InvalidText => "invalidText",
            ResultCode::InvalidNumber => "invalidNumber",
            ResultCode::InvalidBoolean => "invalidBoolean",
            ResultCode::InvalidDate => "invalidDate",
            ResultCode::InvalidMonth => "invalidMonth",
            ResultCode::InvalidDateTime => "invalidDateTime",
            ResultCode::InvalidFile => "invalidFile",
            ResultCode::Custom(code) => code,
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ResultCode {
    fn from(code: &str) -> Self {
        ResultCode::Custom(code.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub severity: Severity,
    pub code: ResultCode,
    pub message: String,
}

impl ValidationResult {
    pub fn new(
        severity: Severity,
        code: impl Into<ResultCode>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn error(code: impl Into<ResultCode>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: impl Into<ResultCode>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn info(code: impl Into<ResultCode>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": self.severity.to_string(),
            "code": self.code.as_str(),
            "message": self.message,
        })
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)
    }
}
