use crate::xdm::ExpandedName;
use core::fmt;
use std::sync::Arc;

/// Namespace URI used for W3C-defined XPath/XQuery error codes (xqt-errors).
pub const ERR_NS: &str = "http://www.w3.org/2005/xqt-errors";

/// Canonicalized set of error codes this core currently emits.
/// This is intentionally small and will be expanded alongside feature coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Generic dynamic error; also used for iteration failures surfaced by
    /// underlying storage and for close-action failures.
    FOER0000,
    /// No namespace found for a (mandatory) prefix.
    FONS0004,
    /// Invalid lexical value, e.g. a malformed lexical QName.
    FOCA0002,
    /// Type error.
    XPTY0004,
    // Fallback / unknown (kept last)
    Unknown,
}

impl ErrorCode {
    /// Returns the QName (`ExpandedName`) for this W3C-defined error code.
    pub fn qname(&self) -> ExpandedName {
        ExpandedName {
            ns_uri: Some(ERR_NS.to_string()),
            local: match self {
                ErrorCode::FOER0000 => "FOER0000".to_string(),
                ErrorCode::FONS0004 => "FONS0004".to_string(),
                ErrorCode::FOCA0002 => "FOCA0002".to_string(),
                ErrorCode::XPTY0004 => "XPTY0004".to_string(),
                ErrorCode::Unknown => "UNKNOWN".to_string(),
            },
        }
    }

    pub fn from_code(s: &str) -> Self {
        use ErrorCode::*;
        match s {
            "err:FOER0000" => FOER0000,
            "err:FONS0004" => FONS0004,
            "err:FOCA0002" => FOCA0002,
            "err:XPTY0004" => XPTY0004,
            _ => Unknown,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub struct Error {
    pub code: ExpandedName,
    pub message: String,
    #[source]
    pub source: Option<Arc<dyn std::error::Error + Send + Sync>>, // optional chained cause
}

impl Error {
    /// QName-centric constructor. Stores the QName directly.
    pub fn new_qname(code: ExpandedName, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), source: None }
    }

    pub fn from_code(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self::new_qname(code.qname(), msg)
    }

    pub fn code_enum(&self) -> ErrorCode {
        // Only ERR_NS codes map to the enum; others are Unknown.
        if self.code.ns_uri.as_deref() == Some(ERR_NS) {
            let s = format!("err:{}", self.code.local);
            ErrorCode::from_code(&s)
        } else {
            ErrorCode::Unknown
        }
    }

    /// Format the code as a human-readable string (err:LOCAL or Q{ns}local).
    pub fn format_code(&self) -> String {
        if self.code.ns_uri.as_deref() == Some(ERR_NS) {
            format!("err:{}", self.code.local)
        } else if let Some(ns) = &self.code.ns_uri {
            format!("Q{{{}}}{}", ns, self.code.local)
        } else {
            self.code.local.clone()
        }
    }

    /// Compose an error with a source cause.
    pub fn with_source(
        mut self,
        source: impl Into<Option<Arc<dyn std::error::Error + Send + Sync>>>,
    ) -> Self {
        self.source = source.into();
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {} ({})", self.message, self.format_code())
    }
}
