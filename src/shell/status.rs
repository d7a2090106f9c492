//! The single user-facing status message

use crate::error::Error;

/// Holds the one message shown to the user; each report replaces the last
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusLine {
    message: Option<String>,
    is_error: bool,
}

impl StatusLine {
    pub fn info(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.is_error = false;
    }

    pub fn fail(&mut self, error: &Error) {
        self.message = Some(describe(error));
        self.is_error = true;
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.is_error = false;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

/// Human-readable text for an error
pub fn describe(error: &Error) -> String {
    match error {
        Error::InputRejected(reason) => format!("Please choose PDF files: {}", reason),
        Error::DecodeFailure { name, .. } => format!(
            "{} could not be opened. It may be damaged or password protected.",
            name
        ),
        Error::LimitExceeded(reason) => format!("Not allowed: {}", reason),
        Error::IncompleteExport { delivered, total, reason } => format!(
            "Only {} of {} files were saved; the rest failed: {}",
            delivered, total, reason
        ),
        other => other.to_string(),
    }
}
