//! Structured user notices
//!
//! Core operations report outcomes as [`Notice`] values; the rendering layer
//! decides how to deliver them (toast, banner, log line). The core never
//! touches UI machinery.

use serde::Serialize;

/// Notice severity, mirrored by the rendering layer's toast variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A single user-facing notice
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub severity: Severity,
    /// Sticky notices stay on screen until dismissed
    pub sticky: bool,
    pub title: Option<String>,
    pub message: String,
}

impl Notice {
    /// Transient informational notice
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            sticky: false,
            title: None,
            message: message.into(),
        }
    }

    /// Sticky informational notice with a title
    pub fn info_sticky(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            sticky: true,
            title: Some(title.into()),
            message: message.into(),
        }
    }

    /// Transient success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            sticky: false,
            title: None,
            message: message.into(),
        }
    }

    /// Error notices are always sticky
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            sticky: true,
            title: Some(title.into()),
            message: message.into(),
        }
    }

    /// Sticky error notice with no title
    pub fn error_untitled(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            sticky: true,
            title: None,
            message: message.into(),
        }
    }
}
