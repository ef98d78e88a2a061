//! Result and error types for Ensayo.

use thiserror::Error;

/// Result type for Ensayo operations
pub type EnsayoResult<T> = Result<T, EnsayoError>;

/// Errors that can occur in Ensayo
#[derive(Debug, Error)]
pub enum EnsayoError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A bounded wait expired before its condition held
    #[error("Timed out after {ms}ms waiting for {condition}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Condition that was waited for
        condition: String,
    },

    /// JavaScript evaluation error
    #[error("Script evaluation failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Input dispatch error
    #[error("Input dispatch failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Settings file missing, unreadable, or structurally invalid
    #[error("Settings error: {message}")]
    Settings {
        /// Error message
        message: String,
    },

    /// Test data file missing a sheet or carrying malformed rows
    #[error("Test data error: {message}")]
    TestData {
        /// Error message
        message: String,
    },

    /// Session fixture error (setup/teardown failed)
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// A test expectation did not hold
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// A measured interaction failed; the measurement was reported first
    #[error("Interaction '{interaction}' failed: {message}")]
    Interaction {
        /// Interaction label
        interaction: String,
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl EnsayoError {
    /// Short kind name for report lines (the error's variant name)
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BrowserLaunch { .. } => "BrowserLaunch",
            Self::Page { .. } => "Page",
            Self::Navigation { .. } => "Navigation",
            Self::Timeout { .. } => "Timeout",
            Self::Script { .. } => "Script",
            Self::Input { .. } => "Input",
            Self::Screenshot { .. } => "Screenshot",
            Self::Settings { .. } => "Settings",
            Self::TestData { .. } => "TestData",
            Self::Session { .. } => "Session",
            Self::Assertion { .. } => "Assertion",
            Self::Interaction { .. } => "Interaction",
            Self::Io(_) => "Io",
            Self::Json(_) => "Json",
            Self::Yaml(_) => "Yaml",
        }
    }
}
