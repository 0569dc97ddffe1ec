//! Error types for the site's network boundary.
//!
//! The tiering core never fails; everything here comes from the chat relay,
//! the GitHub activity fetch, or a missing browser environment.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    /// Transport-level failure (offline, CORS, DNS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; `text` is the server's explanation when it sent one
    #[error("Request failed with status {status}: {text}")]
    Status { status: u16, text: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No browser window available")]
    NoWindow,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SiteError {
    /// Short text suitable for showing in the UI.
    pub fn user_message(&self) -> String {
        match self {
            SiteError::Http(_) => "I can't reach the server right now. Check your connection and try again.".to_string(),
            SiteError::Status { text, .. } if !text.trim().is_empty() => text.clone(),
            SiteError::Status { status, .. } if *status == 429 => {
                "Too many messages at once. Give it a minute and try again.".to_string()
            }
            SiteError::Status { .. } => "Something went wrong on my end. Please try again later.".to_string(),
            SiteError::Json(_) => "I got a reply I couldn't read. Please try again.".to_string(),
            SiteError::NoWindow => "This feature needs a browser.".to_string(),
            SiteError::InvalidInput(msg) => msg.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
