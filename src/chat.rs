//! Client for the chat relay endpoint.
//!
//! The relay takes `{ message, history }` and answers with
//! `{ type: "MESSAGE" | "ACTION", text, action }`. Every failure is turned
//! into a displayable [`ChatReply`] so the chat widget never has an error
//! path of its own.

use crate::config::{SiteConfig, CHAT_HISTORY_TURNS, CHAT_MAX_MESSAGE_CHARS};
use crate::error::{Result, SiteError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<ChatTurn>,
}

impl ChatRequest {
    /// Build a request carrying only the last few turns of context.
    pub fn new(message: &str, history: &[ChatTurn]) -> Self {
        let start = history.len().saturating_sub(CHAT_HISTORY_TURNS);
        Self {
            message: message.trim().to_string(),
            history: history[start..].to_vec(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.message.is_empty() {
            return Err(SiteError::InvalidInput("Type a message first.".into()));
        }
        if self.message.chars().count() > CHAT_MAX_MESSAGE_CHARS {
            return Err(SiteError::InvalidInput(format!(
                "Messages are limited to {} characters.",
                CHAT_MAX_MESSAGE_CHARS
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReplyKind {
    #[default]
    #[serde(rename = "MESSAGE")]
    Message,
    #[serde(rename = "ACTION")]
    Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(rename = "type", default)]
    pub kind: ReplyKind,
    pub text: String,
    #[serde(default)]
    pub action: Option<String>,
    /// Set locally when the reply stands in for a failed request.
    #[serde(skip)]
    pub is_error: bool,
}

impl ChatReply {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Message,
            text: text.into(),
            action: None,
            is_error: true,
        }
    }

    /// The site action to run, for `ACTION` replies with a recognized action.
    pub fn site_action(&self) -> Option<SiteAction> {
        match self.kind {
            ReplyKind::Action => self.action.as_deref().and_then(SiteAction::parse),
            ReplyKind::Message => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    text: String,
}

/// Things the assistant can ask the page to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteAction {
    /// Scroll the section with this element id into view
    ScrollTo(String),
    /// Open the project modal for this project id
    OpenProject(String),
    /// Open an external https link in a new tab
    OpenUrl(String),
}

impl SiteAction {
    /// Parse `SCROLL_TO:projects`, `OPEN_PROJECT:folio`, `OPEN_URL:https://…`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (verb, arg) = raw.trim().split_once(':')?;
        let arg = arg.trim();
        if arg.is_empty() {
            return None;
        }
        match verb.trim().to_ascii_uppercase().as_str() {
            "SCROLL_TO" => Some(SiteAction::ScrollTo(arg.to_string())),
            "OPEN_PROJECT" => Some(SiteAction::OpenProject(arg.to_string())),
            "OPEN_URL" if arg.starts_with("https://") => Some(SiteAction::OpenUrl(arg.to_string())),
            _ => None,
        }
    }
}

/// Absolute URL for the relay; relative endpoints are joined to `origin`.
pub fn endpoint_url(origin: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

fn page_origin() -> Result<String> {
    let window = web_sys::window().ok_or(SiteError::NoWindow)?;
    window
        .location()
        .origin()
        .map_err(|_| SiteError::NoWindow)
}

async fn post_chat(config: &SiteConfig, request: &ChatRequest) -> Result<ChatReply> {
    request.validate()?;
    let url = endpoint_url(&page_origin()?, &config.chat_endpoint);

    let response = reqwest::Client::new()
        .post(&url)
        .json(request)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let text = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.text)
            .unwrap_or_default();
        return Err(SiteError::Status {
            status: status.as_u16(),
            text,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Send one message to the relay. Never fails: errors come back as a reply
/// with `is_error` set.
pub async fn send_message(config: &SiteConfig, message: &str, history: &[ChatTurn]) -> ChatReply {
    let request = ChatRequest::new(message, history);
    debug!(
        "Sending chat message ({} chars, {} turns of context)",
        request.message.len(),
        request.history.len()
    );
    match post_chat(config, &request).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Chat relay failed: {}", e);
            ChatReply::error(e.user_message())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_keeps_trailing_history() {
        let history: Vec<ChatTurn> = (0..10)
            .map(|i| ChatTurn::user(format!("turn {}", i)))
            .collect();
        let req = ChatRequest::new("  hi  ", &history);
        assert_eq!(req.message, "hi");
        assert_eq!(req.history.len(), CHAT_HISTORY_TURNS);
        assert_eq!(req.history[0].text, "turn 4");
    }

    #[test]
    fn test_request_without_history_omits_field() {
        let json = serde_json::to_value(ChatRequest::new("hello", &[])).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "hello" }));

        let json = serde_json::to_value(ChatRequest::new("x", &[ChatTurn::assistant("y")])).unwrap();
        assert_eq!(json["history"][0]["role"], "assistant");
    }

    #[test]
    fn test_validate() {
        assert!(ChatRequest::new("   ", &[]).validate().is_err());
        let long = "a".repeat(CHAT_MAX_MESSAGE_CHARS + 1);
        assert!(ChatRequest::new(&long, &[]).validate().is_err());
        assert!(ChatRequest::new("ok", &[]).validate().is_ok());
    }

    #[test]
    fn test_reply_decoding() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"type": "ACTION", "text": "Here are my projects", "action": "SCROLL_TO:projects"}"#,
        )
        .unwrap();
        assert_eq!(reply.kind, ReplyKind::Action);
        assert!(!reply.is_error);
        assert_eq!(
            reply.site_action(),
            Some(SiteAction::ScrollTo("projects".into()))
        );

        let reply: ChatReply =
            serde_json::from_str(r#"{"type": "MESSAGE", "text": "Hi!", "action": null}"#).unwrap();
        assert_eq!(reply.site_action(), None);

        let reply: ChatReply = serde_json::from_str(r#"{"text": "bare"}"#).unwrap();
        assert_eq!(reply.kind, ReplyKind::Message);
    }

    #[test]
    fn test_message_replies_ignore_action_field() {
        let reply = ChatReply {
            kind: ReplyKind::Message,
            text: "t".into(),
            action: Some("SCROLL_TO:contact".into()),
            is_error: false,
        };
        assert_eq!(reply.site_action(), None);
    }

    #[test]
    fn test_site_action_parse() {
        assert_eq!(
            SiteAction::parse("open_project: folio"),
            Some(SiteAction::OpenProject("folio".into()))
        );
        assert_eq!(
            SiteAction::parse("OPEN_URL:https://example.com/cv.pdf"),
            Some(SiteAction::OpenUrl("https://example.com/cv.pdf".into()))
        );
        assert_eq!(SiteAction::parse("OPEN_URL:javascript:alert(1)"), None);
        assert_eq!(SiteAction::parse("SCROLL_TO:"), None);
        assert_eq!(SiteAction::parse("DANCE:now"), None);
        assert_eq!(SiteAction::parse("nonsense"), None);
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("https://me.dev/", "/api/chat"),
            "https://me.dev/api/chat"
        );
        assert_eq!(
            endpoint_url("https://me.dev", "https://relay.example/chat"),
            "https://relay.example/chat"
        );
    }

    #[test]
    fn test_error_reply_is_flagged() {
        let reply = ChatReply::error("offline");
        assert!(reply.is_error);
        assert_eq!(reply.site_action(), None);
    }
}
